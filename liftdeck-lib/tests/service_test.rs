use anyhow::Result;
use liftdeck_lib::{
    AppService, BuilderIntent, Config, DbError, ExerciseOption, Feel, PlanSource,
    PresetTemplate, SaveOutcome, SelectorAction, Units,
};

// Helper function to create a test service with in-memory database
fn create_test_service() -> Result<AppService> {
    create_test_service_with_config(Config::default())
}

fn create_test_service_with_config(config: Config) -> Result<AppService> {
    AppService::in_memory(config)
}

// Builds and saves a custom workout through the builder, like the UIs do
fn create_via_builder(
    service: &AppService,
    name: &str,
    machines: &[&str],
    abs: &[&str],
) -> Result<i64> {
    let mut builder = service.open_builder(BuilderIntent::Create)?;
    let draft = builder.draft_mut().expect("builder just opened");
    draft.set_name(name);
    for machine in machines {
        draft.toggle_machine(machine);
    }
    for a in abs {
        draft.toggle_abs(a);
    }
    let (outcome, id) = service.save_builder(&mut builder)?;
    assert_eq!(outcome, SaveOutcome::Created);
    Ok(id.expect("created template has an id"))
}

#[test]
fn test_create_and_read_back_template() -> Result<()> {
    let service = create_test_service()?;
    let id = create_via_builder(
        &service,
        "Upper Body",
        &["Bench Press", "Lat Pulldown", "Tricep Pushdown"],
        &["Plank"],
    )?;

    let template = service.get_custom_template(id)?;
    assert_eq!(template.name, "Upper Body");
    assert!(!template.include_in_auto_schedule);
    assert!(template.updated_at.is_some());
    let machines: Vec<_> = template.machine_names().collect();
    assert_eq!(machines, ["Bench Press", "Lat Pulldown", "Tricep Pushdown"]);
    assert_eq!(template.exercises[1].region, "Back");
    assert_eq!(template.exercises[0].feel, Feel::Medium);
    assert!(template.exercises.iter().all(|e| e.sets.len() == 3
        && e.sets.iter().all(|s| s.weight.is_none() && s.rest.is_empty())));
    assert_eq!(template.abs.len(), 1);
    assert_eq!(template.abs[0].time.as_deref(), Some("60s"));
    Ok(())
}

#[test]
fn test_builder_rejects_existing_and_preset_names() -> Result<()> {
    let service = create_test_service()?;
    create_via_builder(&service, "Arms", &["Cable Bicep Curl"], &[])?;

    let mut builder = service.open_builder(BuilderIntent::Create)?;
    let draft = builder.draft_mut().unwrap();
    draft.toggle_machine("Dip Machine");

    draft.set_name(" ARMS ");
    assert!(builder.is_duplicate());

    builder.draft_mut().unwrap().set_name("chest day");
    assert!(builder.is_duplicate());
    let (outcome, id) = service.save_builder(&mut builder)?;
    assert_eq!(outcome, SaveOutcome::Disabled);
    assert_eq!(id, None);

    assert_eq!(service.list_custom_templates()?.len(), 1);
    Ok(())
}

#[test]
fn test_store_enforces_unique_names() -> Result<()> {
    let service = create_test_service()?;
    create_via_builder(&service, "Leg Day", &["Leg Press"], &[])?;

    let data = liftdeck_lib::CustomWorkoutData {
        name: "leg day".into(),
        ..Default::default()
    };
    let result = service.create_custom_template(&data);
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Workout name must be unique"));
    Ok(())
}

#[test]
fn test_edit_template_through_builder() -> Result<()> {
    let service = create_test_service()?;
    let id = create_via_builder(&service, "Push", &["Bench Press", "Pec Deck"], &[])?;
    create_via_builder(&service, "Pull", &["Lat Pulldown"], &[])?;

    let template = service.get_custom_template(id)?;
    let mut builder = service.open_builder(BuilderIntent::Edit(template))?;
    assert!(!builder.is_duplicate()); // Own name is excluded

    let draft = builder.draft_mut().unwrap();
    draft.set_name("Pull");
    assert!(builder.is_duplicate());

    let draft = builder.draft_mut().unwrap();
    draft.set_name("Push Day");
    draft.toggle_machine("Pec Deck");
    draft.toggle_machine("Shoulder Press Machine");
    draft.toggle_abs("Dead Bug");
    draft.set_include_in_auto_schedule(true);

    let (outcome, saved_id) = service.save_builder(&mut builder)?;
    assert_eq!(outcome, SaveOutcome::Updated(id));
    assert_eq!(saved_id, Some(id));
    assert!(!builder.is_open());

    let updated = service.get_custom_template(id)?;
    assert_eq!(updated.name, "Push Day");
    assert!(updated.include_in_auto_schedule);
    let machines: Vec<_> = updated.machine_names().collect();
    assert_eq!(machines, ["Bench Press", "Shoulder Press Machine"]);
    assert_eq!(updated.abs_names().collect::<Vec<_>>(), ["Dead Bug"]);
    assert_eq!(service.list_custom_templates()?.len(), 2);
    Ok(())
}

#[test]
fn test_delete_template_cascades() -> Result<()> {
    let service = create_test_service()?;
    let id = create_via_builder(&service, "Temp", &["Leg Press", "Squat Rack"], &["Plank"])?;

    service.delete_custom_template(id)?;
    assert!(service.list_custom_templates()?.is_empty());

    let orphan_sets: i64 =
        service
            .conn
            .query_row("SELECT COUNT(*) FROM template_sets", [], |row| row.get(0))?;
    assert_eq!(orphan_sets, 0);

    let result = service.delete_custom_template(id);
    assert!(matches!(
        result.unwrap_err().downcast_ref::<DbError>(),
        Some(DbError::TemplateNotFound(_))
    ));
    Ok(())
}

#[test]
fn test_find_template_by_id_or_name() -> Result<()> {
    let service = create_test_service()?;
    let id = create_via_builder(&service, "Back Attack", &["T-Bar Row"], &[])?;

    assert_eq!(service.find_custom_template(&id.to_string())?.id, id);
    assert_eq!(service.find_custom_template("back attack")?.id, id);
    let missing = service.find_custom_template("Nope").unwrap_err();
    assert!(matches!(
        missing.downcast_ref::<DbError>(),
        Some(DbError::TemplateNameNotFound(name)) if name == "Nope"
    ));
    assert!(missing
        .downcast_ref::<DbError>()
        .is_some_and(DbError::is_not_found));
    Ok(())
}

#[test]
fn test_resolve_selection() -> Result<()> {
    let service = create_test_service()?;
    let id = create_via_builder(&service, "Arms", &["Preacher Curl Machine"], &["Crunches"])?;

    let plan = service.resolve_selection("Arms")?;
    assert_eq!(plan.source, PlanSource::Custom(id));
    assert_eq!(plan.exercises.len(), 1);
    assert_eq!(plan.abs.len(), 1);

    let plan = service.resolve_selection("Legs")?;
    assert_eq!(plan.source, PlanSource::Preset(PresetTemplate::Legs));
    assert_eq!(plan.exercises[0].machine, "Squat Rack");

    assert!(service.resolve_selection("Leg Day").is_err());
    Ok(())
}

#[test]
fn test_selection_for_label() -> Result<()> {
    let service = create_test_service()?;
    let id = create_via_builder(&service, "Arms", &["Preacher Curl Machine"], &[])?;

    match service.selection_for_label("Arms")? {
        Some(SelectorAction::SelectCustom(template)) => assert_eq!(template.id, id),
        other => panic!("expected the custom workout, got {other:?}"),
    }
    assert_eq!(
        service.selection_for_label("Legs")?,
        Some(SelectorAction::SelectPreset(PresetTemplate::Legs))
    );
    // Custom names match exactly, like the selector list
    assert_eq!(service.selection_for_label("arms")?, None);
    assert_eq!(service.selection_for_label("Leg Day")?, None);
    Ok(())
}

#[test]
fn test_selection_for_label_reports_store_failures() -> Result<()> {
    let service = create_test_service()?;
    service.conn.execute_batch(
        "DROP TABLE template_abs;
         DROP TABLE template_sets;
         DROP TABLE template_exercises;
         DROP TABLE custom_templates;",
    )?;

    // A broken store must not read as "no such workout"
    assert!(service.selection_for_label("Legs").is_err());
    Ok(())
}

#[test]
fn test_catalog_extras_from_config() -> Result<()> {
    let config = Config {
        extra_exercises: vec![
            ExerciseOption {
                machine: "Smith Machine".into(),
                region: "Legs".into(),
            },
            // Duplicate of a built-in entry, skipped
            ExerciseOption {
                machine: "Bench Press".into(),
                region: "Arms".into(),
            },
        ],
        ..Default::default()
    };
    let service = create_test_service_with_config(config)?;
    assert_eq!(
        service.catalog().find_exercise("Smith Machine").map(|e| e.region.as_str()),
        Some("Legs")
    );
    assert_eq!(
        service.catalog().find_exercise("Bench Press").map(|e| e.region.as_str()),
        Some("Chest")
    );

    create_via_builder(&service, "Smith Legs", &["Smith Machine"], &[])?;
    Ok(())
}

#[test]
fn test_config_round_trip() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("config.toml");

    // Missing file writes defaults
    let config = liftdeck_lib::load_config_util(&path)?;
    assert!(path.exists());
    assert_eq!(config, Config::default());
    assert!(config.confirm_deletes);

    let mut changed = config.clone();
    changed.units = Units::Imperial;
    changed.confirm_deletes = false;
    changed.theme.header_color = "Cyan".into();
    liftdeck_lib::save_config_util(&path, &changed)?;

    let loaded = liftdeck_lib::load_config_util(&path)?;
    assert_eq!(loaded, changed);
    Ok(())
}

#[test]
fn test_partial_config_uses_defaults() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "units = \"imperial\"\n")?;

    let config = liftdeck_lib::load_config_util(&path)?;
    assert_eq!(config.units, Units::Imperial);
    assert!(config.confirm_deletes);
    assert_eq!(config.theme.header_color, "Green");
    assert!(config.extra_exercises.is_empty());
    Ok(())
}

#[test]
fn test_parse_color() {
    assert!(liftdeck_lib::parse_color("darkgrey").is_ok());
    assert!(liftdeck_lib::parse_color("GREEN").is_ok());
    assert!(liftdeck_lib::parse_color("chartreuse").is_err());
}
