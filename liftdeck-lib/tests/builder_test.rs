use anyhow::{bail, Result};
use liftdeck_lib::{
    BuilderError, BuilderIntent, Catalog, CustomWorkoutData, CustomWorkoutTemplate, Exercise,
    ExerciseOption, Feel, SaveOutcome, SessionWarning, WorkoutBuilder, WorkoutBuilderDelegate,
    WorkoutDraft, MAX_EXERCISES,
};

// Records every event the builder emits
#[derive(Default)]
struct RecordingDelegate {
    created: Vec<CustomWorkoutData>,
    updated: Vec<(i64, CustomWorkoutData)>,
    closed: usize,
    no_update: bool,
    fail: bool,
}

impl WorkoutBuilderDelegate for RecordingDelegate {
    fn on_create(&mut self, data: CustomWorkoutData) -> Result<()> {
        if self.fail {
            bail!("storage unavailable");
        }
        self.created.push(data);
        Ok(())
    }

    fn on_update(&mut self, id: i64, data: CustomWorkoutData) -> Result<()> {
        if self.fail {
            bail!("storage unavailable");
        }
        self.updated.push((id, data));
        Ok(())
    }

    fn supports_update(&self) -> bool {
        !self.no_update
    }

    fn on_close(&mut self) {
        self.closed += 1;
    }
}

fn machine_names(catalog: &Catalog, n: usize) -> Vec<String> {
    catalog
        .exercises()
        .iter()
        .take(n)
        .map(|e| e.machine.clone())
        .collect()
}

fn draft_with_machines(catalog: &Catalog, n: usize) -> WorkoutDraft {
    let mut draft = WorkoutDraft::reset(BuilderIntent::Create);
    for machine in machine_names(catalog, n) {
        assert!(draft.toggle_machine(&machine));
    }
    draft
}

fn push_day_template() -> CustomWorkoutTemplate {
    let catalog = Catalog::builtin();
    CustomWorkoutTemplate {
        id: 7,
        name: "Push Day".to_string(),
        exercises: vec![Exercise::from_option(
            catalog.find_exercise("Bench Press").unwrap(),
        )],
        abs: Vec::new(),
        include_in_auto_schedule: true,
        updated_at: None,
    }
}

#[test]
fn test_toggle_machine_below_cap() {
    let catalog = Catalog::builtin();
    let mut draft = draft_with_machines(&catalog, 5);
    assert_eq!(draft.machines().len(), 5);

    assert!(draft.toggle_machine("Dip Machine"));
    assert_eq!(draft.machines().len(), 6);
    assert!(draft.machines().contains("Dip Machine"));

    assert!(draft.toggle_machine("Dip Machine"));
    assert_eq!(draft.machines().len(), 5);
    assert!(!draft.machines().contains("Dip Machine"));
}

#[test]
fn test_toggle_machine_at_cap_is_ignored() {
    let catalog = Catalog::builtin();
    let mut draft = draft_with_machines(&catalog, MAX_EXERCISES);
    let before = draft.machines().clone();

    let extra = &catalog.exercises()[MAX_EXERCISES].machine;
    assert!(!draft.toggle_machine(extra));
    assert_eq!(draft.machines(), &before);
    assert_eq!(draft.machines().len(), MAX_EXERCISES);

    // Removing still works at the cap
    let first = catalog.exercises()[0].machine.clone();
    assert!(draft.toggle_machine(&first));
    assert_eq!(draft.machines().len(), MAX_EXERCISES - 1);
    assert!(draft.toggle_machine(extra));
    assert_eq!(draft.machines().len(), MAX_EXERCISES);
}

#[test]
fn test_toggle_abs_has_no_limit() {
    let catalog = Catalog::builtin();
    let mut draft = WorkoutDraft::reset(BuilderIntent::Create);
    for abs in catalog.abs() {
        assert!(draft.toggle_abs(&abs.name));
    }
    assert_eq!(draft.abs().len(), catalog.abs().len());
    assert!(catalog.abs().len() > 0);

    assert!(draft.toggle_abs("Plank"));
    assert!(!draft.abs().contains("Plank"));
    assert!(draft.toggle_abs("Plank"));
    assert!(draft.abs().contains("Plank"));
}

#[test]
fn test_duplicate_name_when_creating() {
    let existing = ["Leg Day", "Push"];
    let mut draft = WorkoutDraft::reset(BuilderIntent::Create);

    for name in ["leg day", "LEG DAY", "  Leg Day  ", "\tleg DAY\n"] {
        draft.set_name(name);
        assert!(draft.is_duplicate(&existing), "'{name}' should be a duplicate");
    }

    draft.set_name("Pull");
    assert!(!draft.is_duplicate(&existing));
}

#[test]
fn test_duplicate_name_excludes_template_being_edited() {
    let mut template = push_day_template();
    template.name = "Push".to_string();
    let existing = ["Push", "Pull"];

    let mut draft = WorkoutDraft::reset(BuilderIntent::Edit(template));
    assert_eq!(draft.name, "Push");
    assert!(!draft.is_duplicate(&existing));

    draft.set_name("push");
    assert!(!draft.is_duplicate(&existing));

    draft.set_name("Pull");
    assert!(draft.is_duplicate(&existing));
}

#[test]
fn test_save_disabled_cases() {
    let catalog = Catalog::builtin();
    let existing = ["Leg Day"];

    let mut draft = draft_with_machines(&catalog, 2);
    draft.set_name("");
    assert!(!draft.can_save(&existing));
    draft.set_name("   ");
    assert!(!draft.can_save(&existing));
    draft.set_name("leg day ");
    assert!(!draft.can_save(&existing));
    draft.set_name("Arms");
    assert!(draft.can_save(&existing));

    let mut empty = WorkoutDraft::reset(BuilderIntent::Create);
    empty.set_name("Arms");
    assert!(!empty.can_save(&existing));
}

#[test]
fn test_disabled_save_emits_nothing() -> Result<()> {
    let catalog = Catalog::builtin();
    let mut delegate = RecordingDelegate::default();
    let mut builder = WorkoutBuilder::new();

    // Closed builder
    assert_eq!(builder.save(&catalog, &mut delegate)?, SaveOutcome::Disabled);

    builder.open(BuilderIntent::Create, vec!["Push".to_string()]);
    builder.draft_mut().unwrap().set_name("   ");
    builder.draft_mut().unwrap().toggle_machine("Bench Press");
    assert!(!builder.can_save());
    assert_eq!(builder.save(&catalog, &mut delegate)?, SaveOutcome::Disabled);

    builder.draft_mut().unwrap().set_name("push");
    assert!(builder.is_duplicate());
    assert_eq!(builder.save(&catalog, &mut delegate)?, SaveOutcome::Disabled);

    assert!(delegate.created.is_empty());
    assert!(delegate.updated.is_empty());
    assert_eq!(delegate.closed, 0);
    assert!(builder.is_open());
    Ok(())
}

#[test]
fn test_save_create_assembles_fresh_records() -> Result<()> {
    let catalog = Catalog::builtin();
    let mut delegate = RecordingDelegate::default();
    let mut builder = WorkoutBuilder::new();
    builder.open(BuilderIntent::Create, Vec::new());

    let draft = builder.draft_mut().unwrap();
    draft.set_name("  Full Body  ");
    draft.toggle_machine("Bench Press");
    draft.toggle_machine("Squat Rack");
    draft.toggle_abs("Plank");
    draft.toggle_abs("Crunches");
    draft.set_include_in_auto_schedule(true);

    assert_eq!(builder.save(&catalog, &mut delegate)?, SaveOutcome::Created);
    assert!(!builder.is_open());
    assert_eq!(delegate.closed, 1);
    assert_eq!(delegate.created.len(), 1);

    let data = &delegate.created[0];
    assert_eq!(data.name, "Full Body");
    assert!(data.include_in_auto_schedule);
    assert_eq!(data.exercises.len(), 2);
    assert_eq!(data.exercises[0].machine, "Bench Press");
    assert_eq!(data.exercises[0].region, "Chest");
    assert_eq!(data.exercises[1].machine, "Squat Rack");
    assert_eq!(data.exercises[1].region, "Legs");
    for exercise in &data.exercises {
        assert_eq!(exercise.feel, Feel::Medium);
        assert!(!exercise.completed);
        assert_eq!(exercise.sets.len(), 3);
        for set in &exercise.sets {
            assert_eq!(set.weight, None);
            assert_eq!(set.reps, None);
            assert_eq!(set.rest, "");
            assert!(!set.completed);
        }
    }

    assert_eq!(data.abs.len(), 2);
    assert_eq!(data.abs[0].name, "Plank");
    assert_eq!(data.abs[0].time.as_deref(), Some("60s"));
    assert_eq!(data.abs[1].name, "Crunches");
    assert_eq!(data.abs[1].reps, Some(20));
    assert!(data.abs.iter().all(|a| !a.completed));
    Ok(())
}

#[test]
fn test_assembly_order_is_stable() -> Result<()> {
    let catalog = Catalog::builtin();
    let mut draft = WorkoutDraft::reset(BuilderIntent::Create);
    for machine in ["Leg Press", "Bench Press", "Lat Pulldown"] {
        draft.toggle_machine(machine);
    }
    draft.set_name("Mixed");

    let first = draft.assemble(&catalog)?;
    let second = draft.assemble(&catalog)?;
    assert_eq!(first, second);
    let order: Vec<_> = first.exercises.iter().map(|e| e.machine.as_str()).collect();
    assert_eq!(order, ["Leg Press", "Bench Press", "Lat Pulldown"]);
    Ok(())
}

#[test]
fn test_open_for_edit_initializes_from_template() {
    let mut builder = WorkoutBuilder::new();
    builder.open(BuilderIntent::Edit(push_day_template()), vec!["Push Day".into()]);

    let draft = builder.draft().unwrap();
    assert_eq!(draft.name, "Push Day");
    assert_eq!(draft.machines().iter().collect::<Vec<_>>(), ["Bench Press"]);
    assert!(draft.abs().is_empty());
    assert!(draft.include_in_auto_schedule);
    assert!(!builder.is_duplicate());
    assert!(builder.can_save());
}

#[test]
fn test_save_edit_calls_update() -> Result<()> {
    let catalog = Catalog::builtin();
    let mut delegate = RecordingDelegate::default();
    let mut builder = WorkoutBuilder::new();
    builder.open(BuilderIntent::Edit(push_day_template()), vec!["Push Day".into()]);
    builder.draft_mut().unwrap().toggle_machine("Dip Machine");

    assert_eq!(builder.save(&catalog, &mut delegate)?, SaveOutcome::Updated(7));
    assert!(delegate.created.is_empty());
    assert_eq!(delegate.updated.len(), 1);
    let (id, data) = &delegate.updated[0];
    assert_eq!(*id, 7);
    assert_eq!(data.name, "Push Day");
    assert_eq!(data.exercises.len(), 2);
    assert_eq!(delegate.closed, 1);
    Ok(())
}

#[test]
fn test_save_edit_without_update_falls_back_to_create() -> Result<()> {
    let catalog = Catalog::builtin();
    let mut delegate = RecordingDelegate {
        no_update: true,
        ..Default::default()
    };
    let mut builder = WorkoutBuilder::new();
    builder.open(BuilderIntent::Edit(push_day_template()), Vec::new());

    assert_eq!(builder.save(&catalog, &mut delegate)?, SaveOutcome::Created);
    assert_eq!(delegate.created.len(), 1);
    assert!(delegate.updated.is_empty());
    Ok(())
}

#[test]
fn test_warning_thresholds() {
    let catalog = Catalog::builtin();
    assert_eq!(draft_with_machines(&catalog, 0).warning(), None);
    assert_eq!(draft_with_machines(&catalog, 11).warning(), None);
    assert_eq!(
        draft_with_machines(&catalog, 12).warning(),
        Some(SessionWarning::LargeSession)
    );
    assert_eq!(
        draft_with_machines(&catalog, 14).warning(),
        Some(SessionWarning::LargeSession)
    );
    assert_eq!(
        draft_with_machines(&catalog, 15).warning(),
        Some(SessionWarning::AtCapacity)
    );
}

#[test]
fn test_warnings_never_block_save() {
    let catalog = Catalog::builtin();
    let mut draft = draft_with_machines(&catalog, MAX_EXERCISES);
    draft.set_name("Everything");
    assert_eq!(draft.warning(), Some(SessionWarning::AtCapacity));
    assert!(draft.can_save::<&str>(&[]));
}

#[test]
fn test_reopen_for_create_discards_previous_draft() {
    let mut builder = WorkoutBuilder::new();
    let mut delegate = RecordingDelegate::default();

    builder.open(BuilderIntent::Edit(push_day_template()), Vec::new());
    builder.draft_mut().unwrap().toggle_abs("Plank");
    builder.draft_mut().unwrap().set_name("Changed");
    builder.close(&mut delegate);
    assert!(!builder.is_open());
    assert_eq!(delegate.closed, 1);

    builder.open(BuilderIntent::Create, Vec::new());
    let draft = builder.draft().unwrap();
    assert_eq!(draft.name, "");
    assert!(draft.machines().is_empty());
    assert!(draft.abs().is_empty());
    assert!(!draft.include_in_auto_schedule);
    assert!(draft.editing().is_none());
}

#[test]
fn test_unknown_machine_fails_without_emitting() {
    let catalog = Catalog::new(
        vec![ExerciseOption {
            machine: "Bench Press".into(),
            region: "Chest".into(),
        }],
        Vec::new(),
    );
    let mut delegate = RecordingDelegate::default();
    let mut builder = WorkoutBuilder::new();
    builder.open(BuilderIntent::Create, Vec::new());
    let draft = builder.draft_mut().unwrap();
    draft.set_name("Ghost");
    draft.toggle_machine("Bench Press");
    draft.toggle_machine("Smith Machine");

    let result = builder.save(&catalog, &mut delegate);
    assert!(matches!(result, Err(BuilderError::UnknownMachine(ref m)) if m == "Smith Machine"));
    assert!(delegate.created.is_empty());
    assert_eq!(delegate.closed, 0);
    assert!(builder.is_open());
}

#[test]
fn test_delegate_failure_keeps_draft_open() {
    let catalog = Catalog::builtin();
    let mut delegate = RecordingDelegate {
        fail: true,
        ..Default::default()
    };
    let mut builder = WorkoutBuilder::new();
    builder.open(BuilderIntent::Create, Vec::new());
    builder.draft_mut().unwrap().set_name("Arms");
    builder.draft_mut().unwrap().toggle_machine("Cable Bicep Curl");

    let result = builder.save(&catalog, &mut delegate);
    assert!(matches!(result, Err(BuilderError::Delegate(_))));
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("storage unavailable"));
    assert!(builder.is_open());
    assert_eq!(builder.draft().unwrap().name, "Arms");
    assert_eq!(delegate.closed, 0);
}
