//liftdeck-cli/src/main.rs
mod cli;

use anyhow::{bail, Context, Result};
use chrono::Local;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use std::io;
use std::io::{stdin, stdout, Write}; // For prompts

use liftdeck_lib::{
    selector, AbsExercise, AbsExerciseOption, AppService, BuilderError, BuilderIntent,
    Confirmation, CustomWorkoutTemplate, Exercise, ExerciseOption, PresetTemplate, SaveOutcome,
    SelectorAction, TemplateSelectorDelegate, Units, WorkoutBuilder, WorkoutPlan,
};

fn main() -> Result<()> {
    env_logger::init();

    // --- Check for completion generation request FIRST ---
    let cli_args = cli::parse_args();
    let export_csv = cli_args.export_csv;

    if let cli::Commands::GenerateCompletion { shell } = cli_args.command {
        let mut cmd = cli::build_cli_command();
        let bin_name = cmd.get_name().to_string();

        eprintln!("Generating completion script for {}...", shell); // Print to stderr
        clap_complete::generate(shell, &mut cmd, bin_name, &mut stdout());
        return Ok(());
    }

    let mut service =
        AppService::initialize().context("Failed to initialize application service")?;

    match cli_args.command {
        cli::Commands::GenerateCompletion { .. } => {
            unreachable!("Completion generation should have exited already");
        }
        // --- Catalog ---
        cli::Commands::Exercises { region } => {
            let options: Vec<&ExerciseOption> = service
                .catalog()
                .exercises_by_region()
                .into_iter()
                .filter(|o| {
                    region
                        .as_deref()
                        .map_or(true, |r| o.region.eq_ignore_ascii_case(r.trim()))
                })
                .collect();
            if options.is_empty() {
                println!("No machines found matching the criteria.");
            } else if export_csv {
                print_exercise_options_csv(&options)?;
            } else {
                print_exercise_options_table(&options, header_color(&service));
            }
        }
        cli::Commands::Core => {
            let options = service.catalog().abs();
            if export_csv {
                print_abs_options_csv(options)?;
            } else {
                print_abs_options_table(options, header_color(&service));
            }
        }
        // --- Templates ---
        cli::Commands::Presets => {
            if export_csv {
                print_presets_csv()?;
            } else {
                print_presets_table(header_color(&service));
            }
        }
        cli::Commands::Templates => match service.list_custom_templates() {
            Ok(templates) if templates.is_empty() && !export_csv => {
                println!("No custom workouts yet. Create one with `liftdeck create`.");
            }
            Ok(templates) => {
                if export_csv {
                    print_templates_csv(&templates)?;
                } else {
                    print_templates_table(&templates, header_color(&service));
                }
            }
            Err(e) => bail!("Error listing custom workouts: {}", e),
        },
        cli::Commands::Show { identifier } => {
            let template = service.find_custom_template(&identifier)?;
            let plan = WorkoutPlan {
                name: template.name.clone(),
                source: liftdeck_lib::PlanSource::Custom(template.id),
                exercises: template.exercises,
                abs: template.abs,
            };
            print_plan(&plan, &service, export_csv)?;
        }
        cli::Commands::Create {
            name,
            machines,
            core,
            auto_schedule,
        } => {
            let mut builder = service.open_builder(BuilderIntent::Create)?;
            {
                let draft = builder
                    .draft_mut()
                    .context("Workout builder did not open")?;
                draft.set_name(name);
                draft.set_include_in_auto_schedule(auto_schedule);
            }
            add_machines(&mut builder, &service, &machines)?;
            add_core(&mut builder, &service, &core)?;
            save_builder(&service, &mut builder)?;
        }
        cli::Commands::Edit {
            identifier,
            name,
            add,
            remove,
            add_core: core_to_add,
            remove_core,
            auto_schedule,
        } => {
            let template = service.find_custom_template(&identifier)?;
            let mut builder = service.open_builder(BuilderIntent::Edit(template))?;
            {
                let draft = builder
                    .draft_mut()
                    .context("Workout builder did not open")?;
                if let Some(name) = name {
                    draft.set_name(name);
                }
                if let Some(include) = auto_schedule {
                    draft.set_include_in_auto_schedule(include);
                }
                for machine in &remove {
                    if !(draft.machines().contains(machine) && draft.toggle_machine(machine)) {
                        println!("'{}' is not part of this workout, nothing to remove.", machine);
                    }
                }
                for name in &remove_core {
                    if !(draft.abs().contains(name) && draft.toggle_abs(name)) {
                        println!("'{}' is not part of this workout, nothing to remove.", name);
                    }
                }
            }
            add_machines(&mut builder, &service, &add)?;
            add_core(&mut builder, &service, &core_to_add)?;
            save_builder(&service, &mut builder)?;
        }
        cli::Commands::Delete { identifier, yes } => {
            let template = service.find_custom_template(&identifier)?;
            let confirmation = if yes || !service.config.confirm_deletes {
                Confirmation::Confirmed
            } else {
                prompt_confirm_delete(&template)?
            };
            let mut owner = CliSelector::new(&service, export_csv);
            selector::dispatch(SelectorAction::DeleteCustom(template, confirmation), &mut owner)?;
        }
        cli::Commands::Start { label } => {
            let Some(action) = service.selection_for_label(&label)? else {
                bail!(
                    "No workout template named '{}'. See `liftdeck presets` and `liftdeck templates`.",
                    label
                );
            };
            let mut owner = CliSelector::new(&service, export_csv);
            selector::dispatch(action, &mut owner)?;
        }
        // --- Config/Path Commands ---
        cli::Commands::SetUnits { units } => {
            let units = match units {
                cli::UnitsCli::Metric => Units::Metric,
                cli::UnitsCli::Imperial => Units::Imperial,
            };
            match service.set_units(units) {
                Ok(()) => {
                    log::info!("Default units set to {}", units);
                    println!("Successfully set default units to: {}", units);
                    println!("Config file updated: {:?}", service.get_config_path());
                }
                Err(e) => bail!("Error setting units: {}", e),
            }
        }
        cli::Commands::SetConfirmDeletes { enabled } => {
            match service.set_confirm_deletes(enabled) {
                Ok(()) => {
                    log::info!("confirm_deletes set to {}", enabled);
                    println!(
                    "Delete confirmation {}.",
                        if enabled { "enabled" } else { "disabled" }
                    );
                }
                Err(e) => bail!("Error updating config: {}", e),
            }
        }
        cli::Commands::SetHeaderColor { color } => match service.set_header_color(&color) {
            Ok(()) => println!(
                "Table header color set to {}.",
                service.config.theme.header_color
            ),
            Err(e) => bail!("Error setting header color: {}", e),
        },
        cli::Commands::ConfigPath => {
            println!("Config file is located at: {:?}", service.get_config_path());
        }
        cli::Commands::DbPath => {
            println!("Database file is located at: {:?}", service.get_db_path());
        }
    }

    Ok(())
}

// --- Selector owner ---

/// Handles the template selector's choices for one command invocation.
struct CliSelector<'a> {
    service: &'a AppService,
    export_csv: bool,
}

impl<'a> CliSelector<'a> {
    fn new(service: &'a AppService, export_csv: bool) -> Self {
        Self {
            service,
            export_csv,
        }
    }
}

impl TemplateSelectorDelegate for CliSelector<'_> {
    fn on_select_template(&mut self, label: &str) -> Result<()> {
        let plan = self.service.resolve_selection(label)?;
        print_plan(&plan, self.service, self.export_csv)
    }

    fn on_create_custom(&mut self) -> Result<()> {
        println!("Create a custom workout with `liftdeck create --name <NAME> -m <MACHINE>...`");
        Ok(())
    }

    fn on_edit_template(&mut self, template: &CustomWorkoutTemplate) -> Result<()> {
        println!(
            "Edit '{}' with `liftdeck edit {} --add <MACHINE> --remove <MACHINE>`",
            template.name, template.id
        );
        Ok(())
    }

    fn on_delete_template(&mut self, id: i64) -> Result<()> {
        self.service
            .delete_custom_template(id)
            .with_context(|| format!("Error deleting custom workout ID {}", id))?;
        log::info!("Deleted custom workout {}", id);
        println!("Deleted custom workout ID {}.", id);
        Ok(())
    }

    fn on_close(&mut self) -> Result<()> {
        Ok(())
    }
}

// --- Builder helpers ---

/// Toggles machines on, validating names against the catalog first.
fn add_machines(builder: &mut WorkoutBuilder, service: &AppService, machines: &[String]) -> Result<()> {
    let draft = builder
        .draft_mut()
        .context("Workout builder is not open")?;
    for machine in machines {
        let Some(option) = service.catalog().find_exercise(machine.trim()) else {
            bail!(
                "Unknown machine '{}'. See `liftdeck exercises` for the available machines.",
                machine
            );
        };
        if draft.machines().contains(&option.machine) {
            println!("'{}' is already part of this workout.", option.machine);
        } else if !draft.toggle_machine(&option.machine) {
            println!(
                "Skipped '{}': a workout holds at most {} machines.",
                option.machine,
                liftdeck_lib::MAX_EXERCISES
            );
        }
    }
    Ok(())
}

fn add_core(builder: &mut WorkoutBuilder, service: &AppService, names: &[String]) -> Result<()> {
    let draft = builder
        .draft_mut()
        .context("Workout builder is not open")?;
    for name in names {
        let Some(option) = service.catalog().find_abs(name.trim()) else {
            bail!(
                "Unknown core exercise '{}'. See `liftdeck core` for the available exercises.",
                name
            );
        };
        if draft.abs().contains(&option.name) {
            println!("'{}' is already part of this workout.", option.name);
        } else {
            draft.toggle_abs(&option.name);
        }
    }
    Ok(())
}

/// Reports why a save is disabled, or saves and prints the result.
fn save_builder(service: &AppService, builder: &mut WorkoutBuilder) -> Result<()> {
    if let Some(warning) = builder.warning() {
        println!("Note: {}", warning.message());
    }
    if let Some(draft) = builder.draft() {
        if draft.trimmed_name().is_empty() {
            bail!("Workout name cannot be empty.");
        }
        if builder.is_duplicate() {
            bail!(
                "A workout named '{}' already exists. Choose a different name.",
                draft.trimmed_name()
            );
        }
        if draft.machines().is_empty() {
            bail!("Select at least one machine.");
        }
    }

    let name = builder
        .draft()
        .map(|d| d.trimmed_name().to_string())
        .unwrap_or_default();
    match service.save_builder(builder) {
        Ok((SaveOutcome::Created, Some(id))) => {
            log::info!("Created custom workout {} ('{}')", id, name);
            println!("Successfully created custom workout '{}' (ID: {}).", name, id);
        }
        Ok((SaveOutcome::Created, None)) => {
            println!("Successfully created custom workout '{}'.", name);
        }
        Ok((SaveOutcome::Updated(id), _)) => {
            log::info!("Updated custom workout {} ('{}')", id, name);
            println!("Successfully updated custom workout '{}' (ID: {}).", name, id);
        }
        Ok((SaveOutcome::Disabled, _)) => bail!("Nothing to save."),
        Err(e @ BuilderError::Delegate(_)) => bail!("{}", e),
        Err(e) => bail!("Error assembling workout: {}", e),
    }
    Ok(())
}

/// Asks before deleting. Anything but y/yes declines.
fn prompt_confirm_delete(template: &CustomWorkoutTemplate) -> Result<Confirmation> {
    print!(
        "Delete custom workout '{}' (ID {})? This cannot be undone. [y/N]: ",
        template.name, template.id
    );
    stdout().flush()?;

    let mut input = String::new();
    stdin().read_line(&mut input)?;
    let confirmed = matches!(input.trim().to_lowercase().as_str(), "y" | "yes");
    if !confirmed {
        println!("Deletion cancelled.");
    }
    Ok(Confirmation::from(confirmed))
}

fn header_color(service: &AppService) -> Color {
    liftdeck_lib::parse_color(&service.config.theme.header_color)
        .map(Color::from)
        .unwrap_or(Color::Cyan) // Fallback
}

fn core_target(reps: Option<u32>, time: Option<&str>) -> String {
    match (reps, time) {
        (Some(reps), _) => format!("{reps} reps"),
        (None, Some(time)) => time.to_string(),
        (None, None) => "-".to_string(),
    }
}

// --- Table Printing Functions ---

fn print_exercise_options_table(options: &[&ExerciseOption], header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Region").fg(header_color),
            Cell::new("Machine").fg(header_color),
        ]);

    let mut last_region: Option<&str> = None;
    for option in options {
        // Only print the region on the first row of each group
        let region = if last_region == Some(option.region.as_str()) {
            ""
        } else {
            option.region.as_str()
        };
        last_region = Some(option.region.as_str());
        table.add_row(vec![
            Cell::new(region).add_attribute(Attribute::Bold),
            Cell::new(&option.machine),
        ]);
    }
    println!("{table}");
}

fn print_abs_options_table(options: &[AbsExerciseOption], header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Name").fg(header_color),
            Cell::new("Target").fg(header_color),
        ]);

    for option in options {
        table.add_row(vec![
            Cell::new(&option.name),
            Cell::new(core_target(option.reps, option.time.as_deref())),
        ]);
    }
    println!("{table}");
}

fn print_presets_table(header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Name").fg(header_color),
            Cell::new("Machines").fg(header_color),
        ]);

    for preset in PresetTemplate::all() {
        table.add_row(vec![
            Cell::new(preset.label()),
            Cell::new(preset.machines().join(", ")),
        ]);
    }
    println!("{table}");
}

fn print_templates_table(templates: &[CustomWorkoutTemplate], header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(header_color),
            Cell::new("Name").fg(header_color),
            Cell::new("Machines").fg(header_color),
            Cell::new("Core").fg(header_color),
            Cell::new("Auto").fg(header_color),
            Cell::new("Updated").fg(header_color),
        ]);

    for template in templates {
        table.add_row(vec![
            Cell::new(template.id.to_string()),
            Cell::new(&template.name).add_attribute(Attribute::Bold),
            Cell::new(template.machine_names().collect::<Vec<_>>().join(", ")),
            Cell::new(template.abs.len().to_string()),
            Cell::new(if template.include_in_auto_schedule { "yes" } else { "no" }),
            Cell::new(
                template
                    .updated_at
                    .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]);
    }
    println!("{table}");
}

fn print_plan(plan: &WorkoutPlan, service: &AppService, export_csv: bool) -> Result<()> {
    let units = service.config.units;
    if export_csv {
        return print_plan_csv(plan, units);
    }

    println!("{}", plan.name);
    print_plan_exercises_table(&plan.exercises, units, header_color(service));
    if !plan.abs.is_empty() {
        print_plan_abs_table(&plan.abs, header_color(service));
    }
    Ok(())
}

fn print_plan_exercises_table(exercises: &[Exercise], units: Units, header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").fg(header_color),
            Cell::new("Machine").fg(header_color),
            Cell::new("Region").fg(header_color),
            Cell::new("Feel").fg(header_color),
            Cell::new("Sets").fg(header_color),
            Cell::new(format!("Weight ({})", units.weight_unit())).fg(header_color),
        ]);

    for (i, exercise) in exercises.iter().enumerate() {
        let weights = exercise
            .sets
            .iter()
            .map(|s| s.weight.map_or_else(|| "-".to_string(), |w| format!("{w:.1}")))
            .collect::<Vec<_>>()
            .join(" / ");
        table.add_row(vec![
            Cell::new((i + 1).to_string()),
            Cell::new(&exercise.machine).add_attribute(Attribute::Bold),
            Cell::new(&exercise.region),
            Cell::new(exercise.feel.to_string()),
            Cell::new(exercise.sets.len().to_string()),
            Cell::new(weights),
        ]);
    }
    println!("{table}");
}

fn print_plan_abs_table(abs: &[AbsExercise], header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Core").fg(header_color),
            Cell::new("Target").fg(header_color),
        ]);

    for a in abs {
        table.add_row(vec![
            Cell::new(&a.name),
            Cell::new(core_target(a.reps, a.time.as_deref())),
        ]);
    }
    println!("{table}");
}

// --- CSV Printing Functions ---

fn print_exercise_options_csv(options: &[&ExerciseOption]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["Region", "Machine"])?;
    for option in options {
        writer.write_record([&option.region, &option.machine])?;
    }
    writer.flush()?;
    Ok(())
}

fn print_abs_options_csv(options: &[AbsExerciseOption]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["Name", "Reps", "Time"])?;
    for option in options {
        writer.write_record([
            option.name.clone(),
            option.reps.map(|r| r.to_string()).unwrap_or_default(),
            option.time.clone().unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn print_presets_csv() -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["Name", "Machines"])?;
    for preset in PresetTemplate::all() {
        writer.write_record([preset.label().to_string(), preset.machines().join(";")])?;
    }
    writer.flush()?;
    Ok(())
}

fn print_templates_csv(templates: &[CustomWorkoutTemplate]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record([
        "ID",
        "Name",
        "Machines",
        "Core",
        "Include_In_Auto_Schedule",
        "Updated_At_UTC",
    ])?;
    for template in templates {
        writer.write_record([
            template.id.to_string(),
            template.name.clone(),
            template.machine_names().collect::<Vec<_>>().join(";"),
            template.abs_names().collect::<Vec<_>>().join(";"),
            template.include_in_auto_schedule.to_string(),
            template
                .updated_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn print_plan_csv(plan: &WorkoutPlan, units: Units) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    let weight_header = format!("Weight_{}", units.weight_unit());
    writer.write_record([
        "Workout",
        "Kind",
        "Name",
        "Region",
        "Sets",
        weight_header.as_str(),
        "Target",
    ])?;
    for exercise in &plan.exercises {
        let sets = exercise.sets.len().to_string();
        let weights = exercise
            .sets
            .iter()
            .map(|s| s.weight.map(|w| w.to_string()).unwrap_or_default())
            .collect::<Vec<_>>()
            .join(";");
        writer.write_record([
            plan.name.as_str(),
            "machine",
            exercise.machine.as_str(),
            exercise.region.as_str(),
            sets.as_str(),
            weights.as_str(),
            "",
        ])?;
    }
    for a in &plan.abs {
        let target = core_target(a.reps, a.time.as_deref());
        writer.write_record([
            plan.name.as_str(),
            "core",
            a.name.as_str(),
            "",
            "",
            "",
            target.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
