//liftdeck-cli/src/cli.rs
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "Build and pick gym workout templates", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    #[arg(long, global = true)]
    pub export_csv: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the machines available to custom workouts
    Exercises {
        /// Only show machines for this muscle group (e.g. "Chest")
        #[arg(short, long)]
        region: Option<String>,
    },
    /// List the core/abs exercises
    Core,
    /// List the built-in workout templates
    Presets,
    /// List your custom workouts
    Templates,
    /// Show the exercises of a custom workout
    Show {
        identifier: String, // ID or name
    },
    /// Create a custom workout
    Create {
        #[arg(short, long)]
        name: String,
        /// Machine to include, repeatable. Order is kept.
        #[arg(short, long = "machine", required = true)]
        machines: Vec<String>,
        /// Core exercise to include, repeatable
        #[arg(short, long = "core")]
        core: Vec<String>,
        /// Make the workout available to the auto scheduler
        #[arg(long)]
        auto_schedule: bool,
    },
    /// Edit a custom workout
    Edit {
        identifier: String, // ID or name
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// Machine to add, repeatable
        #[arg(long = "add")]
        add: Vec<String>,
        /// Machine to remove, repeatable
        #[arg(long = "remove")]
        remove: Vec<String>,
        #[arg(long = "add-core")]
        add_core: Vec<String>,
        #[arg(long = "remove-core")]
        remove_core: Vec<String>,
        /// Include in the auto scheduler (`true` or `false`)
        #[arg(long)]
        auto_schedule: Option<bool>,
    },
    /// Delete a custom workout
    Delete {
        identifier: String, // ID or name
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Pick a workout template (preset or custom) and print its plan
    Start {
        /// Template name as shown by `presets` / `templates`
        label: String,
    },
    /// Set default units (Metric/Imperial)
    SetUnits {
        #[arg(value_enum)]
        units: UnitsCli,
    },
    /// Ask before deleting custom workouts (`true` or `false`)
    SetConfirmDeletes {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    /// Set the table header color (e.g. "Green", "DarkCyan")
    SetHeaderColor { color: String },
    /// Show the path to the config file
    ConfigPath,
    /// Show the path to the database file
    DbPath,
    GenerateCompletion {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// Function to parse CLI arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}

#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum UnitsCli {
    Metric,
    Imperial,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        build_cli_command().debug_assert();
    }

    #[test]
    fn test_create_keeps_machine_order() {
        let cli = Cli::try_parse_from([
            "liftdeck",
            "create",
            "--name",
            "Push",
            "-m",
            "Pec Deck",
            "-m",
            "Bench Press",
            "--core",
            "Plank",
        ])
        .unwrap();
        match cli.command {
            Commands::Create {
                name,
                machines,
                core,
                auto_schedule,
            } => {
                assert_eq!(name, "Push");
                assert_eq!(machines, ["Pec Deck", "Bench Press"]);
                assert_eq!(core, ["Plank"]);
                assert!(!auto_schedule);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_create_requires_a_machine() {
        let result = Cli::try_parse_from(["liftdeck", "create", "--name", "Empty"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_edit_auto_schedule_takes_bool() {
        let cli = Cli::try_parse_from(["liftdeck", "edit", "3", "--auto-schedule", "false"]).unwrap();
        match cli.command {
            Commands::Edit {
                identifier,
                auto_schedule,
                add,
                ..
            } => {
                assert_eq!(identifier, "3");
                assert_eq!(auto_schedule, Some(false));
                assert!(add.is_empty());
            }
            other => panic!("unexpected command: {other:?}"),
        }

        assert!(Cli::try_parse_from(["liftdeck", "edit", "3", "--auto-schedule", "maybe"]).is_err());
    }

    #[test]
    fn test_export_csv_is_global() {
        let cli = Cli::try_parse_from(["liftdeck", "templates", "--export-csv"]).unwrap();
        assert!(cli.export_csv);
        assert!(matches!(cli.command, Commands::Templates));
    }

    #[test]
    fn test_set_confirm_deletes_takes_value() {
        let cli = Cli::try_parse_from(["liftdeck", "set-confirm-deletes", "false"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::SetConfirmDeletes { enabled: false }
        ));
        let cli = Cli::try_parse_from(["liftdeck", "set-confirm-deletes", "true"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::SetConfirmDeletes { enabled: true }
        ));
        assert!(Cli::try_parse_from(["liftdeck", "set-confirm-deletes"]).is_err());
    }

    #[test]
    fn test_set_units_value_enum() {
        let cli = Cli::try_parse_from(["liftdeck", "set-units", "imperial"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::SetUnits {
                units: UnitsCli::Imperial
            }
        ));
        assert!(Cli::try_parse_from(["liftdeck", "set-units", "stones"]).is_err());
    }
}
