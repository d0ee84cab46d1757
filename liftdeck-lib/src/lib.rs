// src/lib.rs
use anyhow::{bail, Context, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

// --- Declare modules ---
pub mod builder;
pub mod catalog;
mod config;
pub mod db;
pub mod model;
pub mod presets;
pub mod selector;

// --- Expose public types ---
pub use builder::{
    BuilderError, BuilderIntent, SaveOutcome, Selection, SessionWarning, WorkoutBuilder,
    WorkoutBuilderDelegate, WorkoutDraft, LARGE_SESSION_THRESHOLD, MAX_EXERCISES,
};
pub use catalog::{AbsExerciseOption, Catalog, ExerciseOption};
pub use config::{
    get_config_path as get_config_path_util, load as load_config_util, parse_color,
    save as save_config_util, Config, ConfigError, StandardColor, Theme, Units,
};
pub use db::{get_data_dir as get_data_dir_util, get_db_path as get_db_path_util, DbError};
pub use model::{
    AbsExercise, CustomWorkoutData, CustomWorkoutTemplate, Exercise, Feel, WorkoutSet,
    SETS_PER_EXERCISE,
};
pub use presets::PresetTemplate;
pub use selector::{
    Confirmation, SelectorAction, SelectorEntry, TemplateSelectorDelegate,
};

/// Where a resolved workout plan came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanSource {
    Preset(PresetTemplate),
    Custom(i64),
}

/// The contents of a template picked in the selector, ready to start a session with.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutPlan {
    pub name: String,
    pub source: PlanSource,
    pub exercises: Vec<Exercise>,
    pub abs: Vec<AbsExercise>,
}

/// Persists builder events as custom templates.
pub struct TemplateStore<'a> {
    conn: &'a Connection,
    last_saved_id: Option<i64>,
}

impl<'a> TemplateStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            last_saved_id: None,
        }
    }

    /// ID of the template written by the last successful create/update.
    pub fn last_saved_id(&self) -> Option<i64> {
        self.last_saved_id
    }
}

impl WorkoutBuilderDelegate for TemplateStore<'_> {
    fn on_create(&mut self, data: CustomWorkoutData) -> Result<()> {
        let id = db::create_template(self.conn, &data)?;
        log::info!("Created custom workout '{}' (ID {})", data.name, id);
        self.last_saved_id = Some(id);
        Ok(())
    }

    fn on_update(&mut self, id: i64, data: CustomWorkoutData) -> Result<()> {
        db::update_template(self.conn, id, &data)?;
        log::info!("Updated custom workout '{}' (ID {})", data.name, id);
        self.last_saved_id = Some(id);
        Ok(())
    }

    fn on_close(&mut self) {
        log::debug!("Workout builder closed");
    }
}

pub struct AppService {
    pub config: Config,
    pub conn: Connection,
    pub db_path: PathBuf,
    pub config_path: PathBuf,
    pub catalog: Catalog,
}

impl AppService {
    /// Initializes the application service.
    /// # Errors
    /// Returns `anyhow::Error` if config/db path determination, loading, or initialization fails.
    pub fn initialize() -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let config = config::load(&config_path)
            .with_context(|| format!("Failed to load config from {config_path:?}"))?;

        let db_path = db::get_db_path().context("Failed to determine database path")?;
        let conn = db::open_db(&db_path)
            .with_context(|| format!("Failed to open database at {db_path:?}"))?;

        db::init_db(&conn).context("Failed to initialize database schema")?;

        Ok(Self::from_parts(config, conn, db_path, config_path))
    }

    /// A service over a fresh in-memory database, with no config file behind it.
    ///
    /// # Errors
    /// Opening or initializing the database.
    pub fn in_memory(config: Config) -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        db::init_db(&conn).context("Failed to initialize database schema")?;
        Ok(Self::from_parts(
            config,
            conn,
            PathBuf::from(":memory:"),
            PathBuf::new(),
        ))
    }

    /// Assembles a service from already-opened parts. The connection must be initialized.
    pub fn from_parts(config: Config, conn: Connection, db_path: PathBuf, config_path: PathBuf) -> Self {
        let catalog = Catalog::with_extras(&config.extra_exercises, &config.extra_abs);
        Self {
            config,
            conn,
            db_path,
            config_path,
            catalog,
        }
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn get_db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Saves the current configuration state.
    /// # Errors
    /// Returns `ConfigError` if saving fails.
    pub fn save_config(&self) -> Result<(), ConfigError> {
        config::save(&self.config_path, &self.config)
    }

    pub fn set_units(&mut self, units: Units) -> Result<(), ConfigError> {
        self.config.units = units;
        self.save_config()
    }

    pub fn set_confirm_deletes(&mut self, confirm: bool) -> Result<(), ConfigError> {
        self.config.confirm_deletes = confirm;
        self.save_config()
    }

    /// # Errors
    /// `ConfigError::InvalidColor` for an unknown color name.
    pub fn set_header_color(&mut self, color: &str) -> Result<(), ConfigError> {
        let parsed = parse_color(color)?;
        self.config.theme.header_color = format!("{parsed:?}");
        self.save_config()
    }

    // --- Custom templates ---

    pub fn list_custom_templates(&self) -> Result<Vec<CustomWorkoutTemplate>> {
        db::list_templates(&self.conn).context("Failed to list custom workouts")
    }

    pub fn get_custom_template(&self, id: i64) -> Result<CustomWorkoutTemplate> {
        Ok(db::get_template(&self.conn, id)?)
    }

    /// Resolves a template by numeric ID or (case-insensitive) name.
    pub fn find_custom_template(&self, identifier: &str) -> Result<CustomWorkoutTemplate> {
        let identifier = identifier.trim();
        if let Ok(id) = identifier.parse::<i64>() {
            match db::get_template(&self.conn, id) {
                Ok(template) => return Ok(template),
                Err(e) if e.is_not_found() => {} // Might still be a numeric name
                Err(e) => return Err(e.into()),
            }
        }
        match db::find_template_by_name(&self.conn, identifier)? {
            Some(template) => Ok(template),
            None => Err(DbError::TemplateNameNotFound(identifier.to_string()).into()),
        }
    }

    /// Names a new or renamed template may not use: stored custom names and preset labels.
    pub fn reserved_template_names(&self) -> Result<Vec<String>> {
        let mut names =
            db::list_template_names(&self.conn).context("Failed to list custom workout names")?;
        names.extend(PresetTemplate::labels());
        Ok(names)
    }

    pub fn create_custom_template(&self, data: &CustomWorkoutData) -> Result<i64> {
        Ok(db::create_template(&self.conn, data)?)
    }

    pub fn update_custom_template(&self, id: i64, data: &CustomWorkoutData) -> Result<()> {
        Ok(db::update_template(&self.conn, id, data)?)
    }

    pub fn delete_custom_template(&self, id: i64) -> Result<()> {
        db::delete_template(&self.conn, id)?;
        log::info!("Deleted custom workout ID {}", id);
        Ok(())
    }

    // --- Builder / selector wiring ---

    /// A builder opened for `intent`, with the current reserved names loaded.
    pub fn open_builder(&self, intent: BuilderIntent) -> Result<WorkoutBuilder> {
        let mut builder = WorkoutBuilder::new();
        builder.open(intent, self.reserved_template_names()?);
        Ok(builder)
    }

    /// Saves the builder into the template store.
    ///
    /// # Errors
    /// See [`WorkoutBuilder::save`].
    pub fn save_builder(
        &self,
        builder: &mut WorkoutBuilder,
    ) -> Result<(SaveOutcome, Option<i64>), BuilderError> {
        let mut store = TemplateStore::new(&self.conn);
        let outcome = builder.save(&self.catalog, &mut store)?;
        Ok((outcome, store.last_saved_id()))
    }

    /// The selector action a typed label stands for, matched the same way as
    /// [`Self::resolve_selection`]. `None` when nothing carries that label.
    ///
    /// # Errors
    /// Store failures. A missing name is not an error.
    pub fn selection_for_label(&self, label: &str) -> Result<Option<SelectorAction>> {
        match db::find_template_by_name(&self.conn, label) {
            Ok(Some(template)) if template.name == label => {
                return Ok(Some(SelectorAction::SelectCustom(template)));
            }
            Ok(_) => {}
            Err(e) => return Err(e).context("Failed to look up custom workouts"),
        }
        Ok(PresetTemplate::from_label(label).map(SelectorAction::SelectPreset))
    }

    /// Turns a selector label into a plan: custom templates by exact name first, then presets.
    pub fn resolve_selection(&self, label: &str) -> Result<WorkoutPlan> {
        if let Some(template) = db::find_template_by_name(&self.conn, label)? {
            if template.name == label {
                return Ok(WorkoutPlan {
                    name: template.name,
                    source: PlanSource::Custom(template.id),
                    exercises: template.exercises,
                    abs: template.abs,
                });
            }
        }
        if let Some(preset) = PresetTemplate::from_label(label) {
            let exercises = preset
                .build(&self.catalog)
                .with_context(|| format!("Preset '{label}' references an unknown machine"))?;
            return Ok(WorkoutPlan {
                name: preset.label().to_string(),
                source: PlanSource::Preset(preset),
                exercises,
                abs: Vec::new(),
            });
        }
        bail!("No workout template named '{}'", label)
    }
}
