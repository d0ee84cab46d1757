//src/builder.rs
//! State machine behind the custom workout builder modal.
//!
//! The modal is either closed (no draft) or open with a [`WorkoutDraft`] that was
//! produced fresh by [`WorkoutDraft::reset`]. Every user action is a synchronous
//! method call; create/update/close events go out through a [`WorkoutBuilderDelegate`].
use anyhow::Result;
use thiserror::Error;

use crate::catalog::Catalog;
use crate::model::{AbsExercise, CustomWorkoutData, CustomWorkoutTemplate, Exercise};

/// Hard cap on the number of machines in one workout.
pub const MAX_EXERCISES: usize = 15;
/// From this many machines on, the builder warns about session length.
pub const LARGE_SESSION_THRESHOLD: usize = 12;

#[derive(Error, Debug)]
pub enum BuilderError {
    #[error("Selected machine '{0}' is not in the exercise library")]
    UnknownMachine(String),
    #[error("Selected core exercise '{0}' is not in the abs library")]
    UnknownAbsExercise(String),
    #[error("Failed to save workout: {0:#}")]
    Delegate(anyhow::Error),
}

/// Receives the builder's events. Called synchronously, at most once per save/close action.
pub trait WorkoutBuilderDelegate {
    fn on_create(&mut self, data: CustomWorkoutData) -> Result<()>;

    fn on_update(&mut self, id: i64, data: CustomWorkoutData) -> Result<()>;

    /// Whether `on_update` is available. When it isn't, saving an edited
    /// template goes through `on_create` instead.
    fn supports_update(&self) -> bool {
        true
    }

    fn on_close(&mut self) {}
}

/// Advisory shown under the selection. Never blocks saving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionWarning {
    LargeSession,
    AtCapacity,
}

impl SessionWarning {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::LargeSession => "That's a big session. Are you training or moving in?",
            Self::AtCapacity => {
                "Too many exercises in one session isn't effective. Consider splitting it up."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Save was not allowed; nothing was emitted.
    Disabled,
    Created,
    Updated(i64),
}

/// What the modal was opened for.
#[derive(Debug, Clone, PartialEq)]
pub enum BuilderIntent {
    Create,
    Edit(CustomWorkoutTemplate),
}

/// Insertion-ordered set of names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    items: Vec<String>,
}

impl Selection {
    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    /// Returns false if the name was already present.
    fn insert(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.items.push(name.to_string());
        true
    }

    fn remove(&mut self, name: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n != name);
        self.items.len() != before
    }
}

impl<'a> FromIterator<&'a str> for Selection {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut selection = Self::default();
        for name in iter {
            selection.insert(name);
        }
        selection
    }
}

/// In-progress state of one builder session. Discarded on close.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutDraft {
    pub name: String,
    machines: Selection,
    abs: Selection,
    pub include_in_auto_schedule: bool,
    editing: Option<CustomWorkoutTemplate>,
}

impl WorkoutDraft {
    /// Fresh draft for the given intent. Nothing from a previous session survives.
    #[must_use]
    pub fn reset(intent: BuilderIntent) -> Self {
        match intent {
            BuilderIntent::Create => Self {
                name: String::new(),
                machines: Selection::default(),
                abs: Selection::default(),
                include_in_auto_schedule: false,
                editing: None,
            },
            BuilderIntent::Edit(template) => Self {
                name: template.name.clone(),
                machines: template.machine_names().collect(),
                abs: template.abs_names().collect(),
                include_in_auto_schedule: template.include_in_auto_schedule,
                editing: Some(template),
            },
        }
    }

    pub fn editing(&self) -> Option<&CustomWorkoutTemplate> {
        self.editing.as_ref()
    }

    pub fn machines(&self) -> &Selection {
        &self.machines
    }

    pub fn abs(&self) -> &Selection {
        &self.abs
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_include_in_auto_schedule(&mut self, include: bool) {
        self.include_in_auto_schedule = include;
    }

    /// Adds or removes a machine. Adding to a full selection is silently ignored.
    /// Returns whether the selection changed.
    pub fn toggle_machine(&mut self, machine: &str) -> bool {
        if self.machines.contains(machine) {
            self.machines.remove(machine)
        } else if self.machines.len() < MAX_EXERCISES {
            self.machines.insert(machine)
        } else {
            false
        }
    }

    /// Adds or removes a core exercise. No limit applies.
    pub fn toggle_abs(&mut self, name: &str) -> bool {
        if self.abs.contains(name) {
            self.abs.remove(name)
        } else {
            self.abs.insert(name)
        }
    }

    pub fn trimmed_name(&self) -> &str {
        self.name.trim()
    }

    /// True when the trimmed name case-insensitively matches an existing name,
    /// ignoring the name of the template being edited.
    pub fn is_duplicate<S: AsRef<str>>(&self, existing_names: &[S]) -> bool {
        let own_name = self.editing.as_ref().map(|t| t.name.to_lowercase());
        let candidate = self.trimmed_name().to_lowercase();
        existing_names
            .iter()
            .map(|n| n.as_ref().to_lowercase())
            .filter(|n| own_name.as_deref() != Some(n.as_str()))
            .any(|n| n == candidate)
    }

    pub fn warning(&self) -> Option<SessionWarning> {
        match self.machines.len() {
            n if n >= MAX_EXERCISES => Some(SessionWarning::AtCapacity),
            n if n >= LARGE_SESSION_THRESHOLD => Some(SessionWarning::LargeSession),
            _ => None,
        }
    }

    pub fn can_save<S: AsRef<str>>(&self, existing_names: &[S]) -> bool {
        !self.trimmed_name().is_empty()
            && !self.machines.is_empty()
            && !self.is_duplicate(existing_names)
    }

    /// Resolves every selected name against the catalog and builds fresh records.
    ///
    /// # Errors
    /// `UnknownMachine` / `UnknownAbsExercise` when a selected name has no catalog entry.
    pub fn assemble(&self, catalog: &Catalog) -> Result<CustomWorkoutData, BuilderError> {
        let exercises = self
            .machines
            .iter()
            .map(|machine| {
                catalog
                    .find_exercise(machine)
                    .map(Exercise::from_option)
                    .ok_or_else(|| BuilderError::UnknownMachine(machine.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let abs = self
            .abs
            .iter()
            .map(|name| {
                catalog
                    .find_abs(name)
                    .map(AbsExercise::from_option)
                    .ok_or_else(|| BuilderError::UnknownAbsExercise(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CustomWorkoutData {
            name: self.trimmed_name().to_string(),
            exercises,
            abs,
            include_in_auto_schedule: self.include_in_auto_schedule,
        })
    }
}

/// The builder modal: closed, or open with a draft and the owner's list of taken names.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkoutBuilder {
    draft: Option<WorkoutDraft>,
    existing_names: Vec<String>,
}

impl WorkoutBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens (or re-opens) the modal. Always starts from a fresh draft.
    pub fn open(&mut self, intent: BuilderIntent, existing_names: Vec<String>) {
        log::debug!(
            "Opening workout builder ({})",
            match &intent {
                BuilderIntent::Create => "create".to_string(),
                BuilderIntent::Edit(t) => format!("edit #{}", t.id),
            }
        );
        self.draft = Some(WorkoutDraft::reset(intent));
        self.existing_names = existing_names;
    }

    pub fn is_open(&self) -> bool {
        self.draft.is_some()
    }

    pub fn draft(&self) -> Option<&WorkoutDraft> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut WorkoutDraft> {
        self.draft.as_mut()
    }

    pub fn existing_names(&self) -> &[String] {
        &self.existing_names
    }

    pub fn set_existing_names(&mut self, names: Vec<String>) {
        self.existing_names = names;
    }

    /// Recomputed on every call from the current draft name and name list.
    pub fn is_duplicate(&self) -> bool {
        self.draft
            .as_ref()
            .is_some_and(|d| d.is_duplicate(&self.existing_names))
    }

    pub fn can_save(&self) -> bool {
        self.draft
            .as_ref()
            .is_some_and(|d| d.can_save(&self.existing_names))
    }

    pub fn warning(&self) -> Option<SessionWarning> {
        self.draft.as_ref().and_then(WorkoutDraft::warning)
    }

    /// Emits create or update, then closes.
    ///
    /// A disallowed save is a no-op returning `SaveOutcome::Disabled`.
    /// On any error the draft stays open and no close is signalled.
    ///
    /// # Errors
    /// - `BuilderError::UnknownMachine` / `UnknownAbsExercise` if the selection holds a name the catalog lacks.
    /// - `BuilderError::Delegate` if the delegate rejects the create/update.
    pub fn save(
        &mut self,
        catalog: &Catalog,
        delegate: &mut dyn WorkoutBuilderDelegate,
    ) -> Result<SaveOutcome, BuilderError> {
        let Some(draft) = self.draft.as_ref() else {
            return Ok(SaveOutcome::Disabled);
        };
        if !draft.can_save(&self.existing_names) {
            log::debug!("Save ignored, builder state is not saveable");
            return Ok(SaveOutcome::Disabled);
        }

        let data = draft.assemble(catalog)?;
        let outcome = match draft.editing() {
            Some(template) if delegate.supports_update() => {
                let id = template.id;
                delegate
                    .on_update(id, data)
                    .map_err(BuilderError::Delegate)?;
                SaveOutcome::Updated(id)
            }
            _ => {
                delegate.on_create(data).map_err(BuilderError::Delegate)?;
                SaveOutcome::Created
            }
        };

        self.close(delegate);
        Ok(outcome)
    }

    /// Discards the draft and tells the owner.
    pub fn close(&mut self, delegate: &mut dyn WorkoutBuilderDelegate) {
        self.draft = None;
        self.existing_names.clear();
        delegate.on_close();
    }
}
