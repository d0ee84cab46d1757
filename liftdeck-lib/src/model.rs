//src/model.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::catalog::{AbsExerciseOption, ExerciseOption};

/// Every exercise record carries exactly this many sets.
pub const SETS_PER_EXERCISE: usize = 3;

/// How an exercise felt. New records always start at `Medium`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum Feel {
    Easy,
    #[default]
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkoutSet {
    pub weight: Option<f64>,
    pub reps: Option<i64>,
    pub rest: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub machine: String,
    pub region: String,
    #[serde(default)]
    pub feel: Feel,
    #[serde(default)]
    pub completed: bool,
    pub sets: [WorkoutSet; SETS_PER_EXERCISE],
}

impl Exercise {
    /// Fresh record for a machine picked out of the catalog: medium feel, nothing logged yet.
    #[must_use]
    pub fn from_option(option: &ExerciseOption) -> Self {
        Self {
            machine: option.machine.clone(),
            region: option.region.clone(),
            feel: Feel::default(),
            completed: false,
            sets: Default::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsExercise {
    pub name: String,
    pub reps: Option<u32>,
    pub time: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl AbsExercise {
    #[must_use]
    pub fn from_option(option: &AbsExerciseOption) -> Self {
        Self {
            name: option.name.clone(),
            reps: option.reps,
            time: option.time.clone(),
            completed: false,
        }
    }
}

/// A named, user-owned workout template as stored by the owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomWorkoutTemplate {
    pub id: i64,
    pub name: String,
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub abs: Vec<AbsExercise>,
    #[serde(default)]
    pub include_in_auto_schedule: bool,
    /// Set by the store, `None` for templates that were never persisted.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CustomWorkoutTemplate {
    /// Machine names in template order.
    pub fn machine_names(&self) -> impl Iterator<Item = &str> {
        self.exercises.iter().map(|e| e.machine.as_str())
    }

    pub fn abs_names(&self) -> impl Iterator<Item = &str> {
        self.abs.iter().map(|a| a.name.as_str())
    }
}

/// Payload of a create or update event coming out of the workout builder.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CustomWorkoutData {
    pub name: String,
    pub exercises: Vec<Exercise>,
    pub abs: Vec<AbsExercise>,
    pub include_in_auto_schedule: bool,
}
