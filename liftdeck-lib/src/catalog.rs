//src/catalog.rs
use serde::{Deserialize, Serialize};

/// A machine/exercise a workout can be built from, keyed by its unique machine name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseOption {
    pub machine: String,
    pub region: String, // Muscle group, used for grouping in pickers
}

/// A core/abs movement, keyed by its unique name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsExerciseOption {
    pub name: String,
    #[serde(default)]
    pub reps: Option<u32>,
    #[serde(default)]
    pub time: Option<String>,
}

// (machine, region)
const BUILTIN_EXERCISES: &[(&str, &str)] = &[
    ("Bench Press", "Chest"),
    ("Incline Bench Press", "Chest"),
    ("Chest Fly Machine", "Chest"),
    ("Pec Deck", "Chest"),
    ("Cable Crossover", "Chest"),
    ("Lat Pulldown", "Back"),
    ("Seated Cable Row", "Back"),
    ("T-Bar Row", "Back"),
    ("Assisted Pull-Up Machine", "Back"),
    ("Back Extension", "Back"),
    ("Squat Rack", "Legs"),
    ("Leg Press", "Legs"),
    ("Leg Extension", "Legs"),
    ("Seated Leg Curl", "Legs"),
    ("Calf Raise Machine", "Legs"),
    ("Hip Abductor", "Legs"),
    ("Shoulder Press Machine", "Shoulders"),
    ("Lateral Raise Machine", "Shoulders"),
    ("Rear Delt Fly", "Shoulders"),
    ("Cable Face Pull", "Shoulders"),
    ("Preacher Curl Machine", "Biceps"),
    ("Cable Bicep Curl", "Biceps"),
    ("Dumbbell Hammer Curl", "Biceps"),
    ("Tricep Pushdown", "Triceps"),
    ("Dip Machine", "Triceps"),
    ("Overhead Cable Extension", "Triceps"),
];

// (name, reps, time)
const BUILTIN_ABS: &[(&str, Option<u32>, Option<&str>)] = &[
    ("Plank", None, Some("60s")),
    ("Crunches", Some(20), None),
    ("Hanging Leg Raise", Some(12), None),
    ("Russian Twist", Some(20), None),
    ("Cable Crunch", Some(15), None),
    ("Ab Wheel Rollout", Some(10), None),
    ("Side Plank", None, Some("45s")),
    ("Dead Bug", Some(12), None),
    ("Mountain Climbers", None, Some("30s")),
];

/// Read-only reference data the builder and presets resolve names against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    exercises: Vec<ExerciseOption>,
    abs: Vec<AbsExerciseOption>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// Catalog from explicit lists. Later duplicates of a key are dropped.
    #[must_use]
    pub fn new(exercises: Vec<ExerciseOption>, abs: Vec<AbsExerciseOption>) -> Self {
        let mut catalog = Self {
            exercises: Vec::with_capacity(exercises.len()),
            abs: Vec::with_capacity(abs.len()),
        };
        catalog.extend(exercises, abs);
        catalog
    }

    #[must_use]
    pub fn builtin() -> Self {
        let exercises = BUILTIN_EXERCISES
            .iter()
            .map(|(machine, region)| ExerciseOption {
                machine: (*machine).to_string(),
                region: (*region).to_string(),
            })
            .collect();
        let abs = BUILTIN_ABS
            .iter()
            .map(|(name, reps, time)| AbsExerciseOption {
                name: (*name).to_string(),
                reps: *reps,
                time: time.map(str::to_string),
            })
            .collect();
        Self { exercises, abs }
    }

    /// Built-in library plus user-configured additions.
    #[must_use]
    pub fn with_extras(extra_exercises: &[ExerciseOption], extra_abs: &[AbsExerciseOption]) -> Self {
        let mut catalog = Self::builtin();
        catalog.extend(extra_exercises.to_vec(), extra_abs.to_vec());
        catalog
    }

    fn extend(&mut self, exercises: Vec<ExerciseOption>, abs: Vec<AbsExerciseOption>) {
        for option in exercises {
            if self.find_exercise(&option.machine).is_some() {
                log::warn!("Skipping duplicate catalog exercise '{}'", option.machine);
                continue;
            }
            self.exercises.push(option);
        }
        for option in abs {
            if self.find_abs(&option.name).is_some() {
                log::warn!("Skipping duplicate catalog core exercise '{}'", option.name);
                continue;
            }
            self.abs.push(option);
        }
    }

    pub fn exercises(&self) -> &[ExerciseOption] {
        &self.exercises
    }

    pub fn abs(&self) -> &[AbsExerciseOption] {
        &self.abs
    }

    /// Exact, case-sensitive machine lookup.
    pub fn find_exercise(&self, machine: &str) -> Option<&ExerciseOption> {
        self.exercises.iter().find(|e| e.machine == machine)
    }

    pub fn find_abs(&self, name: &str) -> Option<&AbsExerciseOption> {
        self.abs.iter().find(|a| a.name == name)
    }

    /// Exercises grouped by region, regions in first-seen order.
    pub fn regions(&self) -> Vec<(&str, Vec<&ExerciseOption>)> {
        let mut groups: Vec<(&str, Vec<&ExerciseOption>)> = Vec::new();
        for option in &self.exercises {
            match groups.iter_mut().find(|(region, _)| *region == option.region) {
                Some((_, members)) => members.push(option),
                None => groups.push((option.region.as_str(), vec![option])),
            }
        }
        groups
    }

    /// Machines in display order (region by region), as used by list pickers.
    pub fn exercises_by_region(&self) -> Vec<&ExerciseOption> {
        self.regions()
            .into_iter()
            .flat_map(|(_, members)| members)
            .collect()
    }
}
