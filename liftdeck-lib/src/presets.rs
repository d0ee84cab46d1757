//src/presets.rs
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::builder::BuilderError;
use crate::catalog::Catalog;
use crate::model::Exercise;

/// The fixed preset workouts. The label is both what the selector shows and
/// the key used to look the preset up, so they can't drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
pub enum PresetTemplate {
    #[strum(serialize = "Chest Day")]
    ChestDay,
    #[strum(serialize = "Legs")]
    Legs,
    #[strum(serialize = "Back & Biceps")]
    BackBiceps,
    #[strum(serialize = "Back, Biceps & Legs")]
    BackBicepsLegs,
    #[strum(serialize = "Chest & Triceps")]
    ChestTriceps,
    #[strum(serialize = "Chest & Shoulders")]
    ChestShoulders,
    #[strum(serialize = "Chest, Shoulders & Legs")]
    ChestShouldersLegs,
}

impl PresetTemplate {
    /// All presets in selector order.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    pub fn label(self) -> &'static str {
        self.into()
    }

    /// Exact label match.
    pub fn from_label(label: &str) -> Option<Self> {
        label.parse().ok()
    }

    pub fn labels() -> Vec<String> {
        Self::iter().map(|p| p.label().to_string()).collect()
    }

    /// Machines making up the preset, in workout order.
    pub const fn machines(self) -> &'static [&'static str] {
        match self {
            Self::ChestDay => &[
                "Bench Press",
                "Incline Bench Press",
                "Chest Fly Machine",
                "Pec Deck",
                "Cable Crossover",
            ],
            Self::Legs => &[
                "Squat Rack",
                "Leg Press",
                "Leg Extension",
                "Seated Leg Curl",
                "Calf Raise Machine",
            ],
            Self::BackBiceps => &[
                "Lat Pulldown",
                "Seated Cable Row",
                "T-Bar Row",
                "Preacher Curl Machine",
                "Cable Bicep Curl",
                "Dumbbell Hammer Curl",
            ],
            Self::BackBicepsLegs => &[
                "Lat Pulldown",
                "Seated Cable Row",
                "Preacher Curl Machine",
                "Cable Bicep Curl",
                "Squat Rack",
                "Leg Press",
                "Seated Leg Curl",
            ],
            Self::ChestTriceps => &[
                "Bench Press",
                "Incline Bench Press",
                "Pec Deck",
                "Tricep Pushdown",
                "Dip Machine",
                "Overhead Cable Extension",
            ],
            Self::ChestShoulders => &[
                "Bench Press",
                "Chest Fly Machine",
                "Shoulder Press Machine",
                "Lateral Raise Machine",
                "Rear Delt Fly",
            ],
            Self::ChestShouldersLegs => &[
                "Bench Press",
                "Chest Fly Machine",
                "Shoulder Press Machine",
                "Lateral Raise Machine",
                "Squat Rack",
                "Leg Press",
                "Leg Extension",
            ],
        }
    }

    /// Fresh exercise records for this preset.
    ///
    /// # Errors
    /// `BuilderError::UnknownMachine` if the catalog lacks one of the preset's machines.
    pub fn build(self, catalog: &Catalog) -> Result<Vec<Exercise>, BuilderError> {
        self.machines()
            .iter()
            .map(|machine| {
                catalog
                    .find_exercise(machine)
                    .map(Exercise::from_option)
                    .ok_or_else(|| BuilderError::UnknownMachine((*machine).to_string()))
            })
            .collect()
    }
}
