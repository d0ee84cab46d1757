//src/config.rs
use comfy_table::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

use crate::catalog::{AbsExerciseOption, ExerciseOption};

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_CONFIG_DIR: &str = "liftdeck";
const CONFIG_ENV_VAR: &str = "LIFTDECK_CONFIG_DIR"; // Environment variable name

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine configuration directory.")]
    CannotDetermineConfigDir,
    #[error("I/O error accessing config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file (TOML): {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Failed to serialize config data (TOML): {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Invalid color name: {0}")]
    InvalidColor(String),
}

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Units {
    #[default]
    Metric, // kg
    Imperial, // lbs
}

impl Units {
    pub const fn weight_unit(self) -> &'static str {
        match self {
            Self::Metric => "kg",
            Self::Imperial => "lbs",
        }
    }
}

// Define standard colors using strum for easy iteration/parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum StandardColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    DarkGrey,
    DarkRed,
    DarkGreen,
    DarkYellow,
    DarkBlue,
    DarkMagenta,
    DarkCyan,
    Grey,
}

impl From<StandardColor> for Color {
    fn from(value: StandardColor) -> Self {
        match value {
            StandardColor::Black => Self::Black,
            StandardColor::Red => Self::Red,
            StandardColor::Green => Self::Green,
            StandardColor::Yellow => Self::Yellow,
            StandardColor::Blue => Self::Blue,
            StandardColor::Magenta => Self::Magenta,
            StandardColor::Cyan => Self::Cyan,
            StandardColor::White => Self::White,
            StandardColor::DarkGrey => Self::DarkGrey,
            StandardColor::DarkRed => Self::DarkRed,
            StandardColor::DarkGreen => Self::DarkGreen,
            StandardColor::DarkYellow => Self::DarkYellow,
            StandardColor::DarkBlue => Self::DarkBlue,
            StandardColor::DarkMagenta => Self::DarkMagenta,
            StandardColor::DarkCyan => Self::DarkCyan,
            StandardColor::Grey => Self::Grey,
        }
    }
}

/// Case-insensitive color name lookup ("darkgrey", "Green", ...).
pub fn parse_color(color_str: &str) -> Result<StandardColor, ConfigError> {
    StandardColor::iter()
        .find(|color| format!("{color:?}").eq_ignore_ascii_case(color_str))
        .ok_or_else(|| ConfigError::InvalidColor(color_str.to_string()))
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Theme {
    pub header_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            header_color: "Green".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)] // Ensure defaults are used if fields are missing
pub struct Config {
    pub units: Units,
    /// Ask before deleting a custom workout.
    pub confirm_deletes: bool,
    pub theme: Theme,
    /// User additions to the built-in exercise library.
    pub extra_exercises: Vec<ExerciseOption>,
    pub extra_abs: Vec<AbsExerciseOption>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            units: Units::default(),
            confirm_deletes: true,
            theme: Theme::default(),
            extra_exercises: Vec::new(),
            extra_abs: Vec::new(),
        }
    }
}

/// Determines the path to the configuration file, creating its directory if needed.
pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir_path = if let Ok(path_str) = std::env::var(CONFIG_ENV_VAR) {
        let path = PathBuf::from(path_str);
        if !path.is_dir() {
            log::warn!(
                "Environment variable {} points to '{}', which is not a directory. Trying to create it.",
                CONFIG_ENV_VAR,
                path.display()
            );
        }
        path
    } else {
        let base_config_dir = dirs::config_dir().ok_or(ConfigError::CannotDetermineConfigDir)?;
        base_config_dir.join(APP_CONFIG_DIR)
    };

    if !config_dir_path.exists() {
        fs::create_dir_all(&config_dir_path)?;
    }

    Ok(config_dir_path.join(CONFIG_FILE_NAME))
}

/// Loads the configuration, writing out defaults if the file doesn't exist yet.
pub fn load(config_path: &Path) -> Result<Config, ConfigError> {
    if config_path.exists() {
        let config_content = fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    } else {
        let default_config = Config::default();
        save(config_path, &default_config)?;
        log::info!("Wrote default config to {}", config_path.display());
        Ok(default_config)
    }
}

pub fn save(config_path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent_dir) = config_path.parent() {
        if !parent_dir.exists() {
            fs::create_dir_all(parent_dir)?;
        }
    }
    let config_content = toml::to_string_pretty(config)?;
    fs::write(config_path, config_content)?;
    Ok(())
}
