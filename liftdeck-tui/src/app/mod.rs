// liftdeck-tui/src/app/mod.rs
use thiserror::Error;

pub mod actions;
pub mod data;
pub mod input;
pub mod modals;
pub mod navigation_helpers;
pub mod state;

pub use state::{App, BuilderField};

/// Problems shown inline in a modal instead of the status bar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppInputError {
    #[error("Workout name cannot be empty.")]
    NameEmpty,
    #[error("A workout named '{0}' already exists.")]
    DuplicateName(String),
    #[error("Select at least one machine.")]
    SelectionRequired,
    #[error("{0}")]
    Save(String),
}
