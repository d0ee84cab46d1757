// liftdeck-tui/src/ui/mod.rs

// Declare UI component modules
mod builder_modal;
mod layout;
mod modals;
mod plan_view;
mod status_bar;

// Re-export the main render function
pub use layout::render_ui;
