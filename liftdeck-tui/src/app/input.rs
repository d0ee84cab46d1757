// liftdeck-tui/src/app/input.rs
use super::{
    modals::{
        handle_confirm_delete_input, handle_template_selector_input, handle_workout_builder_input,
    },
    navigation_helpers::{list_next, list_previous},
    state::{ActiveModal, App, DeleteOrigin},
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use liftdeck_lib::{BuilderIntent, SelectorAction};

// Main key event handler method on App
impl App {
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        // Handle based on active modal first
        if !matches!(self.active_modal, ActiveModal::None) {
            return self.handle_modal_input(key);
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.open_help(),
            KeyCode::Char('s') => self.open_template_selector(),
            KeyCode::Char('n') => {
                if let Err(e) = self.open_workout_builder(BuilderIntent::Create) {
                    self.set_error(format!("Could not open workout builder: {e:#}"));
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                list_previous(&mut self.template_list_state, self.custom_templates.len());
            }
            KeyCode::Char('j') | KeyCode::Down => {
                list_next(&mut self.template_list_state, self.custom_templates.len());
            }
            KeyCode::Enter => {
                if let Some(template) = self.selected_custom_template().cloned() {
                    self.run_selector_action(SelectorAction::SelectCustom(template));
                }
            }
            KeyCode::Char('e') => {
                if let Some(template) = self.selected_custom_template().cloned() {
                    self.run_selector_action(SelectorAction::EditCustom(template));
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(template) = self.selected_custom_template().cloned() {
                    self.request_delete(template, DeleteOrigin::MainList);
                }
            }
            _ => {}
        }
        Ok(())
    }

    // --- Modal Input Handling ---
    fn handle_modal_input(&mut self, key: KeyEvent) -> Result<()> {
        match self.active_modal {
            ActiveModal::Help => self.handle_help_modal_input(key),
            ActiveModal::TemplateSelector { .. } => handle_template_selector_input(self, key)?,
            ActiveModal::WorkoutBuilder { .. } => handle_workout_builder_input(self, key)?,
            ActiveModal::ConfirmDeleteTemplate { .. } => handle_confirm_delete_input(self, key)?,
            ActiveModal::None => {}
        }
        Ok(())
    }

    fn handle_help_modal_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter | KeyCode::Char('?') => {
                self.active_modal = ActiveModal::None;
            }
            _ => {} // Ignore other keys in help
        }
    }
}
