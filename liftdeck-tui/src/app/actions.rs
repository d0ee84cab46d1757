// liftdeck-tui/src/app/actions.rs
use super::state::{ActiveModal, App, BuilderField, DeleteOrigin};
use anyhow::Result;
use liftdeck_lib::{
    selector, BuilderIntent, Confirmation, CustomWorkoutTemplate, SelectorAction,
    TemplateSelectorDelegate,
};
use ratatui::widgets::ListState;

impl App {
    pub fn open_help(&mut self) {
        self.active_modal = ActiveModal::Help;
    }

    pub fn open_template_selector(&mut self) {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        self.active_modal = ActiveModal::TemplateSelector { list_state };
    }

    /// Opens the builder with a fresh draft and the current set of taken names.
    pub fn open_workout_builder(&mut self, intent: BuilderIntent) -> Result<()> {
        let builder = self.service.open_builder(intent)?;
        let mut exercise_list_state = ListState::default();
        exercise_list_state.select(Some(0));
        let mut abs_list_state = ListState::default();
        abs_list_state.select(Some(0));
        self.active_modal = ActiveModal::WorkoutBuilder {
            builder,
            focused_field: BuilderField::Name,
            exercise_list_state,
            abs_list_state,
            error_message: None,
        };
        Ok(())
    }

    /// Asks first when deletes need confirming, otherwise deletes straight away.
    pub fn request_delete(&mut self, template: CustomWorkoutTemplate, origin: DeleteOrigin) {
        if self.service.config.confirm_deletes {
            self.active_modal = ActiveModal::ConfirmDeleteTemplate { template, origin };
        } else {
            self.answer_delete(template, Confirmation::Confirmed, origin);
        }
    }

    /// Runs (or drops) a delete, then goes back to where it was asked from.
    pub fn answer_delete(
        &mut self,
        template: CustomWorkoutTemplate,
        confirmation: Confirmation,
        origin: DeleteOrigin,
    ) {
        self.run_selector_action(SelectorAction::DeleteCustom(template, confirmation));
        match origin {
            DeleteOrigin::MainList => self.active_modal = ActiveModal::None,
            DeleteOrigin::Selector => self.open_template_selector(),
        }
    }

    /// Relays a selector choice to `self`, reporting failures in the status bar.
    pub fn run_selector_action(&mut self, action: SelectorAction) {
        if let Err(e) = selector::dispatch(action, self) {
            self.set_error(format!("{e:#}"));
        }
    }
}

impl TemplateSelectorDelegate for App {
    fn on_select_template(&mut self, label: &str) -> Result<()> {
        let plan = self.service.resolve_selection(label)?;
        log::info!("Selected workout '{}'", plan.name);
        self.set_info(format!(
            "Loaded '{}' ({} machines)",
            plan.name,
            plan.exercises.len()
        ));
        self.current_plan = Some(plan);
        self.active_modal = ActiveModal::None;
        Ok(())
    }

    fn on_create_custom(&mut self) -> Result<()> {
        self.open_workout_builder(BuilderIntent::Create)
    }

    fn on_edit_template(&mut self, template: &CustomWorkoutTemplate) -> Result<()> {
        self.open_workout_builder(BuilderIntent::Edit(template.clone()))
    }

    fn on_delete_template(&mut self, id: i64) -> Result<()> {
        self.service.delete_custom_template(id)?;
        self.refresh_data();
        self.set_info(format!("Deleted custom workout ID {id}"));
        Ok(())
    }

    fn on_close(&mut self) -> Result<()> {
        self.active_modal = ActiveModal::None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use liftdeck_lib::{AppService, Config, PresetTemplate};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    // App with two saved custom workouts, loaded into the main list
    fn create_test_app(confirm_deletes: bool) -> Result<App> {
        let config = Config {
            confirm_deletes,
            ..Config::default()
        };
        let mut app = App::new(AppService::in_memory(config)?);
        for (name, machine) in [("Push", "Bench Press"), ("Pull", "Lat Pulldown")] {
            let mut builder = app.service.open_builder(BuilderIntent::Create)?;
            let draft = builder.draft_mut().expect("builder just opened");
            draft.set_name(name);
            draft.toggle_machine(machine);
            app.service.save_builder(&mut builder)?;
        }
        app.refresh_data();
        Ok(app)
    }

    fn select_in_selector(app: &mut App, index: usize) {
        if let ActiveModal::TemplateSelector { list_state } = &mut app.active_modal {
            list_state.select(Some(index));
        }
    }

    #[test]
    fn test_confirmed_delete_from_main_list_returns_to_main_list() -> Result<()> {
        let mut app = create_test_app(true)?;
        app.handle_key_event(key(KeyCode::Char('d')))?;
        assert!(matches!(
            app.active_modal,
            ActiveModal::ConfirmDeleteTemplate {
                origin: DeleteOrigin::MainList,
                ..
            }
        ));

        app.handle_key_event(key(KeyCode::Char('y')))?;
        assert!(matches!(app.active_modal, ActiveModal::None));
        assert_eq!(app.custom_templates.len(), 1);
        assert_eq!(app.custom_templates[0].name, "Pull");
        Ok(())
    }

    #[test]
    fn test_declined_delete_from_main_list_returns_to_main_list() -> Result<()> {
        let mut app = create_test_app(true)?;
        app.handle_key_event(key(KeyCode::Char('d')))?;
        app.handle_key_event(key(KeyCode::Esc))?;
        assert!(matches!(app.active_modal, ActiveModal::None));
        assert_eq!(app.custom_templates.len(), 2);
        Ok(())
    }

    #[test]
    fn test_unconfirmed_delete_from_main_list_stays_on_main_list() -> Result<()> {
        let mut app = create_test_app(false)?;
        app.handle_key_event(key(KeyCode::Char('d')))?;
        assert!(matches!(app.active_modal, ActiveModal::None));
        assert_eq!(app.custom_templates.len(), 1);
        Ok(())
    }

    #[test]
    fn test_delete_from_selector_returns_to_selector() -> Result<()> {
        let first_custom = PresetTemplate::all().count();

        let mut app = create_test_app(true)?;
        app.handle_key_event(key(KeyCode::Char('s')))?;
        select_in_selector(&mut app, first_custom);
        app.handle_key_event(key(KeyCode::Char('d')))?;
        assert!(matches!(
            app.active_modal,
            ActiveModal::ConfirmDeleteTemplate {
                origin: DeleteOrigin::Selector,
                ..
            }
        ));
        app.handle_key_event(key(KeyCode::Char('n')))?;
        assert!(matches!(app.active_modal, ActiveModal::TemplateSelector { .. }));
        assert_eq!(app.custom_templates.len(), 2);

        select_in_selector(&mut app, first_custom);
        app.handle_key_event(key(KeyCode::Char('d')))?;
        app.handle_key_event(key(KeyCode::Enter))?;
        assert!(matches!(app.active_modal, ActiveModal::TemplateSelector { .. }));
        assert_eq!(app.custom_templates.len(), 1);
        Ok(())
    }
}
