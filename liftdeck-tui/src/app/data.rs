// liftdeck-tui/src/app/data.rs
use super::navigation_helpers::list_clamp;
use super::state::App;
use liftdeck_lib::PlanSource;

impl App {
    /// Reloads custom templates from the store and drops a plan whose template is gone.
    pub fn refresh_data(&mut self) {
        match self.service.list_custom_templates() {
            Ok(templates) => {
                self.custom_templates = templates;
                list_clamp(&mut self.template_list_state, self.custom_templates.len());

                if let Some(PlanSource::Custom(id)) = self.current_plan.as_ref().map(|p| p.source) {
                    if !self.custom_templates.iter().any(|t| t.id == id) {
                        self.current_plan = None;
                    }
                }
            }
            Err(e) => self.set_error(format!("Error loading custom workouts: {e:#}")),
        }
    }
}
