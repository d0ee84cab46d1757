// liftdeck-tui/src/app/state.rs
use ratatui::widgets::ListState;
use std::time::{Duration, Instant};
use liftdeck_lib::{AppService, CustomWorkoutTemplate, WorkoutBuilder, WorkoutPlan};

const MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

// Focusable parts of the workout builder modal, in Tab order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuilderField {
    Name,
    Exercises,
    Core,
    AutoSchedule,
    Save,
    Cancel,
}

impl BuilderField {
    pub const fn next(self) -> Self {
        match self {
            Self::Name => Self::Exercises,
            Self::Exercises => Self::Core,
            Self::Core => Self::AutoSchedule,
            Self::AutoSchedule => Self::Save,
            Self::Save => Self::Cancel,
            Self::Cancel => Self::Name,
        }
    }

    pub const fn previous(self) -> Self {
        match self {
            Self::Name => Self::Cancel,
            Self::Exercises => Self::Name,
            Self::Core => Self::Exercises,
            Self::AutoSchedule => Self::Core,
            Self::Save => Self::AutoSchedule,
            Self::Cancel => Self::Save,
        }
    }
}

/// Screen a delete was asked from, and returned to once it's answered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOrigin {
    MainList,
    Selector,
}

// Represents the state of active modals
#[derive(Clone, Debug)]
pub enum ActiveModal {
    None,
    Help,
    TemplateSelector {
        list_state: ListState,
    },
    WorkoutBuilder {
        builder: WorkoutBuilder,
        focused_field: BuilderField,
        exercise_list_state: ListState,
        abs_list_state: ListState,
        error_message: Option<String>,
    },
    ConfirmDeleteTemplate {
        template: CustomWorkoutTemplate,
        origin: DeleteOrigin,
    },
}

// Holds the application state
pub struct App {
    pub service: AppService,
    pub should_quit: bool,
    pub active_modal: ActiveModal,
    pub last_error: Option<String>, // For status bar errors
    pub last_info: Option<String>,
    pub message_clear_time: Option<Instant>,

    // === Main screen ===
    pub custom_templates: Vec<CustomWorkoutTemplate>,
    pub template_list_state: ListState,
    pub current_plan: Option<WorkoutPlan>,
}

impl App {
    pub fn new(service: AppService) -> Self {
        let mut app = App {
            service,
            should_quit: false,
            active_modal: ActiveModal::None,
            last_error: None,
            last_info: None,
            message_clear_time: None,
            custom_templates: Vec::new(),
            template_list_state: ListState::default(),
            current_plan: None,
        };
        app.template_list_state.select(Some(0));
        app
    }

    pub fn set_error(&mut self, msg: String) {
        log::warn!("{}", msg);
        self.last_error = Some(msg);
        self.last_info = None;
        self.message_clear_time = Some(Instant::now() + MESSAGE_TIMEOUT);
    }

    pub fn set_info(&mut self, msg: String) {
        self.last_info = Some(msg);
        self.last_error = None;
        self.message_clear_time = Some(Instant::now() + MESSAGE_TIMEOUT);
    }

    // Called once per frame from the main loop
    pub fn clear_expired_messages(&mut self) {
        if let Some(clear_time) = self.message_clear_time {
            if Instant::now() >= clear_time {
                self.last_error = None;
                self.last_info = None;
                self.message_clear_time = None;
            }
        }
    }

    pub fn selected_custom_template(&self) -> Option<&CustomWorkoutTemplate> {
        self.template_list_state
            .selected()
            .and_then(|i| self.custom_templates.get(i))
    }
}
