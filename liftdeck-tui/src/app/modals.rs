// liftdeck-tui/src/app/modals.rs
use super::navigation_helpers::{list_next, list_previous};
use super::state::{ActiveModal, App, BuilderField, DeleteOrigin};
use super::AppInputError;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use liftdeck_lib::{
    selector, Confirmation, CustomWorkoutTemplate, SaveOutcome, SelectorAction, SelectorEntry,
    TemplateStore, WorkoutBuilder,
};

// --- Template selector ---

pub fn handle_template_selector_input(app: &mut App, key: KeyEvent) -> Result<()> {
    let ActiveModal::TemplateSelector { ref mut list_state } = app.active_modal else {
        return Ok(());
    };
    let entries = selector::entries(&app.custom_templates);

    // Resolved to owned values before `app` is touched again
    let pending = match key.code {
        KeyCode::Char('k') | KeyCode::Up => {
            list_previous(list_state, entries.len());
            Pending::Nothing
        }
        KeyCode::Char('j') | KeyCode::Down => {
            list_next(list_state, entries.len());
            Pending::Nothing
        }
        KeyCode::Esc | KeyCode::Char('q') => Pending::Action(SelectorAction::Dismiss),
        KeyCode::Enter => match list_state.selected().and_then(|i| entries.get(i)) {
            Some(SelectorEntry::Preset(preset)) => {
                Pending::Action(SelectorAction::SelectPreset(*preset))
            }
            Some(SelectorEntry::Custom(template)) => {
                Pending::Action(SelectorAction::SelectCustom((*template).clone()))
            }
            Some(SelectorEntry::CreateCustom) => Pending::Action(SelectorAction::CreateCustom),
            None => Pending::Nothing,
        },
        KeyCode::Char('e') => match list_state.selected().and_then(|i| entries.get(i)) {
            Some(SelectorEntry::Custom(template)) => {
                Pending::Action(SelectorAction::EditCustom((*template).clone()))
            }
            _ => Pending::Nothing, // Presets can't be edited
        },
        KeyCode::Char('d') | KeyCode::Delete => {
            match list_state.selected().and_then(|i| entries.get(i)) {
                Some(SelectorEntry::Custom(template)) => Pending::Delete((*template).clone()),
                _ => Pending::Nothing,
            }
        }
        _ => Pending::Nothing,
    };

    match pending {
        Pending::Nothing => {}
        Pending::Action(action) => app.run_selector_action(action),
        Pending::Delete(template) => app.request_delete(template, DeleteOrigin::Selector),
    }
    Ok(())
}

enum Pending {
    Nothing,
    Action(SelectorAction),
    Delete(CustomWorkoutTemplate),
}

pub fn handle_confirm_delete_input(app: &mut App, key: KeyEvent) -> Result<()> {
    let ActiveModal::ConfirmDeleteTemplate {
        ref template,
        origin,
    } = app.active_modal
    else {
        return Ok(());
    };
    let confirmation = match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Confirmation::Confirmed,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Confirmation::Declined,
        _ => return Ok(()),
    };
    let template = template.clone();

    app.answer_delete(template, confirmation, origin);
    Ok(())
}

// --- Workout builder ---

/// Why the builder can't save right now, checked in the order the user fills the form.
fn save_blocker(builder: &WorkoutBuilder) -> Option<AppInputError> {
    let draft = builder.draft()?;
    if draft.trimmed_name().is_empty() {
        Some(AppInputError::NameEmpty)
    } else if builder.is_duplicate() {
        Some(AppInputError::DuplicateName(draft.trimmed_name().to_string()))
    } else if draft.machines().is_empty() {
        Some(AppInputError::SelectionRequired)
    } else {
        None
    }
}

enum BuilderCommand {
    Stay,
    Save,
    Close,
}

pub fn handle_workout_builder_input(app: &mut App, key: KeyEvent) -> Result<()> {
    let ActiveModal::WorkoutBuilder {
        ref mut builder,
        ref mut focused_field,
        ref mut exercise_list_state,
        ref mut abs_list_state,
        ref mut error_message,
    } = app.active_modal
    else {
        return Ok(());
    };

    // Always clear error on any input
    *error_message = None;

    let catalog = app.service.catalog();
    let exercises = catalog.exercises_by_region();
    let abs = catalog.abs();

    let command = match key.code {
        KeyCode::Esc => BuilderCommand::Close,
        KeyCode::Tab => {
            *focused_field = focused_field.next();
            BuilderCommand::Stay
        }
        KeyCode::BackTab => {
            *focused_field = focused_field.previous();
            BuilderCommand::Stay
        }
        code => match *focused_field {
            BuilderField::Name => {
                if let Some(draft) = builder.draft_mut() {
                    match code {
                        KeyCode::Char(c) => draft.name.push(c),
                        KeyCode::Backspace => {
                            draft.name.pop();
                        }
                        KeyCode::Enter | KeyCode::Down => *focused_field = BuilderField::Exercises,
                        _ => {}
                    }
                }
                BuilderCommand::Stay
            }
            BuilderField::Exercises => {
                match code {
                    KeyCode::Char('k') | KeyCode::Up => {
                        list_previous(exercise_list_state, exercises.len());
                    }
                    KeyCode::Char('j') | KeyCode::Down => {
                        list_next(exercise_list_state, exercises.len());
                    }
                    KeyCode::Char(' ') | KeyCode::Enter => {
                        let selected = exercise_list_state.selected().and_then(|i| exercises.get(i));
                        if let (Some(option), Some(draft)) = (selected, builder.draft_mut()) {
                            draft.toggle_machine(&option.machine);
                        }
                    }
                    _ => {}
                }
                BuilderCommand::Stay
            }
            BuilderField::Core => {
                match code {
                    KeyCode::Char('k') | KeyCode::Up => list_previous(abs_list_state, abs.len()),
                    KeyCode::Char('j') | KeyCode::Down => list_next(abs_list_state, abs.len()),
                    KeyCode::Char(' ') | KeyCode::Enter => {
                        let selected = abs_list_state.selected().and_then(|i| abs.get(i));
                        if let (Some(option), Some(draft)) = (selected, builder.draft_mut()) {
                            draft.toggle_abs(&option.name);
                        }
                    }
                    _ => {}
                }
                BuilderCommand::Stay
            }
            BuilderField::AutoSchedule => {
                if matches!(code, KeyCode::Char(' ') | KeyCode::Enter) {
                    if let Some(draft) = builder.draft_mut() {
                        let include = !draft.include_in_auto_schedule;
                        draft.set_include_in_auto_schedule(include);
                    }
                }
                BuilderCommand::Stay
            }
            BuilderField::Save => match code {
                KeyCode::Enter => match save_blocker(builder) {
                    Some(err) => {
                        *error_message = Some(err.to_string());
                        BuilderCommand::Stay
                    }
                    None => BuilderCommand::Save,
                },
                KeyCode::Right => {
                    *focused_field = BuilderField::Cancel;
                    BuilderCommand::Stay
                }
                _ => BuilderCommand::Stay,
            },
            BuilderField::Cancel => match code {
                KeyCode::Enter => BuilderCommand::Close,
                KeyCode::Left => {
                    *focused_field = BuilderField::Save;
                    BuilderCommand::Stay
                }
                _ => BuilderCommand::Stay,
            },
        },
    };

    match command {
        BuilderCommand::Stay => {}
        BuilderCommand::Close => {
            builder.close(&mut TemplateStore::new(&app.service.conn));
            app.active_modal = ActiveModal::None;
        }
        BuilderCommand::Save => match app.service.save_builder(builder) {
            Ok((SaveOutcome::Created, id)) => {
                app.active_modal = ActiveModal::None;
                app.refresh_data();
                select_template(app, id);
                app.set_info("Custom workout created".to_string());
            }
            Ok((SaveOutcome::Updated(id), _)) => {
                app.active_modal = ActiveModal::None;
                app.refresh_data();
                select_template(app, Some(id));
                app.set_info("Custom workout updated".to_string());
            }
            Ok((SaveOutcome::Disabled, _)) => {}
            // Draft stays open so nothing typed is lost
            Err(e) => *error_message = Some(AppInputError::Save(e.to_string()).to_string()),
        },
    }
    Ok(())
}

fn select_template(app: &mut App, id: Option<i64>) {
    if let Some(index) = id.and_then(|id| app.custom_templates.iter().position(|t| t.id == id)) {
        app.template_list_state.select(Some(index));
    }
}
