// liftdeck-tui/src/ui/builder_modal.rs
use crate::{
    app::{state::ActiveModal, App, BuilderField},
    ui::layout::centered_rect,
};
use liftdeck_lib::MAX_EXERCISES;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().reversed()
    } else {
        Style::default()
    }
}

fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

pub fn render_workout_builder_modal(f: &mut Frame, app: &mut App) {
    let ActiveModal::WorkoutBuilder {
        ref builder,
        ref focused_field,
        ref mut exercise_list_state,
        ref mut abs_list_state,
        ref error_message,
    } = app.active_modal
    else {
        return;
    };
    let Some(draft) = builder.draft() else {
        return;
    };
    let catalog = app.service.catalog();
    let focused_field = *focused_field;

    let title = match draft.editing() {
        Some(template) => format!("Edit Workout: {}", template.name),
        None => "New Custom Workout".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::new().yellow());
    let area = centered_rect(80, 85, f.size());
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Name label
            Constraint::Length(1), // Name input
            Constraint::Length(1), // Duplicate name message
            Constraint::Min(6),    // Exercise + core lists
            Constraint::Length(1), // Session advisory
            Constraint::Length(1), // Auto schedule
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Buttons
            Constraint::Length(1), // Error
        ])
        .split(area.inner(&Margin {
            vertical: 1,
            horizontal: 1,
        }));

    // --- Name ---
    f.render_widget(Paragraph::new("Workout name:"), chunks[0]);
    f.render_widget(
        Paragraph::new(draft.name.as_str()).style(focus_style(focused_field == BuilderField::Name)),
        chunks[1],
    );
    if builder.is_duplicate() {
        f.render_widget(
            Paragraph::new("A workout with this name already exists.")
                .style(Style::default().fg(Color::Red)),
            chunks[2],
        );
    }

    // --- Lists ---
    let list_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[3]);

    let mut previous_region: Option<&str> = None;
    let exercise_items: Vec<ListItem> = catalog
        .exercises_by_region()
        .into_iter()
        .map(|option| {
            let selected = draft.machines().contains(&option.machine);
            // Region is only labelled on the first machine of each group
            let region = if previous_region == Some(option.region.as_str()) {
                String::new()
            } else {
                option.region.clone()
            };
            previous_region = Some(option.region.as_str());
            let style = if selected {
                Style::new().fg(Color::Green)
            } else {
                Style::new()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{region:<10}"), Style::new().fg(Color::DarkGray)),
                Span::styled(
                    format!("{} {}", checkbox(selected), option.machine),
                    style,
                ),
            ]))
        })
        .collect();
    let exercises_block = Block::default()
        .borders(Borders::ALL)
        .title(format!(
            "Machines {}/{}",
            draft.machines().len(),
            MAX_EXERCISES
        ))
        .border_style(focus_border(focused_field == BuilderField::Exercises));
    let exercise_list = List::new(exercise_items)
        .block(exercises_block)
        .highlight_style(highlight(focused_field == BuilderField::Exercises));
    f.render_stateful_widget(exercise_list, list_chunks[0], exercise_list_state);

    let abs_items: Vec<ListItem> = catalog
        .abs()
        .iter()
        .map(|option| {
            let selected = draft.abs().contains(&option.name);
            let style = if selected {
                Style::new().fg(Color::Green)
            } else {
                Style::new()
            };
            ListItem::new(Span::styled(
                format!("{} {}", checkbox(selected), option.name),
                style,
            ))
        })
        .collect();
    let abs_block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Core ({})", draft.abs().len()))
        .border_style(focus_border(focused_field == BuilderField::Core));
    let abs_list = List::new(abs_items)
        .block(abs_block)
        .highlight_style(highlight(focused_field == BuilderField::Core));
    f.render_stateful_widget(abs_list, list_chunks[1], abs_list_state);

    // --- Advisory ---
    if let Some(warning) = builder.warning() {
        f.render_widget(
            Paragraph::new(warning.message()).style(Style::default().fg(Color::Yellow).italic()),
            chunks[4],
        );
    }

    // --- Auto schedule ---
    f.render_widget(
        Paragraph::new(format!(
            "{} Include in auto schedule",
            checkbox(draft.include_in_auto_schedule)
        ))
        .style(focus_style(focused_field == BuilderField::AutoSchedule)),
        chunks[5],
    );

    // --- Buttons ---
    let button_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[7]);

    let mut save_style = focus_style(focused_field == BuilderField::Save);
    if !builder.can_save() {
        save_style = save_style.fg(Color::DarkGray).add_modifier(Modifier::DIM);
    }
    let save_label = if draft.editing().is_some() {
        " Save Changes "
    } else {
        " Create "
    };
    f.render_widget(
        Paragraph::new(save_label)
            .alignment(Alignment::Center)
            .style(save_style),
        button_layout[0],
    );
    f.render_widget(
        Paragraph::new(" Cancel ")
            .alignment(Alignment::Center)
            .style(focus_style(focused_field == BuilderField::Cancel)),
        button_layout[1],
    );

    if let Some(err) = error_message {
        f.render_widget(
            Paragraph::new(err.as_str()).style(Style::default().fg(Color::Red)),
            chunks[8],
        );
    }

    if focused_field == BuilderField::Name {
        f.set_cursor(
            chunks[1].x + draft.name.chars().count() as u16,
            chunks[1].y,
        );
    }
}

fn focus_border(focused: bool) -> Style {
    if focused {
        Style::new().fg(Color::Yellow)
    } else {
        Style::new()
    }
}

fn highlight(focused: bool) -> Style {
    if focused {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    }
}
