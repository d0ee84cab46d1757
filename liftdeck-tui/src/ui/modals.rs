// liftdeck-tui/src/ui/modals.rs
use crate::{
    app::{state::ActiveModal, App},
    ui::{builder_modal::render_workout_builder_modal, layout::centered_rect},
};
use liftdeck_lib::{selector, SelectorEntry};
use ratatui::{
    layout::{Alignment, Margin},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub fn render_modal(f: &mut Frame, app: &mut App) {
    match app.active_modal {
        ActiveModal::Help => render_help_modal(f),
        ActiveModal::TemplateSelector { .. } => render_template_selector_modal(f, app),
        ActiveModal::WorkoutBuilder { .. } => render_workout_builder_modal(f, app),
        ActiveModal::ConfirmDeleteTemplate { .. } => render_confirm_delete_modal(f, app),
        ActiveModal::None => {} // Should not happen if called correctly
    }
}

fn render_help_modal(f: &mut Frame) {
    let block = Block::default()
        .title("Help (?)")
        .borders(Borders::ALL)
        .title_style(Style::new().bold())
        .border_style(Style::new().yellow());
    let area = centered_rect(60, 70, f.size());
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let help_text = vec![
        Line::from("--- Main Screen ---").style(Style::new().bold().underlined()),
        Line::from(" k / ↑, j / ↓: Navigate Your Workouts"),
        Line::from(" Enter: Load Selected Workout"),
        Line::from(" s: Open Template Selector (presets and your workouts)"),
        Line::from(" n: Build a New Custom Workout"),
        Line::from(" e: Edit Selected Workout"),
        Line::from(" d / Delete: Delete Selected Workout"),
        Line::from(" ?: Show/Hide This Help"),
        Line::from(" q: Quit Application"),
        Line::from(""),
        Line::from("--- Template Selector ---").style(Style::new().bold().underlined()),
        Line::from(" Enter: Load Template / Create Custom"),
        Line::from(" e: Edit Custom Workout"),
        Line::from(" d: Delete Custom Workout"),
        Line::from(" Esc: Close"),
        Line::from(""),
        Line::from("--- Workout Builder ---").style(Style::new().bold().underlined()),
        Line::from(" Tab / Shift+Tab: Move Between Fields"),
        Line::from(" Space / Enter: Toggle Machine, Core Exercise or Auto Schedule"),
        Line::from(format!(
            " Up to {} machines per workout",
            liftdeck_lib::MAX_EXERCISES
        )),
        Line::from(" Esc: Discard and Close"),
        Line::from(""),
        Line::from(Span::styled(
            " Press Esc, ?, or Enter to close ",
            Style::new().italic().yellow(),
        )),
    ];

    let paragraph = Paragraph::new(help_text).wrap(Wrap { trim: false });
    f.render_widget(
        paragraph,
        area.inner(&Margin {
            vertical: 1,
            horizontal: 1,
        }),
    );
}

fn render_template_selector_modal(f: &mut Frame, app: &App) {
    let ActiveModal::TemplateSelector { ref list_state } = app.active_modal else {
        return;
    };
    let entries = selector::entries(&app.custom_templates);

    let area = centered_rect(50, 60, f.size());
    let block = Block::default()
        .title("Choose a Workout")
        .borders(Borders::ALL)
        .border_style(Style::new().yellow());
    f.render_widget(Clear, area);

    let mut items = Vec::with_capacity(entries.len() + 2);
    let mut custom_header_shown = false;
    // Rendered row of each entry, section headers included in the count
    let mut row_of_entry = Vec::with_capacity(entries.len());
    items.push(ListItem::new(Line::from("Presets").style(Style::new().bold().underlined())));
    for entry in &entries {
        match entry {
            SelectorEntry::Custom(_) if !custom_header_shown => {
                custom_header_shown = true;
                items.push(ListItem::new(
                    Line::from("My Workouts").style(Style::new().bold().underlined()),
                ));
            }
            _ => {}
        }
        row_of_entry.push(items.len());
        let item = match entry {
            SelectorEntry::CreateCustom => {
                ListItem::new(Line::from(entry.label().to_string()).style(Style::new().green()))
            }
            _ => ListItem::new(format!("  {}", entry.label())),
        };
        items.push(item);
    }

    // Headers shift rows, so map the entry selection onto a render-only state
    let mut render_state = ListState::default();
    render_state.select(
        list_state
            .selected()
            .and_then(|i| row_of_entry.get(i).copied()),
    );

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, &mut render_state);
}

fn render_confirm_delete_modal(f: &mut Frame, app: &App) {
    let ActiveModal::ConfirmDeleteTemplate { template, .. } = &app.active_modal else {
        return;
    };
    let block = Block::default()
        .title("Delete Workout")
        .borders(Borders::ALL)
        .border_style(Style::new().red());
    let area = centered_rect(50, 20, f.size());
    f.render_widget(Clear, area);

    let text = vec![
        Line::from(vec![
            Span::raw("Delete "),
            Span::styled(template.name.clone(), Style::new().bold()),
            Span::raw(format!(" ({} machines)?", template.exercises.len())),
        ]),
        Line::from("This cannot be undone."),
        Line::from(""),
        Line::from(Span::styled(
            "[y] Delete    [n] Keep",
            Style::new().fg(Color::Yellow),
        )),
    ];
    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
