// liftdeck-tui/src/ui/plan_view.rs
use crate::app::App;
use chrono::Local;
use liftdeck_lib::{PlanSource, WorkoutPlan};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Row, Table, Wrap},
    Frame,
};

pub fn render_main_screen(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    render_custom_templates(f, app, chunks[0]);
    render_plan(f, app, chunks[1]);
}

fn render_custom_templates(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("My Workouts");

    if app.custom_templates.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from("No custom workouts yet."),
            Line::from(""),
            Line::from(Span::styled("Press 'n' to build one.", Style::new().italic())),
        ])
        .block(block)
        .wrap(Wrap { trim: true });
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .custom_templates
        .iter()
        .map(|t| {
            let updated = t
                .updated_at
                .map(|ts| ts.with_timezone(&Local).format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            let mut spans = vec![
                Span::raw(t.name.clone()),
                Span::styled(
                    format!("  {} machines", t.exercises.len()),
                    Style::new().fg(Color::DarkGray),
                ),
            ];
            if t.include_in_auto_schedule {
                spans.push(Span::styled(" ⟳", Style::new().fg(Color::Cyan)));
            }
            if !updated.is_empty() {
                spans.push(Span::styled(format!("  {updated}"), Style::new().fg(Color::DarkGray)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, &mut app.template_list_state);
}

fn render_plan(f: &mut Frame, app: &App, area: Rect) {
    let Some(plan) = &app.current_plan else {
        let hint = Paragraph::new(vec![
            Line::from("No workout loaded."),
            Line::from(""),
            Line::from(Span::styled(
                "Press 's' to pick a template, or Enter on one of your workouts.",
                Style::new().italic(),
            )),
        ])
        .block(Block::default().borders(Borders::ALL).title("Workout"))
        .wrap(Wrap { trim: true });
        f.render_widget(hint, area);
        return;
    };

    let core_height = if plan.abs.is_empty() {
        0
    } else {
        plan.abs.len() as u16 + 2
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(core_height)])
        .split(area);

    render_plan_exercises(f, app, plan, chunks[0]);
    if !plan.abs.is_empty() {
        render_plan_core(f, plan, chunks[1]);
    }
}

fn render_plan_exercises(f: &mut Frame, app: &App, plan: &WorkoutPlan, area: Rect) {
    let source = match plan.source {
        PlanSource::Preset(_) => "preset",
        PlanSource::Custom(_) => "custom",
    };
    let weight_unit = app.service.config.units.weight_unit();

    let header = Row::new(vec![
        "#".to_string(),
        "Machine".to_string(),
        "Region".to_string(),
        "Feel".to_string(),
        format!("Sets ({weight_unit})"),
    ])
    .style(Style::new().bold().fg(Color::Yellow));

    let rows = plan.exercises.iter().enumerate().map(|(i, e)| {
        let sets = e
            .sets
            .iter()
            .map(|s| s.weight.map_or_else(|| "-".to_string(), |w| format!("{w:.1}")))
            .collect::<Vec<_>>()
            .join(" / ");
        Row::new(vec![
            (i + 1).to_string(),
            e.machine.clone(),
            e.region.clone(),
            e.feel.to_string(),
            sets,
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Percentage(40),
            Constraint::Percentage(20),
            Constraint::Length(7),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("{} ({source})", plan.name)),
    );
    f.render_widget(table, area);
}

fn render_plan_core(f: &mut Frame, plan: &WorkoutPlan, area: Rect) {
    let items: Vec<ListItem> = plan
        .abs
        .iter()
        .map(|a| {
            let target = match (a.reps, a.time.as_deref()) {
                (Some(reps), _) => format!("{reps} reps"),
                (None, Some(time)) => time.to_string(),
                (None, None) => String::new(),
            };
            ListItem::new(Line::from(vec![
                Span::raw(a.name.clone()),
                Span::styled(format!("  {target}"), Style::new().fg(Color::DarkGray)),
            ]))
        })
        .collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Core"));
    f.render_widget(list, area);
}
