// liftdeck-tui/src/ui/status_bar.rs
use crate::app::{state::ActiveModal, App, BuilderField};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

pub fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let status_text = match &app.active_modal {
        ActiveModal::None => {
            " [↑↓/jk] Nav | [Enter] Start | [s]elect template | [n]ew | [e]dit | [d]elete | [?] Help | [q]uit "
        }
        ActiveModal::Help => " [Esc/Enter/?] Close Help ",
        ActiveModal::TemplateSelector { .. } => {
            " [↑↓/jk] Nav | [Enter] Select | [e]dit | [d]elete | [Esc] Close "
        }
        ActiveModal::WorkoutBuilder { focused_field, .. } => match focused_field {
            BuilderField::Name => " Type a name | [Tab/Shift+Tab] Focus | [Esc] Cancel ",
            BuilderField::Exercises | BuilderField::Core => {
                " [↑↓/jk] Nav | [Space/Enter] Toggle | [Tab/Shift+Tab] Focus | [Esc] Cancel "
            }
            BuilderField::AutoSchedule => " [Space/Enter] Toggle | [Tab/Shift+Tab] Focus | [Esc] Cancel ",
            BuilderField::Save | BuilderField::Cancel => {
                " [Enter] Confirm | [←→] Switch | [Tab/Shift+Tab] Focus | [Esc] Cancel "
            }
        },
        ActiveModal::ConfirmDeleteTemplate { .. } => " [y/Enter] Delete | [n/Esc] Keep ",
    };

    let (message, color) = match (&app.last_error, &app.last_info) {
        (Some(err), _) => (err.as_str(), Color::Red),
        (None, Some(info)) => (info.as_str(), Color::Green),
        (None, None) => ("", Color::White),
    };

    let status_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let status_paragraph =
        Paragraph::new(status_text).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(status_paragraph, status_chunks[0]);

    let message_paragraph = Paragraph::new(message)
        .style(Style::default().bg(Color::DarkGray).fg(color))
        .alignment(Alignment::Right);
    f.render_widget(message_paragraph, status_chunks[1]);
}
