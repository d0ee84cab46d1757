// liftdeck-tui/src/ui/layout.rs
use crate::{
    app::{state::ActiveModal, App},
    ui::{modals::render_modal, plan_view::render_main_screen, status_bar::render_status_bar},
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    widgets::Paragraph,
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &mut App) {
    let size = f.size();

    // Title on top, content below, status bar at bottom
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status Bar
        ])
        .split(size);

    let title = Paragraph::new(" liftdeck ").style(Style::new().bold().yellow());
    f.render_widget(title, main_chunks[0]);
    render_main_screen(f, app, main_chunks[1]);
    render_status_bar(f, app, main_chunks[2]);

    // Render modal last if active
    if !matches!(app.active_modal, ActiveModal::None) {
        render_modal(f, app);
    }
}

/// Helper function to create a centered rectangle for modals
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let percent_x = percent_x.min(100);
    let percent_y = percent_y.min(100);
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
