// liftdeck-tui/src/app/navigation_helpers.rs
use ratatui::widgets::ListState;

pub fn list_next(state: &mut ListState, list_len: usize) {
    if list_len == 0 {
        state.select(None);
        return;
    }
    let i = match state.selected() {
        Some(i) if i >= list_len - 1 => 0,
        Some(i) => i + 1,
        None => 0,
    };
    state.select(Some(i));
}

pub fn list_previous(state: &mut ListState, list_len: usize) {
    if list_len == 0 {
        state.select(None);
        return;
    }
    let i = match state.selected() {
        Some(0) => list_len - 1,
        Some(i) => (i - 1).min(list_len - 1),
        None => list_len - 1,
    };
    state.select(Some(i));
}

/// Keeps the selection inside the list after it shrank.
pub fn list_clamp(state: &mut ListState, list_len: usize) {
    match (state.selected(), list_len) {
        (_, 0) => state.select(None),
        (Some(i), len) if i >= len => state.select(Some(len - 1)),
        (None, _) => state.select(Some(0)),
        _ => {}
    }
}
