use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct AppLayout {
    pub header: Rect,
    pub content: Rect,
    pub status_bar: Rect,
}

pub fn compute_layout(area: Rect) -> AppLayout {
    // Main vertical split: header | content | status bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(5),    // Screen content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    AppLayout {
        header: main_chunks[0],
        content: main_chunks[1],
        status_bar: main_chunks[2],
    }
}

/// Areas of the list screen.
pub struct ListLayout {
    pub search: Rect,
    pub cards: Rect,
    pub pagination: Rect,
}

pub fn list_layout(area: Rect, with_search: bool) -> ListLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(if with_search { 3 } else { 0 }), // Search box
            Constraint::Min(3),                                  // Cards
            Constraint::Length(1),                               // Pagination
        ])
        .split(area);

    ListLayout {
        search: chunks[0],
        cards: chunks[1],
        pagination: chunks[2],
    }
}
