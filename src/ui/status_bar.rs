use crate::app::state::*;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

fn key_hints(state: &AppState) -> &'static str {
    match &state.screen {
        Screen::List(list) if list.draft().is_some() => "enter search  esc cancel",
        Screen::List(_) => "←/→ page  ↑/↓ select  s star  enter details  / search  f filter  tab switch  q quit",
        Screen::Detail(_) => "s star  1-3 sections  ↑/↓ scroll  esc back  q quit",
    }
}

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut parts: Vec<Span> = Vec::new();

    parts.push(Span::styled(
        format!(" {} ", state.status_line()),
        Theme::status_bar(),
    ));

    // Pad to fill remaining space
    let hints = key_hints(state);
    let used: usize = parts.iter().map(|s| s.content.width()).sum();
    let remaining = (area.width as usize).saturating_sub(used + hints.width() + 2);
    parts.push(Span::styled(" ".repeat(remaining), Theme::status_bar()));
    parts.push(Span::styled(format!(" {} ", hints), Theme::key_hint()));

    let line = Line::from(parts);
    let paragraph = Paragraph::new(line);
    frame.render_widget(paragraph, area);
}
