mod country_list;
mod details;
mod layout;
mod status_bar;
mod theme;

use crate::app::state::{AppState, Screen};
use crate::view::tree::{NodeId, Tree};
use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};
use theme::Theme;
use unicode_width::UnicodeWidthChar;

const SPINNER: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let app_layout = layout::compute_layout(area);

    render_header(frame, app_layout.header, state);
    match &state.screen {
        Screen::List(list) => country_list::render(frame, app_layout.content, state, list),
        Screen::Detail(detail) => details::render(frame, app_layout.content, state, detail),
    }
    status_bar::render(frame, app_layout.status_bar, state);
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let line = Line::from(vec![
        Span::styled(" countrydeck ", Theme::headline()),
        Span::styled(format!(" {}", state.route), Theme::subtitle()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Paints the loading or error state of a screen root. Returns false when
/// the root holds data and the caller should draw its content.
fn render_load_state(frame: &mut Frame, area: Rect, state: &AppState, tree: &Tree, root: NodeId) -> bool {
    if tree.has_class(root, "loading") {
        let frame_idx = (state.tick_count / 2) as usize % SPINNER.len();
        let line = Line::from(Span::styled(
            format!(" {} Loading...", SPINNER[frame_idx]),
            Theme::loading(),
        ));
        frame.render_widget(Paragraph::new(line), area);
        return true;
    }
    if tree.has_class(root, "error") {
        let reason = tree
            .node(root)
            .and_then(|n| n.attr("data-reason"))
            .unwrap_or_default();
        let lines = vec![
            Line::from(Span::styled(
                " Something went wrong, the countries could not be shown.",
                Theme::error_message(),
            )),
            Line::from(Span::styled(format!(" {}", reason), Theme::subtitle())),
        ];
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
        return true;
    }
    false
}

/// Cut `text` to at most `width` columns, marking the cut with an ellipsis.
fn truncate(text: &str, width: usize) -> String {
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            if out.pop().is_some() {
                out.push('…');
            }
            return out;
        }
        used += w;
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Peru", 10), "Peru");
        assert_eq!(truncate("Republic of Peru", 8), "Republi…");
        assert_eq!(truncate("日本国", 4), "日…");
        assert_eq!(truncate("", 3), "");
    }
}
