use super::layout::list_layout;
use super::theme::Theme;
use super::{render_load_state, truncate};
use unicode_width::UnicodeWidthStr;
use crate::app::state::AppState;
use crate::screen::{ListMode, ListScreen, StarState};
use crate::view::tree::{NodeId, Tree};
use ratatui::prelude::*;
use ratatui::widgets::block::Padding;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState, list: &ListScreen) {
    let tree = list.tree();
    let block = Block::default()
        .title(format!(" {} ", list.mode().title()))
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_style(Theme::border());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let browsing = matches!(list.mode(), ListMode::Browse { .. });
    let layout = list_layout(inner, browsing);
    if browsing {
        render_search(frame, layout.search, list);
    }

    if !render_load_state(frame, layout.cards, state, tree, list.body().node()) {
        if tree.has_class(list.notice(), "hidden") {
            render_cards(frame, layout.cards, list);
        } else {
            let notice = Paragraph::new(Span::styled(
                format!(" {}", tree.text(list.notice())),
                Theme::notice(),
            ));
            frame.render_widget(notice, layout.cards);
        }
    }
    render_pagination(frame, layout.pagination, list);
}

fn render_search(frame: &mut Frame, area: Rect, list: &ListScreen) {
    let tree = list.tree();
    let editing = list.draft().is_some();
    let block = Block::default()
        .title(" Search ")
        .title_style(if editing { Theme::title() } else { Theme::border() })
        .borders(Borders::ALL)
        .border_style(if editing {
            Theme::border_focused()
        } else {
            Theme::border()
        })
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let query = list.draft().unwrap_or_else(|| tree.text(list.query_label()));
    let filter = format!("[{}] ", tree.text(list.filter_label()));
    let prompt_width = filter.width() + "❯ ".width();
    let line = Line::from(vec![
        Span::styled(filter, Theme::field_label()),
        Span::styled("❯ ", Style::default().fg(Theme::ACCENT_TEAL)),
        Span::styled(query.to_string(), Theme::input_text()),
    ]);
    frame.render_widget(Paragraph::new(line), inner);

    if editing && inner.width > 0 {
        frame.set_cursor_position((cursor_column(inner, prompt_width + query.width()), inner.y));
    }
}

/// Terminal column for a cursor `offset` display cells into `area`, kept
/// inside the area.
fn cursor_column(area: Rect, offset: usize) -> u16 {
    let offset = u16::try_from(offset).unwrap_or(u16::MAX);
    area.x.saturating_add(offset).min(area.right().saturating_sub(1))
}

fn star_span(list: &ListScreen, card: NodeId) -> Span<'static> {
    if list.card_state(card) == Some(&StarState::Starred) {
        Span::styled("★ ", Theme::star_on())
    } else {
        Span::styled("☆ ", Theme::star_off())
    }
}

fn card_item(list: &ListScreen, card: NodeId, width: usize) -> ListItem<'static> {
    let tree = list.tree();
    let title = tree
        .find_class(card, "title")
        .map(|id| tree.text(id).to_string())
        .unwrap_or_default();
    let official = tree
        .find_class(card, "official")
        .map(|id| tree.text(id).to_string())
        .unwrap_or_default();

    let first = Line::from(vec![
        star_span(list, card),
        Span::styled(title, Theme::title()),
        Span::styled(format!("  {}", official), Theme::subtitle()),
    ]);

    let fields: Vec<String> = tree
        .children(card)
        .iter()
        .filter(|&&id| tree.has_class(id, "field"))
        .filter_map(|&id| {
            let node = tree.node(id)?;
            Some(format!("{}{}", node.attr("data-desc").unwrap_or_default(), node.text))
        })
        .collect();
    let second = Line::from(Span::styled(
        truncate(&format!("  {}", fields.join(" | ")), width),
        Theme::field_label(),
    ));

    ListItem::new(vec![first, second, Line::from("")])
}

fn render_cards(frame: &mut Frame, area: Rect, list: &ListScreen) {
    let tree = list.tree();
    let width = area.width as usize;
    let items: Vec<ListItem> = list
        .cards()
        .iter()
        .map(|&card| card_item(list, card, width))
        .collect();

    let widget = List::new(items).highlight_style(Theme::selected());
    let mut list_state = ListState::default();
    list_state.select(Some(list.selected()));
    frame.render_stateful_widget(widget, area, &mut list_state);
}

fn control_style(tree: &Tree, node: NodeId) -> Style {
    if tree.has_class(node, "invalid") {
        Theme::control_disabled()
    } else {
        Theme::control_enabled()
    }
}

fn render_pagination(frame: &mut Frame, area: Rect, list: &ListScreen) {
    let tree = list.tree();
    let prev = list.prev_control();
    let next = list.next_control();
    let line = Line::from(vec![
        Span::styled(format!("◀ {}", tree.text(prev)), control_style(tree, prev)),
        Span::styled(
            format!("   {}   ", tree.text(list.range_control())),
            Theme::field_value(),
        ),
        Span::styled(format!("{} ▶", tree.text(next)), control_style(tree, next)),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_column_uses_display_width() {
        let area = Rect::new(2, 0, 40, 1);
        let prompt = "[name] ".width() + "❯ ".width();
        assert_eq!(cursor_column(area, prompt + "日本".width()), 2 + 9 + 4);
        assert_eq!(cursor_column(area, prompt + "Peru".width()), 2 + 9 + 4);
    }

    #[test]
    fn test_cursor_column_stays_inside_area() {
        let area = Rect::new(2, 0, 40, 1);
        assert_eq!(cursor_column(area, 10_000), area.right() - 1);
        assert_eq!(cursor_column(area, usize::MAX), area.right() - 1);
        let edge = Rect::new(u16::MAX - 5, 0, 5, 1);
        assert_eq!(cursor_column(edge, 100), edge.right() - 1);
    }
}
