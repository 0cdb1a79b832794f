use super::render_load_state;
use super::theme::Theme;
use crate::app::state::AppState;
use crate::screen::DetailScreen;
use crate::view::tree::NodeId;
use ratatui::prelude::*;
use ratatui::widgets::{
    Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState, detail: &DetailScreen) {
    let tree = detail.tree();
    let block = Block::default()
        .title(" Details ")
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_style(Theme::border());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if render_load_state(frame, inner, state, tree, detail.body().node()) {
        return;
    }

    let starred = tree.has_class(detail.star().node(), "fas");
    let mut lines: Vec<Line> = vec![
        Line::from(vec![
            Span::styled(tree.text(detail.headline()).to_string(), Theme::headline()),
            Span::raw("  "),
            if starred {
                Span::styled("★ starred", Theme::star_on())
            } else {
                Span::styled("☆ not starred", Theme::star_off())
            },
        ]),
        Line::from(Span::styled(
            tree.text(detail.subheadline()).to_string(),
            Theme::subtitle(),
        )),
        Line::from(""),
    ];

    for (index, section) in detail.sections().into_iter().enumerate() {
        let shown = tree.has_class(section, "show");
        let title = tree
            .node(section)
            .and_then(|n| n.attr("title"))
            .unwrap_or_default();
        lines.push(Line::from(Span::styled(
            format!("{} [{}] {}", if shown { "▼" } else { "▶" }, index + 1, title),
            Theme::title(),
        )));
        if shown {
            lines.extend(section_lines(detail, index));
        }
        lines.push(Line::from(""));
    }

    let total = lines.len();
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((state.detail_scroll, 0));
    frame.render_widget(paragraph, inner);

    let mut scrollbar_state = ScrollbarState::new(total).position(state.detail_scroll as usize);
    frame.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::VerticalRight),
        inner,
        &mut scrollbar_state,
    );
}

fn text_line(detail: &DetailScreen, id: NodeId) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {}", detail.tree().text(id)),
        Theme::field_value(),
    ))
}

fn section_lines(detail: &DetailScreen, index: usize) -> Vec<Line<'static>> {
    let tree = detail.tree();
    match index {
        0 => vec![text_line(detail, detail.description())],
        1 => tree
            .children(detail.translations())
            .iter()
            .map(|&item| {
                Line::from(Span::styled(
                    format!("  • {}", tree.text(item)),
                    Theme::field_value(),
                ))
            })
            .collect(),
        _ => detail
            .symbols()
            .into_iter()
            .flat_map(|(image, caption)| {
                let src = tree
                    .node(image)
                    .and_then(|n| n.attr("src"))
                    .unwrap_or_default()
                    .to_string();
                [
                    text_line(detail, caption),
                    Line::from(Span::styled(format!("    {}", src), Theme::field_label())),
                ]
            })
            .collect(),
    }
}
