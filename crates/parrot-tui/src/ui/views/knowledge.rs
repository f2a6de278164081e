// Knowledge view: seeded reference cards plus entries captured through the
// add-to-context flow. Left column lists titles, right pane shows the body.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::ui::format::truncate_with_ellipsis;
use crate::ui::{theme, App};

pub fn render_knowledge(f: &mut Frame, app: &mut App, area: Rect) {
    app.knowledge_list.clamp(app.knowledge_cards.len());
    let columns =
        Layout::horizontal([Constraint::Percentage(35), Constraint::Percentage(65)]).split(area);

    let list_block = Block::default()
        .title(" Knowledge ")
        .borders(Borders::ALL)
        .border_style(theme::border_inactive())
        .style(Style::default().bg(theme::BG_APP));
    let list_inner = list_block.inner(columns[0]);
    f.render_widget(list_block, columns[0]);

    let mut lines: Vec<Line> = Vec::new();
    for (idx, card) in app.knowledge_cards.iter().enumerate() {
        if lines.len() as u16 >= list_inner.height {
            break;
        }
        let selected = idx == app.knowledge_list.selected;
        let style = if selected {
            theme::interactive_selected()
        } else {
            theme::text_primary()
        };
        lines.push(Line::from(vec![
            Span::styled(if selected { "› " } else { "  " }, theme::text_dim()),
            Span::styled(
                truncate_with_ellipsis(&card.title, (list_inner.width as usize).saturating_sub(3)),
                style,
            ),
        ]));
    }
    f.render_widget(Paragraph::new(lines), list_inner);

    let body_block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_inactive())
        .style(Style::default().bg(theme::BG_APP));
    let body_inner = body_block.inner(columns[1]);
    f.render_widget(body_block, columns[1]);

    let body = app
        .knowledge_cards
        .get(app.knowledge_list.selected)
        .map(|card| card.body.clone())
        .unwrap_or_else(|| "Nothing here yet.".to_string());
    f.render_widget(
        Paragraph::new(body)
            .style(theme::text_primary())
            .wrap(Wrap { trim: false }),
        body_inner,
    );
}
