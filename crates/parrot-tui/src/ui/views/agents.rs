// Agents view: one row per accepted submission, each owning its derived
// question set. Enter drills into the detail page for the selected set.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::format::{format_relative_time, truncate_with_ellipsis};
use crate::ui::{theme, App};

pub fn render_agents(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .title(" Question sets ")
        .borders(Borders::ALL)
        .border_style(theme::border_inactive())
        .style(Style::default().bg(theme::BG_APP));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chat = app.chat.borrow();
    let sets = chat.question_sets();
    app.agents_list.clamp(sets.len());

    if sets.is_empty() {
        let empty = Paragraph::new("No submissions yet. Every chat input spawns a question set.")
            .style(theme::text_dim());
        f.render_widget(empty, inner);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for (idx, set) in sets.iter().enumerate() {
        if lines.len() as u16 >= inner.height {
            break;
        }
        let selected = idx == app.agents_list.selected;
        let cursor = if selected { "› " } else { "  " };
        let style = if selected {
            theme::interactive_selected()
        } else {
            theme::text_primary()
        };
        let budget = (inner.width as usize).saturating_sub(24);
        lines.push(Line::from(vec![
            Span::styled(cursor, theme::text_dim()),
            Span::styled(format!("#{:<3} ", set.input_number + 1), theme::text_muted()),
            Span::styled(truncate_with_ellipsis(&set.original_input, budget), style),
            Span::styled(
                format!("  {}", format_relative_time(set.created_at)),
                theme::text_dim(),
            ),
        ]));
    }
    f.render_widget(Paragraph::new(lines), inner);
}
