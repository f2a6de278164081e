// Detail page for one question set: the original input plus its derived
// questions. Pressing a question's number re-submits it as chat input.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use uuid::Uuid;

use crate::ui::format::format_relative_time;
use crate::ui::{theme, App};

pub fn render_question_detail(f: &mut Frame, app: &App, area: Rect, question_set_id: Uuid) {
    let chat = app.chat.borrow();
    let Some(set) = chat.question_set(question_set_id) else {
        // Route points at a vanished set; the handler sends us back on Esc
        let missing = Paragraph::new("This question set no longer exists. Press Esc to go back.")
            .style(theme::text_dim());
        f.render_widget(missing, area);
        return;
    };

    let block = Block::default()
        .title(format!(" Input #{} ", set.input_number + 1))
        .borders(Borders::ALL)
        .border_style(theme::border_active())
        .style(Style::default().bg(theme::BG_APP));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("You said  ", theme::text_muted()),
            Span::styled(
                format_relative_time(set.created_at),
                theme::text_dim(),
            ),
        ]),
        Line::from(Span::styled(set.original_input.clone(), theme::text_bold())),
        Line::default(),
        Line::from(Span::styled(
            "Questions to dig deeper:",
            theme::text_muted(),
        )),
    ];
    for (i, question) in set.questions.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("  [{}] ", i + 1), theme::interactive_selected()),
            Span::styled(question.clone(), theme::text_primary()),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Press 1-3 to ask a question in the chat · Esc back",
        theme::text_dim(),
    )));

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
