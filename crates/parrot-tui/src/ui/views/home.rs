// Home view: conversation tree sidebar, chat transcript, input box.
// Sidebar row rects and the max scroll offset are recorded on the App during
// render so key/mouse handlers can use them next frame.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use parrot_core::models::Role;

use crate::ui::format::truncate_with_ellipsis;
use crate::ui::{theme, App, InputMode};

const SIDEBAR_WIDTH: u16 = 28;

pub fn render_home(f: &mut Frame, app: &mut App, area: Rect) {
    let columns =
        Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)]).split(area);
    render_sidebar(f, app, columns[0]);
    render_chat(f, app, columns[1]);
}

fn render_sidebar(f: &mut Frame, app: &mut App, area: Rect) {
    app.sidebar_rects.clear();

    let block = Block::default()
        .title(" Chats ")
        .borders(Borders::RIGHT)
        .border_style(theme::border_inactive())
        .style(Style::default().bg(theme::BG_SIDEBAR));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chat = app.chat.borrow();
    let active = chat.active();
    let flattened = chat.flattened();

    let mut lines: Vec<Line> = Vec::new();
    let mut skip_deeper_than: Option<usize> = None;
    for (idx, &(id, depth)) in flattened.iter().enumerate() {
        if let Some(limit) = skip_deeper_than {
            if depth > limit {
                continue;
            }
            skip_deeper_than = None;
        }
        let Some(node) = chat.node(id) else { continue };
        if app.sidebar.is_collapsed(id) {
            skip_deeper_than = Some(depth);
        }

        let row = inner.y + lines.len() as u16;
        if row >= inner.y + inner.height {
            break;
        }
        app.sidebar_rects
            .push((Rect::new(inner.x, row, inner.width, 1), id));

        let indent = "  ".repeat(depth);
        let marker = if node.children.is_empty() {
            "· "
        } else if app.sidebar.is_collapsed(id) {
            "▸ "
        } else {
            "▾ "
        };
        let cursor = if idx == app.sidebar.cursor { "›" } else { " " };

        let style = if id == active {
            theme::interactive_selected()
        } else if idx == app.sidebar.cursor {
            theme::text_primary()
        } else {
            theme::text_muted()
        };

        let budget = (inner.width as usize)
            .saturating_sub(indent.width() + marker.width() + 3);
        let mut spans = vec![
            Span::styled(cursor, theme::text_dim()),
            Span::raw(indent),
            Span::styled(marker, theme::text_dim()),
            Span::styled(truncate_with_ellipsis(&node.name, budget), style),
        ];
        if app.is_thinking(id) {
            spans.push(Span::styled(" ⋯", theme::pending_indicator()));
        }
        lines.push(Line::from(spans));
    }
    drop(chat);

    f.render_widget(Paragraph::new(lines), inner);
}

fn render_chat(f: &mut Frame, app: &mut App, area: Rect) {
    let rows = Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).split(area);
    render_transcript(f, app, rows[0]);
    render_input(f, app, rows[1]);
}

fn render_transcript(f: &mut Frame, app: &mut App, area: Rect) {
    let chat = app.chat.borrow();
    let active = chat.active();
    let title = chat
        .node(active)
        .map(|n| format!(" {} ", n.name))
        .unwrap_or_default();

    let block = Block::default()
        .title(title)
        .borders(Borders::NONE)
        .style(Style::default().bg(theme::BG_APP));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let session = chat.active_session();
    let mut lines: Vec<Line> = Vec::new();
    let mut summaries = session.agent_responses.iter();

    for message in &session.messages {
        match message.role {
            Role::User => {
                lines.push(Line::from(vec![
                    Span::styled("you ", theme::text_bold()),
                    Span::styled(message.content.clone(), theme::text_primary()),
                ]));
            }
            Role::Assistant => {
                lines.push(Line::from(vec![
                    Span::styled("echo ", Style::default().fg(theme::ACCENT_PRIMARY)),
                    Span::styled(message.content.clone(), theme::text_primary()),
                ]));
                // Each echoed reply carries its agent interpretation line
                if let Some(summary) = summaries.next() {
                    lines.push(Line::from(Span::styled(
                        format!("     {summary}"),
                        theme::agent_response(),
                    )));
                }
            }
        }
        lines.push(Line::default());
    }

    if app.is_thinking(active) {
        lines.push(Line::from(Span::styled(
            "echo is thinking ⋯",
            theme::pending_indicator(),
        )));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Say something. It will come right back.",
            theme::text_dim(),
        )));
    }
    drop(chat);

    // Wrapped line count decides how far the transcript can scroll
    let width = inner.width.max(1) as usize;
    let total: usize = lines
        .iter()
        .map(|l| {
            let w: usize = l.spans.iter().map(|s| s.content.width()).sum();
            w.div_ceil(width).max(1)
        })
        .sum();
    app.max_chat_scroll = (total as u16).saturating_sub(inner.height);
    if app.chat_scroll > app.max_chat_scroll {
        app.chat_scroll = app.max_chat_scroll;
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.chat_scroll, 0));
    f.render_widget(paragraph, inner);
}

fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let editing = app.input_mode == InputMode::Insert;
    let border = if editing {
        theme::border_focused()
    } else {
        theme::border_inactive()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .style(Style::default().bg(theme::BG_INPUT));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let text = app.chat_input.text();
    let paragraph = if text.is_empty() && !editing {
        Paragraph::new("Press i to type").style(theme::input_placeholder())
    } else {
        Paragraph::new(text).style(theme::input_active())
    };
    f.render_widget(paragraph, inner);

    if editing {
        let x = inner.x + (app.chat_input.cursor() as u16).min(inner.width.saturating_sub(1));
        f.set_cursor_position((x, inner.y));
    }
}
