// Frame composition: nav bar, active view, status bar, then the floating
// overlay layer on top.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::ui::components::{nav_bar, statusbar};
use crate::ui::overlays::{Overlay, OverlayKind};
use crate::ui::views;
use crate::ui::{theme, App, View};

pub fn render(f: &mut Frame, app: &mut App) {
    let rows = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .split(f.area());

    nav_bar::render_nav_bar(f, app, rows[0]);

    match app.view {
        View::Home => views::home::render_home(f, app, rows[1]),
        View::Agents => views::agents::render_agents(f, app, rows[1]),
        View::Knowledge => views::knowledge::render_knowledge(f, app, rows[1]),
        View::Storage => views::storage::render_storage(f, app, rows[1]),
        View::Settings => views::settings::render_settings(f, app, rows[1]),
        View::QuestionDetail { question_set_id } => {
            views::question_detail::render_question_detail(f, app, rows[1], question_set_id)
        }
    }

    statusbar::render_statusbar(f, app, rows[2]);
    render_overlays(f, app);
}

fn render_overlays(f: &mut Frame, app: &App) {
    let focused = app.overlays.focused_id();
    for overlay in app.overlays.iter() {
        let rect = clamp_to_frame(overlay, f.area());
        if rect.width < 4 || rect.height < 3 {
            continue;
        }
        let is_focused = focused == Some(overlay.id);
        render_overlay_card(f, overlay, rect, is_focused);
    }
}

fn clamp_to_frame(overlay: &Overlay, frame: Rect) -> Rect {
    let width = overlay.width.min(frame.width);
    let height = overlay.height.min(frame.height);
    let x = overlay.x.min(frame.width.saturating_sub(width));
    let y = overlay.y.min(frame.height.saturating_sub(height));
    Rect::new(x, y, width, height)
}

fn render_overlay_card(f: &mut Frame, overlay: &Overlay, rect: Rect, is_focused: bool) {
    f.render_widget(Clear, rect);

    let border = if is_focused {
        theme::border_focused()
    } else {
        theme::border_inactive()
    };
    let block = Block::default()
        .title(format!(" {} ", overlay.title()))
        .borders(Borders::ALL)
        .border_style(border)
        .style(Style::default().bg(theme::BG_OVERLAY));
    let inner = block.inner(rect);
    f.render_widget(block, rect);

    let mut lines: Vec<Line> = Vec::new();
    match &overlay.kind {
        OverlayKind::Highlight {
            replies, in_card, ..
        } => {
            lines.push(Line::from(Span::styled(
                format!("“{}”", overlay.text),
                theme::text_primary(),
            )));
            for reply in replies {
                lines.push(Line::from(Span::styled(
                    format!("  ↳ {reply}"),
                    theme::agent_response(),
                )));
            }
            lines.push(Line::default());
            let routing = if *in_card {
                "[x] keep replies in this card"
            } else {
                "[ ] keep replies in this card"
            };
            lines.push(Line::from(Span::styled(routing, theme::text_muted())));
            lines.push(reply_input_line(overlay, is_focused));
        }
        OverlayKind::StickyNote { editable } => {
            if *editable && is_focused {
                lines.push(Line::from(Span::styled(
                    format!("{}▏", overlay.input.text()),
                    theme::input_active(),
                )));
            } else {
                lines.push(Line::from(Span::styled(
                    overlay.text.clone(),
                    theme::text_primary(),
                )));
            }
        }
        OverlayKind::QuestionPopup => {
            for (i, question) in overlay.text.lines().enumerate() {
                lines.push(Line::from(vec![
                    Span::styled(format!("[{}] ", i + 1), theme::interactive_selected()),
                    Span::styled(question.to_string(), theme::text_primary()),
                ]));
            }
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                "1-3 asks · Esc closes",
                theme::text_dim(),
            )));
        }
        OverlayKind::Clarification => {
            lines.push(Line::from(Span::styled(
                overlay.text.clone(),
                theme::text_primary(),
            )));
            lines.push(Line::default());
            lines.push(reply_input_line(overlay, is_focused));
        }
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn reply_input_line(overlay: &Overlay, is_focused: bool) -> Line<'static> {
    let text = overlay.input.text();
    if text.is_empty() && !is_focused {
        Line::from(Span::styled("reply…", theme::input_placeholder()))
    } else {
        let cursor = if is_focused { "▏" } else { "" };
        Line::from(Span::styled(
            format!("> {text}{cursor}"),
            theme::input_active(),
        ))
    }
}
