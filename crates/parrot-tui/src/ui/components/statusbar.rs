// Bottom status bar: current toast on the left, input-mode hint on the right

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::ui::format::truncate_with_ellipsis;
use crate::ui::notifications::ToastLevel;
use crate::ui::{theme, App, InputMode};

fn mode_hint(app: &App) -> &'static str {
    if app.overlays.focused().is_some() {
        return "Tab cycle · Enter send · Ctrl+T card · Ctrl+A context · Ctrl+S store · Shift/Ctrl+arrows move/resize · Esc close";
    }
    match app.input_mode {
        InputMode::Normal => "i type · n new chat · b branch · 1-5 views · q quit",
        InputMode::Insert => "Enter send · Esc done",
        InputMode::NoteTitle => "Enter rename · Esc cancel",
        InputMode::NoteBody => "Enter save · Ctrl+A mark · Ctrl+B/I/U format · Esc cancel",
    }
}

pub fn render_statusbar(f: &mut Frame, app: &App, area: Rect) {
    let hint = mode_hint(app);
    let hint_width = (hint.width() + 2) as u16;
    let chunks =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(hint_width)]).split(area);

    let toast_paragraph = if let Some(toast) = app.toasts.current() {
        let style = match toast.level {
            ToastLevel::Info => theme::status_info(),
            ToastLevel::Success => theme::status_success(),
            ToastLevel::Warning => theme::status_warning(),
            ToastLevel::Error => theme::status_error(),
        };
        let available = (chunks[0].width as usize).saturating_sub(4);
        let message = truncate_with_ellipsis(&toast.message, available);
        Paragraph::new(Line::from(vec![
            Span::styled(format!(" {} ", toast.level.icon()), style),
            Span::styled(message, style),
        ]))
        .style(Style::default().bg(theme::BG_SIDEBAR))
    } else {
        Paragraph::new("").style(Style::default().bg(theme::BG_SIDEBAR))
    };
    f.render_widget(toast_paragraph, chunks[0]);

    let hint_paragraph = Paragraph::new(format!(" {hint} "))
        .style(Style::default().fg(theme::TEXT_DIM).bg(theme::BG_SIDEBAR));
    f.render_widget(hint_paragraph, chunks[1]);
}
