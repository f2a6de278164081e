// Settings view: session-level toggles and read-only runtime facts

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::{theme, App};

/// Rows shown in the settings list. Sound and reply delay are actionable.
pub const SETTINGS_ROWS: usize = 4;

pub fn render_settings(f: &mut Frame, app: &mut App, area: Rect) {
    app.settings_list.clamp(SETTINGS_ROWS);

    let block = Block::default()
        .title(" Settings ")
        .borders(Borders::ALL)
        .border_style(theme::border_inactive())
        .style(Style::default().bg(theme::BG_APP));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let sound_value = if app.sound.is_enabled() {
        "on"
    } else if app.sound.is_available() {
        "off"
    } else {
        "off (no audio device)"
    };
    let rows: [(&str, String, Option<&str>); SETTINGS_ROWS] = [
        ("Sound effects", sound_value.to_string(), Some("Enter toggles")),
        (
            "Reply delay",
            format!("{} ms", app.config.reply_delay.as_millis()),
            Some("h/l adjusts"),
        ),
        (
            "Conversations",
            app.chat.borrow().flattened().len().to_string(),
            None,
        ),
        (
            "Stored notes",
            app.notes.borrow().top_level().len().to_string(),
            None,
        ),
    ];

    let mut lines: Vec<Line> = Vec::new();
    for (idx, (label, value, hint)) in rows.iter().enumerate() {
        let selected = idx == app.settings_list.selected;
        let cursor = if selected { "› " } else { "  " };
        let label_style = if selected {
            theme::interactive_selected()
        } else {
            theme::text_primary()
        };
        let mut spans = vec![
            Span::styled(cursor, theme::text_dim()),
            Span::styled(format!("{label:<16}"), label_style),
            Span::styled(value.clone(), theme::text_muted()),
        ];
        if let (true, Some(hint)) = (selected, hint) {
            spans.push(Span::styled(format!("   {hint}"), theme::text_dim()));
        }
        lines.push(Line::from(spans));
        lines.push(Line::default());
    }

    f.render_widget(Paragraph::new(lines), inner);
}
