// Top navigation bar with the five destinations. Records each tab's rect on
// the App so mouse clicks can route without re-deriving the layout.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::ui::{theme, App, View};

pub fn render_nav_bar(f: &mut Frame, app: &mut App, area: Rect) {
    app.nav_rects.clear();

    let mut spans: Vec<Span> = vec![Span::styled(" parrot ", theme::text_bold())];
    let mut x = area.x + " parrot ".width() as u16;
    let active_slot = app.view.nav_slot();

    for (i, view) in View::NAV.iter().enumerate() {
        let label = format!(" {} [{}] ", view.label(), i + 1);
        let width = label.width() as u16;
        let style = if *view == active_slot {
            theme::tab_active()
        } else {
            theme::tab_inactive()
        };
        app.nav_rects
            .push((Rect::new(x, area.y, width, 1), *view));
        spans.push(Span::styled(label, style));
        x += width;

        if i + 1 < View::NAV.len() {
            spans.push(Span::styled("│", Style::default().fg(theme::BORDER_INACTIVE)));
            x += 1;
        }
    }

    let bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme::BG_SIDEBAR));
    f.render_widget(bar, area);
}
