// Storage view: a flowing grid of note cards. Card rects are recorded on the
// App every frame so mouse drags can resolve which card they started on and
// which one they ended over.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use parrot_core::models::rich_text::{RichText, RunColor, RunStyle};
use parrot_core::models::{NoteAlignment, StoredNote};

use crate::ui::format::truncate_with_ellipsis;
use crate::ui::{theme, App, InputMode};

const CARD_CELL_WIDTH: u16 = 24;
const CARD_HEIGHT: u16 = 6;

pub fn render_storage(f: &mut Frame, app: &mut App, area: Rect) {
    app.note_rects.clear();

    let notes = app.notes.borrow();
    let breadcrumb = match notes.open_folder_id() {
        Some(fid) => {
            let title = notes
                .top_level()
                .iter()
                .find(|n| n.id == fid)
                .map(|n| n.title.as_str())
                .unwrap_or("?");
            format!(" Storage / {title}  (Esc closes the folder) ")
        }
        None => " Storage ".to_string(),
    };

    let block = Block::default()
        .title(breadcrumb)
        .borders(Borders::ALL)
        .border_style(theme::border_inactive())
        .style(Style::default().bg(theme::BG_APP));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let visible: Vec<StoredNote> = notes.visible().to_vec();
    drop(notes);
    app.notes_state.clamp_cursor(visible.len());

    if visible.is_empty() {
        let hint = Paragraph::new(
            "No notes yet. Store a highlight or sticky note from the chat, or press a to add one.",
        )
        .style(theme::text_dim())
        .wrap(Wrap { trim: false });
        f.render_widget(hint, inner);
        return;
    }

    // Flow layout: left to right, wrapping into rows of CARD_HEIGHT
    let mut x = inner.x;
    let mut y = inner.y;
    for (idx, note) in visible.iter().enumerate() {
        let width = (CARD_CELL_WIDTH * note.size.cells()).min(inner.width.max(CARD_CELL_WIDTH));
        if x + width > inner.x + inner.width && x > inner.x {
            x = inner.x;
            y += CARD_HEIGHT;
        }
        if y + CARD_HEIGHT > inner.y + inner.height {
            break;
        }
        let rect = Rect::new(x, y, width, CARD_HEIGHT);
        app.note_rects.push((rect, note.id));
        render_note_card(f, app, note, idx, rect);
        x += width;
    }
}

fn render_note_card(f: &mut Frame, app: &App, note: &StoredNote, idx: usize, rect: Rect) {
    let drag_target = app
        .notes_state
        .drag
        .as_ref()
        .is_some_and(|d| d.target == Some(note.id));
    let under_cursor = idx == app.notes_state.cursor;

    let border = if drag_target {
        Style::default().fg(theme::ACCENT_SUCCESS)
    } else if app.notes_state.is_selected(note.id) {
        theme::border_focused()
    } else if under_cursor {
        theme::border_active()
    } else {
        Style::default().fg(theme::note_color(note.color))
    };

    let renaming = under_cursor && app.input_mode == InputMode::NoteTitle;
    let title = if renaming {
        format!(" {}▏", app.note_edit.text())
    } else {
        let mut t = format!(" {} ", note.title);
        if note.is_folder() {
            t = format!(" ▣ {} ({}) ", note.title, note.merged_count());
        }
        truncate_with_ellipsis(&t, rect.width.saturating_sub(2) as usize)
    };

    let block = Block::default()
        .title(Span::styled(title, theme::text_bold()))
        .borders(Borders::ALL)
        .border_style(border)
        .style(Style::default().bg(theme::BG_CARD));
    let inner = block.inner(rect);
    f.render_widget(block, rect);

    let editing_body = under_cursor && app.input_mode == InputMode::NoteBody;
    let paragraph = if editing_body {
        Paragraph::new(app.note_edit.text()).style(theme::input_active())
    } else {
        Paragraph::new(body_lines(&note.body))
    };
    f.render_widget(
        paragraph
            .alignment(alignment(note.alignment))
            .wrap(Wrap { trim: false }),
        inner,
    );
}

fn alignment(a: NoteAlignment) -> Alignment {
    match a {
        NoteAlignment::Left => Alignment::Left,
        NoteAlignment::Center => Alignment::Center,
        NoteAlignment::Right => Alignment::Right,
    }
}

fn run_style(style: &RunStyle) -> Style {
    let mut out = Style::default().fg(match style.color {
        Some(RunColor::Red) => theme::ACCENT_ERROR,
        Some(RunColor::Green) => theme::ACCENT_SUCCESS,
        Some(RunColor::Blue) => theme::ACCENT_PRIMARY,
        Some(RunColor::Yellow) => theme::ACCENT_WARNING,
        Some(RunColor::Purple) => theme::ACCENT_SPECIAL,
        None => theme::TEXT_PRIMARY,
    });
    if style.bold {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.italic {
        out = out.add_modifier(Modifier::ITALIC);
    }
    if style.underline {
        out = out.add_modifier(Modifier::UNDERLINED);
    }
    out
}

/// Styled runs to lines: runs flow within a line, newlines inside a run
/// break it
fn body_lines(body: &RichText) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = Vec::new();
    let mut current: Vec<Span> = Vec::new();
    for run in body.runs() {
        let style = run_style(&run.style);
        let mut parts = run.text.split('\n').peekable();
        while let Some(part) = parts.next() {
            if !part.is_empty() {
                current.push(Span::styled(part.to_string(), style));
            }
            if parts.peek().is_some() {
                lines.push(Line::from(std::mem::take(&mut current)));
            }
        }
    }
    if !current.is_empty() {
        lines.push(Line::from(current));
    }
    lines
}
