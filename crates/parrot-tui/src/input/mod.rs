// Input routing. Keys go to the focused overlay first, then to the mode the
// app is in; mouse events resolve against the geometry recorded during the
// last render.

mod notes_handlers;
mod overlay_handlers;
mod view_handlers;

use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};

use crate::ui::{App, InputMode, View};

pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.request_quit();
        return;
    }

    if app.overlays.focused().is_some() {
        overlay_handlers::handle_overlay_key(app, key);
        return;
    }

    match app.input_mode {
        InputMode::Insert => handle_chat_insert(app, key),
        InputMode::NoteTitle | InputMode::NoteBody => {
            notes_handlers::handle_note_edit_key(app, key)
        }
        InputMode::Normal => view_handlers::handle_view_key(app, key),
    }
}

fn handle_chat_insert(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Enter => app.submit_chat_input(),
        KeyCode::Backspace => app.chat_input.backspace(),
        KeyCode::Delete => app.chat_input.delete(),
        KeyCode::Left => app.chat_input.move_left(),
        KeyCode::Right => app.chat_input.move_right(),
        KeyCode::Home => app.chat_input.move_home(),
        KeyCode::End => app.chat_input.move_end(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.chat_input.insert(c);
        }
        _ => {}
    }
}

pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let (col, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => handle_left_down(app, col, row),
        MouseEventKind::Drag(MouseButton::Left) => {
            if app.overlays.is_dragging() {
                app.overlays.drag_to(col, row);
            } else if app.notes_state.drag.is_some() {
                app.notes_state.update_drag(note_at(app, col, row));
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.overlays.end_drag();
            notes_handlers::finish_note_drag(app);
        }
        MouseEventKind::ScrollUp => {
            if app.view == View::Home {
                app.chat_scroll = app.chat_scroll.saturating_sub(1);
            }
        }
        MouseEventKind::ScrollDown => {
            if app.view == View::Home {
                app.chat_scroll = app.chat_scroll.saturating_add(1).min(app.max_chat_scroll);
            }
        }
        _ => {}
    }
}

fn handle_left_down(app: &mut App, col: u16, row: u16) {
    // Overlays sit above everything else
    if let Some((id, on_title)) = app
        .overlays
        .overlay_at(col, row)
        .map(|o| (o.id, o.on_title_bar(col, row)))
    {
        app.overlays.bring_to_front(id);
        if on_title {
            app.overlays.begin_drag(id, col, row);
        }
        return;
    }

    if let Some(view) = hit(&app.nav_rects, col, row) {
        app.set_view(view);
        return;
    }

    match app.view {
        View::Home => {
            if let Some(conversation) = hit(&app.sidebar_rects, col, row) {
                app.chat.borrow_mut().select(conversation);
            }
        }
        View::Storage => {
            if let Some(id) = note_at(app, col, row) {
                if let Some(idx) = app.note_rects.iter().position(|(_, nid)| *nid == id) {
                    app.notes_state.cursor = idx;
                }
                app.notes_state.begin_drag(id);
            }
        }
        _ => {}
    }
}

fn note_at(app: &App, col: u16, row: u16) -> Option<uuid::Uuid> {
    hit(&app.note_rects, col, row)
}

fn hit<T: Copy>(rects: &[(Rect, T)], col: u16, row: u16) -> Option<T> {
    rects
        .iter()
        .find(|(rect, _)| rect.contains(Position::new(col, row)))
        .map(|(_, value)| *value)
}
