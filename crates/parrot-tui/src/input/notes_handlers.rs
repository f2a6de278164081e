// Storage view keys and the drag-gesture endings for note cards

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use uuid::Uuid;

use parrot_core::models::rich_text::RichText;
use parrot_core::models::{NoteAlignment, NoteColor};
use parrot_core::Signal;

use crate::ui::notifications::Toast;
use crate::ui::{App, InputMode};

pub fn handle_storage_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            let len = app.notes.borrow().visible().len();
            app.notes_state.move_cursor_down(len);
        }
        KeyCode::Char('k') | KeyCode::Up => app.notes_state.move_cursor_up(),
        KeyCode::Char(' ') => {
            if let Some(id) = note_under_cursor(app) {
                app.notes_state.toggle_select(id);
            }
        }
        KeyCode::Char('m') => merge_selection(app),
        KeyCode::Enter => open_or_edit(app),
        KeyCode::Char('r') => begin_rename(app),
        KeyCode::Char('s') => {
            if let Some(id) = note_under_cursor(app) {
                let size = app.notes.borrow().visible_note(id).map(|n| n.size);
                if let Some(size) = size {
                    app.notes.borrow_mut().set_size(id, size.next());
                }
            }
        }
        KeyCode::Char('c') => cycle_color(app),
        KeyCode::Char('t') => cycle_alignment(app),
        KeyCode::Char('a') => app.publish(Signal::StoreText {
            text: "New note".to_string(),
            source: "manual".to_string(),
        }),
        KeyCode::Char('e') => {
            let result = {
                let notes = app.notes.borrow();
                parrot_core::export::export_notes(&app.export_path, notes.top_level())
            };
            match result {
                Ok(()) => app.toasts.push(Toast::success(format!(
                    "Exported to {}",
                    app.export_path.display()
                ))),
                Err(e) => {
                    tracing::warn!("notes export failed: {}", e);
                    app.toasts.push(Toast::error("Export failed"));
                }
            }
        }
        KeyCode::Char('x') | KeyCode::Delete => {
            if let Some(id) = note_under_cursor(app) {
                if app.notes_state.is_selected(id) {
                    app.notes_state.toggle_select(id);
                }
                app.notes.borrow_mut().delete(id);
                let len = app.notes.borrow().visible().len();
                app.notes_state.clamp_cursor(len);
                app.toasts.push(Toast::info("Note deleted"));
            }
        }
        KeyCode::Esc => {
            if !app.notes_state.selection().is_empty() {
                app.notes_state.clear_selection();
            } else if app.notes.borrow().open_folder_id().is_some() {
                app.notes.borrow_mut().close_folder();
                app.notes_state.clamp_cursor(app.notes.borrow().visible().len());
            }
        }
        _ => {}
    }
}

fn note_under_cursor(app: &App) -> Option<Uuid> {
    app.notes
        .borrow()
        .visible()
        .get(app.notes_state.cursor)
        .map(|n| n.id)
}

fn merge_selection(app: &mut App) {
    let ids = app.notes_state.take_selection();
    if ids.len() < 2 {
        app.toasts
            .push(Toast::warning("Select at least two notes to merge"));
        return;
    }
    if app.notes.borrow_mut().merge(&ids).is_some() {
        app.toasts
            .push(Toast::success(format!("Merged {} notes", ids.len())));
    }
    let len = app.notes.borrow().visible().len();
    app.notes_state.clamp_cursor(len);
}

fn open_or_edit(app: &mut App) {
    let Some(id) = note_under_cursor(app) else {
        return;
    };
    let (is_folder, body) = {
        let notes = app.notes.borrow();
        let Some(note) = notes.visible_note(id) else {
            return;
        };
        (note.is_folder(), note.body.plain())
    };
    if is_folder {
        app.notes.borrow_mut().open_folder(id);
        app.notes_state.cursor = 0;
        app.notes_state.clear_selection();
    } else {
        app.note_edit = crate::ui::state::TextInput::from_text(&body);
        app.input_mode = InputMode::NoteBody;
    }
}

fn begin_rename(app: &mut App) {
    let Some(id) = note_under_cursor(app) else {
        return;
    };
    let title = app
        .notes
        .borrow()
        .visible_note(id)
        .map(|n| n.title.clone())
        .unwrap_or_default();
    app.note_edit = crate::ui::state::TextInput::from_text(&title);
    app.input_mode = InputMode::NoteTitle;
}

fn cycle_color(app: &mut App) {
    if let Some(id) = note_under_cursor(app) {
        let color = app.notes.borrow().visible_note(id).map(|n| n.color);
        if let Some(color) = color {
            let pos = NoteColor::ALL.iter().position(|c| *c == color).unwrap_or(0);
            let next = NoteColor::ALL[(pos + 1) % NoteColor::ALL.len()];
            app.notes.borrow_mut().set_color(id, next);
            app.toasts.push(Toast::info(next.label()));
        }
    }
}

fn cycle_alignment(app: &mut App) {
    if let Some(id) = note_under_cursor(app) {
        let alignment = app.notes.borrow().visible_note(id).map(|n| n.alignment);
        if let Some(alignment) = alignment {
            let next = match alignment {
                NoteAlignment::Left => NoteAlignment::Center,
                NoteAlignment::Center => NoteAlignment::Right,
                NoteAlignment::Right => NoteAlignment::Left,
            };
            app.notes.borrow_mut().set_alignment(id, next);
        }
    }
}

/// Title/body edit keys. Formatting shortcuts only touch the stored body
/// while the buffer is clean, so styled runs are never clobbered by a
/// plain-text commit.
pub fn handle_note_edit_key(app: &mut App, key: KeyEvent) {
    let Some(id) = note_under_cursor(app) else {
        app.input_mode = InputMode::Normal;
        return;
    };

    if key.modifiers.contains(KeyModifiers::CONTROL) && app.input_mode == InputMode::NoteBody {
        match key.code {
            KeyCode::Char('a') => {
                app.notes_state.body_cursor = app.note_edit.cursor();
                app.notes_state.set_format_anchor();
                app.toasts.push(Toast::info("Format mark set"));
                return;
            }
            KeyCode::Char('b') => return apply_format(app, id, |s| s.bold = !s.bold),
            KeyCode::Char('i') => return apply_format(app, id, |s| s.italic = !s.italic),
            KeyCode::Char('u') => return apply_format(app, id, |s| s.underline = !s.underline),
            _ => {}
        }
    }

    match key.code {
        KeyCode::Esc => {
            app.note_edit.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            let text = app.note_edit.take();
            match app.input_mode {
                InputMode::NoteTitle => app.notes.borrow_mut().rename(id, &text),
                InputMode::NoteBody => {
                    let unchanged = app
                        .notes
                        .borrow()
                        .visible_note(id)
                        .is_some_and(|n| n.body.plain() == text);
                    if !unchanged {
                        app.notes
                            .borrow_mut()
                            .set_body(id, RichText::from_plain(text));
                    }
                }
                _ => {}
            }
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => app.note_edit.backspace(),
        KeyCode::Delete => app.note_edit.delete(),
        KeyCode::Left => app.note_edit.move_left(),
        KeyCode::Right => app.note_edit.move_right(),
        KeyCode::Home => app.note_edit.move_home(),
        KeyCode::End => app.note_edit.move_end(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.note_edit.insert(c);
        }
        _ => {}
    }
    app.notes_state.body_cursor = app.note_edit.cursor();
}

fn apply_format(app: &mut App, id: Uuid, mutate: impl Fn(&mut parrot_core::models::rich_text::RunStyle)) {
    let clean = app
        .notes
        .borrow()
        .visible_note(id)
        .is_some_and(|n| n.body.plain() == app.note_edit.text());
    if !clean {
        app.toasts
            .push(Toast::warning("Save the text first, then format"));
        return;
    }
    app.notes_state.body_cursor = app.note_edit.cursor();
    let Some((start, end)) = app.notes_state.take_format_range() else {
        app.toasts
            .push(Toast::warning("Set a format mark with Ctrl+A first"));
        return;
    };
    app.notes.borrow_mut().format_body(id, start, end, mutate);
}

/// Resolve a finished mouse drag on the notes grid: a real drag onto a
/// folder moves notes in, onto a plain note swaps positions, and a plain
/// click toggles selection.
pub fn finish_note_drag(app: &mut App) {
    let Some(drag) = app.notes_state.take_drag() else {
        return;
    };
    if !drag.moved {
        // Clicking cancels an in-progress inline edit before selecting
        if app.input_mode == InputMode::NoteTitle || app.input_mode == InputMode::NoteBody {
            app.note_edit.clear();
            app.input_mode = InputMode::Normal;
        }
        if let Some(idx) = app
            .note_rects
            .iter()
            .position(|(_, id)| *id == drag.source)
        {
            app.notes_state.cursor = idx;
        }
        app.notes_state.toggle_select(drag.source);
        return;
    }
    let Some(target) = drag.target else {
        return;
    };

    let target_is_folder = app
        .notes
        .borrow()
        .visible_note(target)
        .is_some_and(|n| n.is_folder());
    if target_is_folder {
        // Dragging a selected note carries the whole selection with it
        let ids = if app.notes_state.is_selected(drag.source) {
            app.notes_state.take_selection()
        } else {
            vec![drag.source]
        };
        app.notes.borrow_mut().merge_into(target, &ids);
        app.toasts.push(Toast::success("Moved into folder"));
    } else {
        app.notes.borrow_mut().swap(drag.source, target);
    }
    let len = app.notes.borrow().visible().len();
    app.notes_state.clamp_cursor(len);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use parrot_core::config::CoreConfig;

    use crate::ui::App;

    fn app_with_notes(texts: &[&str]) -> (App, Vec<Uuid>) {
        let mut app = App::new(CoreConfig::default(), false, PathBuf::from("notes.json"));
        let ids = texts
            .iter()
            .map(|t| app.notes.borrow_mut().add_text(t, "test"))
            .collect();
        (app, ids)
    }

    #[test]
    fn test_drag_onto_plain_note_swaps_positions() {
        let (mut app, ids) = app_with_notes(&["A", "B", "C"]);
        app.notes_state.begin_drag(ids[0]);
        app.notes_state.update_drag(Some(ids[2]));

        finish_note_drag(&mut app);

        let order: Vec<Uuid> = app.notes.borrow().visible().iter().map(|n| n.id).collect();
        assert_eq!(order, vec![ids[2], ids[1], ids[0]]);
    }

    #[test]
    fn test_drag_onto_folder_moves_note_inside() {
        let (mut app, ids) = app_with_notes(&["A", "B", "C"]);
        let folder = app.notes.borrow_mut().merge(&[ids[0], ids[1]]).unwrap();

        app.notes_state.begin_drag(ids[2]);
        app.notes_state.update_drag(Some(folder));
        finish_note_drag(&mut app);

        let notes = app.notes.borrow();
        assert_eq!(notes.visible().len(), 1);
        let note = notes.visible_note(folder).unwrap();
        assert_eq!(note.merged_count(), 3);
        assert_eq!(note.body.plain(), "A\n\nB\n\nC");
    }

    #[test]
    fn test_press_release_without_movement_is_a_selection_click() {
        let (mut app, ids) = app_with_notes(&["A", "B"]);
        app.notes_state.begin_drag(ids[1]);
        // Pointer never left the source card
        app.notes_state.update_drag(Some(ids[1]));

        finish_note_drag(&mut app);

        assert!(app.notes_state.is_selected(ids[1]));
        assert_eq!(app.notes.borrow().visible().len(), 2);
    }

    #[test]
    fn test_dragging_a_selected_note_carries_the_selection() {
        let (mut app, ids) = app_with_notes(&["A", "B", "C", "D"]);
        let folder = app.notes.borrow_mut().merge(&[ids[0], ids[1]]).unwrap();
        app.notes_state.toggle_select(ids[2]);
        app.notes_state.toggle_select(ids[3]);

        app.notes_state.begin_drag(ids[2]);
        app.notes_state.update_drag(Some(folder));
        finish_note_drag(&mut app);

        let notes = app.notes.borrow();
        assert_eq!(notes.visible().len(), 1);
        assert_eq!(notes.visible_note(folder).unwrap().merged_count(), 4);
        drop(notes);
        assert!(app.notes_state.selection().is_empty());
    }

    #[test]
    fn test_merge_selection_requires_two_notes() {
        let (mut app, ids) = app_with_notes(&["A"]);
        app.notes_state.toggle_select(ids[0]);

        merge_selection(&mut app);

        // Nothing merged, selection consumed, warning surfaced
        assert_eq!(app.notes.borrow().visible().len(), 1);
        assert!(!app.notes.borrow().visible()[0].is_folder());
    }
}
