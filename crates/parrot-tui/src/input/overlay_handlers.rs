// Keys while a floating card has focus

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use parrot_core::Signal;

use crate::ui::overlays::OverlayKind;
use crate::ui::App;

pub fn handle_overlay_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('t') => return app.toggle_overlay_in_card(),
            KeyCode::Char('s') => return app.store_focused_overlay(),
            KeyCode::Char('a') => return app.add_focused_overlay_to_context(),
            // Ctrl+arrows resize the focused card
            KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down => {
                if let Some(overlay) = app.overlays.focused_mut() {
                    let (dw, dh) = match key.code {
                        KeyCode::Left => (-2, 0),
                        KeyCode::Right => (2, 0),
                        KeyCode::Up => (0, -1),
                        _ => (0, 1),
                    };
                    overlay.resize_by(dw, dh);
                }
                return;
            }
            _ => {}
        }
    }

    // Shift+arrows move the focused card
    if key.modifiers.contains(KeyModifiers::SHIFT) {
        if let KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down = key.code {
            if let Some(overlay) = app.overlays.focused_mut() {
                let (dx, dy) = match key.code {
                    KeyCode::Left => (-2, 0),
                    KeyCode::Right => (2, 0),
                    KeyCode::Up => (0, -1),
                    _ => (0, 1),
                };
                overlay.move_by(dx, dy);
            }
            return;
        }
    }

    // Question popups are read-only; digits ask, everything else passes
    if matches!(
        app.overlays.focused().map(|o| &o.kind),
        Some(OverlayKind::QuestionPopup)
    ) {
        match key.code {
            KeyCode::Char(c @ '1'..='3') => {
                let question = app
                    .overlays
                    .focused()
                    .and_then(|o| o.text.lines().nth((c as u8 - b'1') as usize))
                    .map(str::to_string);
                if let Some(question) = question {
                    app.overlays.close_focused();
                    app.publish(Signal::AskQuestion { question });
                }
            }
            KeyCode::Esc => {
                app.overlays.close_focused();
            }
            KeyCode::Tab => app.overlays.focus_next(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => {
            app.overlays.close_focused();
        }
        KeyCode::Tab => app.overlays.focus_next(),
        KeyCode::Enter => submit_focused(app),
        KeyCode::Backspace => {
            if let Some(overlay) = app.overlays.focused_mut() {
                overlay.input.backspace();
            }
        }
        KeyCode::Left => {
            if let Some(overlay) = app.overlays.focused_mut() {
                overlay.input.move_left();
            }
        }
        KeyCode::Right => {
            if let Some(overlay) = app.overlays.focused_mut() {
                overlay.input.move_right();
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(overlay) = app.overlays.focused_mut() {
                if overlay.is_editable() || matches!(overlay.kind, OverlayKind::Clarification) {
                    overlay.input.insert(c);
                }
            }
        }
        _ => {}
    }
}

fn submit_focused(app: &mut App) {
    let kind_is_clarification = matches!(
        app.overlays.focused().map(|o| &o.kind),
        Some(OverlayKind::Clarification)
    );
    if kind_is_clarification {
        // A clarification answer becomes a normal question submission
        let question = app
            .overlays
            .focused_mut()
            .map(|o| o.input.take())
            .unwrap_or_default();
        if question.trim().is_empty() {
            return;
        }
        app.overlays.close_focused();
        app.publish(Signal::AskQuestion { question });
    } else {
        app.submit_focused_overlay();
    }
}
