// Normal-mode keys, routed by the active view

use crossterm::event::{KeyCode, KeyEvent};

use parrot_core::bus::HighlightPayload;
use parrot_core::constants::DEFAULT_CONVERSATION_NAME;
use parrot_core::models::Role;
use parrot_core::Signal;

use crate::input::notes_handlers;
use crate::ui::notifications::Toast;
use crate::ui::views::settings::SETTINGS_ROWS;
use crate::ui::{App, InputMode, View};

pub fn handle_view_key(app: &mut App, key: KeyEvent) {
    // Global navigation first
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        // Digits switch views everywhere except inside a question detail,
        // where they ask the numbered question
        KeyCode::Char(c @ '1'..='5') if !matches!(app.view, View::QuestionDetail { .. }) => {
            let idx = (c as u8 - b'1') as usize;
            app.set_view(View::NAV[idx]);
            return;
        }
        KeyCode::Tab if !app.overlays.is_empty() => {
            app.overlays.focus_next();
            return;
        }
        _ => {}
    }

    match app.view {
        View::Home => handle_home_key(app, key),
        View::Agents => handle_agents_key(app, key),
        View::Knowledge => handle_knowledge_key(app, key),
        View::Storage => notes_handlers::handle_storage_key(app, key),
        View::Settings => handle_settings_key(app, key),
        View::QuestionDetail { question_set_id } => {
            handle_question_detail_key(app, key, question_set_id)
        }
    }
}

fn handle_home_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('i') => app.input_mode = InputMode::Insert,
        KeyCode::Char('n') => {
            app.chat.borrow_mut().create_root(DEFAULT_CONVERSATION_NAME);
            sync_sidebar_cursor(app);
        }
        KeyCode::Char('b') => {
            let active = app.chat.borrow().active();
            app.chat.borrow_mut().create_sub_chat(active);
            sync_sidebar_cursor(app);
        }
        KeyCode::Char('j') | KeyCode::Down => move_sidebar(app, 1),
        KeyCode::Char('k') | KeyCode::Up => move_sidebar(app, -1),
        KeyCode::Char('h') | KeyCode::Left | KeyCode::Char('l') | KeyCode::Right => {
            let target = sidebar_entry(app, app.sidebar.cursor);
            if let Some(id) = target {
                app.sidebar.toggle_collapsed(id);
            }
        }
        KeyCode::Char('x') => {
            let target = sidebar_entry(app, app.sidebar.cursor);
            if let Some(id) = target {
                let name = app
                    .chat
                    .borrow()
                    .node(id)
                    .map(|n| n.name.clone())
                    .unwrap_or_default();
                app.chat.borrow_mut().delete(id);
                sync_sidebar_cursor(app);
                app.toasts.push(Toast::info(format!("Deleted {name}")));
            }
        }
        KeyCode::PageUp => app.chat_scroll = app.chat_scroll.saturating_sub(5),
        KeyCode::PageDown => {
            app.chat_scroll = app.chat_scroll.saturating_add(5).min(app.max_chat_scroll)
        }
        // Overlay emitters
        KeyCode::Char('y') => spawn_highlight_from_last_reply(app, false),
        KeyCode::Char('Y') => spawn_highlight_from_last_reply(app, true),
        KeyCode::Char('s') => app.publish(Signal::CreateStickyNote {
            text: String::new(),
            is_editable: true,
        }),
        KeyCode::Char('Q') => app.publish(Signal::CreateQuestionPopup),
        KeyCode::Char('C') => app.publish(Signal::CreateClarificationPopup),
        _ => {}
    }
}

/// Highlight the most recent echoed reply in the active conversation and
/// float it as a card
fn spawn_highlight_from_last_reply(app: &mut App, branched: bool) {
    let text = {
        let chat = app.chat.borrow();
        chat.active_session()
            .messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .map(|m| m.content.clone())
    };
    let Some(text) = text else {
        app.toasts.push(Toast::warning("Nothing to highlight yet"));
        return;
    };
    let highlight = HighlightPayload::new(text);
    let signal = if branched {
        Signal::CreateBranchedHighlight { highlight }
    } else {
        Signal::CreateHighlight { highlight }
    };
    app.publish(signal);
}

fn sidebar_entry(app: &App, index: usize) -> Option<parrot_core::models::ConversationId> {
    app.chat.borrow().flattened().get(index).map(|&(id, _)| id)
}

fn sync_sidebar_cursor(app: &mut App) {
    let chat = app.chat.borrow();
    let active = chat.active();
    if let Some(pos) = chat.flattened().iter().position(|&(id, _)| id == active) {
        drop(chat);
        app.sidebar.cursor = pos;
    }
}

fn move_sidebar(app: &mut App, delta: isize) {
    let len = app.chat.borrow().flattened().len();
    if len == 0 {
        return;
    }
    let cursor = app.sidebar.cursor as isize + delta;
    app.sidebar.cursor = cursor.clamp(0, len as isize - 1) as usize;
    if let Some(id) = sidebar_entry(app, app.sidebar.cursor) {
        app.chat.borrow_mut().select(id);
        app.chat_scroll = u16::MAX;
    }
}

fn handle_agents_key(app: &mut App, key: KeyEvent) {
    let len = app.chat.borrow().question_sets().len();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.agents_list.down(len),
        KeyCode::Char('k') | KeyCode::Up => app.agents_list.up(),
        KeyCode::Enter => {
            let id = app
                .chat
                .borrow()
                .question_sets()
                .get(app.agents_list.selected)
                .map(|qs| qs.id);
            if let Some(question_set_id) = id {
                app.set_view(View::QuestionDetail { question_set_id });
            }
        }
        _ => {}
    }
}

fn handle_question_detail_key(app: &mut App, key: KeyEvent, question_set_id: uuid::Uuid) {
    match key.code {
        KeyCode::Esc => app.set_view(View::Agents),
        KeyCode::Char(c @ '1'..='3') => {
            let question = app
                .chat
                .borrow()
                .question_set(question_set_id)
                .and_then(|qs| qs.questions.get((c as u8 - b'1') as usize).cloned());
            if let Some(question) = question {
                app.publish(Signal::AskQuestion { question });
            }
        }
        _ => {}
    }
}

fn handle_knowledge_key(app: &mut App, key: KeyEvent) {
    let len = app.knowledge_cards.len();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.knowledge_list.down(len),
        KeyCode::Char('k') | KeyCode::Up => app.knowledge_list.up(),
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.settings_list.down(SETTINGS_ROWS),
        KeyCode::Char('k') | KeyCode::Up => app.settings_list.up(),
        KeyCode::Enter if app.settings_list.selected == 0 => {
            let next = !app.sound.is_enabled();
            app.sound.set_enabled(next);
            let state = if app.sound.is_enabled() { "on" } else { "off" };
            app.toasts.push(Toast::info(format!("Sound {state}")));
        }
        KeyCode::Char('h') | KeyCode::Left if app.settings_list.selected == 1 => {
            app.adjust_reply_delay(-(REPLY_DELAY_STEP_MS as i64));
        }
        KeyCode::Char('l') | KeyCode::Right if app.settings_list.selected == 1 => {
            app.adjust_reply_delay(REPLY_DELAY_STEP_MS as i64);
        }
        _ => {}
    }
}

const REPLY_DELAY_STEP_MS: u64 = 100;
