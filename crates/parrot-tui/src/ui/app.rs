// Central application state: owns the stores, the signal bus and its
// subscriptions, the overlay manager, and everything views need to render.
// Handlers mutate this; render reads it and records hit-test geometry back
// onto it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use uuid::Uuid;

use parrot_core::config::CoreConfig;
use parrot_core::echo;
use parrot_core::events::{CoreCommand, CoreEvent};
use parrot_core::models::ConversationId;
use parrot_core::store::{ConversationStore, NotesStore};
use parrot_core::{CoreHandle, Signal, SignalBus};

use crate::ui::notifications::{Toast, ToastQueue};
use crate::ui::overlays::{OverlayKind, OverlayManager};
use crate::ui::sound::{SoundCue, SoundPlayer};
use crate::ui::state::{ListState, NotesViewState, SidebarState, TextInput};

/// Top-level destinations. `QuestionDetail` carries the set it shows, so
/// "which detail page" is state inside the route, not a parallel field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Agents,
    Knowledge,
    Storage,
    Settings,
    QuestionDetail { question_set_id: Uuid },
}

impl View {
    /// Destinations shown in the nav bar, in display order
    pub const NAV: [View; 5] = [
        View::Home,
        View::Agents,
        View::Knowledge,
        View::Storage,
        View::Settings,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            View::Home => "Home",
            View::Agents => "Agents",
            View::Knowledge => "Knowledge",
            View::Storage => "Storage",
            View::Settings => "Settings",
            View::QuestionDetail { .. } => "Questions",
        }
    }

    /// The nav tab this view highlights
    pub fn nav_slot(&self) -> View {
        match self {
            View::QuestionDetail { .. } => View::Agents,
            other => *other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing into the main chat input
    Insert,
    /// Renaming the focused note
    NoteTitle,
    /// Editing the focused note's body
    NoteBody,
}

#[derive(Debug, Clone)]
pub struct KnowledgeCard {
    pub title: String,
    pub body: String,
}

pub struct App {
    pub config: CoreConfig,
    pub view: View,
    pub input_mode: InputMode,
    pub should_quit: bool,
    /// Set by the first Ctrl+C; a second within the grace window quits
    pub quit_requested_at: Option<Instant>,

    pub chat: Rc<RefCell<ConversationStore>>,
    pub notes: Rc<RefCell<NotesStore>>,
    bus: SignalBus,
    chat_signals: Receiver<Signal>,
    notes_signals: Receiver<Signal>,
    overlay_signals: Receiver<Signal>,

    pub overlays: OverlayManager,
    pub toasts: ToastQueue,
    pub sound: SoundPlayer,
    /// Destination for notes snapshot exports
    pub export_path: PathBuf,
    core_handle: Option<CoreHandle>,
    /// Submissions awaiting their echoed reply, per conversation
    in_flight: HashMap<ConversationId, u32>,

    pub chat_input: TextInput,
    pub sidebar: SidebarState,
    pub notes_state: NotesViewState,
    /// Title/body edit buffer shared by the note editing modes
    pub note_edit: TextInput,
    pub agents_list: ListState,
    pub knowledge_list: ListState,
    pub settings_list: ListState,
    pub knowledge_cards: Vec<KnowledgeCard>,

    // Geometry recorded during render for mouse hit-testing
    pub nav_rects: Vec<(Rect, View)>,
    pub sidebar_rects: Vec<(Rect, ConversationId)>,
    pub note_rects: Vec<(Rect, Uuid)>,
    pub chat_scroll: u16,
    pub max_chat_scroll: u16,
}

impl App {
    pub fn new(config: CoreConfig, sound_enabled: bool, export_path: PathBuf) -> Self {
        let mut bus = SignalBus::new();
        // Registration order is delivery order: chat first, then storage,
        // then overlays
        let chat_signals = bus.subscribe();
        let notes_signals = bus.subscribe();
        let overlay_signals = bus.subscribe();

        Self {
            config,
            view: View::Home,
            input_mode: InputMode::Normal,
            should_quit: false,
            quit_requested_at: None,
            chat: Rc::new(RefCell::new(ConversationStore::new())),
            notes: Rc::new(RefCell::new(NotesStore::new())),
            bus,
            chat_signals,
            notes_signals,
            overlay_signals,
            overlays: OverlayManager::new(),
            toasts: ToastQueue::new(),
            sound: SoundPlayer::new(sound_enabled),
            export_path,
            core_handle: None,
            in_flight: HashMap::new(),
            chat_input: TextInput::new(),
            sidebar: SidebarState::new(),
            notes_state: NotesViewState::new(),
            note_edit: TextInput::new(),
            agents_list: ListState::new(),
            knowledge_list: ListState::new(),
            settings_list: ListState::new(),
            knowledge_cards: seed_knowledge_cards(),
            nav_rects: Vec::new(),
            sidebar_rects: Vec::new(),
            note_rects: Vec::new(),
            chat_scroll: 0,
            max_chat_scroll: 0,
        }
    }

    pub fn set_core_handle(&mut self, handle: CoreHandle) {
        self.core_handle = Some(handle);
    }

    /// Adjust the simulated reply latency; already-scheduled replies keep
    /// the delay they were scheduled with.
    pub fn adjust_reply_delay(&mut self, delta_ms: i64) {
        let current = self.config.reply_delay.as_millis() as i64;
        let next = Duration::from_millis((current + delta_ms).max(0) as u64);
        if next == self.config.reply_delay {
            return;
        }
        self.config.reply_delay = next;
        if let Some(handle) = &self.core_handle {
            if let Err(e) = handle.send(CoreCommand::SetReplyDelay(next)) {
                tracing::warn!("could not update reply delay: {}", e);
            }
        }
    }

    pub fn set_view(&mut self, view: View) {
        if self.view != view {
            tracing::debug!(from = self.view.label(), to = view.label(), "navigate");
            self.view = view;
            self.input_mode = InputMode::Normal;
        }
    }

    pub fn publish(&mut self, signal: Signal) {
        self.bus.publish(signal);
        self.process_signals();
    }

    /// True while the originating conversation of any submission is still
    /// waiting on its echoed reply
    pub fn is_thinking(&self, conversation: ConversationId) -> bool {
        self.in_flight.get(&conversation).copied().unwrap_or(0) > 0
    }

    // --- chat flow ---------------------------------------------------------

    /// Submit the chat input buffer to the active conversation
    pub fn submit_chat_input(&mut self) {
        let text = self.chat_input.take();
        self.submit_text(&text);
    }

    /// Submit arbitrary text as the user (also the auto-submit path for
    /// derived questions). Whitespace-only text is rejected by the store.
    pub fn submit_text(&mut self, text: &str) {
        let pending = self.chat.borrow_mut().submit(text);
        let Some(pending) = pending else {
            return;
        };
        *self.in_flight.entry(pending.conversation).or_insert(0) += 1;
        self.chat_scroll = u16::MAX; // snap to bottom
        if let Some(handle) = &self.core_handle {
            if let Err(e) = handle.send(CoreCommand::ScheduleReply(pending)) {
                tracing::warn!("failed to schedule reply: {}", e);
                self.toasts.push(Toast::error("Reply engine unavailable"));
            }
        }
    }

    /// A reply's simulated latency elapsed; write it into the originating
    /// session and surface it.
    pub fn handle_core_event(&mut self, event: CoreEvent) {
        match event {
            CoreEvent::ReplyReady(pending) => {
                let conversation = pending.conversation;
                if let Some(count) = self.in_flight.get_mut(&conversation) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        self.in_flight.remove(&conversation);
                    }
                }

                let name = {
                    let chat = self.chat.borrow();
                    chat.node(conversation).map(|n| n.name.clone())
                };
                self.chat.borrow_mut().apply_reply(&pending);

                match name {
                    Some(name) => {
                        if conversation != self.chat.borrow().active() {
                            self.toasts.push(Toast::info(format!("Reply in {name}")));
                        }
                        self.sound.play(SoundCue::ReplyArrived);
                    }
                    None => {
                        // Conversation deleted while the timer ran
                        tracing::debug!(%conversation, "reply arrived for deleted conversation");
                    }
                }
            }
        }
    }

    // --- signal subscriptions ------------------------------------------------

    /// Drain all three subscriptions. Called after every publish and on each
    /// tick, so signals emitted while handling signals still land this frame.
    pub fn process_signals(&mut self) {
        while let Ok(signal) = self.chat_signals.try_recv() {
            self.handle_chat_signal(signal);
        }
        while let Ok(signal) = self.notes_signals.try_recv() {
            self.handle_notes_signal(signal);
        }
        while let Ok(signal) = self.overlay_signals.try_recv() {
            self.handle_overlay_signal(signal);
        }
    }

    fn handle_chat_signal(&mut self, signal: Signal) {
        match signal {
            Signal::AskQuestion { question } => {
                self.set_view(View::Home);
                self.submit_text(&question);
            }
            Signal::HighlightReply {
                highlight_text,
                reply_text,
                in_card,
                ..
            } => {
                // In-card replies stay inside the overlay; only the rest
                // reach the main thread
                if !in_card {
                    let user_text = format!("Re \"{highlight_text}\": {reply_text}");
                    let assistant_text = echo::derive_response(&reply_text);
                    self.chat
                        .borrow_mut()
                        .append_exchange(&user_text, &assistant_text);
                }
            }
            Signal::AddToContext {
                highlight_text,
                add_text,
                ..
            } => {
                let user_text = format!("Add to context for \"{highlight_text}\": {add_text}");
                self.chat
                    .borrow_mut()
                    .append_exchange(&user_text, "Added to the conversation context.");
                self.knowledge_cards.push(KnowledgeCard {
                    title: highlight_text,
                    body: add_text,
                });
            }
            _ => {}
        }
    }

    fn handle_notes_signal(&mut self, signal: Signal) {
        match signal {
            Signal::StoreHighlight { highlight_text, .. } => {
                self.notes.borrow_mut().add_highlight(&highlight_text);
                self.toasts.push(Toast::success("Highlight stored"));
                self.sound.play(SoundCue::NoteStored);
            }
            Signal::StickyNoteToStorage { text, title, .. } => {
                self.notes.borrow_mut().add_sticky(&text, title);
                self.toasts.push(Toast::success("Sticky note stored"));
                self.sound.play(SoundCue::NoteStored);
            }
            Signal::StoreText { text, source } => {
                self.notes.borrow_mut().add_text(&text, &source);
                self.toasts.push(Toast::success("Saved to storage"));
                self.sound.play(SoundCue::NoteStored);
            }
            _ => {}
        }
    }

    fn handle_overlay_signal(&mut self, signal: Signal) {
        match signal {
            Signal::CreateHighlight { highlight } => {
                self.overlays.spawn_highlight(highlight.id, highlight.text);
                self.sound.play(SoundCue::OverlayOpened);
            }
            Signal::CreateBranchedHighlight { highlight } => {
                self.overlays
                    .spawn_branched_highlight(highlight.id, highlight.text);
                self.sound.play(SoundCue::OverlayOpened);
            }
            Signal::CreateStickyNote { text, is_editable } => {
                self.overlays.spawn_sticky(text, is_editable);
                self.sound.play(SoundCue::OverlayOpened);
            }
            Signal::CreateQuestionPopup => {
                let questions = self
                    .chat
                    .borrow()
                    .question_sets()
                    .last()
                    .map(|qs| qs.questions.clone())
                    .unwrap_or_default();
                if questions.is_empty() {
                    self.toasts.push(Toast::warning("No questions yet"));
                } else {
                    self.overlays.spawn_question_popup(&questions);
                    self.sound.play(SoundCue::OverlayOpened);
                }
            }
            Signal::CreateClarificationPopup => {
                self.overlays
                    .spawn_clarification("What would you like to clarify?".to_string());
                self.sound.play(SoundCue::OverlayOpened);
            }
            _ => {}
        }
    }

    // --- overlay actions -----------------------------------------------------

    /// Submit the focused overlay's input buffer according to its kind
    pub fn submit_focused_overlay(&mut self) {
        let mut outgoing = None;
        let mut sticky_updated = false;
        if let Some(overlay) = self.overlays.focused_mut() {
            match &mut overlay.kind {
                OverlayKind::Highlight {
                    highlight_id,
                    replies,
                    in_card,
                } => {
                    let reply_text = overlay.input.take();
                    if reply_text.trim().is_empty() {
                        return;
                    }
                    if *in_card {
                        replies.push(reply_text.clone());
                    }
                    outgoing = Some(Signal::HighlightReply {
                        highlight_id: *highlight_id,
                        highlight_text: overlay.text.clone(),
                        reply_text,
                        in_card: *in_card,
                    });
                }
                OverlayKind::StickyNote { editable: true } => {
                    overlay.text = overlay.input.text();
                    sticky_updated = true;
                }
                _ => {}
            }
        }
        if let Some(signal) = outgoing {
            self.publish(signal);
        }
        if sticky_updated {
            self.toasts.push(Toast::info("Sticky note updated"));
        }
    }

    /// Send the focused highlight card's input buffer as conversation
    /// context instead of a reply
    pub fn add_focused_overlay_to_context(&mut self) {
        let mut outgoing = None;
        if let Some(overlay) = self.overlays.focused_mut() {
            if let OverlayKind::Highlight { highlight_id, .. } = &overlay.kind {
                let add_text = overlay.input.take();
                if add_text.trim().is_empty() {
                    return;
                }
                outgoing = Some(Signal::AddToContext {
                    highlight_id: *highlight_id,
                    highlight_text: overlay.text.clone(),
                    add_text,
                });
            }
        }
        if let Some(signal) = outgoing {
            self.publish(signal);
            self.toasts.push(Toast::success("Added to context"));
        }
    }

    /// Toggle the focused highlight card between in-card and main-thread
    /// reply routing
    pub fn toggle_overlay_in_card(&mut self) {
        if let Some(overlay) = self.overlays.focused_mut() {
            if let OverlayKind::Highlight { in_card, .. } = &mut overlay.kind {
                *in_card = !*in_card;
                let state = if *in_card { "in card" } else { "main thread" };
                self.toasts.push(Toast::info(format!("Replies go {state}")));
            }
        }
    }

    /// Persist the focused overlay into storage, then close it
    pub fn store_focused_overlay(&mut self) {
        let Some(overlay) = self.overlays.close_focused() else {
            return;
        };
        let signal = match overlay.kind {
            OverlayKind::Highlight { highlight_id, .. } => Signal::StoreHighlight {
                highlight_id,
                highlight_text: overlay.text,
            },
            OverlayKind::StickyNote { editable } => Signal::StickyNoteToStorage {
                id: overlay.id,
                text: if editable {
                    overlay.input.text()
                } else {
                    overlay.text
                },
                title: None,
            },
            OverlayKind::QuestionPopup | OverlayKind::Clarification => return,
        };
        self.publish(signal);
    }

    // --- housekeeping ----------------------------------------------------------

    /// Per-frame upkeep, driven by the event loop tick
    pub fn tick(&mut self) {
        self.toasts.tick();
        self.process_signals();
        if let Some(at) = self.quit_requested_at {
            if at.elapsed().as_secs() >= 2 {
                self.quit_requested_at = None;
            }
        }
    }

    /// First Ctrl+C arms the quit, second within the window confirms
    pub fn request_quit(&mut self) {
        match self.quit_requested_at {
            Some(at) if at.elapsed().as_secs() < 2 => self.should_quit = true,
            _ => {
                self.quit_requested_at = Some(Instant::now());
                self.toasts.push(Toast::warning("Press Ctrl+C again to quit"));
            }
        }
    }
}

fn seed_knowledge_cards() -> Vec<KnowledgeCard> {
    vec![
        KnowledgeCard {
            title: "Getting started".into(),
            body: "Type in the input box and press Enter. The reply echoes your words back after a short delay.".into(),
        },
        KnowledgeCard {
            title: "Sub-chats".into(),
            body: "Branch any conversation into a nested sub-chat from the sidebar. Replies always land in the conversation that asked.".into(),
        },
        KnowledgeCard {
            title: "Storage".into(),
            body: "Highlights and sticky notes can be stored as cards. Drag one card onto another to merge them into a folder.".into(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use parrot_core::bus::HighlightPayload;
    use parrot_core::models::Role;

    fn test_app() -> App {
        App::new(CoreConfig::default(), false, PathBuf::from("notes.json"))
    }

    #[test]
    fn test_ask_question_signal_submits_to_active_chat() {
        let mut app = test_app();
        app.set_view(View::Agents);
        app.publish(Signal::AskQuestion {
            question: "What do you mean?".into(),
        });

        assert_eq!(app.view, View::Home);
        let chat = app.chat.borrow();
        let session = chat.active_session();
        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.messages[0].content, "What do you mean?");
        drop(chat);
        assert!(app.is_thinking(app.chat.borrow().active()));
    }

    #[test]
    fn test_fresh_highlight_card_keeps_replies_in_card() {
        let mut app = test_app();
        app.publish(Signal::CreateHighlight {
            highlight: HighlightPayload::new("chosen passage"),
        });
        for c in "private reply".chars() {
            if let Some(overlay) = app.overlays.focused_mut() {
                overlay.input.insert(c);
            }
        }
        app.submit_focused_overlay();

        // Reply recorded on the card, not in the chat session
        let overlay = app.overlays.focused().unwrap();
        match &overlay.kind {
            OverlayKind::Highlight { replies, .. } => {
                assert_eq!(replies, &vec!["private reply".to_string()]);
            }
            other => panic!("unexpected overlay kind: {other:?}"),
        }
        assert!(app.chat.borrow().active_session().messages.is_empty());
    }

    #[test]
    fn test_main_thread_highlight_reply_appends_exchange() {
        let mut app = test_app();
        app.publish(Signal::CreateHighlight {
            highlight: HighlightPayload::new("chosen passage"),
        });
        // Opt out of in-card routing
        app.toggle_overlay_in_card();
        for c in "public reply".chars() {
            if let Some(overlay) = app.overlays.focused_mut() {
                overlay.input.insert(c);
            }
        }
        app.submit_focused_overlay();

        let chat = app.chat.borrow();
        let session = chat.active_session();
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[0].role, Role::User);
        assert!(session.messages[0].content.contains("chosen passage"));
        assert!(session.messages[0].content.contains("public reply"));
        assert_eq!(session.messages[1].role, Role::Assistant);
    }

    #[test]
    fn test_add_to_context_feeds_chat_and_knowledge() {
        let mut app = test_app();
        let seeded = app.knowledge_cards.len();
        app.publish(Signal::CreateHighlight {
            highlight: HighlightPayload::new("key passage"),
        });
        for c in "extra background".chars() {
            if let Some(overlay) = app.overlays.focused_mut() {
                overlay.input.insert(c);
            }
        }
        app.add_focused_overlay_to_context();

        assert_eq!(app.knowledge_cards.len(), seeded + 1);
        assert_eq!(app.knowledge_cards[seeded].title, "key passage");
        assert_eq!(app.knowledge_cards[seeded].body, "extra background");
        let chat = app.chat.borrow();
        let session = chat.active_session();
        assert_eq!(session.messages.len(), 2);
        assert!(session.messages[0].content.contains("extra background"));
    }

    #[test]
    fn test_store_highlight_lands_in_notes() {
        let mut app = test_app();
        app.publish(Signal::CreateHighlight {
            highlight: HighlightPayload::new("worth keeping"),
        });
        app.store_focused_overlay();

        assert!(app.overlays.is_empty());
        let notes = app.notes.borrow();
        assert_eq!(notes.top_level().len(), 1);
        assert_eq!(notes.top_level()[0].body.plain(), "worth keeping");
    }

    #[test]
    fn test_reply_ready_clears_thinking_state() {
        let mut app = test_app();
        let pending = app.chat.borrow_mut().submit("hello").unwrap();
        app.in_flight.insert(pending.conversation, 1);

        app.handle_core_event(CoreEvent::ReplyReady(pending.clone()));

        assert!(!app.is_thinking(pending.conversation));
        let chat = app.chat.borrow();
        assert_eq!(chat.active_session().messages.len(), 2);
    }

    #[test]
    fn test_question_popup_requires_a_submission() {
        let mut app = test_app();
        app.publish(Signal::CreateQuestionPopup);
        assert!(app.overlays.is_empty());

        app.submit_text("seed input");
        app.publish(Signal::CreateQuestionPopup);
        assert_eq!(app.overlays.len(), 1);
    }

    #[test]
    fn test_double_ctrl_c_quits() {
        let mut app = test_app();
        app.request_quit();
        assert!(!app.should_quit);
        app.request_quit();
        assert!(app.should_quit);
    }
}
