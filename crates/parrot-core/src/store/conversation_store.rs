//! Single source of truth for the conversation forest and its chat sessions.
//!
//! The forest is an arena keyed by stable UUIDs: parent/child links are id
//! lists, so mutating one node never deep-clones a subtree. The active node
//! is a single id on the store, which makes the "exactly one active
//! conversation" invariant structural instead of a recursive repair walk.

use std::collections::HashMap;

use uuid::Uuid;

use crate::constants::{DEFAULT_CONVERSATION_NAME, SUB_CHAT_NAMES};
use crate::echo;
use crate::events::PendingReply;
use crate::models::{ChatSession, ConversationId, ConversationNode, Message, QuestionSet};

pub struct ConversationStore {
    nodes: HashMap<ConversationId, ConversationNode>,
    /// Top-level conversation ordering (insertion order significant)
    roots: Vec<ConversationId>,
    /// The single active conversation
    active: ConversationId,
    /// Lazily created per-node logs; an entry exists for every node that has
    /// ever been selected
    sessions: HashMap<ConversationId, ChatSession>,
    /// Every accepted submission creates exactly one set, never mutated
    question_sets: Vec<QuestionSet>,
    /// Monotonic counter across all input paths
    input_counter: u64,
    /// Cycles the display names handed to new sub-chats
    sub_chat_counter: usize,
}

impl ConversationStore {
    pub fn new() -> Self {
        let root = ConversationNode::root(DEFAULT_CONVERSATION_NAME);
        let active = root.id;
        let mut nodes = HashMap::new();
        nodes.insert(root.id, root);
        let mut sessions = HashMap::new();
        sessions.insert(active, ChatSession::new());
        Self {
            nodes,
            roots: vec![active],
            active,
            sessions,
            question_sets: Vec::new(),
            input_counter: 0,
            sub_chat_counter: 0,
        }
    }

    // --- queries ---------------------------------------------------------

    pub fn active(&self) -> ConversationId {
        self.active
    }

    pub fn node(&self, id: ConversationId) -> Option<&ConversationNode> {
        self.nodes.get(&id)
    }

    pub fn roots(&self) -> &[ConversationId] {
        &self.roots
    }

    pub fn contains(&self, id: ConversationId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn session(&self, id: ConversationId) -> Option<&ChatSession> {
        self.sessions.get(&id)
    }

    pub fn active_session(&self) -> &ChatSession {
        // The active node always has a session: selection creates one
        self.sessions
            .get(&self.active)
            .expect("active conversation has a session")
    }

    pub fn input_counter(&self) -> u64 {
        self.input_counter
    }

    pub fn question_sets(&self) -> &[QuestionSet] {
        &self.question_sets
    }

    pub fn question_set(&self, id: Uuid) -> Option<&QuestionSet> {
        self.question_sets.iter().find(|qs| qs.id == id)
    }

    /// Depth-first flattening of the forest for sidebar rendering:
    /// (id, depth) pairs in display order.
    pub fn flattened(&self) -> Vec<(ConversationId, usize)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        for &root in &self.roots {
            self.flatten_into(root, 0, &mut out);
        }
        out
    }

    fn flatten_into(&self, id: ConversationId, depth: usize, out: &mut Vec<(ConversationId, usize)>) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        out.push((id, depth));
        for &child in &node.children {
            self.flatten_into(child, depth + 1, out);
        }
    }

    // --- mutations (missing ids are silent no-ops by contract) ------------

    /// Make `id` the active conversation, lazily creating its session.
    /// No-op on an unknown id.
    pub fn select(&mut self, id: ConversationId) {
        if !self.nodes.contains_key(&id) {
            return;
        }
        self.active = id;
        self.sessions.entry(id).or_default();
    }

    /// Create a new top-level conversation and select it.
    pub fn create_root(&mut self, name: impl Into<String>) -> ConversationId {
        let node = ConversationNode::root(name);
        let id = node.id;
        self.nodes.insert(id, node);
        self.roots.push(id);
        self.select(id);
        id
    }

    /// Create a sub-chat under `parent` with a generated display name,
    /// select it, and return its id. `None` when `parent` is unknown.
    pub fn create_sub_chat(&mut self, parent: ConversationId) -> Option<ConversationId> {
        if !self.nodes.contains_key(&parent) {
            return None;
        }
        let name = SUB_CHAT_NAMES[self.sub_chat_counter % SUB_CHAT_NAMES.len()];
        self.sub_chat_counter += 1;

        let node = ConversationNode::child_of(parent, name);
        let id = node.id;
        self.nodes.insert(id, node);
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }
        self.select(id);
        Some(id)
    }

    /// Accept a user submission into the active conversation.
    ///
    /// Whitespace-only input is rejected (`None`, nothing appended). On
    /// acceptance: the counter advances, a `QuestionSet` is recorded, the
    /// user message lands in the active session, and the returned
    /// `PendingReply` carries the *originating* conversation id for the
    /// runtime to schedule.
    pub fn submit(&mut self, text: &str) -> Option<PendingReply> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        let input_number = self.input_counter;
        self.input_counter += 1;

        self.question_sets.push(QuestionSet::new(
            input_number,
            trimmed,
            echo::derive_questions(trimmed),
        ));

        let session = self.sessions.entry(self.active).or_default();
        session.messages.push(Message::user(trimmed));

        Some(PendingReply {
            conversation: self.active,
            user_text: trimmed.to_string(),
            input_number,
        })
    }

    /// Append a prepared user/assistant exchange to the active session
    /// without advancing the input counter or deriving questions. Highlight
    /// replies and context additions routed from overlay cards use this.
    pub fn append_exchange(&mut self, user_text: &str, assistant_text: &str) {
        let session = self.sessions.entry(self.active).or_default();
        session.messages.push(Message::user(user_text));
        session.messages.push(Message::assistant(assistant_text));
    }

    /// Apply a reply whose simulated latency has elapsed. Writes the echoed
    /// assistant message, the duplicate agent message, and the agent summary
    /// into the originating session's three logs. A reply for a conversation
    /// deleted in the meantime is dropped.
    pub fn apply_reply(&mut self, reply: &PendingReply) {
        if !self.nodes.contains_key(&reply.conversation) {
            tracing::debug!(conversation = %reply.conversation, "dropping reply for deleted conversation");
            return;
        }
        let session = self.sessions.entry(reply.conversation).or_default();
        let assistant_text = echo::derive_response(&reply.user_text);
        session.messages.push(Message::assistant(&assistant_text));
        session.agent_messages.push(Message::assistant(&assistant_text));
        session
            .agent_responses
            .push(echo::derive_agent_summary(&reply.user_text));
    }

    /// Remove `id` and its entire subtree, along with their sessions. When
    /// the active conversation was inside the subtree, selection falls back
    /// to the first remaining root; an empty forest gets a fresh default
    /// root so the chat view always has an active conversation.
    pub fn delete(&mut self, id: ConversationId) {
        if !self.nodes.contains_key(&id) {
            return;
        }

        let mut doomed = Vec::new();
        self.collect_subtree(id, &mut doomed);
        for gone in &doomed {
            self.nodes.remove(gone);
            self.sessions.remove(gone);
        }

        self.roots.retain(|r| r != &id);
        for node in self.nodes.values_mut() {
            node.children.retain(|c| c != &id);
        }

        if doomed.contains(&self.active) {
            if self.roots.is_empty() {
                self.create_root(DEFAULT_CONVERSATION_NAME);
            } else {
                let first = self.roots[0];
                self.select(first);
            }
        }
    }

    fn collect_subtree(&self, id: ConversationId, out: &mut Vec<ConversationId>) {
        out.push(id);
        if let Some(node) = self.nodes.get(&id) {
            for &child in &node.children {
                self.collect_subtree(child, out);
            }
        }
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::QUESTIONS_PER_INPUT;
    use crate::models::Role;

    #[test]
    fn test_exactly_one_active_after_any_selection_sequence() {
        let mut store = ConversationStore::new();
        let root = store.active();
        let a = store.create_sub_chat(root).unwrap();
        let b = store.create_sub_chat(root).unwrap();

        for &target in &[a, b, root, b, a] {
            store.select(target);
            assert_eq!(store.active(), target);
            // Active id always names a live node with a session
            assert!(store.contains(store.active()));
            assert!(store.session(store.active()).is_some());
        }
    }

    #[test]
    fn test_select_unknown_id_is_a_noop() {
        let mut store = ConversationStore::new();
        let before = store.active();
        store.select(ConversationId::new());
        assert_eq!(store.active(), before);
    }

    #[test]
    fn test_create_sub_chat_appends_child_and_selects_it() {
        let mut store = ConversationStore::new();
        let root = store.active();

        let child = store.create_sub_chat(root).unwrap();

        let root_node = store.node(root).unwrap();
        assert_eq!(root_node.children, vec![child]);
        assert_eq!(store.active(), child);
        assert!(store.session(child).unwrap().is_empty());
    }

    #[test]
    fn test_create_sub_chat_under_unknown_parent_is_a_noop() {
        let mut store = ConversationStore::new();
        let before = store.flattened().len();
        assert!(store.create_sub_chat(ConversationId::new()).is_none());
        assert_eq!(store.flattened().len(), before);
    }

    #[test]
    fn test_whitespace_submission_is_rejected_everywhere_it_counts() {
        let mut store = ConversationStore::new();
        assert!(store.submit("").is_none());
        assert!(store.submit("   \t\n").is_none());
        assert_eq!(store.active_session().messages.len(), 0);
        assert_eq!(store.input_counter(), 0);
        assert!(store.question_sets().is_empty());
    }

    #[test]
    fn test_counter_advances_by_one_per_accepted_submission() {
        let mut store = ConversationStore::new();
        store.submit("one");
        store.submit("  ");
        store.submit("two");
        assert_eq!(store.input_counter(), 2);
    }

    #[test]
    fn test_round_trip_echoes_input_after_reply() {
        let mut store = ConversationStore::new();
        let pending = store.submit("Hello").unwrap();
        store.apply_reply(&pending);

        let session = store.active_session();
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[0].role, Role::User);
        assert_eq!(session.messages[0].content, "Hello");
        assert_eq!(session.messages[1].role, Role::Assistant);
        assert_eq!(session.messages[1].content, "Hello");

        assert_eq!(session.agent_messages.len(), 1);
        assert_eq!(session.agent_responses.len(), 1);
        assert!(session.agent_responses[0].contains("Hello"));
    }

    #[test]
    fn test_reply_lands_in_originating_conversation_not_the_active_one() {
        let mut store = ConversationStore::new();
        let origin = store.active();
        let pending = store.submit("ping").unwrap();

        // User navigates before the timer fires
        let elsewhere = store.create_sub_chat(origin).unwrap();
        store.apply_reply(&pending);

        assert_eq!(store.session(origin).unwrap().messages.len(), 2);
        assert!(store.session(elsewhere).unwrap().messages.is_empty());
    }

    #[test]
    fn test_reply_for_deleted_conversation_is_dropped() {
        let mut store = ConversationStore::new();
        let root = store.active();
        let child = store.create_sub_chat(root).unwrap();
        let pending = store.submit("doomed").unwrap();
        assert_eq!(pending.conversation, child);

        store.delete(child);
        store.apply_reply(&pending);
        assert!(store.session(child).is_none());
    }

    #[test]
    fn test_delete_removes_subtree_and_sessions() {
        let mut store = ConversationStore::new();
        let root = store.active();
        let child = store.create_sub_chat(root).unwrap();
        let grandchild = store.create_sub_chat(child).unwrap();

        store.delete(child);

        assert!(!store.contains(child));
        assert!(!store.contains(grandchild));
        assert!(store.session(child).is_none());
        assert!(store.session(grandchild).is_none());
        // Active fell back to the surviving root
        assert_eq!(store.active(), root);
        assert!(store.node(root).unwrap().children.is_empty());
    }

    #[test]
    fn test_deleting_last_root_recreates_a_default() {
        let mut store = ConversationStore::new();
        let root = store.active();
        store.delete(root);

        assert_eq!(store.roots().len(), 1);
        assert_ne!(store.roots()[0], root);
        assert_eq!(store.active(), store.roots()[0]);
    }

    #[test]
    fn test_append_exchange_skips_counter_and_questions() {
        let mut store = ConversationStore::new();
        store.append_exchange("replying to a highlight", "echoed back");

        let session = store.active_session();
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[0].role, Role::User);
        assert_eq!(session.messages[1].role, Role::Assistant);
        assert_eq!(store.input_counter(), 0);
        assert!(store.question_sets().is_empty());
        // The parallel agent logs are untouched
        assert!(session.agent_messages.is_empty());
    }

    #[test]
    fn test_question_set_lifecycle() {
        let mut store = ConversationStore::new();
        let before = store.input_counter();
        store.submit("X").unwrap();

        assert_eq!(store.question_sets().len(), 1);
        let qs = &store.question_sets()[0];
        assert_eq!(qs.input_number, before);
        assert_eq!(qs.original_input, "X");
        assert_eq!(qs.questions.len(), QUESTIONS_PER_INPUT);

        // Asking one of the derived questions is just another submission
        let question = qs.questions[0].clone();
        let pending = store.submit(&question).unwrap();
        assert_eq!(pending.user_text, question);
        assert_eq!(store.question_sets().len(), 2);
    }
}
