use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::message::Message;

/// Stable arena key for a conversation node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub Uuid);

impl ConversationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One node in the conversation forest. Nodes are stored in an arena keyed by
/// id; `parent`/`children` hold ids rather than owned subtrees so a
/// single-node mutation never rebuilds the tree.
#[derive(Debug, Clone)]
pub struct ConversationNode {
    pub id: ConversationId,
    pub name: String,
    pub parent: Option<ConversationId>,
    /// Insertion order is significant
    pub children: Vec<ConversationId>,
}

impl ConversationNode {
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            id: ConversationId::new(),
            name: name.into(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn child_of(parent: ConversationId, name: impl Into<String>) -> Self {
        Self {
            id: ConversationId::new(),
            name: name.into(),
            parent: Some(parent),
            children: Vec::new(),
        }
    }
}

/// The message/agent-log bundle for one conversation node.
///
/// Every accepted submission writes into three separate logs. The
/// duplication mirrors the UI contract: the chat pane, the agent pane and
/// the agent-response ticker each own an independent append-only log.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    pub messages: Vec<Message>,
    pub agent_messages: Vec<Message>,
    pub agent_responses: Vec<String>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.agent_messages.is_empty() && self.agent_responses.is_empty()
    }
}
