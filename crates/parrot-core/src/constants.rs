//! Application-wide constants
//!
//! Centralized location for magic strings and configuration values
//! that are used across multiple modules.

/// Default simulated reply latency in milliseconds
pub const DEFAULT_REPLY_DELAY_MS: u64 = 600;

/// Number of follow-up questions derived per accepted submission
pub const QUESTIONS_PER_INPUT: usize = 3;

/// Maximum number of input characters embedded in the agent summary
pub const SUMMARY_SNIPPET_CHARS: usize = 40;

/// Prefix for the agent interpretation line
pub const AGENT_SUMMARY_PREFIX: &str = "Agent interpretation:";

// Conversation defaults
pub const DEFAULT_CONVERSATION_NAME: &str = "New chat";
pub const DEFAULT_NOTE_TITLE: &str = "Untitled note";

/// Display names given to freshly created sub-chats, cycled by creation count
pub const SUB_CHAT_NAMES: [&str; 8] = [
    "Tangent", "Aside", "Branch", "Detour", "Thread", "Offshoot", "Fork", "Sidebar",
];

/// Question templates - `{}` is replaced with a snippet of the user input.
/// Must contain exactly QUESTIONS_PER_INPUT entries.
pub const QUESTION_TEMPLATES: [&str; QUESTIONS_PER_INPUT] = [
    "Can you say more about \"{}\"?",
    "What outcome do you expect from \"{}\"?",
    "Is there context around \"{}\" I should know?",
];
