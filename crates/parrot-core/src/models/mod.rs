pub mod conversation;
pub mod message;
pub mod note;
pub mod question;
pub mod rich_text;

pub use conversation::{ChatSession, ConversationId, ConversationNode};
pub use message::{Message, Role};
pub use note::{NoteAlignment, NoteColor, NoteKind, NoteSize, StoredNote};
pub use question::QuestionSet;
pub use rich_text::{RichText, RunStyle, StyledRun};
