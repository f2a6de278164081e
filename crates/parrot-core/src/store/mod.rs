pub mod conversation_store;
pub mod notes_store;

pub use conversation_store::ConversationStore;
pub use notes_store::NotesStore;
