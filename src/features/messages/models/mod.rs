pub mod conversation;

pub use conversation::{ChatMessage, Conversation, MessageDirection, PassengerContact};
