//! Domain model for the migration pipeline.

pub mod conversation;
pub mod directory;
pub mod outbound;
pub mod roster;

pub use conversation::{Conversation, ConversationRef, Message, MessagePart, SYSTEM_MESSAGE_TYPE};
pub use directory::{DirectoryAgent, DirectoryChannel};
pub use outbound::{
    ContactProperty, ConversationUser, CreatedContact, FoundUser, MigrationResult, NewContact,
    NewConversation, OutboundMessage,
};
pub use roster::SourceUser;
