//! Destination-side wire payloads and per-run results.

use super::conversation::MessagePart;
use super::roster::SourceUser;
use serde::{Deserialize, Serialize};

/// A message rewritten into the destination's schema.
///
/// `actor_id` and `actor_type` always carry a value (real, substituted, or
/// defaulted); every other field is emitted only when the source message
/// carried it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_parts: Option<Vec<MessagePart>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_type: Option<String>,
    pub actor_id: String,
    pub actor_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
}

/// Payload for creating a destination conversation.
#[derive(Debug, Clone, Serialize)]
pub struct NewConversation {
    pub status: String,
    pub messages: Vec<OutboundMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
    pub users: Vec<ConversationUser>,
    pub channel_id: String,
    pub agent_id: String,
}

/// Participant reference inside a conversation-creation payload.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationUser {
    pub id: String,
}

/// Payload for creating a destination contact.
#[derive(Debug, Clone, Serialize)]
pub struct NewContact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub properties: Vec<ContactProperty>,
}

/// A custom property attached to a created contact.
#[derive(Debug, Clone, Serialize)]
pub struct ContactProperty {
    pub name: String,
    pub value: String,
}

/// A contact returned by the destination's creation endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedContact {
    pub id: String,
    pub first_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// A contact returned by the destination's user search.
#[derive(Debug, Clone, Deserialize)]
pub struct FoundUser {
    #[serde(default)]
    pub id: String,
}

/// The outcome of migrating one source user.
///
/// `conversation_ids` grows by one entry per successfully migrated
/// conversation and is final once the user's conversation loop ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationResult {
    pub source_user_id: String,
    pub destination_user_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub conversation_ids: Vec<String>,
}

impl MigrationResult {
    /// Starts an empty result row for one source user.
    pub fn new(user: &SourceUser, destination_user_id: impl Into<String>) -> Self {
        Self {
            source_user_id: user.user_alias.clone(),
            destination_user_id: destination_user_id.into(),
            name: user.display_name().to_string(),
            email: user.email.clone().unwrap_or_default(),
            phone: user.phone.clone().unwrap_or_default(),
            conversation_ids: Vec::new(),
        }
    }
}
