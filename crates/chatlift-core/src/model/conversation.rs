//! Source-side conversation and message types.
//!
//! These mirror the source platform's wire shapes. Values are immutable once
//! fetched; transformation produces new outbound values instead of mutating
//! these in place.

use serde::{Deserialize, Serialize};

/// Message type used by the source platform for administrative entries.
/// Such messages are filtered out and never migrated.
pub const SYSTEM_MESSAGE_TYPE: &str = "system";

/// One entry of a user's conversation listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRef {
    #[serde(default)]
    pub id: String,
}

/// A fully fetched source conversation (messages are fetched separately).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(default)]
    pub conversation_id: String,
    pub channel_id: Option<String>,
    pub assigned_agent_id: Option<String>,
    pub created_time: Option<String>,
}

/// A single source message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub actor_id: Option<String>,
    pub actor_type: Option<String>,
    pub message_type: Option<String>,
    pub channel_id: Option<String>,
    /// RFC 3339 creation timestamp; drives the chronological sort.
    pub created_time: Option<String>,
    pub message_parts: Option<Vec<MessagePart>>,
}

/// One part of a message payload.
///
/// At most one of the three payload fields is populated; payloads are kept
/// as opaque JSON because the destination accepts them verbatim. Parts that
/// carry none of the three (buttons, quick replies, ...) are unsupported and
/// dropped during transformation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessagePart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<serde_json::Value>,
}

impl Message {
    /// Whether this is a system/administrative message.
    pub fn is_system(&self) -> bool {
        self.message_type.as_deref() == Some(SYSTEM_MESSAGE_TYPE)
    }
}
