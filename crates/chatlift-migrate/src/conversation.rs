//! Per-conversation migration.
//!
//! Fetches a conversation's messages across every page, restores
//! chronological order, filters administrative entries, rewrites the rest
//! into the destination schema, and creates the destination conversation.

use crate::pacer::Pacer;
use crate::resolver::IdentityResolver;
use chatlift_core::config::DestinationConfig;
use chatlift_core::model::{
    Conversation, ConversationUser, Message, NewConversation, OutboundMessage,
};
use chatlift_core::ports::{DestinationPlatform, SourcePlatform};
use chatlift_core::transform::{TransformContext, transform_message};
use chrono::{DateTime, FixedOffset};
use std::sync::Arc;
use tracing::{info, warn};

/// Status for newly created destination conversations.
const NEW_STATUS: &str = "new";
/// Status applied immediately after creation; migrated history is closed.
const RESOLVED_STATUS: &str = "resolved";

/// Migrates one source conversation into the destination platform.
pub struct ConversationMigrator {
    source: Arc<dyn SourcePlatform>,
    destination: Arc<dyn DestinationPlatform>,
    resolver: Arc<IdentityResolver>,
    fixed_actor_id: String,
    fixed_actor_type: String,
    pacer: Pacer,
}

impl ConversationMigrator {
    pub fn new(
        source: Arc<dyn SourcePlatform>,
        destination: Arc<dyn DestinationPlatform>,
        resolver: Arc<IdentityResolver>,
        config: &DestinationConfig,
        pacer: Pacer,
    ) -> Self {
        Self {
            source,
            destination,
            resolver,
            fixed_actor_id: config.fixed_actor_id.clone(),
            fixed_actor_type: config.fixed_actor_type.clone(),
            pacer,
        }
    }

    /// Migrates one conversation and returns the destination conversation
    /// id, or `None` when the conversation was skipped or failed.
    ///
    /// The inter-request delay applies on every exit path, successful or
    /// not. A failure here never aborts the remaining conversations.
    pub async fn migrate(
        &self,
        conversation: &Conversation,
        source_user_id: &str,
        destination_user_id: &str,
        agent_id: &str,
    ) -> Option<String> {
        let outcome = self
            .migrate_inner(conversation, source_user_id, destination_user_id, agent_id)
            .await;
        self.pacer.pause().await;
        outcome
    }

    async fn migrate_inner(
        &self,
        conversation: &Conversation,
        source_user_id: &str,
        destination_user_id: &str,
        agent_id: &str,
    ) -> Option<String> {
        let conversation_id = &conversation.conversation_id;

        // Fail-soft: a failed page leaves the whole conversation empty
        // rather than partially migrated.
        let mut messages = match self.source.fetch_messages(conversation_id).await {
            Ok(messages) => messages,
            Err(e) => {
                warn!(
                    "failed to fetch messages for conversation {} (source user {}): {}",
                    conversation_id, source_user_id, e
                );
                Vec::new()
            }
        };

        if messages.is_empty() {
            info!("conversation {} has no messages, skipping", conversation_id);
            return None;
        }

        // The destination renders by insertion order, not server-assigned
        // metadata; sort explicitly instead of trusting API ordering.
        // Stable: equal or unparseable timestamps keep source order.
        messages.sort_by_key(creation_instant);

        let channel_id = self
            .resolver
            .resolve_channel(conversation.channel_id.as_deref())
            .await;

        let ctx = TransformContext {
            source_user_id,
            destination_user_id,
            channel_id: &channel_id,
            fixed_actor_id: &self.fixed_actor_id,
            fixed_actor_type: &self.fixed_actor_type,
        };
        let transformed: Vec<OutboundMessage> = messages
            .iter()
            .filter(|m| !m.is_system())
            .map(|m| transform_message(m, &ctx))
            .collect();

        let payload = NewConversation {
            status: NEW_STATUS.to_string(),
            messages: transformed,
            created_time: conversation.created_time.clone(),
            users: vec![ConversationUser {
                id: destination_user_id.to_string(),
            }],
            channel_id,
            agent_id: agent_id.to_string(),
        };

        match self.destination.create_conversation(&payload).await {
            Ok(destination_id) => {
                info!(
                    "created destination conversation {} for source conversation {}",
                    destination_id, conversation_id
                );
                // Best-effort: the conversation exists either way.
                if let Err(e) = self
                    .destination
                    .update_conversation_status(&destination_id, RESOLVED_STATUS)
                    .await
                {
                    warn!(
                        "failed to mark destination conversation {} resolved: {}",
                        destination_id, e
                    );
                }
                Some(destination_id)
            }
            Err(e) => {
                warn!(
                    "failed to create destination conversation for source conversation {} (source user {}): {}",
                    conversation_id, source_user_id, e
                );
                None
            }
        }
    }
}

/// Sort key for the chronological sort. Missing or unparseable timestamps
/// order before parseable ones.
fn creation_instant(message: &Message) -> Option<DateTime<FixedOffset>> {
    message
        .created_time
        .as_deref()
        .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
}
