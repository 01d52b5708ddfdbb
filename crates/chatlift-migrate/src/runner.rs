//! Whole-run orchestration.
//!
//! Iterates the source roster sequentially, resolves or creates each
//! destination contact, drives the conversation migrator for each of the
//! user's conversations, and accumulates one result row per user. Each
//! conversation is awaited before the next starts, so its id is folded
//! into the row before the row can be returned or persisted.

use crate::conversation::ConversationMigrator;
use crate::pacer::Pacer;
use crate::resolver::IdentityResolver;
use chatlift_core::Result;
use chatlift_core::model::{MigrationResult, SourceUser};
use chatlift_core::ports::SourcePlatform;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Drives a complete migration run over a roster of source users.
pub struct MigrationRunner {
    source: Arc<dyn SourcePlatform>,
    resolver: Arc<IdentityResolver>,
    migrator: ConversationMigrator,
    pacer: Pacer,
}

impl MigrationRunner {
    pub fn new(
        source: Arc<dyn SourcePlatform>,
        resolver: Arc<IdentityResolver>,
        migrator: ConversationMigrator,
        pacer: Pacer,
    ) -> Self {
        Self {
            source,
            resolver,
            migrator,
            pacer,
        }
    }

    /// Migrates every roster user in order and returns the accumulated
    /// result rows.
    ///
    /// A failed user is logged and skipped; the run continues with the
    /// next user and the returned rows cover whatever subset succeeded.
    pub async fn run(&self, roster: &[SourceUser]) -> Vec<MigrationResult> {
        let mut results = Vec::new();
        for user in roster {
            match self.run_for_user(user).await {
                Ok(row) => results.push(row),
                Err(e) => {
                    error!("migration failed for source user {}: {}", user.user_alias, e);
                }
            }
            self.pacer.pause().await;
        }
        results
    }

    /// Migrates one source user: resolve-or-create the destination
    /// contact, then migrate each conversation sequentially.
    ///
    /// The returned row reflects whatever subset of conversations
    /// succeeded. Only contact creation failure is an error; everything
    /// downstream degrades and continues.
    pub async fn run_for_user(&self, user: &SourceUser) -> Result<MigrationResult> {
        info!(
            "processing source user {} (email: {:?}, phone: {:?})",
            user.user_alias, user.email, user.phone
        );

        let destination_user_id = match self.resolver.resolve_destination_user(user).await {
            Some(id) => id,
            None => {
                let created = self.resolver.create_destination_user(user).await?;
                info!(
                    "created destination contact {} for source user {}",
                    created.id, user.user_alias
                );
                created.id
            }
        };

        let mut row = MigrationResult::new(user, destination_user_id);

        let refs = match self.source.list_conversation_refs(&user.user_alias).await {
            Ok(refs) => refs,
            Err(e) => {
                warn!(
                    "failed to list conversations for source user {}: {}",
                    user.user_alias, e
                );
                return Ok(row);
            }
        };
        info!(
            "found {} conversation(s) for source user {}",
            refs.len(),
            user.user_alias
        );

        for conversation_ref in &refs {
            let conversation = match self.source.fetch_conversation(&conversation_ref.id).await {
                Ok(conversation) => conversation,
                Err(e) => {
                    warn!(
                        "failed to fetch conversation {} for source user {}: {}",
                        conversation_ref.id, user.user_alias, e
                    );
                    continue;
                }
            };
            if conversation.conversation_id.is_empty() {
                warn!(
                    "conversation {} came back without an id, skipping",
                    conversation_ref.id
                );
                continue;
            }

            let agent_id = self
                .resolver
                .resolve_agent(conversation.assigned_agent_id.as_deref())
                .await;

            if let Some(destination_conversation_id) = self
                .migrator
                .migrate(&conversation, &user.user_alias, &row.destination_user_id, &agent_id)
                .await
            {
                row.conversation_ids.push(destination_conversation_id);
            }
        }

        Ok(row)
    }
}
