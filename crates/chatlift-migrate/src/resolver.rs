//! Identity resolution across the two platforms.
//!
//! Maps source users, agents, and channels to their destination
//! counterparts. Users resolve by contact attribute (email, then phone)
//! with lookup-then-create semantics; agents map by email, channels by
//! name. The four directory listings behind agent/channel mapping are
//! fetched at most once per run and cached here — agent and channel counts
//! are small and bounded while conversations are numerous, so resolution
//! stays O(1) after a fixed warm-up cost.
//!
//! A migration must not abort because one agent or channel cannot be
//! mapped: every failure path degrades to the configured fallback identity
//! and continues. Contact *creation* is the exception — without a
//! destination user id no conversation can be attached, so that failure
//! propagates.

use chatlift_core::Result;
use chatlift_core::config::DestinationConfig;
use chatlift_core::model::{
    ContactProperty, CreatedContact, DirectoryAgent, DirectoryChannel, NewContact, SourceUser,
};
use chatlift_core::ports::{DestinationPlatform, SourcePlatform};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Custom property carrying the source alias on created contacts.
const ALIAS_PROPERTY: &str = "cf_old_alias";

struct AgentDirectories {
    source: Vec<DirectoryAgent>,
    destination: Vec<DirectoryAgent>,
}

struct ChannelDirectories {
    source: Vec<DirectoryChannel>,
    destination: Vec<DirectoryChannel>,
}

/// Resolves source identities to destination identities.
///
/// Owns the directory caches exclusively; they are populated on first
/// access and never invalidated mid-run. A new run starts cold.
pub struct IdentityResolver {
    source: Arc<dyn SourcePlatform>,
    destination: Arc<dyn DestinationPlatform>,
    fallback_agent_id: String,
    default_channel_id: String,
    agents: OnceCell<AgentDirectories>,
    channels: OnceCell<ChannelDirectories>,
}

impl IdentityResolver {
    pub fn new(
        source: Arc<dyn SourcePlatform>,
        destination: Arc<dyn DestinationPlatform>,
        config: &DestinationConfig,
    ) -> Self {
        Self {
            source,
            destination,
            fallback_agent_id: config.fallback_agent_id.clone(),
            default_channel_id: config.default_channel_id.clone(),
            agents: OnceCell::new(),
            channels: OnceCell::new(),
        }
    }

    /// Looks up the destination contact for a source user.
    ///
    /// Queries by email if present, else by phone if present, else returns
    /// `None` without a network call. The first returned match wins. A
    /// request failure is logged and treated as no-match; it never raises
    /// past this boundary.
    pub async fn resolve_destination_user(&self, user: &SourceUser) -> Option<String> {
        let result = if let Some(email) = user.email.as_deref().filter(|e| !e.is_empty()) {
            self.destination.find_users_by_email(email).await
        } else if let Some(phone) = user.phone.as_deref().filter(|p| !p.is_empty()) {
            self.destination.find_users_by_phone(phone).await
        } else {
            debug!(
                "user {} has no email or phone, skipping destination lookup",
                user.user_alias
            );
            return None;
        };

        match result {
            Ok(matches) => match matches.first() {
                Some(found) => {
                    info!(
                        "destination match for source user {}: {}",
                        user.user_alias, found.id
                    );
                    Some(found.id.clone())
                }
                None => {
                    info!("no destination match for source user {}", user.user_alias);
                    None
                }
            },
            Err(e) => {
                warn!(
                    "destination lookup failed for source user {}: {}",
                    user.user_alias, e
                );
                None
            }
        }
    }

    /// Creates a destination contact for a source user.
    ///
    /// Phone values of textual length four or less are placeholders and are
    /// not forwarded. Propagates failure: without a destination user id no
    /// conversation can be attached.
    pub async fn create_destination_user(&self, user: &SourceUser) -> Result<CreatedContact> {
        let contact = NewContact {
            first_name: user.user_name.clone().filter(|n| !n.is_empty()),
            email: user.email.clone().filter(|e| !e.is_empty()),
            phone: user.phone.clone().filter(|p| p.len() > 4),
            properties: vec![ContactProperty {
                name: ALIAS_PROPERTY.to_string(),
                value: user.user_alias.clone(),
            }],
        };
        self.destination.create_user(&contact).await
    }

    /// Maps a source agent id to a destination agent id.
    ///
    /// Warms both agent directories on first call. Falls back to the
    /// configured fixed agent id whenever the id is absent, the source
    /// agent is unknown, no destination agent shares its email, or a
    /// directory fetch failed. Never raises.
    pub async fn resolve_agent(&self, source_agent_id: Option<&str>) -> String {
        let Some(agent_id) = source_agent_id.filter(|id| !id.is_empty()) else {
            return self.fallback_agent_id.clone();
        };
        let directories = self.agent_directories().await;

        let Some(source_agent) = directories.source.iter().find(|a| a.id == agent_id) else {
            debug!("source agent {} not in directory, using fallback", agent_id);
            return self.fallback_agent_id.clone();
        };
        let matched = source_agent.email.as_deref().and_then(|email| {
            directories
                .destination
                .iter()
                .find(|a| a.email.as_deref() == Some(email))
        });
        match matched {
            Some(agent) => agent.id.clone(),
            None => {
                debug!(
                    "no destination agent shares an email with source agent {}, using fallback",
                    agent_id
                );
                self.fallback_agent_id.clone()
            }
        }
    }

    /// Maps a source channel id to a destination channel id.
    ///
    /// Channel ids are not stable across platforms, so mapping goes by
    /// name: the source channel's name is looked up, then matched against
    /// destination channel names. Falls back to the configured default
    /// channel id under the same conditions as agents. Never raises.
    pub async fn resolve_channel(&self, source_channel_id: Option<&str>) -> String {
        let Some(channel_id) = source_channel_id.filter(|id| !id.is_empty()) else {
            return self.default_channel_id.clone();
        };
        let directories = self.channel_directories().await;

        let Some(name) = directories
            .source
            .iter()
            .find(|c| c.id == channel_id)
            .and_then(|c| c.name.as_deref())
        else {
            debug!("source channel {} not in directory, using default", channel_id);
            return self.default_channel_id.clone();
        };
        directories
            .destination
            .iter()
            .find(|c| c.name.as_deref() == Some(name))
            .map(|c| c.id.clone())
            .unwrap_or_else(|| self.default_channel_id.clone())
    }

    async fn agent_directories(&self) -> &AgentDirectories {
        self.agents
            .get_or_init(|| async {
                let source = match self.source.list_agents().await {
                    Ok(agents) => agents,
                    Err(e) => {
                        warn!("failed to fetch source agent directory: {}", e);
                        Vec::new()
                    }
                };
                let destination = match self.destination.list_agents().await {
                    Ok(agents) => agents,
                    Err(e) => {
                        warn!("failed to fetch destination agent directory: {}", e);
                        Vec::new()
                    }
                };
                AgentDirectories {
                    source,
                    destination,
                }
            })
            .await
    }

    async fn channel_directories(&self) -> &ChannelDirectories {
        self.channels
            .get_or_init(|| async {
                let source = match self.source.list_channels().await {
                    Ok(channels) => channels,
                    Err(e) => {
                        warn!("failed to fetch source channel directory: {}", e);
                        Vec::new()
                    }
                };
                let destination = match self.destination.list_channels().await {
                    Ok(channels) => channels,
                    Err(e) => {
                        warn!("failed to fetch destination channel directory: {}", e);
                        Vec::new()
                    }
                };
                ChannelDirectories {
                    source,
                    destination,
                }
            })
            .await
    }
}
