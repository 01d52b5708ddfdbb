//! Source platform client.
//!
//! Read-only: conversation listings, conversation fetches, paginated
//! message pages, and the agent/channel directories.

use crate::http::ApiClient;
use async_trait::async_trait;
use chatlift_core::Result;
use chatlift_core::config::SourceConfig;
use chatlift_core::model::{
    Conversation, ConversationRef, DirectoryAgent, DirectoryChannel, Message,
};
use chatlift_core::ports::SourcePlatform;
use serde::Deserialize;
use tracing::debug;

const MESSAGES_PAGE_SIZE: usize = 50;
const AGENTS_PAGE_SIZE: usize = 100;

/// Client for the platform conversations are migrated from.
#[derive(Clone)]
pub struct SourceClient {
    http: ApiClient,
}

#[derive(Debug, Deserialize)]
struct ConversationListResponse {
    #[serde(default)]
    conversations: Vec<ConversationRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PageLink {
    pub(crate) href: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessagesPage {
    #[serde(default)]
    messages: Vec<Message>,
    link: Option<PageLink>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AgentsPage {
    #[serde(default)]
    pub(crate) agents: Vec<DirectoryAgent>,
    pub(crate) link: Option<AgentsPageLink>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AgentsPageLink {
    pub(crate) next_page: Option<PageLink>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChannelsResponse {
    #[serde(default)]
    pub(crate) channels: Vec<DirectoryChannel>,
}

impl SourceClient {
    pub fn new(config: &SourceConfig) -> Self {
        Self {
            http: ApiClient::new(&config.base_url, &config.api_token),
        }
    }
}

/// Follows `link.next_page.href` until no page remains, accumulating agents.
/// Shared by both platform clients; the two directories use the same paging
/// shape.
pub(crate) async fn fetch_all_agents(http: &ApiClient, context: &str) -> Result<Vec<DirectoryAgent>> {
    let mut agents = Vec::new();
    let mut next = Some(format!("/v2/agents?items_per_page={}", AGENTS_PAGE_SIZE));
    while let Some(path) = next {
        let page: AgentsPage = http.get_json(&path, context).await?;
        agents.extend(page.agents);
        next = page.link.and_then(|l| l.next_page).and_then(|p| p.href);
    }
    debug!("{}: fetched {} agent(s)", context, agents.len());
    Ok(agents)
}

#[async_trait]
impl SourcePlatform for SourceClient {
    async fn list_conversation_refs(
        &self,
        source_user_id: &str,
    ) -> Result<Vec<ConversationRef>> {
        let response: ConversationListResponse = self
            .http
            .get_json(
                &format!("/v2/users/{}/conversations", source_user_id),
                "list conversations",
            )
            .await?;
        Ok(response.conversations)
    }

    async fn fetch_conversation(&self, conversation_id: &str) -> Result<Conversation> {
        self.http
            .get_json(
                &format!("/v2/conversations/{}", conversation_id),
                "fetch conversation",
            )
            .await
    }

    async fn fetch_messages(&self, conversation_id: &str) -> Result<Vec<Message>> {
        let mut messages = Vec::new();
        let mut next = Some(format!(
            "/v2/conversations/{}/messages?items_per_page={}",
            conversation_id, MESSAGES_PAGE_SIZE
        ));
        while let Some(path) = next {
            let page: MessagesPage = self.http.get_json(&path, "fetch messages").await?;
            messages.extend(page.messages);
            next = page.link.and_then(|l| l.href);
        }
        debug!(
            "fetched {} message(s) for conversation {}",
            messages.len(),
            conversation_id
        );
        Ok(messages)
    }

    async fn list_agents(&self) -> Result<Vec<DirectoryAgent>> {
        fetch_all_agents(&self.http, "list source agents").await
    }

    async fn list_channels(&self) -> Result<Vec<DirectoryChannel>> {
        let response: ChannelsResponse = self
            .http
            .get_json("/v2/channels", "list source channels")
            .await?;
        Ok(response.channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_page_link_extraction() {
        let page: MessagesPage = serde_json::from_str(
            r#"{
                "messages": [{"actor_id": "a", "created_time": "2023-01-01T00:00:00Z"}],
                "link": {"href": "/v2/conversations/c1/messages?page=2"}
            }"#,
        )
        .unwrap();
        assert_eq!(page.messages.len(), 1);
        assert_eq!(
            page.link.and_then(|l| l.href).as_deref(),
            Some("/v2/conversations/c1/messages?page=2")
        );
    }

    #[test]
    fn test_messages_page_without_link_ends_pagination() {
        let page: MessagesPage = serde_json::from_str(r#"{"messages": []}"#).unwrap();
        assert!(page.messages.is_empty());
        assert!(page.link.is_none());
    }

    #[test]
    fn test_agents_page_next_link_extraction() {
        let page: AgentsPage = serde_json::from_str(
            r#"{
                "agents": [{"id": "ag1", "email": "a@x.com"}],
                "link": {"next_page": {"href": "/v2/agents?page=2"}}
            }"#,
        )
        .unwrap();
        let next = page.link.and_then(|l| l.next_page).and_then(|p| p.href);
        assert_eq!(next.as_deref(), Some("/v2/agents?page=2"));
    }

    #[test]
    fn test_agents_last_page_has_no_next_link() {
        let page: AgentsPage =
            serde_json::from_str(r#"{"agents": [], "link": {"next_page": null}}"#).unwrap();
        assert!(page.link.and_then(|l| l.next_page).is_none());
    }

    #[test]
    fn test_conversation_list_defaults_to_empty() {
        let response: ConversationListResponse = serde_json::from_str("{}").unwrap();
        assert!(response.conversations.is_empty());
    }
}
