//! Destination platform client.
//!
//! Contact search and creation, the agent/channel directories, conversation
//! creation, and conversation status updates.

use crate::http::ApiClient;
use crate::source::{ChannelsResponse, fetch_all_agents};
use async_trait::async_trait;
use chatlift_core::config::DestinationConfig;
use chatlift_core::model::{
    CreatedContact, DirectoryAgent, DirectoryChannel, FoundUser, NewContact, NewConversation,
};
use chatlift_core::ports::DestinationPlatform;
use chatlift_core::{ChatliftError, Result};
use reqwest::StatusCode;
use serde::Deserialize;

/// Client for the platform conversations are migrated to.
#[derive(Clone)]
pub struct DestinationClient {
    http: ApiClient,
}

#[derive(Debug, Deserialize)]
struct UserSearchResponse {
    #[serde(default)]
    users: Vec<FoundUser>,
}

#[derive(Debug, Deserialize)]
struct ConversationCreated {
    conversation_id: Option<String>,
}

impl DestinationClient {
    pub fn new(config: &DestinationConfig) -> Self {
        Self {
            http: ApiClient::new(&config.base_url, &config.api_token),
        }
    }

    async fn search_users(&self, query: &[(&str, &str)]) -> Result<Vec<FoundUser>> {
        let response: UserSearchResponse = self
            .http
            .get_json_query("/v2/users", query, "search users")
            .await?;
        Ok(response.users)
    }
}

#[async_trait]
impl DestinationPlatform for DestinationClient {
    async fn find_users_by_email(&self, email: &str) -> Result<Vec<FoundUser>> {
        self.search_users(&[("email", email)]).await
    }

    async fn find_users_by_phone(&self, phone: &str) -> Result<Vec<FoundUser>> {
        self.search_users(&[("phone", phone)]).await
    }

    async fn create_user(&self, contact: &NewContact) -> Result<CreatedContact> {
        self.http
            .post_json("/v2/users", contact, "create contact")
            .await
    }

    async fn list_agents(&self) -> Result<Vec<DirectoryAgent>> {
        fetch_all_agents(&self.http, "list destination agents").await
    }

    async fn list_channels(&self) -> Result<Vec<DirectoryChannel>> {
        let response: ChannelsResponse = self
            .http
            .get_json("/v2/channels", "list destination channels")
            .await?;
        Ok(response.channels)
    }

    async fn create_conversation(&self, conversation: &NewConversation) -> Result<String> {
        let response = self
            .http
            .post_raw("/v2/conversations", conversation, "create conversation")
            .await?;
        let status = response.status();

        // The platform acknowledges creations with 200 or 202; anything else
        // counts as a failed migration for this conversation.
        if status != StatusCode::OK && status != StatusCode::ACCEPTED {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(ChatliftError::api(status.as_u16(), body));
        }

        let created: ConversationCreated =
            ApiClient::decode(response, "create conversation").await?;
        match created.conversation_id {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(ChatliftError::api(
                status.as_u16(),
                "creation response carried no conversation id",
            )),
        }
    }

    async fn update_conversation_status(
        &self,
        conversation_id: &str,
        status: &str,
    ) -> Result<()> {
        self.http
            .put_unit(
                &format!("/v2/conversations/{}", conversation_id),
                &serde_json::json!({ "status": status }),
                "update conversation status",
            )
            .await
    }
}
