//! Platform port traits.
//!
//! These traits decouple the migration orchestration from the HTTP clients,
//! so the orchestration can be exercised against in-memory fakes.

use crate::error::Result;
use crate::model::{
    Conversation, ConversationRef, CreatedContact, DirectoryAgent, DirectoryChannel, FoundUser,
    Message, NewContact, NewConversation,
};
use async_trait::async_trait;

/// Read-only access to the platform conversations are migrated from.
///
/// # Implementation Notes
///
/// `fetch_messages` and `list_agents` are paginated on the wire; an
/// implementation must follow the next-page links and return the complete
/// accumulated listing, not a single page.
#[async_trait]
pub trait SourcePlatform: Send + Sync {
    /// Lists the conversation references of one source user.
    ///
    /// # Arguments
    ///
    /// * `source_user_id` - The source platform's stable user identifier
    async fn list_conversation_refs(
        &self,
        source_user_id: &str,
    ) -> Result<Vec<ConversationRef>>;

    /// Fetches a single conversation by id.
    async fn fetch_conversation(&self, conversation_id: &str) -> Result<Conversation>;

    /// Fetches all messages of a conversation, across every page, in the
    /// order the platform returned them.
    async fn fetch_messages(&self, conversation_id: &str) -> Result<Vec<Message>>;

    /// Lists the complete agent directory, across every page.
    async fn list_agents(&self) -> Result<Vec<DirectoryAgent>>;

    /// Lists the channel directory (single page).
    async fn list_channels(&self) -> Result<Vec<DirectoryChannel>>;
}

/// Read/write access to the platform conversations are migrated to.
#[async_trait]
pub trait DestinationPlatform: Send + Sync {
    /// Searches contacts by email.
    ///
    /// # Returns
    ///
    /// All matches, in platform order. Callers take the first.
    async fn find_users_by_email(&self, email: &str) -> Result<Vec<FoundUser>>;

    /// Searches contacts by phone number.
    async fn find_users_by_phone(&self, phone: &str) -> Result<Vec<FoundUser>>;

    /// Creates a new contact.
    async fn create_user(&self, contact: &NewContact) -> Result<CreatedContact>;

    /// Lists the complete agent directory, across every page.
    async fn list_agents(&self) -> Result<Vec<DirectoryAgent>>;

    /// Lists the channel directory (single page).
    async fn list_channels(&self) -> Result<Vec<DirectoryChannel>>;

    /// Creates a conversation and returns its destination id.
    ///
    /// # Returns
    ///
    /// - `Ok(id)`: the platform accepted the conversation (HTTP 200/202)
    /// - `Err(_)`: any other status or a transport failure
    async fn create_conversation(&self, conversation: &NewConversation) -> Result<String>;

    /// Updates a conversation's status (e.g. to `"resolved"`).
    async fn update_conversation_status(
        &self,
        conversation_id: &str,
        status: &str,
    ) -> Result<()>;
}
