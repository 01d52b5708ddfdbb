//! In-memory platform fakes for orchestration tests.

use async_trait::async_trait;
use chatlift_core::model::{
    Conversation, ConversationRef, CreatedContact, DirectoryAgent, DirectoryChannel, FoundUser,
    Message, NewContact, NewConversation,
};
use chatlift_core::ports::{DestinationPlatform, SourcePlatform};
use chatlift_core::{ChatliftError, Result};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
pub(crate) struct MockSource {
    pub(crate) conversation_refs: HashMap<String, Vec<ConversationRef>>,
    pub(crate) conversations: HashMap<String, Conversation>,
    pub(crate) messages: HashMap<String, Vec<Message>>,
    pub(crate) agents: Vec<DirectoryAgent>,
    pub(crate) channels: Vec<DirectoryChannel>,
    pub(crate) fail_messages: bool,
    pub(crate) fail_agents: bool,
    pub(crate) fail_channels: bool,
    pub(crate) fail_conversation_list: bool,
    pub(crate) agent_list_calls: AtomicUsize,
    pub(crate) channel_list_calls: AtomicUsize,
}

impl MockSource {
    pub(crate) fn add_agent(&mut self, id: &str, email: Option<&str>) {
        self.agents.push(DirectoryAgent {
            id: id.to_string(),
            email: email.map(String::from),
        });
    }

    pub(crate) fn add_channel(&mut self, id: &str, name: Option<&str>) {
        self.channels.push(DirectoryChannel {
            id: id.to_string(),
            name: name.map(String::from),
        });
    }

    /// Registers a conversation with its messages under a source user.
    pub(crate) fn add_conversation(
        &mut self,
        source_user_id: &str,
        conversation: Conversation,
        messages: Vec<Message>,
    ) {
        self.conversation_refs
            .entry(source_user_id.to_string())
            .or_default()
            .push(ConversationRef {
                id: conversation.conversation_id.clone(),
            });
        self.messages
            .insert(conversation.conversation_id.clone(), messages);
        self.conversations
            .insert(conversation.conversation_id.clone(), conversation);
    }
}

#[async_trait]
impl SourcePlatform for MockSource {
    async fn list_conversation_refs(
        &self,
        source_user_id: &str,
    ) -> Result<Vec<ConversationRef>> {
        if self.fail_conversation_list {
            return Err(ChatliftError::http("conversation list unavailable"));
        }
        Ok(self
            .conversation_refs
            .get(source_user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_conversation(&self, conversation_id: &str) -> Result<Conversation> {
        self.conversations
            .get(conversation_id)
            .cloned()
            .ok_or_else(|| ChatliftError::http(format!("unknown conversation {}", conversation_id)))
    }

    async fn fetch_messages(&self, conversation_id: &str) -> Result<Vec<Message>> {
        if self.fail_messages {
            return Err(ChatliftError::http("messages unavailable"));
        }
        Ok(self
            .messages
            .get(conversation_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_agents(&self) -> Result<Vec<DirectoryAgent>> {
        self.agent_list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_agents {
            return Err(ChatliftError::http("agent directory unavailable"));
        }
        Ok(self.agents.clone())
    }

    async fn list_channels(&self) -> Result<Vec<DirectoryChannel>> {
        self.channel_list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_channels {
            return Err(ChatliftError::http("channel directory unavailable"));
        }
        Ok(self.channels.clone())
    }
}

#[derive(Default)]
pub(crate) struct MockDestination {
    pub(crate) users_by_email: HashMap<String, Vec<FoundUser>>,
    pub(crate) users_by_phone: HashMap<String, Vec<FoundUser>>,
    pub(crate) agents: Vec<DirectoryAgent>,
    pub(crate) channels: Vec<DirectoryChannel>,
    pub(crate) fail_search: bool,
    pub(crate) fail_create_user: bool,
    pub(crate) fail_agents: bool,
    pub(crate) fail_channels: bool,
    pub(crate) fail_create_conversation: bool,
    pub(crate) fail_status_update: bool,
    pub(crate) created_contacts: Mutex<Vec<NewContact>>,
    pub(crate) created_conversations: Mutex<Vec<NewConversation>>,
    pub(crate) status_updates: Mutex<Vec<(String, String)>>,
    pub(crate) search_calls: AtomicUsize,
    pub(crate) agent_list_calls: AtomicUsize,
    pub(crate) conversation_counter: AtomicUsize,
}

impl MockDestination {
    pub(crate) fn add_user_by_email(&mut self, email: &str, id: &str) {
        self.users_by_email
            .entry(email.to_string())
            .or_default()
            .push(FoundUser { id: id.to_string() });
    }

    pub(crate) fn add_user_by_phone(&mut self, phone: &str, id: &str) {
        self.users_by_phone
            .entry(phone.to_string())
            .or_default()
            .push(FoundUser { id: id.to_string() });
    }

    pub(crate) fn add_agent(&mut self, id: &str, email: Option<&str>) {
        self.agents.push(DirectoryAgent {
            id: id.to_string(),
            email: email.map(String::from),
        });
    }

    pub(crate) fn add_channel(&mut self, id: &str, name: Option<&str>) {
        self.channels.push(DirectoryChannel {
            id: id.to_string(),
            name: name.map(String::from),
        });
    }
}

#[async_trait]
impl DestinationPlatform for MockDestination {
    async fn find_users_by_email(&self, email: &str) -> Result<Vec<FoundUser>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_search {
            return Err(ChatliftError::api(500, "search failed"));
        }
        Ok(self.users_by_email.get(email).cloned().unwrap_or_default())
    }

    async fn find_users_by_phone(&self, phone: &str) -> Result<Vec<FoundUser>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_search {
            return Err(ChatliftError::api(500, "search failed"));
        }
        Ok(self.users_by_phone.get(phone).cloned().unwrap_or_default())
    }

    async fn create_user(&self, contact: &NewContact) -> Result<CreatedContact> {
        if self.fail_create_user {
            return Err(ChatliftError::api(422, "contact creation rejected"));
        }
        let mut created = self.created_contacts.lock().unwrap();
        created.push(contact.clone());
        Ok(CreatedContact {
            id: format!("contact-{}", created.len()),
            first_name: contact.first_name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
        })
    }

    async fn list_agents(&self) -> Result<Vec<DirectoryAgent>> {
        self.agent_list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_agents {
            return Err(ChatliftError::http("agent directory unavailable"));
        }
        Ok(self.agents.clone())
    }

    async fn list_channels(&self) -> Result<Vec<DirectoryChannel>> {
        if self.fail_channels {
            return Err(ChatliftError::http("channel directory unavailable"));
        }
        Ok(self.channels.clone())
    }

    async fn create_conversation(&self, conversation: &NewConversation) -> Result<String> {
        if self.fail_create_conversation {
            return Err(ChatliftError::api(500, "conversation creation failed"));
        }
        let id = format!(
            "dconv-{}",
            self.conversation_counter.fetch_add(1, Ordering::SeqCst) + 1
        );
        self.created_conversations
            .lock()
            .unwrap()
            .push(conversation.clone());
        Ok(id)
    }

    async fn update_conversation_status(
        &self,
        conversation_id: &str,
        status: &str,
    ) -> Result<()> {
        if self.fail_status_update {
            return Err(ChatliftError::api(500, "status update failed"));
        }
        self.status_updates
            .lock()
            .unwrap()
            .push((conversation_id.to_string(), status.to_string()));
        Ok(())
    }
}
