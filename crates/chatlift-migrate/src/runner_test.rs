//! End-to-end orchestration tests over in-memory platform fakes.

use crate::testing::{MockDestination, MockSource};
use crate::{ConversationMigrator, IdentityResolver, MigrationRunner, Pacer};
use chatlift_core::config::DestinationConfig;
use chatlift_core::model::{Conversation, Message, MessagePart, SourceUser};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

fn dest_config() -> DestinationConfig {
    DestinationConfig {
        base_url: "https://dest.example.com".to_string(),
        api_token: "token".to_string(),
        fallback_agent_id: "fallback-agent".to_string(),
        default_channel_id: "default-channel".to_string(),
        fixed_actor_id: "fixed-actor".to_string(),
        fixed_actor_type: "agent".to_string(),
    }
}

fn pipeline(
    source: MockSource,
    destination: MockDestination,
) -> (MigrationRunner, Arc<MockSource>, Arc<MockDestination>) {
    let source = Arc::new(source);
    let destination = Arc::new(destination);
    let config = dest_config();
    let resolver = Arc::new(IdentityResolver::new(
        source.clone(),
        destination.clone(),
        &config,
    ));
    let migrator = ConversationMigrator::new(
        source.clone(),
        destination.clone(),
        resolver.clone(),
        &config,
        Pacer::new(Duration::ZERO),
    );
    let runner = MigrationRunner::new(
        source.clone(),
        resolver,
        migrator,
        Pacer::new(Duration::ZERO),
    );
    (runner, source, destination)
}

fn user(alias: &str, email: Option<&str>) -> SourceUser {
    SourceUser {
        user_alias: alias.to_string(),
        user_name: Some("Ada".to_string()),
        email: email.map(String::from),
        phone: None,
    }
}

fn conversation(id: &str) -> Conversation {
    Conversation {
        conversation_id: id.to_string(),
        channel_id: Some("src-chan".to_string()),
        assigned_agent_id: Some("src-agent".to_string()),
        created_time: Some("2023-04-01T09:00:00Z".to_string()),
    }
}

fn message(actor: Option<&str>, time: &str, message_type: &str) -> Message {
    Message {
        actor_id: actor.map(String::from),
        actor_type: None,
        message_type: Some(message_type.to_string()),
        channel_id: Some("src-chan".to_string()),
        created_time: Some(time.to_string()),
        message_parts: Some(vec![MessagePart {
            text: Some(json!({"content": "hi"})),
            ..Default::default()
        }]),
    }
}

#[tokio::test]
async fn test_messages_sorted_chronologically_and_system_filtered() {
    let mut source = MockSource::default();
    source.add_channel("src-chan", Some("Support"));
    source.add_conversation(
        "u1",
        conversation("c1"),
        vec![
            message(Some("agent-1"), "2023-04-01T12:00:00Z", "normal"),
            message(Some("u1"), "2023-04-01T10:00:00Z", "normal"),
            message(None, "2023-04-01T11:00:00Z", "system"),
            message(Some("u1"), "2023-04-01T11:30:00Z", "normal"),
        ],
    );
    let mut destination = MockDestination::default();
    destination.add_user_by_email("a@x.com", "dest-1");
    destination.add_channel("dst-chan", Some("Support"));

    let (runner, _, destination) = pipeline(source, destination);
    let results = runner.run(&[user("u1", Some("a@x.com"))]).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].conversation_ids, vec!["dconv-1"]);

    let created = destination.created_conversations.lock().unwrap();
    let payload = &created[0];
    let times: Vec<&str> = payload
        .messages
        .iter()
        .map(|m| m.created_time.as_deref().unwrap())
        .collect();
    assert_eq!(
        times,
        vec![
            "2023-04-01T10:00:00Z",
            "2023-04-01T11:30:00Z",
            "2023-04-01T12:00:00Z",
        ]
    );
    // the system message is gone; the user's messages carry the destination
    // id, everyone else collapses to the fixed actor
    assert_eq!(payload.messages[0].actor_id, "dest-1");
    assert_eq!(payload.messages[1].actor_id, "dest-1");
    assert_eq!(payload.messages[2].actor_id, "fixed-actor");
}

#[tokio::test]
async fn test_empty_conversation_is_skipped() {
    let mut source = MockSource::default();
    source.add_conversation(
        "u1",
        conversation("c1"),
        vec![
            message(Some("u1"), "2023-04-01T10:00:00Z", "normal"),
            message(Some("u1"), "2023-04-01T10:01:00Z", "normal"),
            message(Some("u1"), "2023-04-01T10:02:00Z", "normal"),
        ],
    );
    source.add_conversation("u1", conversation("c2"), Vec::new());
    let mut destination = MockDestination::default();
    destination.add_user_by_email("a@x.com", "dest-1");

    let (runner, _, destination) = pipeline(source, destination);
    let results = runner.run(&[user("u1", Some("a@x.com"))]).await;

    assert_eq!(results[0].conversation_ids.len(), 1);
    assert_eq!(destination.created_conversations.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_lookup_then_create_uses_one_destination_id_throughout() {
    let mut source = MockSource::default();
    source.add_conversation(
        "u1",
        conversation("c1"),
        vec![message(Some("u1"), "2023-04-01T10:00:00Z", "normal")],
    );
    // no pre-existing destination user: lookup misses, creation runs
    let (runner, _, destination) = pipeline(source, MockDestination::default());
    let results = runner.run(&[user("u1", Some("a@x.com"))]).await;

    assert_eq!(destination.created_contacts.lock().unwrap().len(), 1);
    let row = &results[0];
    assert_eq!(row.destination_user_id, "contact-1");

    let created = destination.created_conversations.lock().unwrap();
    assert_eq!(created[0].users[0].id, "contact-1");
    assert_eq!(created[0].messages[0].actor_id, "contact-1");
}

#[tokio::test]
async fn test_existing_contact_skips_creation() {
    let mut source = MockSource::default();
    source.add_conversation(
        "u1",
        conversation("c1"),
        vec![message(Some("u1"), "2023-04-01T10:00:00Z", "normal")],
    );
    let mut destination = MockDestination::default();
    destination.add_user_by_email("a@x.com", "dest-1");

    let (runner, _, destination) = pipeline(source, destination);
    let results = runner.run(&[user("u1", Some("a@x.com"))]).await;

    assert!(destination.created_contacts.lock().unwrap().is_empty());
    assert_eq!(results[0].destination_user_id, "dest-1");
}

#[tokio::test]
async fn test_contact_creation_failure_skips_user_but_run_continues() {
    let mut source = MockSource::default();
    source.add_conversation(
        "u2",
        conversation("c1"),
        vec![message(Some("u2"), "2023-04-01T10:00:00Z", "normal")],
    );
    let mut destination = MockDestination::default();
    // u1 misses lookup and creation is rejected; u2 resolves by email
    destination.fail_create_user = true;
    destination.add_user_by_email("b@x.com", "dest-2");

    let (runner, _, _) = pipeline(source, destination);
    let results = runner
        .run(&[user("u1", Some("a@x.com")), user("u2", Some("b@x.com"))])
        .await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].source_user_id, "u2");
    assert_eq!(results[0].conversation_ids.len(), 1);
}

#[tokio::test]
async fn test_agent_directory_failure_falls_back_for_every_conversation() {
    let mut source = MockSource::default();
    source.add_agent("src-agent", Some("agent@x.com"));
    source.add_conversation(
        "u1",
        conversation("c1"),
        vec![message(Some("u1"), "2023-04-01T10:00:00Z", "normal")],
    );
    source.add_conversation(
        "u1",
        conversation("c2"),
        vec![message(Some("u1"), "2023-04-02T10:00:00Z", "normal")],
    );
    let mut destination = MockDestination::default();
    destination.add_user_by_email("a@x.com", "dest-1");
    destination.fail_agents = true;

    let (runner, _, destination) = pipeline(source, destination);
    let results = runner.run(&[user("u1", Some("a@x.com"))]).await;

    assert_eq!(results[0].conversation_ids.len(), 2);
    let created = destination.created_conversations.lock().unwrap();
    assert!(created.iter().all(|c| c.agent_id == "fallback-agent"));
    assert_eq!(destination.agent_list_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_resolved_channel_used_for_payload_and_messages() {
    let mut source = MockSource::default();
    source.add_channel("src-chan", Some("Support"));
    source.add_conversation(
        "u1",
        conversation("c1"),
        vec![message(Some("u1"), "2023-04-01T10:00:00Z", "normal")],
    );
    let mut destination = MockDestination::default();
    destination.add_user_by_email("a@x.com", "dest-1");
    destination.add_channel("dst-chan", Some("Support"));

    let (runner, source, destination) = pipeline(source, destination);
    runner.run(&[user("u1", Some("a@x.com"))]).await;

    let created = destination.created_conversations.lock().unwrap();
    assert_eq!(created[0].channel_id, "dst-chan");
    assert_eq!(created[0].messages[0].channel_id.as_deref(), Some("dst-chan"));
    assert_eq!(source.channel_list_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_created_conversation_is_marked_resolved() {
    let mut source = MockSource::default();
    source.add_conversation(
        "u1",
        conversation("c1"),
        vec![message(Some("u1"), "2023-04-01T10:00:00Z", "normal")],
    );
    let mut destination = MockDestination::default();
    destination.add_user_by_email("a@x.com", "dest-1");

    let (runner, _, destination) = pipeline(source, destination);
    runner.run(&[user("u1", Some("a@x.com"))]).await;

    let updates = destination.status_updates.lock().unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0], ("dconv-1".to_string(), "resolved".to_string()));
}

#[tokio::test]
async fn test_status_update_failure_keeps_the_conversation_id() {
    let mut source = MockSource::default();
    source.add_conversation(
        "u1",
        conversation("c1"),
        vec![message(Some("u1"), "2023-04-01T10:00:00Z", "normal")],
    );
    let mut destination = MockDestination::default();
    destination.add_user_by_email("a@x.com", "dest-1");
    destination.fail_status_update = true;

    let (runner, _, _) = pipeline(source, destination);
    let results = runner.run(&[user("u1", Some("a@x.com"))]).await;

    assert_eq!(results[0].conversation_ids, vec!["dconv-1"]);
}

#[tokio::test]
async fn test_message_fetch_failure_skips_conversation_without_aborting() {
    let mut source = MockSource::default();
    source.add_conversation(
        "u1",
        conversation("c1"),
        vec![message(Some("u1"), "2023-04-01T10:00:00Z", "normal")],
    );
    source.fail_messages = true;
    let mut destination = MockDestination::default();
    destination.add_user_by_email("a@x.com", "dest-1");

    let (runner, _, destination) = pipeline(source, destination);
    let results = runner.run(&[user("u1", Some("a@x.com"))]).await;

    assert_eq!(results.len(), 1);
    assert!(results[0].conversation_ids.is_empty());
    assert!(destination.created_conversations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_conversation_creation_failure_yields_no_id() {
    let mut source = MockSource::default();
    source.add_conversation(
        "u1",
        conversation("c1"),
        vec![message(Some("u1"), "2023-04-01T10:00:00Z", "normal")],
    );
    let mut destination = MockDestination::default();
    destination.add_user_by_email("a@x.com", "dest-1");
    destination.fail_create_conversation = true;

    let (runner, _, destination) = pipeline(source, destination);
    let results = runner.run(&[user("u1", Some("a@x.com"))]).await;

    assert!(results[0].conversation_ids.is_empty());
    assert!(destination.status_updates.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unfetchable_conversation_ref_is_skipped() {
    let mut source = MockSource::default();
    // a ref whose conversation object cannot be fetched
    source
        .conversation_refs
        .entry("u1".to_string())
        .or_default()
        .push(chatlift_core::model::ConversationRef {
            id: "ghost".to_string(),
        });
    source.add_conversation(
        "u1",
        conversation("c1"),
        vec![message(Some("u1"), "2023-04-01T10:00:00Z", "normal")],
    );
    let mut destination = MockDestination::default();
    destination.add_user_by_email("a@x.com", "dest-1");

    let (runner, _, _) = pipeline(source, destination);
    let results = runner.run(&[user("u1", Some("a@x.com"))]).await;

    assert_eq!(results[0].conversation_ids, vec!["dconv-1"]);
}

#[tokio::test]
async fn test_conversation_list_failure_still_returns_the_row() {
    let mut source = MockSource::default();
    source.fail_conversation_list = true;
    let mut destination = MockDestination::default();
    destination.add_user_by_email("a@x.com", "dest-1");

    let (runner, _, _) = pipeline(source, destination);
    let results = runner.run(&[user("u1", Some("a@x.com"))]).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].destination_user_id, "dest-1");
    assert!(results[0].conversation_ids.is_empty());
}

#[tokio::test]
async fn test_roster_order_is_preserved_in_results() {
    let mut destination = MockDestination::default();
    destination.add_user_by_email("a@x.com", "dest-1");
    destination.add_user_by_email("b@x.com", "dest-2");

    let (runner, _, _) = pipeline(MockSource::default(), destination);
    let results = runner
        .run(&[user("u1", Some("a@x.com")), user("u2", Some("b@x.com"))])
        .await;

    let aliases: Vec<&str> = results.iter().map(|r| r.source_user_id.as_str()).collect();
    assert_eq!(aliases, vec!["u1", "u2"]);
}
