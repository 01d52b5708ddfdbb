//! Message transformation into the destination schema.
//!
//! A pure function over its inputs: actor substitution, channel
//! substitution, and part filtering. System messages are filtered out by the
//! conversation migrator and never reach this module.

use crate::model::{Message, MessagePart, OutboundMessage};

/// Resolved identities a conversation's messages are rewritten against.
#[derive(Debug, Clone, Copy)]
pub struct TransformContext<'a> {
    /// The migrated user's source-side id.
    pub source_user_id: &'a str,
    /// The migrated user's destination-side id.
    pub destination_user_id: &'a str,
    /// The resolved destination channel, shared by every message of the
    /// conversation.
    pub channel_id: &'a str,
    /// Identity collapsing all non-user actors (agents, bots).
    pub fixed_actor_id: &'a str,
    /// Default for messages that carry no actor type.
    pub fixed_actor_type: &'a str,
}

/// Rewrites one source message into the destination's wire shape.
///
/// - The migrated user keeps their identity (re-attributed to the
///   destination id); every other actor, including an absent one, collapses
///   to the fixed actor id.
/// - Parts are filtered to text/image/video payloads, order preserved;
///   unsupported parts are dropped, not replaced.
/// - `channel_id` is substituted whenever the source message carried any
///   channel; the specific source value is irrelevant beyond presence.
/// - Remaining fields pass through when present and are omitted when absent.
pub fn transform_message(message: &Message, ctx: &TransformContext<'_>) -> OutboundMessage {
    let message_parts = message
        .message_parts
        .as_ref()
        .map(|parts| parts.iter().filter_map(project_part).collect());

    let actor_id = match message.actor_id.as_deref() {
        Some(id) if id == ctx.source_user_id => ctx.destination_user_id.to_string(),
        _ => ctx.fixed_actor_id.to_string(),
    };

    let actor_type = message
        .actor_type
        .clone()
        .unwrap_or_else(|| ctx.fixed_actor_type.to_string());

    OutboundMessage {
        message_parts,
        message_type: message.message_type.clone(),
        actor_id,
        actor_type,
        channel_id: message
            .channel_id
            .as_ref()
            .map(|_| ctx.channel_id.to_string()),
        created_time: message.created_time.clone(),
    }
}

/// Reduces a part to exactly one supported payload, or drops it.
fn project_part(part: &MessagePart) -> Option<MessagePart> {
    if let Some(text) = &part.text {
        return Some(MessagePart {
            text: Some(text.clone()),
            ..Default::default()
        });
    }
    if let Some(image) = &part.image {
        return Some(MessagePart {
            image: Some(image.clone()),
            ..Default::default()
        });
    }
    if let Some(video) = &part.video {
        return Some(MessagePart {
            video: Some(video.clone()),
            ..Default::default()
        });
    }
    None
}
