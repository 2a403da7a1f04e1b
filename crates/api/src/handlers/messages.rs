//! Message API handlers
//!
//! Implements:
//! - POST /api/conversations/:id/messages — append a message to a
//!   conversation's sequence, driving the message-based state transitions

use serde::Deserialize;

use switchboard_common::{Error, Result};
use switchboard_domain::{Direction, Message, SenderType};

use crate::dispatch::{Reply, RequestContext};
use crate::handlers::{non_blank, not_found, path_uuid};
use crate::AppState;

/// Request for posting a message
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostMessageRequest {
    pub channel: Option<String>,
    pub direction: Option<Direction>,
    pub sender_type: Option<SenderType>,
    pub sender_id: Option<String>,
    pub content: Option<String>,
}

/// POST /api/conversations/:id/messages
pub async fn post_message(state: AppState, ctx: RequestContext) -> Result<Reply> {
    let id = path_uuid(&ctx, "Conversation")?;
    let req: PostMessageRequest = ctx.parse_body()?;
    let content = non_blank(req.content)
        .ok_or_else(|| Error::Validation("content is required".to_string()))?;

    let mut guard = state.store.write().await;
    let tables = &mut *guard;
    let conversation = tables
        .conversations
        .get_mut(&id)
        .ok_or_else(|| not_found("Conversation", id))?;

    let channel = req
        .channel
        .unwrap_or_else(|| conversation.current_channel.clone());
    let direction = req.direction.unwrap_or_default();
    let sender_type = req.sender_type.unwrap_or_default();

    // Agent messages posted over an authenticated session are attributed to
    // the actor unless the caller names a sender explicitly.
    let sender_id = non_blank(req.sender_id).or_else(|| match sender_type {
        SenderType::Agent => ctx.actor.as_ref().map(|a| a.id.to_string()),
        _ => None,
    });

    let message = Message::new(id, channel, direction, sender_type, sender_id, content)?;
    conversation.record_message(&message);
    tables.messages.append(message.clone());

    tracing::debug!(
        conversation_id = %id,
        direction = %message.direction,
        sender_type = %message.sender_type,
        state = %conversation.state,
        "message posted"
    );

    Reply::created(message)
}
