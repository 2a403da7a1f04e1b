//! Conversation lifecycle API handlers
//!
//! Implements:
//! - POST /api/conversations — open a conversation, optionally with an
//!   initial customer message
//! - GET /api/conversations — list with state/severity filters
//! - GET /api/conversations/:id — conversation plus its message sequence
//! - POST /api/conversations/:id/assign
//! - POST /api/conversations/:id/escalate
//! - POST /api/conversations/:id/resolve

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use switchboard_common::{Error, PageQuery, Result};
use switchboard_domain::{
    Conversation, Customer, Direction, Message, Resolution, SenderType, Sentiment, Severity,
};

use crate::dispatch::{Reply, RequestContext};
use crate::handlers::{non_blank, not_found, path_uuid};
use crate::AppState;

/// Request for creating a conversation
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateConversationRequest {
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub channel: Option<String>,
    pub subject: Option<String>,
    pub initial_message: Option<String>,
    // Annotations stamped by an upstream classifier, stored as-is
    pub severity: Option<Severity>,
    pub sentiment: Option<Sentiment>,
    pub intent: Option<String>,
}

/// Request for assigning an agent
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssignRequest {
    pub agent_id: Option<String>,
    pub team_id: Option<String>,
}

/// Request for escalating a conversation
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EscalateRequest {
    pub reason: Option<String>,
    pub create_resolution: Option<bool>,
    pub priority: Option<Severity>,
}

/// Request for resolving a conversation
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolveConversationRequest {
    pub resolution_notes: Option<String>,
}

/// Conversation plus its stored message sequence
#[derive(Debug, Serialize)]
pub struct ConversationDetail {
    #[serde(flatten)]
    pub conversation: Conversation,
    pub messages: Vec<Message>,
}

/// Escalation outcome: the updated conversation and the resolution spawned
/// for it, if any
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalateResponse {
    pub conversation: Conversation,
    pub resolution_id: Option<Uuid>,
}

/// POST /api/conversations
pub async fn create_conversation(state: AppState, ctx: RequestContext) -> Result<Reply> {
    let req: CreateConversationRequest = ctx.parse_body()?;

    let mut guard = state.store.write().await;
    let tables = &mut *guard;

    // Resolve the owning customer: an explicit id must exist, otherwise a
    // new customer record is created from the inline fields.
    let customer_id = match non_blank(req.customer_id) {
        Some(raw) => {
            let id: Uuid = raw.parse().map_err(|_| not_found("Customer", &raw))?;
            if !tables.customers.contains(&id) {
                return Err(not_found("Customer", &raw));
            }
            id
        }
        None => {
            let customer = Customer::new(
                req.customer_name
                    .unwrap_or_else(|| "Anonymous".to_string()),
                req.customer_email,
                None,
            );
            let id = customer.id;
            tables.customers.insert(id, customer);
            id
        }
    };

    let channel = req.channel.unwrap_or_else(|| "web_chat".to_string());
    let mut conversation = Conversation::new(
        customer_id,
        channel.clone(),
        req.subject,
        req.severity.unwrap_or_default(),
        req.sentiment.unwrap_or_default(),
        req.intent.unwrap_or_else(|| "general_inquiry".to_string()),
    );

    if let Some(content) = non_blank(req.initial_message) {
        let message = Message::new(
            conversation.id,
            channel,
            Direction::Inbound,
            SenderType::Customer,
            None,
            content,
        )?;
        conversation.record_message(&message);
        tables.messages.append(message);
    }

    tracing::info!(
        conversation_id = %conversation.id,
        customer_id = %customer_id,
        channel = %conversation.current_channel,
        "conversation created"
    );

    tables
        .conversations
        .insert(conversation.id, conversation.clone());
    Reply::created(conversation)
}

/// GET /api/conversations
pub async fn list_conversations(state: AppState, ctx: RequestContext) -> Result<Reply> {
    let state_filter = ctx.csv_filter("state");
    let severity_filter = ctx.csv_filter("severity");
    let page = PageQuery::from_query(&ctx.query);

    let tables = state.store.read().await;
    let mut conversations: Vec<Conversation> = tables
        .conversations
        .list()
        .into_iter()
        .filter(|c| matches(&state_filter, c.state))
        .filter(|c| matches(&severity_filter, c.severity))
        .cloned()
        .collect();

    // Stable sort keeps creation order within a severity tier.
    conversations.sort_by_key(|c| c.severity.sort_rank());

    let (items, pagination) = page.paginate(conversations);
    Reply::paged(items, pagination)
}

fn matches<T: std::fmt::Display>(
    filter: &Option<std::collections::HashSet<String>>,
    value: T,
) -> bool {
    filter
        .as_ref()
        .map_or(true, |set| set.contains(&value.to_string()))
}

/// GET /api/conversations/:id
pub async fn get_conversation(state: AppState, ctx: RequestContext) -> Result<Reply> {
    let id = path_uuid(&ctx, "Conversation")?;

    let tables = state.store.read().await;
    let conversation = tables
        .conversations
        .get(&id)
        .ok_or_else(|| not_found("Conversation", id))?;

    Reply::ok(ConversationDetail {
        conversation: conversation.clone(),
        messages: tables.messages.list(&id).to_vec(),
    })
}

/// POST /api/conversations/:id/assign
pub async fn assign_conversation(state: AppState, ctx: RequestContext) -> Result<Reply> {
    let id = path_uuid(&ctx, "Conversation")?;
    let req: AssignRequest = ctx.parse_body()?;
    let agent_id = non_blank(req.agent_id)
        .ok_or_else(|| Error::Validation("agentId is required".to_string()))?;

    let mut tables = state.store.write().await;
    let conversation = tables
        .conversations
        .get_mut(&id)
        .ok_or_else(|| not_found("Conversation", id))?;

    conversation.assign(agent_id, non_blank(req.team_id))?;

    tracing::info!(
        conversation_id = %id,
        agent_id = ?conversation.assigned_agent_id,
        "conversation assigned"
    );
    Reply::ok(conversation.clone())
}

/// POST /api/conversations/:id/escalate
pub async fn escalate_conversation(state: AppState, ctx: RequestContext) -> Result<Reply> {
    let id = path_uuid(&ctx, "Conversation")?;
    let req: EscalateRequest = ctx.parse_body()?;
    let create_resolution = req.create_resolution.unwrap_or(false);
    let reason = non_blank(req.reason).unwrap_or_else(|| "escalated".to_string());

    let mut guard = state.store.write().await;
    let tables = &mut *guard;
    let conversation = tables
        .conversations
        .get_mut(&id)
        .ok_or_else(|| not_found("Conversation", id))?;

    // A conversation owns at most one resolution; refuse before mutating
    // anything so a failed escalation leaves no partial state behind.
    if create_resolution {
        if let Some(existing) = conversation.resolution_id {
            return Err(Error::Conflict(format!(
                "Conversation {} already has resolution {}",
                id, existing
            )));
        }
    }

    conversation.escalate(req.priority)?;

    let note = Message::system(
        id,
        conversation.current_channel.clone(),
        format!("Conversation escalated: {}", reason),
    );
    conversation.record_message(&note);
    tables.messages.append(note);

    if create_resolution {
        let resolution = Resolution::new(
            conversation.id,
            conversation.customer_id,
            conversation
                .subject
                .clone()
                .unwrap_or_else(|| "Escalated conversation".to_string()),
            Some(reason),
            None,
            conversation.severity,
        );
        conversation.attach_resolution(resolution.id)?;
        tables.resolutions.insert(resolution.id, resolution);
    }

    tracing::info!(
        conversation_id = %id,
        resolution_id = ?conversation.resolution_id,
        "conversation escalated"
    );

    Reply::ok(EscalateResponse {
        resolution_id: conversation.resolution_id,
        conversation: conversation.clone(),
    })
}

/// POST /api/conversations/:id/resolve
pub async fn resolve_conversation(state: AppState, ctx: RequestContext) -> Result<Reply> {
    let id = path_uuid(&ctx, "Conversation")?;
    let req: ResolveConversationRequest = ctx.parse_body()?;

    let mut guard = state.store.write().await;
    let tables = &mut *guard;
    let conversation = tables
        .conversations
        .get_mut(&id)
        .ok_or_else(|| not_found("Conversation", id))?;

    conversation.resolve()?;

    let content = match non_blank(req.resolution_notes) {
        Some(notes) => format!("Conversation resolved: {}", notes),
        None => "Conversation resolved".to_string(),
    };
    let note = Message::system(id, conversation.current_channel.clone(), content);
    conversation.record_message(&note);
    tables.messages.append(note);

    tracing::info!(conversation_id = %id, "conversation resolved");
    Reply::ok(conversation.clone())
}
