//! Resolution workflow API handlers
//!
//! Implements:
//! - POST /api/resolutions — direct creation, mirroring escalation defaults
//! - GET /api/resolutions — list with status filter
//! - GET /api/resolutions/:id — fetch a single resolution with its timeline
//! - PATCH /api/resolutions/:id/status — free-form status/field updates
//! - POST /api/resolutions/:id/resolve — terminal resolve with notes

use serde::Deserialize;
use uuid::Uuid;

use switchboard_common::{Error, PageQuery, Result};
use switchboard_domain::{Resolution, ResolutionStatus, Severity};

use crate::dispatch::{Reply, RequestContext};
use crate::handlers::{non_blank, not_found, path_uuid};
use crate::AppState;

/// Request for creating a resolution directly
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateResolutionRequest {
    pub conversation_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub issue_type: Option<String>,
    pub priority: Option<Severity>,
}

/// Request for updating workflow status and investigation fields
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateStatusRequest {
    pub status: Option<ResolutionStatus>,
    pub root_cause: Option<String>,
    pub affected_systems: Option<Vec<String>>,
    pub assigned_team_id: Option<String>,
    pub assigned_engineer_id: Option<String>,
}

/// Request for the terminal resolve operation
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolveResolutionRequest {
    pub resolution_notes: Option<String>,
    pub root_cause: Option<String>,
}

/// POST /api/resolutions
pub async fn create_resolution(state: AppState, ctx: RequestContext) -> Result<Reply> {
    let req: CreateResolutionRequest = ctx.parse_body()?;
    let raw = non_blank(req.conversation_id)
        .ok_or_else(|| Error::Validation("conversationId is required".to_string()))?;
    let conversation_id: Uuid = raw.parse().map_err(|_| not_found("Conversation", &raw))?;

    let mut guard = state.store.write().await;
    let tables = &mut *guard;
    let conversation = tables
        .conversations
        .get_mut(&conversation_id)
        .ok_or_else(|| not_found("Conversation", &raw))?;

    let resolution = Resolution::new(
        conversation.id,
        conversation.customer_id,
        non_blank(req.title)
            .or_else(|| conversation.subject.clone())
            .unwrap_or_else(|| "Escalated conversation".to_string()),
        req.description,
        req.issue_type,
        req.priority.unwrap_or(conversation.severity),
    );

    // Refuses a second resolution for the same conversation.
    conversation.attach_resolution(resolution.id)?;
    tables.resolutions.insert(resolution.id, resolution.clone());

    tracing::info!(
        resolution_id = %resolution.id,
        conversation_id = %conversation_id,
        "resolution created"
    );
    Reply::created(resolution)
}

/// GET /api/resolutions
pub async fn list_resolutions(state: AppState, ctx: RequestContext) -> Result<Reply> {
    let status_filter = ctx.csv_filter("status");
    let page = PageQuery::from_query(&ctx.query);

    let tables = state.store.read().await;
    let resolutions: Vec<Resolution> = tables
        .resolutions
        .list()
        .into_iter()
        .filter(|r| {
            status_filter
                .as_ref()
                .map_or(true, |set| set.contains(&r.status.to_string()))
        })
        .cloned()
        .collect();

    let (items, pagination) = page.paginate(resolutions);
    Reply::paged(items, pagination)
}

/// GET /api/resolutions/:id
pub async fn get_resolution(state: AppState, ctx: RequestContext) -> Result<Reply> {
    let id = path_uuid(&ctx, "Resolution")?;

    let tables = state.store.read().await;
    let resolution = tables
        .resolutions
        .get(&id)
        .ok_or_else(|| not_found("Resolution", id))?;

    Reply::ok(resolution.clone())
}

/// PATCH /api/resolutions/:id/status
pub async fn update_status(state: AppState, ctx: RequestContext) -> Result<Reply> {
    let id = path_uuid(&ctx, "Resolution")?;
    let req: UpdateStatusRequest = ctx.parse_body()?;

    let mut tables = state.store.write().await;
    let resolution = tables
        .resolutions
        .get_mut(&id)
        .ok_or_else(|| not_found("Resolution", id))?;

    if let Some(status) = req.status {
        resolution.set_status(status);
    }
    resolution.update_details(
        non_blank(req.root_cause),
        req.affected_systems,
        non_blank(req.assigned_team_id),
        non_blank(req.assigned_engineer_id),
    );

    tracing::info!(resolution_id = %id, status = %resolution.status, "resolution updated");
    Reply::ok(resolution.clone())
}

/// POST /api/resolutions/:id/resolve
pub async fn resolve_resolution(state: AppState, ctx: RequestContext) -> Result<Reply> {
    let id = path_uuid(&ctx, "Resolution")?;
    let req: ResolveResolutionRequest = ctx.parse_body()?;

    let mut tables = state.store.write().await;
    let resolution = tables
        .resolutions
        .get_mut(&id)
        .ok_or_else(|| not_found("Resolution", id))?;

    if let Some(root_cause) = non_blank(req.root_cause) {
        resolution.root_cause = Some(root_cause);
    }
    resolution.resolve(non_blank(req.resolution_notes).as_deref());

    tracing::info!(resolution_id = %id, "resolution resolved");
    Reply::ok(resolution.clone())
}
