//! HTTP handlers for Switchboard

pub mod auth;
pub mod conversations;
pub mod customers;
pub mod messages;
pub mod resolutions;

use serde_json::json;
use uuid::Uuid;

use switchboard_common::{Error, Result};

use crate::dispatch::{Reply, RequestContext};
use crate::AppState;

/// Not-found error naming the entity and the offending id
pub(crate) fn not_found(entity: &str, id: impl std::fmt::Display) -> Error {
    Error::NotFound(format!("{} {} not found", entity, id))
}

/// Parse the `:id` path parameter. A syntactically invalid id can never
/// reference a stored entity, so it is reported as the same not-found.
pub(crate) fn path_uuid(ctx: &RequestContext, entity: &str) -> Result<Uuid> {
    let raw = ctx.params.get("id").unwrap_or("");
    raw.parse().map_err(|_| not_found(entity, raw))
}

/// Treat whitespace-only strings as absent
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// GET /health — liveness probe
pub async fn health(_state: AppState, _ctx: RequestContext) -> Result<Reply> {
    Reply::ok(json!({ "status": "ok" }))
}
