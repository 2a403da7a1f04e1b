//! Request dispatch: route lookup, lenient body parsing, actor resolution
//!
//! The dispatcher is the error boundary of the service. A missing route is a
//! structured 404, a handler error maps to its status code, and nothing here
//! ever takes the process down.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use switchboard_common::{Envelope, Error, PageInfo, Result};
use switchboard_domain::{AuthUser, Token};
use switchboard_router::PathParams;

use crate::AppState;

/// Cap on buffered request bodies. Anything larger is treated like an
/// unparsable body under the lenient-parse contract.
const BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Everything a handler needs from the request
pub struct RequestContext {
    pub params: PathParams,
    pub query: HashMap<String, String>,
    pub body: Value,
    pub actor: Option<AuthUser>,
}

impl RequestContext {
    /// Deserialize the (already leniently parsed) body into a request DTO.
    /// Request DTOs are all-optional, so an empty body always succeeds;
    /// wrongly typed fields are a validation error.
    pub fn parse_body<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.body.clone())
            .map_err(|e| Error::Validation(format!("Invalid request body: {}", e)))
    }

    /// Parse a comma-separated filter parameter into a set of tokens.
    /// Absent or empty parameters mean "no filter".
    pub fn csv_filter(&self, name: &str) -> Option<std::collections::HashSet<String>> {
        let set: std::collections::HashSet<String> = self
            .query
            .get(name)?
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if set.is_empty() {
            None
        } else {
            Some(set)
        }
    }
}

/// A handler's reply: status code plus the response envelope
pub struct Reply {
    status: StatusCode,
    envelope: Envelope,
}

impl Reply {
    /// 200 with a data envelope
    pub fn ok<T: Serialize>(data: T) -> Result<Self> {
        Ok(Self {
            status: StatusCode::OK,
            envelope: Envelope::data(serde_json::to_value(data)?),
        })
    }

    /// 201 with a data envelope
    pub fn created<T: Serialize>(data: T) -> Result<Self> {
        Ok(Self {
            status: StatusCode::CREATED,
            envelope: Envelope::data(serde_json::to_value(data)?),
        })
    }

    /// 200 with a list envelope and pagination block
    pub fn paged<T: Serialize>(data: T, pagination: PageInfo) -> Result<Self> {
        Ok(Self {
            status: StatusCode::OK,
            envelope: Envelope::list(serde_json::to_value(data)?, pagination),
        })
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        (self.status, Json(self.envelope)).into_response()
    }
}

type HandlerFuture = Pin<Box<dyn Future<Output = Result<Reply>> + Send>>;

/// A registered route handler
pub type RouteHandler = Arc<dyn Fn(AppState, RequestContext) -> HandlerFuture + Send + Sync>;

/// Wrap a plain async handler fn into a registrable [`RouteHandler`]
pub fn handler<F, Fut>(f: F) -> RouteHandler
where
    F: Fn(AppState, RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Reply>> + Send + 'static,
{
    Arc::new(move |state, ctx| Box::pin(f(state, ctx)))
}

/// Dispatch one request through the route table
pub async fn dispatch(State(state): State<AppState>, req: Request) -> Response {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let query = parse_query(req.uri().query());
    let bearer = bearer_token(req.headers());

    let routes = Arc::clone(&state.routes);
    let Some(matched) = routes.lookup(&method, &path) else {
        tracing::debug!(%method, %path, "no matching route");
        return Error::NotFound(format!("No route for {} {}", method, path)).into_response();
    };
    let handler = Arc::clone(matched.handler);
    let params = matched.params;

    // The only suspension point before the store is touched: everything
    // after the body has arrived runs without yielding on other requests'
    // state.
    let body = lenient_body(req).await;

    let actor = match bearer {
        Some(token) => state.store.read().await.tokens.get(&token).map(Token::user),
        None => None,
    };

    let ctx = RequestContext {
        params,
        query,
        body,
        actor,
    };

    match handler(state.clone(), ctx).await {
        Ok(reply) => reply.into_response(),
        Err(error) => error.into_response(),
    }
}

/// Read the request body, treating anything unparsable as an empty object.
/// Downstream required-field checks govern behavior from there; this
/// leniency is part of the API contract.
async fn lenient_body(req: Request) -> Value {
    let empty = || Value::Object(serde_json::Map::new());

    match axum::body::to_bytes(req.into_body(), BODY_LIMIT).await {
        Ok(bytes) if !bytes.is_empty() => {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| empty())
        }
        _ => empty(),
    }
}

/// Extract the opaque token from an `Authorization: Bearer` header
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

/// Parse query parameters. Filter values are plain tokens (state names,
/// severity tiers, page numbers), so no percent-decoding is applied.
fn parse_query(raw: Option<&str>) -> HashMap<String, String> {
    let mut query = HashMap::new();
    let Some(raw) = raw else {
        return query;
    };

    for pair in raw.split('&').filter(|p| !p.is_empty()) {
        match pair.split_once('=') {
            Some((key, value)) => query.insert(key.to_string(), value.to_string()),
            None => query.insert(pair.to_string(), String::new()),
        };
    }

    query
}
