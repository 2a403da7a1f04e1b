//! Auth API handlers
//!
//! Implements:
//! - POST /api/auth/login — verify credentials against the injected user
//!   directory and issue an opaque bearer token

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use switchboard_common::{Error, Result};
use switchboard_domain::{AuthUser, Token};

use crate::dispatch::{Reply, RequestContext};
use crate::AppState;

/// Advisory token lifetime returned to the caller. Expiry is not enforced
/// by the engine.
const TOKEN_TTL_HOURS: i64 = 24;

/// Login request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: AuthUser,
    pub expires_at: DateTime<Utc>,
}

/// POST /api/auth/login
pub async fn login(state: AppState, ctx: RequestContext) -> Result<Reply> {
    let req: LoginRequest = ctx.parse_body()?;

    // Missing fields get the same uniform 401 as a wrong password; the
    // response never reveals whether the email exists.
    let (email, password) = match (req.email, req.password) {
        (Some(email), Some(password)) => (email, password),
        _ => return Err(Error::InvalidCredentials),
    };

    let user = state
        .directory
        .authenticate(&email, &password)
        .await
        .ok_or(Error::InvalidCredentials)?;

    let token = Token::issue(&user, Duration::hours(TOKEN_TTL_HOURS));
    let response = LoginResponse {
        token: token.token.clone(),
        user,
        expires_at: token.expires_at,
    };

    let mut tables = state.store.write().await;
    tables.tokens.insert(token);

    tracing::info!(email = %email, "login succeeded");
    Reply::ok(response)
}
