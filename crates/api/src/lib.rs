//! HTTP surface and request dispatch for Switchboard

pub mod dispatch;
pub mod handlers;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use switchboard_common::Config;
use switchboard_domain::{StaticUserDirectory, UserDirectory};
use switchboard_router::RouteTable;
use switchboard_store::Store;

use dispatch::RouteHandler;

/// Application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub directory: Arc<dyn UserDirectory>,
    pub routes: Arc<RouteTable<RouteHandler>>,
}

/// Create the main application with all routes and middleware.
///
/// Every request flows through the fallback dispatcher so that route
/// matching is owned by the registered route table rather than the HTTP
/// framework.
pub fn create_app(config: &Config) -> Router {
    let store = Store::new();

    let directory: Arc<dyn UserDirectory> = Arc::new(StaticUserDirectory::new().with_user(
        &config.agent_email,
        &config.agent_password,
        &config.agent_name,
        "agent",
    ));

    let state = AppState {
        store,
        directory,
        routes: Arc::new(routes::create_routes()),
    };

    Router::new()
        .fallback(dispatch::dispatch)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .into_inner(),
        )
}
