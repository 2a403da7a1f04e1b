//! Route registration for the Switchboard API
//!
//! Routes are registered into the route table in this order; among
//! templates the first match in registration order wins, so more specific
//! templates come first within each group.

use switchboard_router::RouteTable;

use crate::dispatch::{handler, RouteHandler};
use crate::handlers;

/// Build the full route table
pub fn create_routes() -> RouteTable<RouteHandler> {
    let mut table = RouteTable::new();

    // Infrastructure
    table.register("GET", "/health", handler(handlers::health));

    // Auth
    table.register("POST", "/api/auth/login", handler(handlers::auth::login));

    // Conversations
    table.register(
        "POST",
        "/api/conversations",
        handler(handlers::conversations::create_conversation),
    );
    table.register(
        "GET",
        "/api/conversations",
        handler(handlers::conversations::list_conversations),
    );
    table.register(
        "GET",
        "/api/conversations/:id",
        handler(handlers::conversations::get_conversation),
    );
    table.register(
        "POST",
        "/api/conversations/:id/messages",
        handler(handlers::messages::post_message),
    );
    table.register(
        "POST",
        "/api/conversations/:id/assign",
        handler(handlers::conversations::assign_conversation),
    );
    table.register(
        "POST",
        "/api/conversations/:id/escalate",
        handler(handlers::conversations::escalate_conversation),
    );
    table.register(
        "POST",
        "/api/conversations/:id/resolve",
        handler(handlers::conversations::resolve_conversation),
    );

    // Customers
    table.register(
        "POST",
        "/api/customers",
        handler(handlers::customers::create_customer),
    );
    table.register(
        "GET",
        "/api/customers",
        handler(handlers::customers::list_customers),
    );
    table.register(
        "GET",
        "/api/customers/:id",
        handler(handlers::customers::get_customer),
    );

    // Resolutions
    table.register(
        "POST",
        "/api/resolutions",
        handler(handlers::resolutions::create_resolution),
    );
    table.register(
        "GET",
        "/api/resolutions",
        handler(handlers::resolutions::list_resolutions),
    );
    table.register(
        "GET",
        "/api/resolutions/:id",
        handler(handlers::resolutions::get_resolution),
    );
    table.register(
        "PATCH",
        "/api/resolutions/:id/status",
        handler(handlers::resolutions::update_status),
    );
    table.register(
        "POST",
        "/api/resolutions/:id/resolve",
        handler(handlers::resolutions::resolve_resolution),
    );

    table
}
