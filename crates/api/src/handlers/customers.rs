//! Customer API handlers
//!
//! Implements:
//! - POST /api/customers — create an identity record
//! - GET /api/customers — list customers
//! - GET /api/customers/:id — fetch a single customer

use serde::Deserialize;

use switchboard_common::{PageQuery, Result};
use switchboard_domain::Customer;

use crate::dispatch::{Reply, RequestContext};
use crate::handlers::{not_found, path_uuid};
use crate::AppState;

/// Request for creating a customer
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateCustomerRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
}

/// POST /api/customers
pub async fn create_customer(state: AppState, ctx: RequestContext) -> Result<Reply> {
    let req: CreateCustomerRequest = ctx.parse_body()?;

    let customer = Customer::new(
        req.name.unwrap_or_else(|| "Anonymous".to_string()),
        req.email,
        req.company,
    );

    let mut tables = state.store.write().await;
    tables.customers.insert(customer.id, customer.clone());

    tracing::info!(customer_id = %customer.id, "customer created");
    Reply::created(customer)
}

/// GET /api/customers
pub async fn list_customers(state: AppState, ctx: RequestContext) -> Result<Reply> {
    let page = PageQuery::from_query(&ctx.query);

    let tables = state.store.read().await;
    let customers: Vec<Customer> = tables.customers.list().into_iter().cloned().collect();

    let (items, pagination) = page.paginate(customers);
    Reply::paged(items, pagination)
}

/// GET /api/customers/:id
pub async fn get_customer(state: AppState, ctx: RequestContext) -> Result<Reply> {
    let id = path_uuid(&ctx, "Customer")?;

    let tables = state.store.read().await;
    let customer = tables
        .customers
        .get(&id)
        .ok_or_else(|| not_found("Customer", id))?;

    Reply::ok(customer.clone())
}
