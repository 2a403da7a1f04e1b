//! Response envelope shared by every Switchboard endpoint
//!
//! All handlers reply with `{ success, data?, error?, pagination? }` so that
//! channel adapters and the browser widget can treat every endpoint
//! uniformly.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Default page size for list endpoints
const DEFAULT_PAGE_SIZE: usize = 50;

/// Maximum page size for list endpoints
const MAX_PAGE_SIZE: usize = 100;

/// Error block inside the envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Pagination block attached to list responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
}

/// The uniform response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageInfo>,
}

impl Envelope {
    /// Successful response carrying `data`
    pub fn data(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            pagination: None,
        }
    }

    /// Successful list response carrying `data` plus a pagination block
    pub fn list(data: Value, pagination: PageInfo) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            pagination: Some(pagination),
        }
    }

    /// Failed response carrying a structured error
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody {
                code: code.into(),
                message: message.into(),
            }),
            pagination: None,
        }
    }
}

/// Page/pageSize query parameters for list endpoints
#[derive(Debug, Clone, Copy)]
pub struct PageQuery {
    page: Option<usize>,
    page_size: Option<usize>,
}

impl PageQuery {
    /// Parse `page` and `pageSize` from the request query parameters.
    /// Unparseable values fall back to the defaults.
    pub fn from_query(query: &HashMap<String, String>) -> Self {
        Self {
            page: query.get("page").and_then(|v| v.parse().ok()),
            page_size: query.get("pageSize").and_then(|v| v.parse().ok()),
        }
    }

    /// Get the 1-based page number, defaulting to 1
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    /// Get the page size, defaulting to 50, capped at 100
    pub fn page_size(&self) -> usize {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Slice a filtered result set down to the requested page, returning the
    /// page items and the pagination block describing the whole set.
    pub fn paginate<T>(&self, items: Vec<T>) -> (Vec<T>, PageInfo) {
        let total_items = items.len();
        let page = self.page();
        let page_size = self.page_size();

        let start = (page - 1).saturating_mul(page_size);
        let paged = items
            .into_iter()
            .skip(start)
            .take(page_size)
            .collect();

        (
            paged,
            PageInfo {
                page,
                page_size,
                total_items,
            },
        )
    }
}
