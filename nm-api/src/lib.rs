//! NotionMail API - HTTP client for the Notion REST API.
//!
//! This crate provides a typed client for the handful of endpoints the
//! mailbox needs (database query and retrieve, page create and archive),
//! filter builders for the query language, and automatic retry with
//! exponential backoff for rate limits and gateway errors.

pub mod client;
pub mod endpoints;
pub mod filter;
pub mod response;

// Re-export key types
pub use client::{ApiClient, RetryConfig};
pub use filter::{Filter, Sort};
pub use response::{ApiErrorBody, DatabaseInfo, QueryPage};
