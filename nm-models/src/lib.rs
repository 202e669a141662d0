//! NotionMail Models - the message entity and the logic around it.
//!
//! This crate owns the mapping between mailbox rows (Notion pages) and
//! messages, timestamp normalization for display, and the relationship
//! merge that builds a two-party conversation from one-sided query results.

pub mod models;
pub mod time;
pub mod relationship;

// Re-export key types
pub use models::message::{Message, NewMessage};
pub use models::page::{Page, PropertyValue, RichText};
pub use relationship::merge_conversation;
pub use time::DisplayZone;
