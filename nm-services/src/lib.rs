//! NotionMail Services - mailbox operations over a pluggable store.
//!
//! `MailService` implements send, read, delete, clear, and relationship on
//! top of the `MailboxStore` trait. `NotionStore` talks to the real
//! database; `MemoryStore` keeps rows in process for tests.

pub mod store;
pub mod notion;
pub mod memory;
pub mod mail;

pub use mail::{ClearReport, MailService};
pub use memory::MemoryStore;
pub use notion::NotionStore;
pub use store::MailboxStore;
