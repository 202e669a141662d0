//! The mailbox store seam.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use nm_api::filter::Filter;
use nm_api::DatabaseInfo;
use nm_core::error::NmResult;
use nm_models::{NewMessage, Page};

/// Storage backend holding mailbox rows.
///
/// Archived rows never appear in query results.
#[async_trait]
pub trait MailboxStore: Send + Sync {
    /// All live rows matching `filter`, oldest first by send date.
    async fn query(&self, filter: &Filter) -> NmResult<Vec<Page>>;

    /// Store a new message and return the created row.
    async fn create(&self, message: &NewMessage, sent_at: DateTime<Utc>) -> NmResult<Page>;

    /// Archive the row with the given id.
    async fn archive(&self, id: &str) -> NmResult<()>;

    /// Metadata and property schema of the backing database.
    async fn describe(&self) -> NmResult<DatabaseInfo>;
}
