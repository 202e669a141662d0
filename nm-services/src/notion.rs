//! Store backed by a Notion database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use nm_api::endpoints::pages::CreatePageParams;
use nm_api::filter::{Filter, Sort};
use nm_api::{ApiClient, DatabaseInfo};
use nm_core::config::AppConfig;
use nm_core::error::NmResult;
use nm_models::{NewMessage, Page};

use crate::store::MailboxStore;

/// Mailbox rows kept in a Notion database.
#[derive(Clone)]
pub struct NotionStore {
    client: ApiClient,
    database_id: String,
}

impl NotionStore {
    /// Wrap an API client and the id of the mailbox database.
    pub fn new(client: ApiClient, database_id: impl Into<String>) -> Self {
        Self {
            client,
            database_id: database_id.into(),
        }
    }

    /// Build a store from configuration, failing if credentials are missing.
    pub fn from_config(config: &AppConfig) -> NmResult<Self> {
        config.require_credentials()?;
        let client = ApiClient::new(&config.notion)?;
        Ok(Self::new(client, config.notion.database_id.clone()))
    }

    /// Id of the mailbox database.
    pub fn database_id(&self) -> &str {
        &self.database_id
    }
}

#[async_trait]
impl MailboxStore for NotionStore {
    async fn query(&self, filter: &Filter) -> NmResult<Vec<Page>> {
        debug!("querying {} with {}", self.database_id, filter.to_json());
        self.client
            .query_database_all(&self.database_id, Some(filter), vec![Sort::oldest_first()])
            .await
    }

    async fn create(&self, message: &NewMessage, sent_at: DateTime<Utc>) -> NmResult<Page> {
        let params = CreatePageParams::in_database(&self.database_id, message.to_properties(&sent_at));
        self.client.create_page(&params).await
    }

    async fn archive(&self, id: &str) -> NmResult<()> {
        self.client.archive_page(id).await.map(|_| ())
    }

    async fn describe(&self) -> NmResult<DatabaseInfo> {
        self.client.retrieve_database(&self.database_id).await
    }
}
