//! In-process store.
//!
//! Evaluates filters locally with the same semantics the remote query
//! uses, so services can be exercised without network access.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use nm_api::filter::Filter;
use nm_api::response::PropertySchema;
use nm_api::DatabaseInfo;
use nm_core::constants::properties;
use nm_core::error::{NmError, NmResult};
use nm_models::time::parse_date_value;
use nm_models::{Message, NewMessage, Page};

use crate::store::MailboxStore;

/// Mailbox held in memory.
#[derive(Default)]
pub struct MemoryStore {
    pages: Mutex<Vec<Page>>,
    failing_archives: Mutex<HashSet<String>>,
    queries: AtomicUsize,
}

impl MemoryStore {
    /// An empty mailbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailbox pre-filled with the given messages.
    pub fn with_messages(messages: impl IntoIterator<Item = Message>) -> Self {
        let pages = messages.into_iter().map(|m| m.to_page()).collect();
        Self {
            pages: Mutex::new(pages),
            ..Self::default()
        }
    }

    /// Insert a raw row, including ones that are not valid messages.
    pub async fn insert_page(&self, page: Page) {
        self.pages.lock().await.push(page);
    }

    /// Make every archive of `id` fail with a server error.
    pub async fn fail_archive_of(&self, id: &str) {
        self.failing_archives.lock().await.insert(id.to_string());
    }

    /// Number of queries served so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Ids of rows that are not archived.
    pub async fn live_ids(&self) -> Vec<String> {
        self.pages
            .lock()
            .await
            .iter()
            .filter(|p| !p.archived)
            .map(|p| p.id.clone())
            .collect()
    }
}

fn sent_at(page: &Page) -> Option<DateTime<Utc>> {
    page.date_property(properties::DATE)
        .and_then(|d| parse_date_value(&d.start, d.time_zone.as_deref()).ok())
}

#[async_trait]
impl MailboxStore for MemoryStore {
    async fn query(&self, filter: &Filter) -> NmResult<Vec<Page>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let mut matched: Vec<Page> = self
            .pages
            .lock()
            .await
            .iter()
            .filter(|p| !p.archived && filter.matches(p))
            .cloned()
            .collect();
        // Rows without a readable date sort last, like empty values remotely.
        matched.sort_by_key(|p| (sent_at(p).is_none(), sent_at(p)));
        Ok(matched)
    }

    async fn create(&self, message: &NewMessage, sent_at: DateTime<Utc>) -> NmResult<Page> {
        let id = uuid::Uuid::new_v4().to_string();
        let page = message.clone().into_message(id, sent_at).to_page();
        self.pages.lock().await.push(page.clone());
        Ok(page)
    }

    async fn archive(&self, id: &str) -> NmResult<()> {
        if self.failing_archives.lock().await.contains(id) {
            return Err(NmError::Api {
                status: 500,
                code: "internal_server_error".into(),
                message: format!("archive of {id} failed"),
            });
        }
        let mut pages = self.pages.lock().await;
        let page = pages
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| NmError::NotFound(format!("page {id}")))?;
        page.archived = true;
        Ok(())
    }

    async fn describe(&self) -> NmResult<DatabaseInfo> {
        let properties: HashMap<String, PropertySchema> = properties::SCHEMA
            .iter()
            .map(|(name, kind)| {
                (
                    name.to_string(),
                    PropertySchema {
                        id: name.to_lowercase(),
                        property_type: kind.to_string(),
                    },
                )
            })
            .collect();
        Ok(DatabaseInfo {
            id: "memory".into(),
            title: vec![nm_models::RichText::plain("In-memory mailbox")],
            archived: false,
            properties,
        })
    }
}
