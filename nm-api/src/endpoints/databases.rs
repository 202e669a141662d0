//! Database endpoints.

use serde::Serialize;
use tracing::debug;

use nm_core::constants::MAX_QUERY_PAGE_SIZE;
use nm_core::error::NmResult;
use nm_models::Page;

use crate::client::ApiClient;
use crate::filter::{Filter, Sort};
use crate::response::{DatabaseInfo, QueryPage};

/// Body of a database query request.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sorts: Vec<Sort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
    pub page_size: u32,
}

impl DatabaseQuery {
    /// A first-page query with the given filter and sorts.
    pub fn new(filter: Option<&Filter>, sorts: Vec<Sort>) -> Self {
        Self {
            filter: filter.map(Filter::to_json),
            sorts,
            start_cursor: None,
            page_size: MAX_QUERY_PAGE_SIZE,
        }
    }
}

impl ApiClient {
    /// Run one page of a database query.
    pub async fn query_database(
        &self,
        database_id: &str,
        query: &DatabaseQuery,
    ) -> NmResult<QueryPage> {
        let body = serde_json::to_value(query)?;
        self.post_json(&format!("/databases/{database_id}/query"), &body)
            .await
    }

    /// Run a database query and follow the cursor until every row is fetched.
    pub async fn query_database_all(
        &self,
        database_id: &str,
        filter: Option<&Filter>,
        sorts: Vec<Sort>,
    ) -> NmResult<Vec<Page>> {
        let mut query = DatabaseQuery::new(filter, sorts);
        let mut pages = Vec::new();

        loop {
            let batch = self.query_database(database_id, &query).await?;
            let next = batch.continuation().map(str::to_string);
            debug!(
                "query page returned {} rows (more: {})",
                batch.results.len(),
                next.is_some()
            );
            pages.extend(batch.results);

            match next {
                Some(cursor) => query.start_cursor = Some(cursor),
                None => break,
            }
        }

        Ok(pages)
    }

    /// Retrieve database metadata, including its property schema.
    pub async fn retrieve_database(&self, database_id: &str) -> NmResult<DatabaseInfo> {
        self.get_json(&format!("/databases/{database_id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nm_core::config::MatchMode;

    #[test]
    fn test_query_serialize_first_page() {
        let filter = crate::filter::recipient_filter("bob", MatchMode::Contains);
        let q = DatabaseQuery::new(Some(&filter), vec![Sort::oldest_first()]);
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["page_size"], 100);
        assert_eq!(json["filter"]["property"], "Recipient");
        assert_eq!(json["sorts"][0]["property"], "Date");
        assert!(json.get("start_cursor").is_none());
    }

    #[test]
    fn test_query_serialize_unfiltered() {
        let q = DatabaseQuery {
            start_cursor: Some("abc".into()),
            ..DatabaseQuery::new(None, Vec::new())
        };
        let json = serde_json::to_value(&q).unwrap();
        assert!(json.get("filter").is_none());
        assert!(json.get("sorts").is_none());
        assert_eq!(json["start_cursor"], "abc");
    }
}
