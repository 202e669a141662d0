//! Page endpoints.

use serde::Serialize;
use serde_json::json;

use nm_core::error::{NmError, NmResult};
use nm_models::Page;

use crate::client::ApiClient;

/// Parameters for creating a row in a database.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePageParams {
    pub parent: Parent,
    pub properties: serde_json::Value,
}

/// Parent reference of a new page.
#[derive(Debug, Clone, Serialize)]
pub struct Parent {
    pub database_id: String,
}

impl CreatePageParams {
    /// A new row in `database_id` with the given property map.
    pub fn in_database(database_id: &str, properties: serde_json::Value) -> Self {
        Self {
            parent: Parent {
                database_id: database_id.to_string(),
            },
            properties,
        }
    }
}

impl ApiClient {
    /// Create a page.
    pub async fn create_page(&self, params: &CreatePageParams) -> NmResult<Page> {
        let body = serde_json::to_value(params)?;
        self.post_json("/pages", &body).await
    }

    /// Archive (soft-delete) a page.
    pub async fn archive_page(&self, page_id: &str) -> NmResult<Page> {
        let page_id = page_id.trim();
        if page_id.is_empty() || page_id.contains('/') {
            return Err(NmError::InvalidInput(format!("invalid page id '{page_id}'")));
        }
        self.patch_json(&format!("/pages/{page_id}"), &json!({ "archived": true }))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_params_serialize() {
        let params = CreatePageParams::in_database(
            "db123",
            json!({ "Sender": { "rich_text": [] } }),
        );
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["parent"]["database_id"], "db123");
        assert!(json["properties"]["Sender"].is_object());
    }

    #[tokio::test]
    async fn test_archive_rejects_bad_id_without_network() {
        let config = nm_core::config::NotionConfig {
            token: "secret".into(),
            base_url: "http://127.0.0.1:9".into(),
            ..Default::default()
        };
        let client = ApiClient::new(&config).unwrap();
        assert!(matches!(
            client.archive_page("  ").await,
            Err(NmError::InvalidInput(_))
        ));
        assert!(matches!(
            client.archive_page("../databases/x").await,
            Err(NmError::InvalidInput(_))
        ));
    }
}
