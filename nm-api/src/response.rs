//! Response types.
//!
//! Notion answers list endpoints with a cursor-paginated `list` object and
//! failures with an `error` object; both are modelled here.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};

use nm_core::constants::properties;
use nm_core::error::{NmError, NmResult};
use nm_models::Page;

/// One page of database query results.
///
/// ```json
/// { "object": "list", "results": [ ... ], "next_cursor": null, "has_more": false }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryPage {
    /// Rows on this page.
    #[serde(default)]
    pub results: Vec<Page>,
    /// Cursor for the next page, when `has_more` is set.
    #[serde(default)]
    pub next_cursor: Option<String>,
    /// Whether more rows follow.
    #[serde(default)]
    pub has_more: bool,
}

impl QueryPage {
    /// The cursor to continue from, if there is another page.
    pub fn continuation(&self) -> Option<&str> {
        if self.has_more {
            self.next_cursor.as_deref()
        } else {
            None
        }
    }
}

/// Error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// Database object, reduced to what the schema check needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseInfo {
    pub id: String,
    #[serde(default)]
    pub title: Vec<nm_models::RichText>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub properties: HashMap<String, PropertySchema>,
}

/// Schema entry of a database property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub property_type: String,
}

impl DatabaseInfo {
    /// Plain-text title of the database.
    pub fn title_text(&self) -> String {
        self.title.iter().map(|t| t.as_str()).collect()
    }

    /// Verify that the database has the four mailbox properties with the right types.
    pub fn check_mailbox_schema(&self) -> NmResult<()> {
        let problems: Vec<String> = properties::SCHEMA
            .iter()
            .filter_map(|(name, expected)| match self.properties.get(*name) {
                None => Some(format!("missing property '{name}' ({expected})")),
                Some(p) if p.property_type != *expected => Some(format!(
                    "property '{name}' is {}, expected {expected}",
                    p.property_type
                )),
                Some(_) => None,
            })
            .collect();

        if problems.is_empty() {
            Ok(())
        } else {
            Err(NmError::Schema(problems.join("; ")))
        }
    }
}
