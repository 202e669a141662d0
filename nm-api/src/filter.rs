//! Query filter and sort builders.
//!
//! A [`Filter`] renders to the JSON filter object accepted by database
//! queries, and can also be evaluated against a [`Page`] locally.

use serde::Serialize;
use serde_json::{json, Value};

use nm_core::config::MatchMode;
use nm_core::constants::properties;
use nm_models::Page;

/// Condition applied to a rich-text or title property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextCondition {
    Contains(String),
    Equals(String),
}

/// A database query filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Condition on a rich-text property.
    RichText {
        property: String,
        condition: TextCondition,
    },
    /// Any of the nested filters matches.
    Or(Vec<Filter>),
    /// All of the nested filters match.
    And(Vec<Filter>),
}

impl Filter {
    /// Rich-text property contains `value`.
    pub fn text_contains(property: &str, value: &str) -> Self {
        Filter::RichText {
            property: property.to_string(),
            condition: TextCondition::Contains(value.to_string()),
        }
    }

    /// Rich-text property equals `value`.
    pub fn text_equals(property: &str, value: &str) -> Self {
        Filter::RichText {
            property: property.to_string(),
            condition: TextCondition::Equals(value.to_string()),
        }
    }

    /// Rich-text property matched according to `mode`.
    pub fn text_matches(property: &str, value: &str, mode: MatchMode) -> Self {
        match mode {
            MatchMode::Contains => Self::text_contains(property, value),
            MatchMode::Equals => Self::text_equals(property, value),
        }
    }

    pub fn or(filters: Vec<Filter>) -> Self {
        Filter::Or(filters)
    }

    pub fn and(filters: Vec<Filter>) -> Self {
        Filter::And(filters)
    }

    /// Render as the JSON filter object.
    pub fn to_json(&self) -> Value {
        match self {
            Filter::RichText { property, condition } => {
                let condition = match condition {
                    TextCondition::Contains(v) => json!({ "contains": v }),
                    TextCondition::Equals(v) => json!({ "equals": v }),
                };
                json!({ "property": property, "rich_text": condition })
            }
            Filter::Or(filters) => {
                json!({ "or": filters.iter().map(Filter::to_json).collect::<Vec<_>>() })
            }
            Filter::And(filters) => {
                json!({ "and": filters.iter().map(Filter::to_json).collect::<Vec<_>>() })
            }
        }
    }

    /// Evaluate the filter against a page.
    ///
    /// `contains` ignores case like the remote text filter; `equals` is exact.
    pub fn matches(&self, page: &Page) -> bool {
        match self {
            Filter::RichText { property, condition } => {
                let Some(text) = page.text_property(property) else {
                    return false;
                };
                match condition {
                    TextCondition::Contains(v) => text.to_lowercase().contains(&v.to_lowercase()),
                    TextCondition::Equals(v) => text == *v,
                }
            }
            Filter::Or(filters) => filters.iter().any(|f| f.matches(page)),
            Filter::And(filters) => filters.iter().all(|f| f.matches(page)),
        }
    }
}

/// Messages addressed to `recipient`. Used by read and clear.
pub fn recipient_filter(recipient: &str, mode: MatchMode) -> Filter {
    Filter::text_matches(properties::RECIPIENT, recipient, mode)
}

/// Messages sent or received by `person`. Used by relationship.
pub fn participant_filter(person: &str, mode: MatchMode) -> Filter {
    Filter::or(vec![
        Filter::text_matches(properties::SENDER, person, mode),
        Filter::text_matches(properties::RECIPIENT, person, mode),
    ])
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ascending,
    Descending,
}

/// A query sort criterion on a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sort {
    pub property: String,
    pub direction: Direction,
}

impl Sort {
    /// Oldest first by the Date property.
    pub fn oldest_first() -> Self {
        Self {
            property: properties::DATE.to_string(),
            direction: Direction::Ascending,
        }
    }
}
