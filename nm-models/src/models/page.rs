//! Notion page objects as returned by database queries and page endpoints.
//!
//! Only the property types the mailbox uses are modelled; anything else
//! deserializes to [`PropertyValue::Other`].

use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// A row of the mailbox database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page id assigned by Notion (dashed UUID form).
    pub id: String,
    /// Whether the page has been archived (soft-deleted).
    #[serde(default)]
    pub archived: bool,
    /// Creation time reported by Notion, RFC 3339.
    #[serde(default)]
    pub created_time: Option<String>,
    /// Property values keyed by property name.
    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
}

/// A single property value on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title {
        #[serde(default)]
        title: Vec<RichText>,
    },
    RichText {
        #[serde(default)]
        rich_text: Vec<RichText>,
    },
    Date {
        #[serde(default)]
        date: Option<DateValue>,
    },
    #[serde(other)]
    Other,
}

/// One rich-text segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plain_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextContent>,
}

/// The `text` object inside a rich-text segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub content: String,
}

/// The value of a date property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateValue {
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
}

impl RichText {
    /// Build a plain segment.
    pub fn plain(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            plain_text: Some(content.clone()),
            text: Some(TextContent { content }),
        }
    }

    /// The visible text of this segment.
    pub fn as_str(&self) -> &str {
        self.plain_text
            .as_deref()
            .or_else(|| self.text.as_ref().map(|t| t.content.as_str()))
            .unwrap_or("")
    }
}

impl PropertyValue {
    /// Concatenated text of a title or rich-text property.
    pub fn text(&self) -> Option<String> {
        match self {
            PropertyValue::Title { title } => Some(join_segments(title)),
            PropertyValue::RichText { rich_text } => Some(join_segments(rich_text)),
            _ => None,
        }
    }

    /// The date value of a date property, if set.
    pub fn date(&self) -> Option<&DateValue> {
        match self {
            PropertyValue::Date { date } => date.as_ref(),
            _ => None,
        }
    }
}

impl Page {
    /// Look up the text of a title / rich-text property.
    pub fn text_property(&self, name: &str) -> Option<String> {
        self.properties.get(name).and_then(PropertyValue::text)
    }

    /// Look up the value of a date property.
    pub fn date_property(&self, name: &str) -> Option<&DateValue> {
        self.properties.get(name).and_then(PropertyValue::date)
    }
}

fn join_segments(segments: &[RichText]) -> String {
    segments.iter().map(RichText::as_str).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_JSON: &str = r#"{
        "object": "page",
        "id": "59833787-2cf9-4fdf-8782-e53db20768a5",
        "created_time": "2024-01-15T12:30:00.000Z",
        "archived": false,
        "properties": {
            "Message": {"id": "title", "type": "title", "title": [
                {"type": "text", "text": {"content": "Hello ", "link": null}, "plain_text": "Hello "},
                {"type": "text", "text": {"content": "world", "link": null}, "plain_text": "world"}
            ]},
            "Sender": {"id": "a%3Ab", "type": "rich_text", "rich_text": [
                {"type": "text", "text": {"content": "alice"}, "plain_text": "alice"}
            ]},
            "Recipient": {"id": "c%3Ad", "type": "rich_text", "rich_text": [
                {"type": "text", "text": {"content": "bob"}}
            ]},
            "Date": {"id": "e%3Af", "type": "date", "date": {"start": "2024-01-15T12:30:00.000+00:00", "end": null, "time_zone": null}},
            "Tags": {"id": "g%3Ah", "type": "multi_select", "multi_select": []}
        }
    }"#;

    #[test]
    fn test_page_deserialize() {
        let page: Page = serde_json::from_str(PAGE_JSON).unwrap();
        assert_eq!(page.id, "59833787-2cf9-4fdf-8782-e53db20768a5");
        assert!(!page.archived);
        assert_eq!(page.text_property("Message").unwrap(), "Hello world");
        assert_eq!(page.text_property("Sender").unwrap(), "alice");
        // Falls back to text.content when plain_text is absent.
        assert_eq!(page.text_property("Recipient").unwrap(), "bob");
        assert_eq!(
            page.date_property("Date").unwrap().start,
            "2024-01-15T12:30:00.000+00:00"
        );
        assert_eq!(page.properties.get("Tags"), Some(&PropertyValue::Other));
    }

    #[test]
    fn test_unset_date_is_none() {
        let json = r#"{"id": "x", "properties": {"Date": {"type": "date", "date": null}}}"#;
        let page: Page = serde_json::from_str(json).unwrap();
        assert!(page.date_property("Date").is_none());
    }

    #[test]
    fn test_text_property_on_wrong_type() {
        let page: Page = serde_json::from_str(PAGE_JSON).unwrap();
        assert!(page.text_property("Date").is_none());
        assert!(page.text_property("Missing").is_none());
    }
}
