//! Message entity model.

use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use nm_core::constants::{properties, MAX_RICH_TEXT_CHARS};
use nm_core::error::{NmError, NmResult};

use super::page::{DateValue, Page, PropertyValue, RichText};
use crate::time::parse_date_value;

/// A message stored in the mailbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Page id assigned by the store. Never changes.
    pub id: String,
    pub sender: String,
    pub recipient: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

/// A message that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub sender: String,
    pub recipient: String,
    pub body: String,
}

impl Message {
    /// Decode a mailbox row.
    ///
    /// Sender, recipient, and date are required. A missing or empty title
    /// decodes to an empty body.
    pub fn from_page(page: &Page) -> NmResult<Self> {
        let malformed = |reason: String| NmError::MalformedPage {
            id: page.id.clone(),
            reason,
        };

        let sender = page
            .text_property(properties::SENDER)
            .ok_or_else(|| malformed(format!("missing {} property", properties::SENDER)))?;
        let recipient = page
            .text_property(properties::RECIPIENT)
            .ok_or_else(|| malformed(format!("missing {} property", properties::RECIPIENT)))?;
        let body = page.text_property(properties::MESSAGE).unwrap_or_default();

        let date = page
            .date_property(properties::DATE)
            .ok_or_else(|| malformed(format!("missing {} value", properties::DATE)))?;
        let sent_at = parse_date_value(&date.start, date.time_zone.as_deref())
            .map_err(|e| malformed(e.to_string()))?;

        Ok(Self {
            id: page.id.clone(),
            sender,
            recipient,
            body,
            sent_at,
        })
    }

    /// Whether this message was exchanged between `a` and `b`, in either direction.
    pub fn involves_pair(&self, a: &str, b: &str) -> bool {
        (self.sender == a && self.recipient == b) || (self.sender == b && self.recipient == a)
    }

    /// Encode as a page, the inverse of [`Message::from_page`].
    pub fn to_page(&self) -> Page {
        let mut props = HashMap::new();
        props.insert(
            properties::MESSAGE.to_string(),
            PropertyValue::Title {
                title: segments(&self.body),
            },
        );
        props.insert(
            properties::SENDER.to_string(),
            PropertyValue::RichText {
                rich_text: segments(&self.sender),
            },
        );
        props.insert(
            properties::RECIPIENT.to_string(),
            PropertyValue::RichText {
                rich_text: segments(&self.recipient),
            },
        );
        props.insert(
            properties::DATE.to_string(),
            PropertyValue::Date {
                date: Some(DateValue {
                    start: format_sent_at(&self.sent_at),
                    end: None,
                    time_zone: None,
                }),
            },
        );

        Page {
            id: self.id.clone(),
            archived: false,
            created_time: Some(format_sent_at(&self.sent_at)),
            properties: props,
        }
    }
}

impl NewMessage {
    /// Create a new unsent message.
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            body: body.into(),
        }
    }

    /// Trim sender and recipient and reject blank ones. The body is kept verbatim.
    pub fn validate(self) -> NmResult<Self> {
        let sender = self.sender.trim().to_string();
        let recipient = self.recipient.trim().to_string();
        if sender.is_empty() {
            return Err(NmError::InvalidInput("sender must not be empty".into()));
        }
        if recipient.is_empty() {
            return Err(NmError::InvalidInput("recipient must not be empty".into()));
        }
        Ok(Self {
            sender,
            recipient,
            body: self.body,
        })
    }

    /// Property map for the page-creation request body.
    pub fn to_properties(&self, sent_at: &DateTime<Utc>) -> serde_json::Value {
        json!({
            (properties::MESSAGE): { "title": request_segments(&self.body) },
            (properties::SENDER): { "rich_text": request_segments(&self.sender) },
            (properties::RECIPIENT): { "rich_text": request_segments(&self.recipient) },
            (properties::DATE): { "date": { "start": format_sent_at(sent_at) } },
        })
    }

    /// Attach the store-assigned id and send time.
    pub fn into_message(self, id: impl Into<String>, sent_at: DateTime<Utc>) -> Message {
        Message {
            id: id.into(),
            sender: self.sender,
            recipient: self.recipient,
            body: self.body,
            sent_at,
        }
    }
}

/// RFC 3339 with millisecond precision and a `Z` suffix.
pub fn format_sent_at(sent_at: &DateTime<Utc>) -> String {
    sent_at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Split text into chunks of at most [`MAX_RICH_TEXT_CHARS`] chars.
pub fn chunk_text(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(MAX_RICH_TEXT_CHARS)
        .map(|c| c.iter().collect())
        .collect()
}

fn segments(text: &str) -> Vec<RichText> {
    chunk_text(text).into_iter().map(RichText::plain).collect()
}

fn request_segments(text: &str) -> serde_json::Value {
    chunk_text(text)
        .into_iter()
        .map(|content| json!({ "type": "text", "text": { "content": content } }))
        .collect()
}
