//! Mail service: the five mailbox operations.
//!
//! Every operation is one or two store round trips. Rows that do not decode
//! as messages are logged and skipped rather than failing the whole listing.

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use nm_api::filter::{participant_filter, recipient_filter, Filter};
use nm_api::DatabaseInfo;
use nm_core::config::MatchMode;
use nm_core::error::{NmError, NmResult};
use nm_models::{merge_conversation, Message, NewMessage, Page};

use crate::store::MailboxStore;

/// Outcome of clearing a recipient's mailbox.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClearReport {
    /// Recipient whose mail was cleared.
    pub recipient: String,
    /// Ids that were archived.
    pub archived: Vec<String>,
    /// Ids that could not be archived, with the error text.
    pub failed: Vec<(String, String)>,
}

impl ClearReport {
    /// Whether the mailbox had nothing to clear.
    pub fn is_empty(&self) -> bool {
        self.archived.is_empty() && self.failed.is_empty()
    }
}

/// Mailbox operations over a store.
pub struct MailService<S> {
    store: S,
    match_mode: MatchMode,
}

impl<S: MailboxStore> MailService<S> {
    /// Create a service with the default (substring) match mode.
    pub fn new(store: S) -> Self {
        Self {
            store,
            match_mode: MatchMode::default(),
        }
    }

    /// Set how names are matched against Sender / Recipient.
    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Send a message, stamped with the current UTC time.
    pub async fn send(&self, sender: &str, recipient: &str, body: &str) -> NmResult<Message> {
        let message = NewMessage::new(sender, recipient, body).validate()?;
        let sent_at = Utc::now();
        let page = self.store.create(&message, sent_at).await?;
        info!(id = %page.id, "message sent from {} to {}", message.sender, message.recipient);

        // Fall back to the local copy if the store echoes a partial row.
        Ok(Message::from_page(&page).unwrap_or_else(|e| {
            debug!("created row did not decode ({e}), using local copy");
            message.into_message(page.id.clone(), sent_at)
        }))
    }

    /// All messages addressed to `recipient`, oldest first.
    pub async fn read(&self, recipient: &str) -> NmResult<Vec<Message>> {
        let recipient = non_blank(recipient, "recipient")?;
        let filter = recipient_filter(recipient, self.match_mode);
        let mut messages = self.fetch(&filter).await?;
        sort_chronologically(&mut messages);
        debug!("{} messages for {recipient}", messages.len());
        Ok(messages)
    }

    /// Archive a single message.
    pub async fn delete(&self, id: &str) -> NmResult<()> {
        let id = non_blank(id, "message id")?;
        self.store.archive(id).await?;
        info!(id, "message deleted");
        Ok(())
    }

    /// Archive every message addressed to `recipient`.
    ///
    /// A failure on one message is recorded and the rest are still archived.
    pub async fn clear(&self, recipient: &str) -> NmResult<ClearReport> {
        let recipient = non_blank(recipient, "recipient")?;
        let rows = self
            .store
            .query(&recipient_filter(recipient, self.match_mode))
            .await?;

        let mut report = ClearReport {
            recipient: recipient.to_string(),
            ..ClearReport::default()
        };
        for row in rows {
            match self.store.archive(&row.id).await {
                Ok(()) => report.archived.push(row.id),
                Err(e) => {
                    warn!(id = %row.id, "failed to archive: {e}");
                    report.failed.push((row.id, e.to_string()));
                }
            }
        }

        info!(
            "cleared {} messages for {recipient} ({} failed)",
            report.archived.len(),
            report.failed.len()
        );
        Ok(report)
    }

    /// The conversation between two people, oldest first.
    pub async fn relationship(&self, person1: &str, person2: &str) -> NmResult<Vec<Message>> {
        let person1 = non_blank(person1, "person 1")?;
        let person2 = non_blank(person2, "person 2")?;

        let side1 = self.fetch(&participant_filter(person1, self.match_mode)).await?;
        let side2 = self.fetch(&participant_filter(person2, self.match_mode)).await?;
        Ok(merge_conversation(person1, person2, side1, side2))
    }

    /// Retrieve the backing database and verify its property schema.
    pub async fn check(&self) -> NmResult<DatabaseInfo> {
        let info = self.store.describe().await?;
        if info.archived {
            return Err(NmError::Schema(format!("database {} is archived", info.id)));
        }
        info.check_mailbox_schema()?;
        Ok(info)
    }

    async fn fetch(&self, filter: &Filter) -> NmResult<Vec<Message>> {
        let rows = self.store.query(filter).await?;
        Ok(decode_rows(&rows))
    }
}

fn decode_rows(rows: &[Page]) -> Vec<Message> {
    rows.iter()
        .filter_map(|row| match Message::from_page(row) {
            Ok(m) => Some(m),
            Err(e) => {
                warn!("skipping row: {e}");
                None
            }
        })
        .collect()
}

fn sort_chronologically(messages: &mut [Message]) {
    messages.sort_by(|a, b| a.sent_at.cmp(&b.sent_at).then_with(|| a.id.cmp(&b.id)));
}

fn non_blank<'a>(value: &'a str, what: &str) -> NmResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(NmError::InvalidInput(format!("{what} must not be empty")))
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank("  bob ", "recipient").unwrap(), "bob");
        let err = non_blank(" ", "recipient").unwrap_err();
        assert_eq!(err.to_string(), "invalid input: recipient must not be empty");
    }

    #[tokio::test]
    async fn test_send_returns_decoded_message() {
        let service = MailService::new(MemoryStore::new());
        let before = Utc::now();
        let msg = service.send("alice", " bob ", "hello").await.unwrap();
        assert_eq!(msg.recipient, "bob");
        assert_eq!(msg.body, "hello");
        assert!(msg.sent_at >= before - chrono::Duration::milliseconds(1));
        assert!(!msg.id.is_empty());
    }

    #[tokio::test]
    async fn test_empty_clear_report() {
        let service = MailService::new(MemoryStore::new());
        let report = service.clear("nobody").await.unwrap();
        assert!(report.is_empty());
        assert_eq!(report.recipient, "nobody");
    }
}
