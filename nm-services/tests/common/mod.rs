//! Shared test utilities for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use nm_models::Message;
use nm_services::{MailService, MemoryStore};

/// A fixed instant `minutes` after 2024-03-10 09:00 UTC.
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap() + chrono::Duration::minutes(minutes)
}

/// Build a stored message.
pub fn message(id: &str, from: &str, to: &str, body: &str, minutes: i64) -> Message {
    Message {
        id: id.to_string(),
        sender: from.to_string(),
        recipient: to.to_string(),
        body: body.to_string(),
        sent_at: at(minutes),
    }
}

/// A service over an empty in-memory mailbox.
pub fn empty_service() -> MailService<MemoryStore> {
    MailService::new(MemoryStore::new())
}

/// A service over a mailbox seeded with a small cast:
///
/// - alice <-> bob: 3 messages
/// - alice -> bobby: 1 message (substring trap for "bob")
/// - carol -> bob: 1 message
/// - dave -> alice: 1 message
pub fn seeded_service() -> MailService<MemoryStore> {
    let store = MemoryStore::with_messages(vec![
        message("m1", "alice", "bob", "lunch?", 0),
        message("m2", "bob", "alice", "sure, noon", 5),
        message("m3", "alice", "bobby", "wrong bob", 6),
        message("m4", "carol", "bob", "report is ready", 7),
        message("m5", "alice", "bob", "see you there", 10),
        message("m6", "dave", "alice", "ping", 12),
    ]);
    MailService::new(store)
}
