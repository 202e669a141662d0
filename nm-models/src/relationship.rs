//! Two-party conversation view.
//!
//! The store can only answer one-sided questions ("everything involving
//! alice"). The conversation between two people is assembled from two such
//! result sets: keep the messages exchanged between exactly those two, drop
//! duplicates, and order them chronologically.

use std::collections::HashSet;

use crate::models::message::Message;

/// Merge two one-sided result sets into the conversation between `person1` and `person2`.
///
/// Messages are matched on exact sender / recipient equality in either
/// direction. Duplicates are detected by id; the first occurrence is kept.
/// The result is ordered by `sent_at`, oldest first, ties broken by id.
pub fn merge_conversation(
    person1: &str,
    person2: &str,
    results1: Vec<Message>,
    results2: Vec<Message>,
) -> Vec<Message> {
    let mut seen = HashSet::new();
    let mut merged: Vec<Message> = results1
        .into_iter()
        .chain(results2)
        .filter(|m| m.involves_pair(person1, person2))
        .filter(|m| seen.insert(m.id.clone()))
        .collect();

    merged.sort_by(|a, b| a.sent_at.cmp(&b.sent_at).then_with(|| a.id.cmp(&b.id)));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn msg(id: &str, from: &str, to: &str, minute: u32) -> Message {
        Message {
            id: id.into(),
            sender: from.into(),
            recipient: to.into(),
            body: format!("{from} -> {to}"),
            sent_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, minute, 0).unwrap(),
        }
    }

    #[test]
    fn test_merge_dedupes_and_orders() {
        let a_to_b = msg("1", "alice", "bob", 5);
        let b_to_a = msg("2", "bob", "alice", 1);
        let a_to_c = msg("3", "alice", "carol", 2);
        let b_to_d = msg("4", "bob", "dave", 3);

        let alice_side = vec![a_to_b.clone(), b_to_a.clone(), a_to_c];
        let bob_side = vec![b_to_a.clone(), a_to_b.clone(), b_to_d];

        let merged = merge_conversation("alice", "bob", alice_side, bob_side);
        let ids: Vec<&str> = merged.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn test_merge_is_symmetric() {
        let side1 = vec![msg("1", "alice", "bob", 1), msg("2", "bob", "alice", 2)];
        let side2 = vec![msg("2", "bob", "alice", 2), msg("3", "alice", "bob", 3)];
        let forward = merge_conversation("alice", "bob", side1.clone(), side2.clone());
        let backward = merge_conversation("bob", "alice", side2, side1);
        assert_eq!(forward, backward);
        assert_eq!(forward.len(), 3);
    }

    #[test]
    fn test_substring_hits_are_dropped() {
        // A "contains" query for bob also returns bobby's mail.
        let side1 = vec![msg("1", "alice", "bobby", 1)];
        let side2 = vec![msg("1", "alice", "bobby", 1), msg("2", "bob", "alice", 2)];
        let merged = merge_conversation("alice", "bob", side1, side2);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, "2");
    }

    #[test]
    fn test_ties_broken_by_id() {
        let merged = merge_conversation(
            "alice",
            "bob",
            vec![msg("b", "alice", "bob", 7)],
            vec![msg("a", "bob", "alice", 7)],
        );
        let ids: Vec<&str> = merged.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_no_interactions() {
        let merged = merge_conversation(
            "alice",
            "bob",
            vec![msg("1", "alice", "carol", 1)],
            Vec::new(),
        );
        assert!(merged.is_empty());
    }

    #[test]
    fn test_self_conversation() {
        let merged = merge_conversation(
            "alice",
            "alice",
            vec![msg("1", "alice", "alice", 1), msg("2", "alice", "bob", 2)],
            vec![msg("1", "alice", "alice", 1)],
        );
        assert_eq!(merged.len(), 1);
    }
}
