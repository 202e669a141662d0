//! CLI command implementations.

pub mod mail;
pub mod check;
pub mod settings;

use dialoguer::Input;

use nm_core::config::AppConfig;
use nm_core::error::{NmError, NmResult};
use nm_models::{DisplayZone, Message};
use nm_services::{MailService, NotionStore};

/// Helper to create the mail service from config.
pub fn create_mail_service(config: &AppConfig) -> NmResult<MailService<NotionStore>> {
    let store = NotionStore::from_config(config)?;
    Ok(MailService::new(store).with_match_mode(config.mailbox.match_mode))
}

/// Helper to resolve the display timezone from config.
pub fn display_zone(config: &AppConfig) -> NmResult<DisplayZone> {
    DisplayZone::from_name(&config.mailbox.timezone)
}

/// Use the given value or prompt for it on the terminal.
pub fn value_or_prompt(value: Option<String>, prompt: &str, allow_empty: bool) -> NmResult<String> {
    if let Some(v) = value {
        return Ok(v);
    }
    Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(allow_empty)
        .interact_text()
        .map_err(|e| NmError::Internal(e.to_string()))
}

/// Block shown per message by `read`.
pub fn inbox_block(msg: &Message, zone: &DisplayZone) -> String {
    format!(
        "ID: {}\nfrom: {}\non: {}\n{}\n",
        msg.id,
        msg.sender,
        zone.format(&msg.sent_at),
        msg.body
    )
}

/// Block shown per message by `relationship`.
pub fn conversation_block(msg: &Message, zone: &DisplayZone) -> String {
    format!(
        "ID: {}\nfrom: {}\nto: {}\non: {}\n{}\n",
        msg.id,
        msg.sender,
        msg.recipient,
        zone.format(&msg.sent_at),
        msg.body
    )
}

/// JSON view of a message with its display-time rendering.
pub fn message_json(msg: &Message, zone: &DisplayZone) -> serde_json::Value {
    serde_json::json!({
        "id": msg.id,
        "sender": msg.sender,
        "recipient": msg.recipient,
        "body": msg.body,
        "sent_at": msg.sent_at,
        "sent_at_local": zone.format(&msg.sent_at),
    })
}

/// Truncate a string to a maximum number of chars, appending an ellipsis if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max_len).collect()
    }
}
