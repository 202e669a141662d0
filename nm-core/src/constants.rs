//! Application-wide constants.

/// Application name.
pub const APP_NAME: &str = "NotionMail";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prefix of the rolling log file.
pub const LOG_FILE_PREFIX: &str = "notionmail.log";

/// Default Notion REST API root.
pub const DEFAULT_API_BASE_URL: &str = "https://api.notion.com/v1";

/// Notion API version sent in the `Notion-Version` header.
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Default API timeout in milliseconds.
pub const DEFAULT_API_TIMEOUT_MS: u64 = 30_000;

/// Largest page size accepted by a database query.
pub const MAX_QUERY_PAGE_SIZE: u32 = 100;

/// Maximum characters in a single rich-text segment.
pub const MAX_RICH_TEXT_CHARS: usize = 2000;

/// Timezone used to display message timestamps unless configured otherwise.
pub const DEFAULT_DISPLAY_TIMEZONE: &str = "America/Los_Angeles";

/// Environment variable holding the integration token.
pub const ENV_TOKEN: &str = "NOTION_TOKEN";

/// Environment variable holding the mailbox database id.
pub const ENV_DATABASE_ID: &str = "NOTION_DATABASE_ID";

/// Older name for [`ENV_DATABASE_ID`], still honored.
pub const ENV_DATABASE_ID_LEGACY: &str = "PAGE_ID";

/// Property names of the mailbox database.
pub mod properties {
    /// Title property holding the message body.
    pub const MESSAGE: &str = "Message";
    /// Rich-text property holding the sender name.
    pub const SENDER: &str = "Sender";
    /// Rich-text property holding the recipient name.
    pub const RECIPIENT: &str = "Recipient";
    /// Date property holding the send instant.
    pub const DATE: &str = "Date";

    /// Every property the mailbox needs, paired with its Notion type.
    pub const SCHEMA: &[(&str, &str)] = &[
        (MESSAGE, "title"),
        (SENDER, "rich_text"),
        (RECIPIENT, "rich_text"),
        (DATE, "date"),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_covers_all_properties() {
        assert_eq!(properties::SCHEMA.len(), 4);
        assert!(properties::SCHEMA.contains(&("Message", "title")));
        assert!(properties::SCHEMA.contains(&("Date", "date")));
    }
}
