//! Config commands.

use std::path::Path;

use clap::Subcommand;
use console::style;

use nm_core::config::{AppConfig, MatchMode};
use nm_core::error::{NmError, NmResult};
use nm_models::DisplayZone;

use crate::OutputFormat;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration (token masked).
    Show,
    /// Print the config file path.
    Path,
    /// Write a default config file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Get a specific setting value by key path.
    Get {
        /// Setting key path (e.g., "notion.database_id", "mailbox.match_mode").
        key: String,
    },
    /// Set a specific setting value by key path.
    Set {
        /// Setting key path (e.g., "notion.database_id", "mailbox.match_mode").
        key: String,
        /// New value.
        value: String,
    },
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

fn mask_token(token: &str) -> String {
    if token.is_empty() {
        "(not set)".to_string()
    } else {
        let prefix: String = token.chars().take(4).collect();
        format!("{prefix}********")
    }
}

/// Resolve a dot-separated key path to a value from the config.
fn get_setting_value(cfg: &AppConfig, key: &str) -> Option<String> {
    match key {
        "notion.token" => Some(mask_token(&cfg.notion.token)),
        "notion.database_id" => Some(cfg.notion.database_id.clone()),
        "notion.base_url" => Some(cfg.notion.base_url.clone()),
        "notion.notion_version" => Some(cfg.notion.notion_version.clone()),
        "notion.api_timeout_ms" => Some(cfg.notion.api_timeout_ms.to_string()),
        "mailbox.match_mode" => Some(cfg.mailbox.match_mode.to_string()),
        "mailbox.timezone" => Some(cfg.mailbox.timezone.clone()),
        "logging.level" => Some(cfg.logging.level.clone()),
        "logging.directory" => Some(cfg.logging.directory.clone()),
        "logging.json_output" => Some(cfg.logging.json_output.to_string()),
        _ => None,
    }
}

/// Apply a value to a dot-separated key path on the config.
fn set_setting_value(cfg: &mut AppConfig, key: &str, value: &str) -> Result<(), String> {
    match key {
        "notion.token" => cfg.notion.token = value.trim().to_string(),
        "notion.database_id" => {
            cfg.notion.database_id = AppConfig::normalize_database_id(value);
        }
        "notion.base_url" => {
            let url = value.trim().trim_end_matches('/');
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("expected an http(s) URL".to_string());
            }
            cfg.notion.base_url = url.to_string();
        }
        "notion.notion_version" => cfg.notion.notion_version = value.trim().to_string(),
        "notion.api_timeout_ms" => {
            cfg.notion.api_timeout_ms = value.parse().map_err(|_| "invalid integer".to_string())?;
        }
        "mailbox.match_mode" => {
            cfg.mailbox.match_mode = value.parse::<MatchMode>().map_err(|e| e.to_string())?;
        }
        "mailbox.timezone" => {
            let zone = DisplayZone::from_name(value).map_err(|e| e.to_string())?;
            cfg.mailbox.timezone = zone.name().to_string();
        }
        "logging.level" => {
            let v = value.trim().to_lowercase();
            if !LOG_LEVELS.contains(&v.as_str()) {
                return Err("expected one of: trace, debug, info, warn, error".to_string());
            }
            cfg.logging.level = v;
        }
        "logging.directory" => cfg.logging.directory = value.trim().to_string(),
        "logging.json_output" => {
            cfg.logging.json_output = value.parse().map_err(|_| "expected true/false".to_string())?;
        }
        _ => return Err(format!("unknown setting key: {key}")),
    }
    Ok(())
}

fn print_settings_text(cfg: &AppConfig) {
    println!("{}", style("Notion").bold().underlined());
    println!("  notion.token              {}", mask_token(&cfg.notion.token));
    println!("  notion.database_id        {}", cfg.notion.database_id);
    println!("  notion.base_url           {}", cfg.notion.base_url);
    println!("  notion.notion_version     {}", cfg.notion.notion_version);
    println!("  notion.api_timeout_ms     {}", cfg.notion.api_timeout_ms);

    println!();
    println!("{}", style("Mailbox").bold().underlined());
    println!("  mailbox.match_mode        {}", cfg.mailbox.match_mode);
    println!("  mailbox.timezone          {}", cfg.mailbox.timezone);

    println!();
    println!("{}", style("Logging").bold().underlined());
    println!("  logging.level             {}", cfg.logging.level);
    println!("  logging.directory         {}", cfg.logging.directory);
    println!("  logging.json_output       {}", cfg.logging.json_output);
}

fn settings_json(cfg: &AppConfig) -> serde_json::Value {
    serde_json::json!({
        "notion": {
            "token": mask_token(&cfg.notion.token),
            "database_id": cfg.notion.database_id,
            "base_url": cfg.notion.base_url,
            "notion_version": cfg.notion.notion_version,
            "api_timeout_ms": cfg.notion.api_timeout_ms,
        },
        "mailbox": {
            "match_mode": cfg.mailbox.match_mode.to_string(),
            "timezone": cfg.mailbox.timezone,
        },
        "logging": {
            "level": cfg.logging.level,
            "directory": cfg.logging.directory,
            "json_output": cfg.logging.json_output,
        },
    })
}

/// Run a config action.
///
/// `config` is the effective configuration (file plus environment). Writes go
/// through the file alone so environment credentials never end up on disk.
pub fn run(
    config: &AppConfig,
    config_path: &Path,
    action: ConfigAction,
    format: OutputFormat,
) -> NmResult<()> {
    match action {
        ConfigAction::Show => match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&settings_json(config))?);
            }
            OutputFormat::Text | OutputFormat::Table => print_settings_text(config),
        },
        ConfigAction::Path => println!("{}", config_path.display()),
        ConfigAction::Init { force } => {
            if config_path.exists() && !force {
                return Err(NmError::Config(format!(
                    "{} already exists (use --force to overwrite)",
                    config_path.display()
                )));
            }
            AppConfig::default().save_to_file(config_path)?;
            println!(
                "{} Wrote default config to {}",
                style("OK").green().bold(),
                config_path.display()
            );
        }
        ConfigAction::Get { key } => match get_setting_value(config, &key) {
            Some(value) => match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::json!({ "key": key, "value": value }));
                }
                OutputFormat::Text | OutputFormat::Table => println!("{key} = {value}"),
            },
            None => {
                return Err(NmError::InvalidInput(format!(
                    "unknown setting key: {key} (see `notionmail config show`)"
                )));
            }
        },
        ConfigAction::Set { key, value } => {
            let mut on_disk = if config_path.exists() {
                AppConfig::load_from_file(config_path)?
            } else {
                AppConfig::default()
            };
            set_setting_value(&mut on_disk, &key, &value)
                .map_err(|e| NmError::InvalidInput(format!("failed to set {key}: {e}")))?;
            on_disk.save_to_file(config_path)?;

            let shown = get_setting_value(&on_disk, &key).unwrap_or_default();
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::json!({ "key": key, "value": shown, "saved": true }));
                }
                OutputFormat::Text | OutputFormat::Table => {
                    println!("{} {key} = {shown}", style("SET").green().bold());
                }
            }
        }
    }

    Ok(())
}
