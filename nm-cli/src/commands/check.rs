//! Check command - verify credentials and the mailbox database layout.

use console::style;

use nm_core::config::AppConfig;
use nm_core::constants::properties;
use nm_core::error::NmResult;

use crate::OutputFormat;

/// Run the check command.
pub async fn run(config: &AppConfig, format: OutputFormat) -> NmResult<()> {
    let service = super::create_mail_service(config)?;

    let start = std::time::Instant::now();
    let info = service.check().await?;
    let latency_ms = start.elapsed().as_millis();

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "database_id": info.id,
                "title": info.title_text(),
                "schema_ok": true,
                "match_mode": config.mailbox.match_mode.to_string(),
                "timezone": config.mailbox.timezone,
                "latency_ms": latency_ms,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text | OutputFormat::Table => {
            println!("{}", style("NotionMail Status").bold().underlined());
            println!();
            println!("  Database:    {}", info.title_text());
            println!("  Id:          {}", info.id);
            println!("  Latency:     {latency_ms}ms");
            println!("  Match mode:  {}", config.mailbox.match_mode);
            println!("  Timezone:    {}", config.mailbox.timezone);
            println!();
            for (name, kind) in properties::SCHEMA {
                println!("  {} {name} ({kind})", style("OK").green().bold());
            }
        }
    }

    Ok(())
}
