//! Mail commands: send, read, delete, clear, relationship.

use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use console::style;
use dialoguer::Confirm;

use nm_core::config::AppConfig;
use nm_core::error::{NmError, NmResult};
use nm_models::{DisplayZone, Message};

use crate::OutputFormat;

/// Run the send command.
pub async fn send(
    config: &AppConfig,
    sender: Option<String>,
    recipient: Option<String>,
    message: Option<String>,
    format: OutputFormat,
) -> NmResult<()> {
    let service = super::create_mail_service(config)?;
    let sender = super::value_or_prompt(sender, "Sender", false)?;
    let recipient = super::value_or_prompt(recipient, "Recipient", false)?;
    let body = super::value_or_prompt(message, "Message", true)?;

    let sent = service.send(&sender, &recipient, &body).await?;

    match format {
        OutputFormat::Json => {
            let zone = super::display_zone(config)?;
            print_json(&super::message_json(&sent, &zone))?;
        }
        OutputFormat::Text | OutputFormat::Table => {
            println!("{}", style("Message sent!").green());
        }
    }
    Ok(())
}

/// Run the read command.
pub async fn read(
    config: &AppConfig,
    recipient: Option<String>,
    format: OutputFormat,
) -> NmResult<()> {
    let service = super::create_mail_service(config)?;
    let zone = super::display_zone(config)?;
    let recipient = super::value_or_prompt(recipient, "Recipient", false)?;

    let messages = service.read(&recipient).await?;

    match format {
        OutputFormat::Json => {
            let list: Vec<_> = messages.iter().map(|m| super::message_json(m, &zone)).collect();
            print_json(&serde_json::json!({
                "recipient": recipient.trim(),
                "count": messages.len(),
                "messages": list,
            }))?;
        }
        OutputFormat::Table => print_table(&messages, &zone, "No messages found."),
        OutputFormat::Text => {
            if messages.is_empty() {
                println!("No messages found.");
            } else {
                println!("Messages ({}):", messages.len());
                println!();
                for msg in &messages {
                    println!("{}", super::inbox_block(msg, &zone));
                }
            }
        }
    }
    Ok(())
}

/// Run the delete command.
pub async fn delete(config: &AppConfig, id: Option<String>, format: OutputFormat) -> NmResult<()> {
    let service = super::create_mail_service(config)?;
    let id = super::value_or_prompt(id, "Message ID", false)?;

    service.delete(&id).await?;

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({ "deleted": id.trim() }))?,
        OutputFormat::Text | OutputFormat::Table => {
            println!("{}", style("Message deleted!").green());
        }
    }
    Ok(())
}

/// Run the clear command.
pub async fn clear(
    config: &AppConfig,
    recipient: Option<String>,
    yes: bool,
    format: OutputFormat,
) -> NmResult<()> {
    let service = super::create_mail_service(config)?;
    let recipient = super::value_or_prompt(recipient, "Recipient", false)?;

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete all messages for {}?", recipient.trim()))
            .default(false)
            .interact()
            .map_err(|e| NmError::Internal(e.to_string()))?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let report = service.clear(&recipient).await?;

    match format {
        OutputFormat::Json => print_json(&serde_json::to_value(&report)?)?,
        OutputFormat::Text | OutputFormat::Table => {
            if report.is_empty() {
                println!("No messages found.");
            } else {
                for _ in &report.archived {
                    println!("{}", style("Message deleted!").green());
                }
                for (id, err) in &report.failed {
                    println!("  {} {id}: {err}", style("FAIL").red().bold());
                }
                if report.failed.is_empty() {
                    println!("Cleared all messages for {}", report.recipient);
                } else {
                    println!(
                        "Cleared {} of {} messages for {}",
                        report.archived.len(),
                        report.archived.len() + report.failed.len(),
                        report.recipient
                    );
                }
            }
        }
    }

    if report.failed.is_empty() {
        Ok(())
    } else {
        Err(NmError::Internal(format!(
            "{} messages could not be deleted",
            report.failed.len()
        )))
    }
}

/// Run the relationship command.
pub async fn relationship(
    config: &AppConfig,
    person1: Option<String>,
    person2: Option<String>,
    format: OutputFormat,
) -> NmResult<()> {
    let service = super::create_mail_service(config)?;
    let zone = super::display_zone(config)?;
    let person1 = super::value_or_prompt(person1, "Person 1", false)?;
    let person2 = super::value_or_prompt(person2, "Person 2", false)?;

    let messages = service.relationship(&person1, &person2).await?;
    let (p1, p2) = (person1.trim(), person2.trim());

    match format {
        OutputFormat::Json => {
            let list: Vec<_> = messages.iter().map(|m| super::message_json(m, &zone)).collect();
            print_json(&serde_json::json!({
                "participants": [p1, p2],
                "count": messages.len(),
                "messages": list,
            }))?;
        }
        OutputFormat::Table => {
            print_table(&messages, &zone, &format!("No interactions found between {p1} and {p2}."))
        }
        OutputFormat::Text => {
            if messages.is_empty() {
                println!("No interactions found between {p1} and {p2}.");
            } else {
                println!("Interactions between {p1} and {p2} ({}):", messages.len());
                println!();
                for msg in &messages {
                    println!("{}", super::conversation_block(msg, &zone));
                }
            }
        }
    }
    Ok(())
}

fn print_json(value: &serde_json::Value) -> NmResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_table(messages: &[Message], zone: &DisplayZone, empty_text: &str) {
    if messages.is_empty() {
        println!("{empty_text}");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec!["ID", "From", "To", "Sent", "Message"]);
    for msg in messages {
        table.add_row(vec![
            msg.id.clone(),
            msg.sender.clone(),
            msg.recipient.clone(),
            zone.format(&msg.sent_at),
            super::truncate(&msg.body, 50),
        ]);
    }

    println!("{table}");
    println!("\n{} messages", messages.len());
}
