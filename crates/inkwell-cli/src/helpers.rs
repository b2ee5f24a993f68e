//! Input and parsing helpers shared by command handlers.

use std::io::{self, IsTerminal, Read};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use dialoguer::Input;
use uuid::Uuid;

use crate::errors::CliError;

/// Parse a datetime string (RFC 3339 or YYYY-MM-DD).
pub fn parse_datetime(value: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let naive = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| anyhow::anyhow!("Invalid date value: {}", value))?;
        return Ok(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
    }

    Err(CliError::invalid_input(format!(
        "Invalid date/time (expected RFC 3339 or YYYY-MM-DD): {}",
        value
    ))
    .into())
}

/// Parse a duration string (e.g., "7d", "24h").
pub fn parse_duration(value: &str) -> anyhow::Result<Duration> {
    if value.len() < 2 || !value.is_ascii() {
        return Err(CliError::invalid_input(format!(
            "Invalid duration: {} (expected <number><unit>)",
            value
        ))
        .into());
    }

    let (num_str, unit) = value.split_at(value.len() - 1);
    let amount: i64 = num_str
        .parse()
        .map_err(|_| CliError::invalid_input(format!("Invalid duration number: {}", value)))?;
    if amount <= 0 {
        return Err(CliError::invalid_input(format!("Duration must be positive: {}", value)).into());
    }

    let window = match unit {
        "d" => Duration::try_days(amount),
        "h" => Duration::try_hours(amount),
        "m" => Duration::try_minutes(amount),
        "s" => Duration::try_seconds(amount),
        _ => {
            return Err(CliError::invalid_input(format!(
                "Invalid duration unit: {} (use d/h/m/s)",
                unit
            ))
            .into())
        }
    };
    window.ok_or_else(|| CliError::invalid_input(format!("Duration too large: {}", value)).into())
}

/// Start of a window of length `window` ending at `now`.
pub fn window_start(now: DateTime<Utc>, window: Duration) -> anyhow::Result<DateTime<Utc>> {
    now.checked_sub_signed(window).ok_or_else(|| {
        CliError::invalid_input(format!("Time window reaches before the earliest date: {}", window))
            .into()
    })
}

/// Parse an entry id argument.
pub fn parse_entry_id(value: &str) -> anyhow::Result<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| CliError::invalid_input(format!("Invalid entry ID: {}", e)).into())
}

/// Resolve the entry title from the flag or an interactive prompt.
pub fn read_title(
    interactive: bool,
    title: Option<String>,
    current: Option<&str>,
) -> anyhow::Result<String> {
    if let Some(value) = title {
        if value.trim().is_empty() {
            return Err(CliError::invalid_input("--title cannot be empty").into());
        }
        return Ok(value);
    }
    if let Some(existing) = current {
        return Ok(existing.to_string());
    }
    if !interactive {
        return Err(CliError::invalid_input("--title is required with --no-input or without a TTY").into());
    }
    Input::<String>::new()
        .with_prompt("Title")
        .interact_text()
        .map_err(|e| anyhow::anyhow!("Failed to read title: {}", e))
}

/// Resolve the entry body from the flag, stdin, or `$EDITOR`.
///
/// `current` seeds the editor when editing an existing entry.
pub fn read_entry_body(
    no_input: bool,
    body: Option<String>,
    current: Option<&str>,
) -> anyhow::Result<String> {
    if let Some(value) = body {
        if value.trim().is_empty() {
            return Err(CliError::invalid_input("--body cannot be empty").into());
        }
        return Ok(value);
    }

    if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
        let trimmed = buffer.trim_end().to_string();
        if trimmed.is_empty() {
            if let Some(existing) = current {
                return Ok(existing.to_string());
            }
            return Err(CliError::invalid_input("No input provided on stdin").into());
        }
        return Ok(trimmed);
    }

    if no_input {
        if let Some(existing) = current {
            return Ok(existing.to_string());
        }
        return Err(CliError::invalid_input("--no-input requires --body or content from stdin").into());
    }

    read_body_from_editor(current)
}

/// Open $EDITOR to compose entry body.
fn read_body_from_editor(initial: Option<&str>) -> anyhow::Result<String> {
    let editor = std::env::var("EDITOR").map_err(|_| {
        CliError::invalid_input("$EDITOR is not set; use --body or pipe content via stdin")
    })?;

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| anyhow::anyhow!("System time error: {}", e))?
        .as_nanos();
    let filename = format!("inkwell_entry_{}_{}.md", std::process::id(), nanos);
    let path = std::env::temp_dir().join(filename);

    std::fs::write(&path, initial.unwrap_or(""))
        .map_err(|e| anyhow::anyhow!("Failed to create temp file: {}", e))?;

    let status = Command::new(editor)
        .arg(&path)
        .status()
        .map_err(|e| anyhow::anyhow!("Failed to launch editor: {}", e))?;
    if !status.success() {
        let _ = std::fs::remove_file(&path);
        return Err(anyhow::anyhow!("Editor exited with failure"));
    }

    let contents = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read temp file: {}", e))?;
    let _ = std::fs::remove_file(&path);

    let trimmed = contents.trim_end().to_string();
    if trimmed.is_empty() {
        return Err(CliError::invalid_input("Entry body is empty").into());
    }

    Ok(trimmed)
}
