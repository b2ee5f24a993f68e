//! Output formatting helpers for the CLI.

use std::collections::HashMap;
use std::io::IsTerminal;

use comfy_table::presets::NOTHING;
use comfy_table::{Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;
use uuid::Uuid;

use inkwell_core::{JournalEntry, Listing};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
const SUMMARY_CHARS: usize = 60;

/// Feedback text per entry, when requested.
pub type FeedbackMap = HashMap<Uuid, String>;

/// First line of the content, shortened for table display.
pub fn entry_summary(entry: &JournalEntry) -> String {
    let first_line = entry.content.lines().next().unwrap_or("");
    let mut summary: String = first_line.chars().take(SUMMARY_CHARS).collect();
    if first_line.chars().count() > SUMMARY_CHARS || entry.content.lines().nth(1).is_some() {
        summary.push('…');
    }
    summary
}

/// Convert an entry to JSON for output.
pub fn entry_json(entry: &JournalEntry, feedback: Option<&String>) -> serde_json::Value {
    let mut value = serde_json::json!({
        "id": entry.id,
        "title": entry.title,
        "content": entry.content,
        "timestamp": entry.timestamp,
    });
    if let Some(text) = feedback {
        value["feedback"] = serde_json::Value::String(text.clone());
    }
    value
}

/// Convert a listing to JSON, including skipped entry ids.
pub fn listing_json(listing: &Listing, feedback: &FeedbackMap) -> serde_json::Value {
    let entries: Vec<serde_json::Value> = listing
        .entries
        .iter()
        .map(|entry| entry_json(entry, feedback.get(&entry.id)))
        .collect();
    serde_json::json!({
        "entries": entries,
        "skipped": listing.skipped,
    })
}

/// Notice shown when some entries could not be decrypted.
pub fn skipped_notice(count: usize) -> Option<String> {
    match count {
        0 => None,
        1 => Some("1 entry could not be decrypted with this passphrase.".to_string()),
        n => Some(format!(
            "{} entries could not be decrypted with this passphrase.",
            n
        )),
    }
}

/// Print the skipped-entry notice to stderr, highlighted on a terminal.
pub fn print_skipped_notice(count: usize) {
    if let Some(notice) = skipped_notice(count) {
        if std::io::stderr().is_terminal() {
            eprintln!("{}", notice.yellow());
        } else {
            eprintln!("{}", notice);
        }
    }
}

/// Print a listing as a borderless table.
pub fn print_listing(listing: &Listing, feedback: &FeedbackMap, quiet: bool) {
    if listing.entries.is_empty() {
        if !quiet {
            println!("No entries found.");
        }
    } else {
        let mut table = Table::new();
        table.load_preset(NOTHING);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        if !quiet {
            table.set_header(vec!["ID", "Date", "Title", "Summary"]);
        }
        for entry in &listing.entries {
            table.add_row(vec![
                Cell::new(entry.id),
                Cell::new(entry.timestamp.format(TIMESTAMP_FORMAT)),
                Cell::new(&entry.title),
                Cell::new(entry_summary(entry)),
            ]);
        }
        println!("{}", table);

        for entry in &listing.entries {
            if let Some(text) = feedback.get(&entry.id) {
                println!();
                println!("Feedback on \"{}\":", entry.title);
                println!("  {}", text);
            }
        }
    }
    print_skipped_notice(listing.skipped_count());
}

/// Print a single entry in human-readable format.
pub fn print_entry(entry: &JournalEntry, feedback: Option<&String>, quiet: bool) {
    if !quiet {
        println!("ID: {}", entry.id);
        println!("Date: {}", entry.timestamp.format(TIMESTAMP_FORMAT));
        println!("Title: {}", entry.title);
        println!();
    }
    println!("{}", entry.content);
    if let Some(text) = feedback {
        println!();
        println!("Feedback:");
        println!("  {}", text);
    }
}
