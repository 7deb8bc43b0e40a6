use anyhow::Result;
use chrono::{DateTime, Utc};
use pocadex_core::import::ImportReport;
use pocadex_core::models::{CollectionRow, Photocard, UserPhotocard};
use pocadex_parse::{DecodeError, ParsedFilename};
use serde::Serialize;

/// Result of decoding one command-line file name.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DecodeOutcome<'a> {
    Ok {
        filename: &'a str,
        result: ParsedFilename,
    },
    Error {
        filename: &'a str,
        kind: &'static str,
        message: String,
    },
}

impl<'a> DecodeOutcome<'a> {
    pub fn new(filename: &'a str, result: Result<ParsedFilename, DecodeError>) -> Self {
        match result {
            Ok(result) => Self::Ok { filename, result },
            Err(e) => Self::Error {
                filename,
                kind: e.kind(),
                message: e.to_string(),
            },
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Writes command results to stdout as tables or JSON.
pub struct Printer {
    json: bool,
}

impl Printer {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn decode_outcomes(&self, outcomes: &[DecodeOutcome]) -> Result<()> {
        if self.json {
            return print_json(&outcomes);
        }
        for outcome in outcomes {
            match outcome {
                DecodeOutcome::Ok { filename, result } => {
                    println!("{filename}");
                    println!("  category           {}", result.category);
                    println!("  album              {}", result.album_name);
                    println!("  store              {}", result.store.as_deref().unwrap_or("-"));
                    println!("  version            {}", result.version);
                    println!("  member             {}", result.member);
                    println!("  release type       {}", result.release_type);
                    println!("  release structure  {}", result.release_structure);
                }
                DecodeOutcome::Error { message, .. } => eprintln!("error: {message}"),
            }
        }
        Ok(())
    }

    /// `empty` is printed instead of a table when there are no cards.
    pub fn photocards(&self, cards: &[Photocard], empty: &str) -> Result<()> {
        if self.json {
            return print_json(&cards);
        }
        if cards.is_empty() {
            println!("{empty}");
            return Ok(());
        }
        println!(
            "{:>5}  {:<8} {:<16} {:<22} {:<18} {:<8} {:<12} {:<16}",
            "ID", "Member", "Category", "Album", "Store", "Version", "Type", "Structure"
        );
        println!("{}", "-".repeat(113));
        for c in cards {
            println!(
                "{:>5}  {:<8} {:<16} {:<22} {:<18} {:<8} {:<12} {:<16}",
                c.id,
                c.member,
                c.category,
                clip(&c.album_name, 22),
                clip(c.store.as_deref().unwrap_or("-"), 18),
                c.version,
                c.release_type,
                c.release_structure,
            );
        }
        Ok(())
    }

    pub fn import_report(&self, report: &ImportReport) -> Result<()> {
        if self.json {
            return print_json(report);
        }
        println!(
            "Import complete: {} scanned, {} imported, {} already in catalog, {} failed",
            report.files_scanned, report.imported, report.skipped, report.failed
        );
        if !report.undecodable.is_empty() {
            println!();
            println!("Could not decode {} file(s):", report.undecodable.len());
            for (path, err) in &report.undecodable {
                println!("  {}: {err}", path.display());
            }
        }
        Ok(())
    }

    pub fn collection_entry(&self, entry: &UserPhotocard) -> Result<()> {
        if self.json {
            return print_json(entry);
        }
        println!("Entry {} (photocard {})", entry.id, entry.photocard_id);
        println!("  condition  {}", entry.condition);
        println!("  acquired   {}", date(entry.acquired_date));
        println!("  notes      {}", entry.notes.as_deref().unwrap_or("-"));
        println!("  image      {}", entry.user_image_url);
        Ok(())
    }

    pub fn collection(&self, rows: &[CollectionRow]) -> Result<()> {
        if self.json {
            return print_json(&rows);
        }
        if rows.is_empty() {
            println!("Collection is empty.");
            return Ok(());
        }
        println!(
            "{:>5}  {:<8} {:<22} {:<18} {:<8} {:<10} {:>10}  {}",
            "ID", "Member", "Album", "Store", "Version", "Condition", "Acquired", "Notes"
        );
        println!("{}", "-".repeat(100));
        for row in rows {
            let (e, c) = (&row.entry, &row.photocard);
            println!(
                "{:>5}  {:<8} {:<22} {:<18} {:<8} {:<10} {:>10}  {}",
                e.id,
                c.member,
                clip(&c.album_name, 22),
                clip(c.store.as_deref().unwrap_or("-"), 18),
                c.version,
                e.condition,
                date(e.acquired_date),
                e.notes.as_deref().unwrap_or(""),
            );
        }
        Ok(())
    }

    pub fn message(&self, text: &str) -> Result<()> {
        if self.json {
            return print_json(&serde_json::json!({ "message": text }));
        }
        println!("{text}");
        Ok(())
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn date(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".into())
}

/// Shorten to `width` characters, marking the cut with `...`.
fn clip(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let kept: String = s.chars().take(width.saturating_sub(3)).collect();
    format!("{kept}...")
}
