//! Directory import.
//!
//! Walks a folder of card images, decodes each file name and adds the
//! results to the catalog in one bulk import.

use std::path::{Path, PathBuf};

use pocadex_parse::DecodeError;
use serde::Serialize;
use walkdir::WalkDir;

use crate::config::ImportConfig;
use crate::error::PocadexError;
use crate::models::NewPhotocard;
use crate::storage::Storage;

/// Image file extensions to consider.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Result of a directory import.
#[derive(Debug, Default, Serialize)]
pub struct ImportReport {
    pub files_scanned: u32,
    pub imported: u32,
    /// Already in the catalog.
    pub skipped: u32,
    /// Rejected by the database.
    pub failed: u32,
    pub undecodable: Vec<(PathBuf, DecodeError)>,
}

/// Import every image under `dir` whose name decodes.
pub fn import_directory(
    storage: &Storage,
    dir: &Path,
    config: &ImportConfig,
) -> Result<ImportReport, PocadexError> {
    if !dir.is_dir() {
        return Err(PocadexError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is not a directory", dir.display()),
        )));
    }

    tracing::info!(path = %dir.display(), recursive = config.recursive, "Scanning import folder");

    let mut report = ImportReport::default();
    let mut cards = Vec::new();
    let max_depth = if config.recursive { usize::MAX } else { 1 };

    for entry in WalkDir::new(dir)
        .max_depth(max_depth)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
            .unwrap_or(false);
        if !is_image {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            tracing::warn!(path = %path.display(), "Skipping file name that is not UTF-8");
            continue;
        };

        report.files_scanned += 1;

        match NewPhotocard::decode(file_name, image_url(config, file_name, path)) {
            Ok(card) => cards.push(card),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Undecodable file name");
                report.undecodable.push((path.to_path_buf(), e));
            }
        }
    }

    let summary = storage.bulk_import(&cards)?;
    report.imported = summary.imported.len() as u32;
    report.skipped = summary.skipped.len() as u32;
    report.failed = summary.failed.len() as u32;

    tracing::info!(
        scanned = report.files_scanned,
        imported = report.imported,
        skipped = report.skipped,
        undecodable = report.undecodable.len(),
        "Import folder scan complete"
    );

    Ok(report)
}

fn image_url(config: &ImportConfig, file_name: &str, path: &Path) -> String {
    match &config.image_base_url {
        Some(base) => format!("{}/{file_name}", base.trim_end_matches('/')),
        None => path.to_string_lossy().into_owned(),
    }
}
