//! Template and asset discovery
//!
//! Templates are found with the ignore crate, so `.gitignore`d drafts and
//! hidden files never become pages. Static assets are walked with walkdir and
//! copied as they are, dotfiles included.

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::paths::has_extension;

/// Find template files under a directory, sorted by path
pub fn find_templates(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut builder = WalkBuilder::new(dir);
    builder.hidden(true).git_ignore(true).git_exclude(true);

    let mut templates = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                tracing::warn!("skipping unreadable entry: {}", err);
                continue;
            }
        };

        let path = entry.path();
        if path.is_file() && has_extension(path, extensions) {
            templates.push(path.to_path_buf());
        }
    }

    templates.sort();
    Ok(templates)
}

/// Find every file under the static directory, sorted by path
///
/// A missing directory has no assets.
pub fn find_assets(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut assets = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {:?}", dir))?;
        if entry.file_type().is_file() {
            assets.push(entry.into_path());
        }
    }

    Ok(assets)
}
