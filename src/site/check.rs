//! Template checking
//!
//! Parses every template and reports one item per file: a `template` item
//! with node and anchor counts, or an `error` item pointing at the offending
//! line.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::core::config::SiteConfig;
use crate::core::file_reader::{read_template, ReadError};
use crate::core::model::{Meta, ResultError, ResultItem, ResultSet};
use crate::core::paths::{make_relative, normalize_path, resolve};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::util::{hash_bytes, truncate_string};
use crate::markup::{parse_document, MarkupNode};
use crate::site::scan::find_templates;

/// Longest source excerpt attached to an error item
const MAX_EXCERPT_BYTES: usize = 200;

/// Path as reported in results: relative to root when possible
pub fn display_path(path: &Path, root: &Path) -> String {
    make_relative(path, root).unwrap_or_else(|| normalize_path(path))
}

/// Expand the requested paths into template files
///
/// No paths means the configured templates directory.
pub fn collect_templates(root: &Path, config: &SiteConfig, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    if paths.is_empty() {
        let dir = resolve(root, &config.templates_dir);
        if !dir.is_dir() {
            anyhow::bail!("Templates directory not found: {:?}", dir);
        }
        return find_templates(&dir, &config.extensions);
    }

    let mut templates = Vec::new();
    for path in paths {
        let path = resolve(root, path);
        if path.is_dir() {
            templates.extend(find_templates(&path, &config.extensions)?);
        } else {
            templates.push(path);
        }
    }
    templates.sort();
    templates.dedup();
    Ok(templates)
}

/// Item for a template that could not be read
pub fn read_error_item(shown: String, err: &ReadError) -> ResultItem {
    let mut item = ResultItem::error(ResultError::new(err.code(), err.to_string()));
    item.path = Some(shown);
    item
}

/// Check a single template file
pub fn check_template(root: &Path, config: &SiteConfig, path: &Path) -> ResultItem {
    let shown = display_path(path, root);

    let source = match read_template(path, &config.read_config()) {
        Ok(s) => s,
        Err(err) => return read_error_item(shown, &err),
    };

    match parse_document(&source, &config.parse_options()) {
        Ok(document) => {
            let nodes: usize = document.nodes.iter().map(MarkupNode::count).sum();
            let meta = Meta {
                size: Some(source.len() as u64),
                hash: Some(hash_bytes(source.as_bytes(), config.hash)),
            };
            ResultItem::template(shown)
                .with_meta(meta)
                .with_data(serde_json::json!({
                    "nodes": nodes,
                    "top_level": document.nodes.len(),
                    "anchors": document.anchors,
                }))
        }
        Err(err) => {
            tracing::debug!(path = %shown, code = err.code(), "template failed to parse");
            let mut item = ResultItem::markup_error(shown, &err);
            if let Some(line) = err.line().and_then(|n| source.lines().nth(n.saturating_sub(1))) {
                let (excerpt, _) = truncate_string(line, MAX_EXCERPT_BYTES);
                item = item.with_excerpt(excerpt);
            }
            item
        }
    }
}

/// Check templates and collect the results
pub fn check_templates(root: &Path, config: &SiteConfig, paths: &[PathBuf]) -> Result<ResultSet> {
    let templates = collect_templates(root, config, paths)?;

    let mut result_set: ResultSet = templates
        .iter()
        .map(|path| check_template(root, config, path))
        .collect();
    result_set.sort();
    Ok(result_set)
}

/// Run the check command
pub fn run_check(
    root: &Path,
    config: &SiteConfig,
    paths: &[PathBuf],
    strict: bool,
    render_config: RenderConfig,
) -> Result<()> {
    let result_set = check_templates(root, config, paths)?;

    let renderer = Renderer::with_config(render_config);
    println!("{}", renderer.render(&result_set));

    let failures = result_set.error_count();
    if strict && failures > 0 {
        anyhow::bail!("{} of {} template(s) failed to parse", failures, result_set.len());
    }
    Ok(())
}
