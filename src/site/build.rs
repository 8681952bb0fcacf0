//! Static site build
//!
//! Renders every template under the templates directory into
//! `<out>/<relative path>.html`, copies the static directory to
//! `<out>/static/` and writes `manifest.json`. Every page has its own parse
//! and anchor registry, so pages render independently (in parallel with the
//! `parallel` feature).

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::config::SiteConfig;
use crate::core::file_reader::read_template;
use crate::core::model::{Kind, Meta, ResultError, ResultItem, ResultSet};
use crate::core::paths::{page_output_path, resolve};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::util::{hash_bytes, HashAlgorithm};
use crate::html::markup_to_html;
use crate::site::check::{collect_templates, display_path, read_error_item};
use crate::site::page::{load_stylesheet, substitute, PageContext};
use crate::site::scan::find_assets;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Manifest file written at the top of the output directory
pub const MANIFEST_FILE: &str = "manifest.json";

/// Directory under the output that receives static assets
pub const STATIC_OUT_DIR: &str = "static";

/// Build summary written to `manifest.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Tool version that produced the build
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub hash_algorithm: String,
    pub pages: Vec<ManifestPage>,
    pub assets: Vec<String>,
}

/// One rendered page in the manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestPage {
    /// Page path relative to the output directory
    pub path: String,
    /// Template path relative to the root
    pub source: String,
    pub hash: String,
}

/// Shared inputs for rendering pages
struct PageJob<'a> {
    root: &'a Path,
    config: &'a SiteConfig,
    templates_dir: &'a Path,
    out_dir: &'a Path,
    style: &'a str,
}

impl PageJob<'_> {
    /// Render and write one page, reporting failure as an error item
    fn build(&self, template: &Path) -> ResultItem {
        let shown = display_path(template, self.root);

        let source = match read_template(template, &self.config.read_config()) {
            Ok(s) => s,
            Err(err) => return read_error_item(shown, &err),
        };

        let fragment = match markup_to_html(&source, &self.config.parse_options()) {
            Ok(html) => html,
            Err(err) => return ResultItem::markup_error(shown, &err),
        };

        let context = PageContext::for_template(self.config, template, &source, self.style);
        let html = substitute(&fragment, &context);

        let relative = template.strip_prefix(self.templates_dir).unwrap_or(template);
        let output = page_output_path(self.out_dir, relative);
        if let Err(err) = write_page(&output, &html) {
            let mut item = ResultItem::error(ResultError::new("WRITE_FAILED", format!("{:#}", err)));
            item.path = Some(shown);
            return item;
        }

        let page_path = display_path(&output, self.out_dir);
        tracing::info!(page = %page_path, source = %shown, "page written");

        ResultItem::page(page_path)
            .with_excerpt(shown)
            .with_meta(Meta {
                size: Some(html.len() as u64),
                hash: Some(hash_bytes(html.as_bytes(), self.config.hash)),
            })
    }
}

fn write_page(output: &Path, html: &str) -> Result<()> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }
    fs::write(output, html).with_context(|| format!("Failed to write page: {:?}", output))?;
    Ok(())
}

/// Render every template to a page
fn build_pages(job: &PageJob<'_>, templates: &[PathBuf]) -> Vec<ResultItem> {
    #[cfg(feature = "parallel")]
    let pages: Vec<ResultItem> = templates.par_iter().map(|t| job.build(t)).collect();

    #[cfg(not(feature = "parallel"))]
    let pages: Vec<ResultItem> = templates.iter().map(|t| job.build(t)).collect();

    pages
}

/// Copy the static directory to `<out>/static/`
fn copy_assets(static_dir: &Path, out_dir: &Path, hash: HashAlgorithm) -> Result<Vec<ResultItem>> {
    let target_dir = out_dir.join(STATIC_OUT_DIR);
    let mut items = Vec::new();

    for asset in find_assets(static_dir)? {
        let relative = asset.strip_prefix(static_dir).unwrap_or(&asset);
        let target = target_dir.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        fs::copy(&asset, &target)
            .with_context(|| format!("Failed to copy {:?} to {:?}", asset, target))?;

        let bytes = fs::read(&target).with_context(|| format!("Failed to read {:?}", target))?;
        let meta = Meta {
            size: Some(bytes.len() as u64),
            hash: Some(hash_bytes(&bytes, hash)),
        };
        let path = display_path(&target, out_dir);
        items.push(ResultItem::asset(path).with_meta(meta));
    }

    Ok(items)
}

/// Write the build manifest from the successful pages and assets
pub fn write_manifest(out_dir: &Path, hash: HashAlgorithm, result_set: &ResultSet) -> Result<Manifest> {
    let mut manifest = Manifest {
        version: env!("CARGO_PKG_VERSION").to_string(),
        generated_at: Utc::now(),
        hash_algorithm: hash.as_str().to_string(),
        pages: Vec::new(),
        assets: Vec::new(),
    };

    for item in &result_set.items {
        match (item.kind, &item.path) {
            (Kind::Page, Some(path)) => manifest.pages.push(ManifestPage {
                path: path.clone(),
                source: item.excerpt.clone().unwrap_or_default(),
                hash: item.meta.hash.clone().unwrap_or_default(),
            }),
            (Kind::Asset, Some(path)) => manifest.assets.push(path.clone()),
            _ => {}
        }
    }

    let file_path = out_dir.join(MANIFEST_FILE);
    let json = serde_json::to_string_pretty(&manifest)?;
    fs::write(&file_path, json).context("Failed to write manifest.json")?;
    Ok(manifest)
}

/// Remove the manifest left by an earlier build
fn remove_manifest(out_dir: &Path) -> Result<()> {
    let file_path = out_dir.join(MANIFEST_FILE);
    match fs::remove_file(&file_path) {
        Ok(()) => {
            tracing::debug!(path = %file_path.display(), "removed previous manifest");
            Ok(())
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => {
            Err(err).with_context(|| format!("Failed to remove old manifest: {:?}", file_path))
        }
    }
}

/// Build the site into `out_dir`
///
/// Every page is attempted. Any manifest from an earlier build is removed
/// first, and a new one is only written when all pages rendered.
pub fn build_site(root: &Path, config: &SiteConfig, out_dir: &Path) -> Result<ResultSet> {
    let templates_dir = resolve(root, &config.templates_dir);
    let templates = collect_templates(root, config, &[])?;
    let style = load_stylesheet(root, config)?;

    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", out_dir))?;
    remove_manifest(out_dir)?;

    let job = PageJob {
        root,
        config,
        templates_dir: &templates_dir,
        out_dir,
        style: &style,
    };

    let mut result_set = ResultSet::new();
    result_set.extend(build_pages(&job, &templates));
    result_set.extend(copy_assets(
        &resolve(root, &config.static_dir),
        out_dir,
        config.hash,
    )?);
    result_set.sort();

    if result_set.error_count() == 0 {
        let manifest = write_manifest(out_dir, config.hash, &result_set)?;
        tracing::info!(
            pages = manifest.pages.len(),
            assets = manifest.assets.len(),
            "site built"
        );
    }

    Ok(result_set)
}

/// Run the build command
pub fn run_build(root: &Path, config: &SiteConfig, render_config: RenderConfig) -> Result<()> {
    let out_dir = resolve(root, &config.out_dir);
    let result_set = build_site(root, config, &out_dir)?;

    let renderer = Renderer::with_config(render_config);
    println!("{}", renderer.render(&result_set));

    let failures = result_set.error_count();
    if failures > 0 {
        anyhow::bail!("{} page(s) failed to build", failures);
    }
    Ok(())
}
