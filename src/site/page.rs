//! Page rendering
//!
//! A rendered template can act as an outer page: `{{ title }}`,
//! `{{ style }}` and `{{ source }}` placeholders in its HTML are replaced
//! with the page title, the stylesheet text and the template's own source.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fs;
use std::path::Path;

use crate::core::config::SiteConfig;
use crate::core::file_reader::read_template;
use crate::core::paths::resolve;
use crate::core::util::escape_html;
use crate::html::markup_to_html;
use crate::markup::parse_with;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("Invalid PLACEHOLDER regex")
});

/// Values substituted into a page
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub title: String,
    /// Inserted verbatim
    pub style: String,
    pub source: String,
}

impl PageContext {
    /// Context for one template, title falling back to the file stem
    pub fn for_template(config: &SiteConfig, path: &Path, source: &str, style: &str) -> Self {
        let title = config.title.clone().unwrap_or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
        Self {
            title,
            style: style.to_string(),
            source: source.to_string(),
        }
    }
}

/// Replace the known placeholders in rendered HTML
///
/// Unknown placeholders are left as they are.
pub fn substitute(html: &str, context: &PageContext) -> String {
    PLACEHOLDER
        .replace_all(html, |caps: &Captures| match &caps[1] {
            "title" => escape_html(&context.title),
            "style" => context.style.clone(),
            "source" => escape_html(&context.source),
            other => {
                tracing::warn!(placeholder = other, "unknown page placeholder left as is");
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Load the configured stylesheet, empty when none is set
pub fn load_stylesheet(root: &Path, config: &SiteConfig) -> Result<String> {
    match &config.stylesheet {
        Some(path) => {
            let path = resolve(root, path);
            fs::read_to_string(&path).with_context(|| format!("Failed to read stylesheet: {:?}", path))
        }
        None => Ok(String::new()),
    }
}

/// Render one template file to HTML, optionally as a full page
pub fn render_file(config: &SiteConfig, path: &Path, as_page: bool, style: &str) -> Result<String> {
    let source = read_template(path, &config.read_config())?;
    let html = markup_to_html(&source, &config.parse_options())
        .with_context(|| format!("Failed to parse {:?}", path))?;

    if !as_page {
        return Ok(html);
    }

    let context = PageContext::for_template(config, path, &source, style);
    Ok(substitute(&html, &context))
}

/// Run the render command
pub fn run_render(root: &Path, config: &SiteConfig, file: &Path, as_page: bool) -> Result<()> {
    let path = resolve(root, file);
    let style = if as_page {
        load_stylesheet(root, config)?
    } else {
        String::new()
    };

    let html = render_file(config, &path, as_page, &style)?;
    println!("{}", html);
    Ok(())
}

/// Run the tree command
pub fn run_tree(root: &Path, config: &SiteConfig, file: &Path, pretty: bool) -> Result<()> {
    let path = resolve(root, file);
    let source = read_template(&path, &config.read_config())?;
    let nodes = parse_with(&source, &config.parse_options())
        .with_context(|| format!("Failed to parse {:?}", path))?;

    let json = if pretty {
        serde_json::to_string_pretty(&nodes)?
    } else {
        serde_json::to_string(&nodes)?
    };
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn context() -> PageContext {
        PageContext {
            title: "Tom & Jerry".to_string(),
            style: "p > a { color: red }".to_string(),
            source: "p: \"<b>\"".to_string(),
        }
    }

    #[test]
    fn test_substitute_known_placeholders() {
        let html = "<title>{{ title }}</title><style>{{style}}</style><pre>{{  source }}</pre>";
        assert_eq!(
            substitute(html, &context()),
            "<title>Tom &amp; Jerry</title><style>p > a { color: red }</style><pre>p: &quot;&lt;b&gt;&quot;</pre>"
        );
    }

    #[test]
    fn test_substitute_leaves_unknown_placeholders() {
        let html = "<p>{{ author }}</p><p>{{ title }}</p>";
        assert_eq!(
            substitute(html, &context()),
            "<p>{{ author }}</p><p>Tom &amp; Jerry</p>"
        );
    }

    #[test]
    fn test_substitute_without_placeholders() {
        assert_eq!(substitute("<p>x</p>", &context()), "<p>x</p>");
    }

    #[test]
    fn test_context_title_falls_back_to_stem() {
        let config = SiteConfig::default();
        let ctx = PageContext::for_template(&config, &PathBuf::from("t/about.yaml"), "", "");
        assert_eq!(ctx.title, "about");

        let config = SiteConfig {
            title: Some("Site".to_string()),
            ..Default::default()
        };
        let ctx = PageContext::for_template(&config, &PathBuf::from("t/about.yaml"), "", "");
        assert_eq!(ctx.title, "Site");
    }

    #[test]
    fn test_render_file_as_page() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.yaml");
        fs::write(
            &path,
            "head:\n  children:\n    - title: \"{{ title }}\"\n    - style: \"{{ style }}\"\n",
        )
        .unwrap();

        let config = SiteConfig {
            title: Some("Home".to_string()),
            ..Default::default()
        };
        let html = render_file(&config, &path, true, "body{}").unwrap();
        assert_eq!(
            html,
            "<head><title>Home</title><style>body{}</style></head>"
        );

        let fragment = render_file(&config, &path, false, "").unwrap();
        assert!(fragment.contains("{{ title }}"));
    }

    #[test]
    fn test_render_file_reports_parse_error_with_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "ref: *missing\n").unwrap();

        let err = render_file(&SiteConfig::default(), &path, false, "").unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("bad.yaml"));
        assert!(message.contains("missing"));
    }

    #[test]
    fn test_load_stylesheet() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("site.css"), "h1{}").unwrap();

        assert_eq!(load_stylesheet(dir.path(), &SiteConfig::default()).unwrap(), "");

        let config = SiteConfig {
            stylesheet: Some(PathBuf::from("site.css")),
            ..Default::default()
        };
        assert_eq!(load_stylesheet(dir.path(), &config).unwrap(), "h1{}");
    }
}
