//! CLI module - Command-line interface definitions and handlers

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::config::SiteConfig;
use crate::core::render::{OutputFormat, RenderConfig};

/// yamlsite - build HTML pages from indented YAML-style markup.
#[derive(Parser, Debug)]
#[command(name = "yamlsite")]
#[command(
    author,
    version,
    about,
    long_about = r#"yamlsite transpiles YAML-style markup templates into HTML.

Every `key:` becomes an element, scalars under an element become attributes,
`children:` lists nested elements, `raw:` emits literal text and `innerText:`
sets an element's text. Anchors (`&name`), aliases (`*name`) and merge keys
(`<<: *name`) reuse fragments within a file.

`check` and `build` print a ResultSet in the selected format (default: jsonl).

Output formats:
- jsonl: one JSON object per line
- json: a single JSON array
- md: human-friendly Markdown
- raw: excerpts only

Examples:
    yamlsite render templates/index.yaml
    yamlsite render templates/index.yaml --page --title "Home"
    yamlsite tree templates/index.yaml --pretty
    yamlsite check --format md
    yamlsite build --out public
"#
)]
pub struct Cli {
    /// Root directory of the site.
    #[arg(
        long,
        global = true,
        default_value = ".",
        value_name = "ROOT",
        long_help = "Root directory of the site (defaults to the current directory).\n\n\
yamlsite.json is read from here, relative paths are resolved against it and\n\
paths emitted in results are relative to it."
    )]
    pub root: PathBuf,

    /// Output format (jsonl/json/md/raw).
    #[arg(
        long,
        global = true,
        default_value = "jsonl",
        value_name = "FORMAT",
        long_help = "Select the output format for ResultSet (check, build).\n\n\
Supported values:\n\
- jsonl (default)\n\
- json\n\
- md (markdown)\n\
- raw"
    )]
    pub format: String,

    /// Disable colored output.
    #[arg(
        long,
        global = true,
        long_help = "Disable colored output. This is useful when piping to files or when your\n\
terminal does not support ANSI colors."
    )]
    pub no_color: bool,

    /// Quiet mode (errors only on stderr).
    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        long_help = "Only log errors to stderr. Results are still printed to stdout."
    )]
    pub quiet: bool,

    /// Verbose mode (debug logging).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Log debug diagnostics to stderr: anchor registrations, merges, pages written.\n\n\
RUST_LOG overrides both --verbose and --quiet."
    )]
    pub verbose: bool,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(
        long,
        global = true,
        long_help = "Pretty-print JSON and JSONL output with indentation for human readability.\n\n\
Also applies to `tree`. Has no effect on md/raw formats."
    )]
    pub pretty: bool,

    /// Maximum nesting depth of markup groups.
    #[arg(
        long,
        global = true,
        env = "YAMLSITE_MAX_DEPTH",
        value_name = "N",
        long_help = "Maximum nesting depth of markup groups. Deeper templates fail with\n\
DEPTH_EXCEEDED. Overrides max_depth from yamlsite.json (default 64)."
    )]
    pub max_depth: Option<usize>,

    /// Maximum nodes one template may build.
    #[arg(
        long,
        global = true,
        env = "YAMLSITE_MAX_NODES",
        value_name = "N",
        long_help = "Maximum nodes one template may build, counting every copy made by an\n\
alias or merge key. Larger templates fail with NODE_LIMIT_EXCEEDED. Overrides\n\
max_nodes from yamlsite.json (default 100000)."
    )]
    pub max_nodes: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render one template to HTML on stdout.
    #[command(
        long_about = "Parse one template and print the HTML it produces.\n\n\
With --page the output is treated as a whole page: {{ title }}, {{ style }} and\n\
{{ source }} placeholders are replaced.\n\n\
Examples:\n\
  yamlsite render templates/index.yaml\n\
  yamlsite render index.yaml --page --stylesheet static/style.css\n"
    )]
    Render {
        /// Template file (relative to ROOT unless absolute).
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Substitute page placeholders.
        #[arg(long)]
        page: bool,

        /// Page title for {{ title }} (defaults to config title, then file stem).
        #[arg(long, value_name = "TITLE")]
        title: Option<String>,

        /// Stylesheet whose text replaces {{ style }}.
        #[arg(long, value_name = "FILE")]
        stylesheet: Option<PathBuf>,

        /// Drop anchor-declaring nodes from the output.
        #[arg(
            long,
            long_help = "Treat anchor-declaring nodes as reusable fragments only: they are\n\
registered for later aliases and merge keys but produce no output of their own."
        )]
        template_mode: bool,
    },

    /// Print the parsed markup tree as JSON.
    Tree {
        /// Template file (relative to ROOT unless absolute).
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Parse templates and report errors per file.
    #[command(
        long_about = "Parse every template under the templates directory (or the given\n\
files and directories) and emit one ResultItem per file: `template` with node\n\
and anchor counts, or `error` with a code, message and line.\n\n\
Exits 0 even when templates fail unless --strict is given.\n\n\
Examples:\n\
  yamlsite check\n\
  yamlsite check templates/blog --strict --format md\n"
    )]
    Check {
        /// Files or directories to check (default: templates directory).
        #[arg(value_name = "PATH")]
        paths: Vec<PathBuf>,

        /// Exit non-zero when any template fails.
        #[arg(long)]
        strict: bool,
    },

    /// Build the whole site into the output directory.
    #[command(
        long_about = "Render every template to <out>/<path>.html, copy the static directory\n\
to <out>/static/ and write <out>/manifest.json.\n\n\
Every page is attempted; the command fails if any page failed.\n\n\
Examples:\n\
  yamlsite build\n\
  yamlsite --root site build --out public\n"
    )]
    Build {
        /// Output directory (overrides out_dir from yamlsite.json).
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },
}

/// Run the CLI command
pub fn run(cli: Cli) -> Result<()> {
    let format: OutputFormat = cli.format.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let render_config = RenderConfig::with_pretty(format, cli.pretty);

    // Get absolute root path
    let root = cli.root.canonicalize().unwrap_or(cli.root);

    let mut config = SiteConfig::load(&root)?;
    if let Some(depth) = cli.max_depth {
        config.max_depth = depth;
    }
    if let Some(nodes) = cli.max_nodes {
        config.max_nodes = nodes;
    }

    match cli.command {
        Commands::Render {
            file,
            page,
            title,
            stylesheet,
            template_mode,
        } => {
            if title.is_some() {
                config.title = title;
            }
            if stylesheet.is_some() {
                config.stylesheet = stylesheet;
            }
            if template_mode {
                config.keep_anchor_declarations = false;
            }
            crate::site::page::run_render(&root, &config, &file, page)
        }

        Commands::Tree { file } => crate::site::page::run_tree(&root, &config, &file, cli.pretty),

        Commands::Check { paths, strict } => {
            crate::site::check::run_check(&root, &config, &paths, strict, render_config)
        }

        Commands::Build { out } => {
            if let Some(out) = out {
                config.out_dir = out;
            }
            crate::site::build::run_build(&root, &config, render_config)
        }
    }
}
