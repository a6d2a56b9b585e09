//! Shared CLI definitions for scoregrid.
//!
//! Used by the main application and by the build script (manpage) and
//! gen_docs binary (command-line-options markdown).

use clap::{CommandFactory, Parser};
use std::path::PathBuf;

/// Command-line arguments for scoregrid
#[derive(Clone, Parser, Debug, Default)]
#[command(
    name = "scoregrid",
    version,
    about = "Scorecard grid in the terminal",
    long_about = include_str!("../long_about.txt")
)]
pub struct Args {
    /// Base URL of the scorecard server (overrides config [server] base_url). Example: http://localhost:8001
    #[arg(long = "url", value_name = "URL")]
    pub url: Option<String>,

    /// JSON file with {"rows": [...]} paginated locally instead of fetched page by page.
    /// Without --url, details and strategy toggles are served from the same file.
    #[arg(long = "source", value_name = "FILE")]
    pub source: Option<PathBuf>,

    /// Rows per page (default: 50)
    #[arg(long = "page-size", value_name = "N")]
    pub page_size: Option<usize>,

    /// Number of page buttons in the pagination bar (default: 5)
    #[arg(long = "window-size", value_name = "N")]
    pub window_size: Option<usize>,

    /// Request timeout in seconds (default: 15)
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Enable debug mode to show operational information
    #[arg(long = "debug", action)]
    pub debug: bool,

    /// Write trace output to this file. Filter with RUST_LOG (e.g. RUST_LOG=expansion=debug)
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Generate default configuration file at ~/.config/scoregrid/config.toml
    #[arg(long = "generate-config", action)]
    pub generate_config: bool,

    /// Force overwrite existing config file when using --generate-config
    #[arg(long = "force", requires = "generate_config", action)]
    pub force: bool,
}

/// Escape `|` and newlines for use in markdown table cells.
fn escape_table_cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\n', '\r'], " ")
}

fn value_placeholder(arg: &clap::Arg) -> String {
    arg.get_value_names()
        .map(|names| {
            names
                .iter()
                .map(|n| format!("<{}>", n.as_str()))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default()
}

/// Render command-line options as markdown.
pub fn render_options_markdown() -> String {
    let mut cmd = Args::command();
    cmd.build();

    let mut out = String::from("# Command Line Options\n\n");

    out.push_str("## Usage\n\n```\n");
    out.push_str(&cmd.render_usage().to_string());
    out.push_str("\n```\n\n");

    out.push_str("## Options\n\n");
    out.push_str("| Option | Description |\n");
    out.push_str("|--------|-------------|\n");

    for arg in cmd.get_arguments() {
        let id = arg.get_id().as_str();
        if id == "help" || id == "version" {
            continue;
        }

        let mut parts = Vec::new();
        if let Some(s) = arg.get_short() {
            parts.push(format!("-{s}"));
        }
        if let Some(l) = arg.get_long() {
            parts.push(format!("--{l}"));
        }
        let op = parts.join(", ");
        let placeholder = if arg.get_action().takes_values() {
            value_placeholder(arg)
        } else {
            String::new()
        };
        let option_str = if placeholder.is_empty() {
            op
        } else {
            format!("{op} {placeholder}")
        };

        let help = arg
            .get_help()
            .map(|h| escape_table_cell(&h.to_string()))
            .unwrap_or_else(|| "-".to_string());

        out.push_str(&format!("| `{option_str}` | {help} |\n"));
    }

    out
}
