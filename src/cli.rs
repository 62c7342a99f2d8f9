//! Command-line interface for markast.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// What to print for each parsed document.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Rendered HTML
    Html,
    /// Pretty-printed syntax tree
    Ast,
    /// Syntax tree as JSON
    Json,
    /// Token stream, one token per line
    Tokens,
}

/// Markast - CommonMark + GFM markdown to AST.
///
/// Parses markdown into a typed syntax tree and prints it as HTML, a debug
/// tree, JSON or the raw token stream.
#[derive(Parser, Debug)]
#[command(
    name = "markast",
    author = "Markast Contributors",
    version,
    about = "CommonMark + GFM markdown to AST parser",
    after_help = "Repository: https://github.com/markast/markast-rs\n\n\
                  Examples:\n  \
                  cat README.md | markast\n  \
                  markast -f json document.md\n  \
                  markast --timeout 2 -c '[parser]\\nStrictMode = true' input.md"
)]
pub struct Cli {
    /// Input files to process (reads from stdin if not provided)
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value = "html")]
    pub format: OutputFormat,

    /// Use a custom config file or inline TOML
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(short = 'l', long = "loglevel", default_value = "warn")]
    pub log_level: String,

    /// Wall-clock parsing budget per document in seconds (0 = unbounded)
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout: Option<f64>,

    /// Disable GFM extensions (tables, task lists, strikethrough, autolinks)
    #[arg(long = "no-gfm")]
    pub no_gfm: bool,

    /// Strict mode: no bare autolinks, overlong table rows are truncated
    #[arg(long = "strict")]
    pub strict: bool,

    /// Show configuration paths and exit
    #[arg(long = "paths")]
    pub show_paths: bool,
}

impl Cli {
    /// Check if we should read from stdin.
    pub fn should_read_stdin(&self) -> bool {
        self.files.is_empty()
    }
}

/// Show paths information.
pub fn show_paths() {
    use markast_config::Config;

    let config_path = Config::config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(not found)".to_string());

    println!("paths:");
    println!("  config                {}", config_path);
}
