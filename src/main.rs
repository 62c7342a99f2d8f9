//! Markast - CommonMark + GFM markdown to AST.
//!
//! This binary provides the CLI interface to the markast library: it reads
//! markdown from files or stdin and prints HTML, the syntax tree or tokens.

mod cli;

use clap::Parser as ClapParser;
use cli::{Cli, OutputFormat};
use log::{debug, error, info, warn, LevelFilter};
use std::io::{self, Read, Write};

use markast_config::Config;
use markast_core::{Error, Result};
use markast_html::HtmlRenderer;
use markast_parser::{MarkdownParser, Token};

fn main() {
    let cli = <Cli as ClapParser>::parse();

    // Handle --paths flag
    if cli.show_paths {
        cli::show_paths();
        return;
    }

    // Set up logging
    setup_logging(&cli.log_level);
    info!("Markast v{}", env!("CARGO_PKG_VERSION"));

    // Run the main application
    if let Err(e) = run(&cli) {
        error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Set up logging based on the log level argument.
fn setup_logging(level: &str) {
    let filter = match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Warn,
    };

    env_logger::Builder::new()
        .filter_level(filter)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

/// Main application logic.
fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    debug!("Parser options: {:?}", config.parser);

    let parser = MarkdownParser::with_options(config.parser.clone());
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.should_read_stdin() {
        info!("Reading from stdin");
        if atty::is(atty::Stream::Stdin) {
            warn!("Reading markdown from a terminal, finish with Ctrl-D");
        }
        let mut input = String::new();
        io::stdin().read_to_string(&mut input)?;
        process(&input, &parser, &config, cli.format, &mut out)?;
    } else {
        for path in &cli.files {
            info!("Processing file: {}", path.display());
            let input = std::fs::read_to_string(path)?;
            process(&input, &parser, &config, cli.format, &mut out)?;
        }
    }

    out.flush()?;
    Ok(())
}

/// Load configuration and apply the command-line overrides.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load_with_override(cli.config.as_deref())?;

    if cli.no_gfm {
        config.parser.enable_gfm_extensions = false;
    }
    if cli.strict {
        config.parser.strict_mode = true;
    }
    if let Some(seconds) = cli.timeout {
        config.parser.max_parsing_time = seconds;
    }

    Ok(config)
}

/// Parse one document and write it in the requested format.
fn process<W: Write>(
    input: &str,
    parser: &MarkdownParser,
    config: &Config,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    if format == OutputFormat::Tokens {
        for token in parser.tokenize(input) {
            writeln!(out, "{}", format_token(&token))?;
        }
        return Ok(());
    }

    let document = parser.parse(input)?;
    match format {
        OutputFormat::Html => {
            let mut renderer = HtmlRenderer::new(&mut *out, config.html.clone());
            renderer.render(&document)?;
        }
        OutputFormat::Ast => writeln!(out, "{:#?}", document)?,
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&document)
                .map_err(|e| Error::Render(e.to_string()))?;
            writeln!(out, "{}", json)?;
        }
        OutputFormat::Tokens => {}
    }
    Ok(())
}

/// One line of `--format tokens` output.
fn format_token(token: &Token) -> String {
    format!(
        "{:>4}:{:<3} {:?} {:?}",
        token.location.line + 1,
        token.location.column + 1,
        token.kind,
        token.content
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use markast_parser::TokenKind;

    fn run_format(input: &str, format: OutputFormat) -> String {
        let config = Config::default();
        let parser = MarkdownParser::with_options(config.parser.clone());
        let mut out = Vec::new();
        process(input, &parser, &config, format, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_load_config_flags() {
        let cli = Cli::parse_from(["markast", "--no-gfm", "--strict", "--timeout", "3"]);
        let config = load_config(&cli).unwrap();
        assert!(!config.parser.enable_gfm_extensions);
        assert!(config.parser.strict_mode);
        assert_eq!(config.parser.max_parsing_time, 3.0);
    }

    #[test]
    fn test_process_html() {
        assert_eq!(run_format("# Hi", OutputFormat::Html), "<h1>Hi</h1>\n");
    }

    #[test]
    fn test_process_json() {
        let json = run_format("hello", OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["kind"]["Document"]["children"].is_array());
    }

    #[test]
    fn test_process_tokens() {
        let out = run_format("a", OutputFormat::Tokens);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Text \"a\""));
        assert!(lines[1].contains(&format!("{:?}", TokenKind::Eof)));
    }

    #[test]
    fn test_process_timeout_is_error() {
        let mut config = Config::default();
        config.parser.max_parsing_time = 1e-9;
        let parser = MarkdownParser::with_options(config.parser.clone());
        let mut out = Vec::new();
        let err = process(&"a\n".repeat(100), &parser, &config, OutputFormat::Ast, &mut out)
            .unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}
