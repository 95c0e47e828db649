use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chatmark::Config;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Read from the working directory when `--config` isn't given.
const DEFAULT_CONFIG_FILE: &str = "chatmark.toml";

#[derive(Parser)]
#[command(name = "chatmark", version)]
#[command(about = "Convert chat markdown to sanitized HTML")]
struct Cli {
    /// Input Markdown file (reads stdin when omitted)
    input: Option<PathBuf>,

    /// Output HTML file (defaults to input name with .html extension, or stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file for standalone pages
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit a full HTML page instead of a fragment
    #[arg(long)]
    standalone: bool,

    /// Log progress at info level
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    // --verbose enables INFO level, otherwise use RUST_LOG
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let markdown = read_input(cli.input.as_deref())?;

    let mut config = match &cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::load(Path::new(DEFAULT_CONFIG_FILE)),
    };

    let html = if cli.standalone || config.document.standalone {
        if config.document.title.is_none() {
            config.document.title = cli
                .input
                .as_deref()
                .and_then(Path::file_stem)
                .map(|stem| stem.to_string_lossy().into_owned());
        }
        chatmark::markdown_to_document(&markdown, &config)
    } else {
        chatmark::markdown_to_html(&markdown)
    };

    // Determine output path
    let output = cli
        .output
        .or_else(|| cli.input.as_ref().map(|input| input.with_extension("html")));

    match output {
        Some(path) => {
            fs::write(&path, &html)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote html");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }

    Ok(())
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut markdown = String::new();
            io::stdin()
                .read_to_string(&mut markdown)
                .context("failed to read stdin")?;
            Ok(markdown)
        }
    }
}
