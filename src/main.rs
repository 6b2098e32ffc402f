//! Sitemap-Scout main entry point
//!
//! This is the command-line interface for the Sitemap-Scout sitemap auditor.

use anyhow::Context;
use clap::Parser;
use sitemap_scout::config::{load_config, Config};
use sitemap_scout::output::{log_summary, JsonLinesSink};
use sitemap_scout::{audit_site, HttpFetcher};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sitemap-Scout: sitemap discovery and traversal for SEO audits
///
/// Sitemap-Scout finds a site's sitemaps through robots.txt or the usual
/// default paths, walks every sitemap index it reaches and reports one JSON
/// line per sitemap, per flagged page and for the run summary.
#[derive(Parser, Debug)]
#[command(name = "sitemap-scout")]
#[command(version)]
#[command(about = "Sitemap discovery and traversal for SEO audits", long_about = None)]
struct Cli {
    /// Site root URL, e.g. https://example.com
    #[arg(value_name = "ROOT_URL")]
    root_url: String,

    /// Sitemap path or URL to use instead of discovery
    #[arg(long, value_name = "PATH")]
    sitemap: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Fetch every listed page and report broken, draft or disallowed ones
    #[arg(long)]
    check_pages: bool,

    /// Write JSON lines to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load {}", path.display()))?
        }
        None => Config::default(),
    };
    if cli.check_pages {
        config.traversal.check_pages = true;
    }

    let fetcher = HttpFetcher::from_config(&config).context("failed to build HTTP client")?;

    let writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let mut sink = JsonLinesSink::new(writer);

    let summary = match audit_site(
        &fetcher,
        &config,
        &cli.root_url,
        cli.sitemap.as_deref(),
        &mut sink,
    )
    .await
    {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!("Audit failed: {}", e);
            return Err(e.into());
        }
    };

    log_summary(&summary);

    if let Some(path) = &cli.output {
        tracing::info!("Report written to: {}", path.display());
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout stays clean for the JSON-lines report.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_scout=info,warn"),
            1 => EnvFilter::new("sitemap_scout=debug,info"),
            2 => EnvFilter::new("sitemap_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
