//! Zonerama-Scraper main entry point
//!
//! Starts the HTTP API that scrapes Zonerama albums and profile listings.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use zonerama_scraper::config::load_or_default;
use zonerama_scraper::server::serve;

/// Zonerama-Scraper: album and photo metadata API
///
/// Serves `/listing` and `/album` endpoints that crawl Zonerama pages and
/// return their albums and photos as JSON.
#[derive(Parser, Debug)]
#[command(name = "zonerama-scraper")]
#[command(version = "1.0.0")]
#[command(about = "Zonerama album and photo metadata API", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Address to listen on, overriding the configuration
    #[arg(short, long, value_name = "ADDR")]
    bind: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let (mut config, hash) = match load_or_default(cli.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    match (&cli.config, hash) {
        (Some(path), Some(hash)) => tracing::info!(
            "Configuration loaded from {} (hash: {})",
            path.display(),
            hash
        ),
        _ => tracing::info!("No configuration file given, using defaults"),
    }

    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }

    if config.fetch.rendered && !cfg!(feature = "render") {
        tracing::warn!("Rendering requested but not compiled in; pages will be fetched raw");
    }

    serve(config).await?;
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// `RUST_LOG` takes precedence over the command-line flags when set.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("error")
        } else {
            match verbose {
                0 => EnvFilter::new("zonerama_scraper=info,warn"),
                1 => EnvFilter::new("zonerama_scraper=debug,tower_http=debug,info"),
                2 => EnvFilter::new("zonerama_scraper=trace,debug"),
                _ => EnvFilter::new("trace"),
            }
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
