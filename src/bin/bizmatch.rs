//! CLI binary for bizmatch.
//!
//! Results are printed to stdout as JSON. All tracing output goes to stderr
//! so stdout can be piped into other tools.

use std::path::{Path, PathBuf};

use anyhow::Context;
use bizmatch::AppConfig;
use bizmatch_search::{
    Resolver, SearchResult, YelpDirectory, YelpPages, parse_suggestion_link,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// bizmatch: find a business by name and read its most recent reviews.
#[derive(Parser)]
#[command(name = "bizmatch", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory API token. Falls back to the config file, then `TOKEN`.
    #[arg(long, global = true, env = "BIZMATCH_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Match a business name and show its reviews or suggestions.
    Search {
        /// Free-text business name, e.g. "Joe's Pizza".
        query: String,
        /// Number of reviews to show.
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Show reviews for a known business id.
    Lookup {
        /// Directory business id.
        id: String,
        /// Number of reviews to show.
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Follow a suggestion link from an earlier search.
    Open {
        /// Link such as `/search?id=joes-pizza-new-york&n=3`.
        link: String,
    },

    /// Write the default configuration file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Users can override with RUST_LOG=debug to see everything.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bizmatch=info,bizmatch_search=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Init { force } => return write_default_config(cli.config, force),
        Command::Search { query, count } => {
            let resolver = build_resolver(cli.config.as_deref(), cli.token)?;
            resolver.search(&query, count).await?
        }
        Command::Lookup { id, count } => {
            let resolver = build_resolver(cli.config.as_deref(), cli.token)?;
            resolver.lookup(&id, count).await?
        }
        Command::Open { link } => {
            let (id, count) = parse_suggestion_link(&link)
                .with_context(|| format!("not a suggestion link: {link}"))?;
            let resolver = build_resolver(cli.config.as_deref(), cli.token)?;
            resolver.lookup(&id, Some(count)).await?
        }
    };

    print_result(&result)
}

fn build_resolver(
    config_path: Option<&Path>,
    token: Option<String>,
) -> anyhow::Result<Resolver<YelpDirectory, YelpPages>> {
    let mut config = AppConfig::load(config_path)?;
    config.apply_token(token, std::env::var("TOKEN").ok());
    if config.search.directory.api_token.is_none() {
        tracing::warn!("no directory API token configured; set BIZMATCH_TOKEN");
    }
    Ok(Resolver::from_config(config.search)?)
}

fn write_default_config(path: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(AppConfig::default_config_path);
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    AppConfig::default().save_to_file(&path)?;
    tracing::info!(path = %path.display(), "wrote default config");
    Ok(())
}

fn print_result(result: &SearchResult) -> anyhow::Result<()> {
    if let Some(failure) = &result.review_error {
        tracing::warn!(
            kind = %failure.kind,
            retryable = failure.retryable,
            "{}",
            failure.message
        );
    } else if result.is_empty() {
        tracing::info!("no matching business found");
    }
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}
