use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::compare::compare as compare_titles;
use crate::config::Config;
use crate::mcp::McpServer;
use crate::movie::MovieFetcher;
use crate::provider::OmdbClient;

mod init;
mod status;

pub use init::{init, init_config, init_mcp_config};
pub use status::status;

#[derive(Parser)]
#[command(
    name = "movie-battle",
    about = "Movie Battle - side-by-side movie comparison cards for LLM agents",
    version,
    author
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start MCP (Model Context Protocol) server on stdio
    Mcp,

    /// Start MCP server on stdio (alias for 'mcp')
    Serve,

    /// Compare two movies once and print the HTML card
    Compare {
        /// First movie title
        movie_a: String,

        /// Second movie title
        movie_b: String,

        /// Write the card to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write default config and register the MCP server in .mcp.json
    Init {
        /// Only write .moviebattlerc.json
        #[arg(long)]
        config: bool,

        /// Only register the server in .mcp.json
        #[arg(long)]
        mcp: bool,
    },

    /// Show configuration and credential status
    Status,

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Build an OMDb-backed fetcher. Fails when the credential is missing.
fn omdb_fetcher() -> Result<MovieFetcher<OmdbClient>> {
    let config = Config::load().context("Failed to load .moviebattlerc.json")?;
    let api_key = config.api_key()?;
    let client = OmdbClient::new(&config, api_key)?;
    info!(endpoint = client.endpoint(), "provider configured");
    Ok(MovieFetcher::new(client))
}

pub fn serve() -> Result<()> {
    let fetcher = omdb_fetcher()?;
    McpServer::new(fetcher).run()
}

pub fn compare(movie_a: &str, movie_b: &str, output: Option<&Path>) -> Result<()> {
    let fetcher = omdb_fetcher()?;

    let html = match compare_titles(&fetcher, movie_a, movie_b) {
        Ok(html) => html,
        Err(e) => {
            println!("{}", e);
            anyhow::bail!("Comparison of '{}' and '{}' failed", movie_a, movie_b);
        }
    };

    match output {
        Some(path) => {
            std::fs::write(path, &html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("{} Wrote {}", "✓".green(), path.display());
        }
        None => print!("{}", html),
    }

    Ok(())
}
