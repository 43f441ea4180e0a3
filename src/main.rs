use anyhow::Result;
use clap::{CommandFactory, Parser as ClapParser};
use movie_battle::cli::{self, Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // stdout carries MCP frames and rendered cards; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("MOVIE_BATTLE_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    dotenv::dotenv().ok();

    let cli_args = Cli::parse();

    match cli_args.command {
        Commands::Mcp | Commands::Serve => {
            cli::serve()?;
        }
        Commands::Compare {
            movie_a,
            movie_b,
            output,
        } => {
            cli::compare(&movie_a, &movie_b, output.as_deref())?;
        }
        Commands::Init { config, mcp } => {
            cli::init(config, mcp)?;
        }
        Commands::Status => {
            cli::status()?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "movie-battle",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}
