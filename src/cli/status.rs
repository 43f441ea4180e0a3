use anyhow::Result;
use colored::Colorize;

use crate::config::{Config, CONFIG_FILE};

pub fn status() -> Result<()> {
    let config_exists = std::path::Path::new(CONFIG_FILE).exists();
    let config = Config::load()?;

    println!("{}", "movie-battle Status".cyan().bold());
    println!("{}", "=".repeat(40).dimmed());

    println!("\n{}", "Configuration:".yellow().bold());
    if config_exists {
        println!("  {} {} found", "✓".green(), CONFIG_FILE);
    } else {
        println!("  {} No {} (using defaults)", "!".yellow(), CONFIG_FILE);
    }

    println!("\n{}", "Provider:".yellow().bold());
    println!("  Endpoint: {}", config.endpoint);
    match config.timeout_secs {
        Some(secs) => println!("  Timeout:  {}s", secs),
        None => println!("  Timeout:  transport default"),
    }

    println!("\n{}", "Credential:".yellow().bold());
    match config.api_key() {
        Ok(_) => println!("  {} {} is set", "✓".green(), config.api_key_env),
        Err(e) => println!("  {} {}", "✗".red(), e),
    }

    println!();
    Ok(())
}
