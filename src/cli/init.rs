use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::{json, Value};
use std::path::Path;

use crate::config::{Config, CONFIG_FILE};

const SERVER_NAME: &str = "movie-battle";

pub fn init(config: bool, mcp: bool) -> Result<()> {
    println!(
        "\n{}",
        "Movie Battle - comparison cards for LLM agents".cyan().bold()
    );
    println!();

    let specific = config || mcp;
    let install_config = config || !specific;
    let install_mcp = mcp || !specific;

    if install_config {
        init_config(Path::new("."))?;
    }
    if install_mcp {
        init_mcp_config(Path::new("."))?;
    }

    println!();
    println!("{}", "Setup complete!".green().bold());
    if install_config {
        println!("  Config:   {}", CONFIG_FILE);
    }
    if install_mcp {
        println!("  MCP:      .mcp.json");
    }

    let key_var = Config::load().unwrap_or_default().api_key_env;
    println!(
        "\n  {} Set {} in your environment or .env before starting the server",
        "next:".cyan(),
        key_var
    );

    Ok(())
}

pub fn init_config(dir: &Path) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE);
    if config_path.exists() {
        println!("{} {} already exists (skipping)", "!".yellow(), CONFIG_FILE);
        return Ok(());
    }

    let json = serde_json::to_string_pretty(&Config::default())?;
    std::fs::write(&config_path, format!("{}\n", json))
        .with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!(
        "{} Created {} with default configuration",
        "✓".green(),
        CONFIG_FILE
    );
    Ok(())
}

fn server_entry() -> Value {
    json!({
        "command": SERVER_NAME,
        "args": ["mcp"]
    })
}

pub fn init_mcp_config(dir: &Path) -> Result<()> {
    let mcp_path = dir.join(".mcp.json");

    if mcp_path.exists() {
        let existing =
            std::fs::read_to_string(&mcp_path).context("Failed to read existing .mcp.json")?;
        if let Ok(mut existing_json) = serde_json::from_str::<Value>(&existing) {
            if let Some(servers) = existing_json.get("mcpServers").and_then(|s| s.as_object()) {
                if servers.contains_key(SERVER_NAME) {
                    println!(
                        "{} .mcp.json already has {} configured (skipping)",
                        "!".yellow(),
                        SERVER_NAME
                    );
                    return Ok(());
                }
            }
            if let Some(obj) = existing_json.as_object_mut() {
                let servers = obj.entry("mcpServers").or_insert_with(|| json!({}));
                if let Some(servers_obj) = servers.as_object_mut() {
                    servers_obj.insert(SERVER_NAME.to_string(), server_entry());
                }
            }
            let json = serde_json::to_string_pretty(&existing_json)?;
            std::fs::write(&mcp_path, format!("{}\n", json))
                .context("Failed to write .mcp.json")?;
            println!(
                "{} Added {} server to existing .mcp.json",
                "✓".green(),
                SERVER_NAME
            );
            return Ok(());
        }
    }

    let mcp_config = json!({
        "mcpServers": {
            SERVER_NAME: server_entry()
        }
    });
    let json = serde_json::to_string_pretty(&mcp_config)?;
    std::fs::write(&mcp_path, format!("{}\n", json)).context("Failed to write .mcp.json")?;

    println!(
        "{} Created .mcp.json with {} server configuration",
        "✓".green(),
        SERVER_NAME
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn init_config_writes_defaults() {
        let tmp = TempDir::new().unwrap();
        init_config(tmp.path()).unwrap();

        let config = Config::load_from_dir(tmp.path()).unwrap();
        assert_eq!(config.endpoint, Config::default().endpoint);
        assert_eq!(config.api_key_env, "OMDB_API_KEY");
    }

    #[test]
    fn init_config_keeps_existing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        fs::write(&path, r#"{ "timeout_secs": 3 }"#).unwrap();

        init_config(tmp.path()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{ "timeout_secs": 3 }"#);
    }

    #[test]
    fn init_mcp_config_creates_file() {
        let tmp = TempDir::new().unwrap();
        init_mcp_config(tmp.path()).unwrap();

        let json = read_json(&tmp.path().join(".mcp.json"));
        assert_eq!(json["mcpServers"]["movie-battle"]["command"], "movie-battle");
        assert_eq!(json["mcpServers"]["movie-battle"]["args"], json!(["mcp"]));
    }

    #[test]
    fn init_mcp_config_merges_into_existing_servers() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".mcp.json");
        fs::write(
            &path,
            r#"{"mcpServers":{"fmm":{"command":"fmm","args":["mcp"]}}}"#,
        )
        .unwrap();

        init_mcp_config(tmp.path()).unwrap();

        let json = read_json(&path);
        assert_eq!(json["mcpServers"]["fmm"]["command"], "fmm");
        assert_eq!(json["mcpServers"]["movie-battle"]["command"], "movie-battle");
    }

    #[test]
    fn init_mcp_config_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        init_mcp_config(tmp.path()).unwrap();
        let first = fs::read_to_string(tmp.path().join(".mcp.json")).unwrap();

        init_mcp_config(tmp.path()).unwrap();
        let second = fs::read_to_string(tmp.path().join(".mcp.json")).unwrap();
        assert_eq!(first, second);
    }
}
