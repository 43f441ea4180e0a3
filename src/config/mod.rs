use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub const CONFIG_FILE: &str = ".moviebattlerc.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider endpoint queried with `t` and `apikey`
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Environment variable holding the provider credential
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Request timeout in seconds (transport default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} not found! Set it in the environment or a .env file")]
    MissingApiKey { var: String },
}

/// Provider credential. Never printed.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
            timeout_secs: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from_dir(Path::new("."))
    }

    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Resolve the credential from the process environment.
    pub fn api_key(&self) -> Result<ApiKey, ConfigError> {
        self.api_key_with(|var| std::env::var(var).ok())
    }

    /// Resolve the credential through `lookup`. Blank values count as missing.
    pub fn api_key_with<F>(&self, lookup: F) -> Result<ApiKey, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(&self.api_key_env)
            .filter(|key| !key.trim().is_empty())
            .map(ApiKey)
            .ok_or_else(|| ConfigError::MissingApiKey {
                var: self.api_key_env.clone(),
            })
    }
}

fn default_endpoint() -> String {
    "http://www.omdbapi.com/".to_string()
}

fn default_api_key_env() -> String {
    "OMDB_API_KEY".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.endpoint, "http://www.omdbapi.com/");
        assert_eq!(config.api_key_env, "OMDB_API_KEY");
        assert!(config.timeout_secs.is_none());
    }

    #[test]
    fn returns_default_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load_from_dir(tmp.path()).unwrap();
        assert_eq!(config.endpoint, "http://www.omdbapi.com/");
        assert!(config.timeout_secs.is_none());
    }

    #[test]
    fn loads_valid_full_config() {
        let tmp = TempDir::new().unwrap();
        let json = r#"{
            "endpoint": "https://omdb.example.test/",
            "api_key_env": "MY_OMDB_KEY",
            "timeout_secs": 5
        }"#;
        fs::write(tmp.path().join(CONFIG_FILE), json).unwrap();

        let config = Config::load_from_dir(tmp.path()).unwrap();
        assert_eq!(config.endpoint, "https://omdb.example.test/");
        assert_eq!(config.api_key_env, "MY_OMDB_KEY");
        assert_eq!(config.timeout_secs, Some(5));
    }

    #[test]
    fn handles_partial_config_with_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), r#"{ "timeout_secs": 10 }"#).unwrap();

        let config = Config::load_from_dir(tmp.path()).unwrap();
        assert_eq!(config.timeout_secs, Some(10));
        assert_eq!(config.endpoint, "http://www.omdbapi.com/");
        assert_eq!(config.api_key_env, "OMDB_API_KEY");
    }

    #[test]
    fn handles_invalid_json_as_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "not json at all {{{").unwrap();
        assert!(Config::load_from_dir(tmp.path()).is_err());
    }

    #[test]
    fn unknown_fields_ignored() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"{ "endpoint": "http://localhost/", "port": 8000 }"#,
        )
        .unwrap();

        let config = Config::load_from_dir(tmp.path()).unwrap();
        assert_eq!(config.endpoint, "http://localhost/");
    }

    #[test]
    fn api_key_resolved_from_named_variable() {
        let config = Config {
            api_key_env: "MY_OMDB_KEY".to_string(),
            ..Config::default()
        };
        let key = config
            .api_key_with(|var| (var == "MY_OMDB_KEY").then(|| "abc123".to_string()))
            .unwrap();
        assert_eq!(key.expose(), "abc123");
    }

    #[test]
    fn missing_api_key_names_the_variable() {
        let err = Config::default().api_key_with(|_| None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey { ref var } if var == "OMDB_API_KEY"));
        assert!(err.to_string().contains("OMDB_API_KEY"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let result = Config::default().api_key_with(|_| Some("   ".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn api_key_debug_is_redacted() {
        let key = ApiKey::new("super-secret");
        assert_eq!(format!("{:?}", key), "ApiKey(***)");
    }

    #[test]
    fn timeout_omitted_when_serializing_defaults() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(!json.contains("timeout_secs"));
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.endpoint, Config::default().endpoint);
    }
}
