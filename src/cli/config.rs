use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// Persisted CLI settings, read from `<config dir>/config.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    pub server_url: Option<String>,
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(custom_dir) = std::env::var("PROTOCTL_CONFIG_DIR") {
        return Ok(PathBuf::from(custom_dir));
    }
    let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
    Ok(PathBuf::from(home).join(".config").join("protoctl"))
}

pub fn load_cli_config() -> anyhow::Result<CliConfig> {
    let config_file = get_config_dir()?.join("config.json");
    if !config_file.exists() {
        return Ok(CliConfig::default());
    }

    let content = fs::read_to_string(config_file)?;
    let config: CliConfig = serde_json::from_str(&content)?;
    Ok(config)
}

/// `--server`, then `PROTOCTL_SERVER`, then the config file, then the local default
pub fn resolve_server_url(flag: Option<String>, env: Option<String>, file: &CliConfig) -> String {
    flag.or(env)
        .or_else(|| file.server_url.clone())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
        .trim_end_matches('/')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_beats_env_beats_file() {
        let file = CliConfig {
            server_url: Some("http://file:1".to_string()),
        };
        assert_eq!(
            resolve_server_url(Some("http://flag:1/".into()), Some("http://env:1".into()), &file),
            "http://flag:1"
        );
        assert_eq!(resolve_server_url(None, Some("http://env:1".into()), &file), "http://env:1");
        assert_eq!(resolve_server_url(None, None, &file), "http://file:1");
        assert_eq!(resolve_server_url(None, None, &CliConfig::default()), DEFAULT_SERVER_URL);
    }
}
