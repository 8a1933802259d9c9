use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, net::SocketAddr, path::PathBuf};
use tracing::debug;

pub const DEFAULT_PROVIDER_URL: &str = "https://v6.exchangerate-api.com/v6";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: DEFAULT_PROVIDER_URL.to_string(),
            api_key: None,
            timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub static_dir: Option<String>,
    pub cors_allow_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            static_dir: None,
            cors_allow_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load the default config file if it exists, then apply environment overrides.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        let config = if config_path.exists() {
            Self::load_from_path(&config_path)?
        } else {
            debug!("No config file at {}, using defaults", config_path.display());
            Self::default()
        };
        config.with_env_overrides()
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "xrate", "xrate")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Apply `.env` and process environment on top of the file settings.
    pub fn with_env_overrides(self) -> Result<Self> {
        dotenvy::dotenv().ok();
        self.apply_env(|key| std::env::var(key).ok())
    }

    fn apply_env<F>(mut self, var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = var("EXCHANGERATE_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.provider.api_key = Some(key);
        }
        if let Some(url) = var("XRATE_PROVIDER_URL") {
            self.provider.base_url = url;
        }
        if let Some(timeout) = var("XRATE_TIMEOUT_MS") {
            self.provider.timeout_ms = timeout
                .parse()
                .with_context(|| format!("Invalid XRATE_TIMEOUT_MS: {timeout}"))?;
        }
        if let Some(addr) = var("XRATE_LISTEN_ADDR") {
            self.server.listen_addr = addr
                .parse()
                .with_context(|| format!("Invalid XRATE_LISTEN_ADDR: {addr}"))?;
        }
        if let Some(dir) = var("XRATE_STATIC_DIR") {
            self.server.static_dir = Some(dir);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
provider:
  base_url: "http://localhost:9000/v6"
  api_key: "secret"
  timeout_ms: 2500
server:
  listen_addr: "127.0.0.1:8080"
  static_dir: "static"
  cors_allow_origins:
    - "http://localhost:3000"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.provider.base_url, "http://localhost:9000/v6");
        assert_eq!(config.provider.api_key.as_deref(), Some("secret"));
        assert_eq!(config.provider.timeout_ms, 2500);
        assert_eq!(config.server.listen_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.server.static_dir.as_deref(), Some("static"));
        assert_eq!(
            config.server.cors_allow_origins,
            vec!["http://localhost:3000".to_string()]
        );
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("provider:\n  api_key: abc\n").unwrap();
        assert_eq!(config.provider.base_url, DEFAULT_PROVIDER_URL);
        assert_eq!(config.provider.timeout_ms, 10_000);
        assert_eq!(config.server, ServerConfig::default());
        assert_eq!(config.server.listen_addr.port(), 5000);
    }

    #[test]
    fn test_env_overrides() {
        let env = HashMap::from([
            ("EXCHANGERATE_API_KEY", "from-env"),
            ("XRATE_PROVIDER_URL", "http://mock"),
            ("XRATE_TIMEOUT_MS", "500"),
            ("XRATE_LISTEN_ADDR", "127.0.0.1:3000"),
            ("XRATE_STATIC_DIR", "/srv/www"),
        ]);

        let config = AppConfig::default()
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.provider.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.provider.base_url, "http://mock");
        assert_eq!(config.provider.timeout_ms, 500);
        assert_eq!(config.server.listen_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.server.static_dir.as_deref(), Some("/srv/www"));
    }

    #[test]
    fn test_blank_api_key_is_ignored() {
        let config = AppConfig::default()
            .apply_env(|key| (key == "EXCHANGERATE_API_KEY").then(|| "  ".to_string()))
            .unwrap();
        assert!(config.provider.api_key.is_none());
    }

    #[test]
    fn test_invalid_env_values() {
        let result =
            AppConfig::default().apply_env(|key| (key == "XRATE_LISTEN_ADDR").then(|| "nope".into()));
        assert!(result.is_err());

        let result =
            AppConfig::default().apply_env(|key| (key == "XRATE_TIMEOUT_MS").then(|| "soon".into()));
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Invalid XRATE_TIMEOUT_MS")
        );
    }

    #[test]
    fn test_load_from_path() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), "server:\n  listen_addr: \"127.0.0.1:0\"\n").unwrap();

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.server.listen_addr.port(), 0);
        assert_eq!(config.provider, ProviderConfig::default());
    }

    #[test]
    fn test_load_from_missing_path() {
        let result = AppConfig::load_from_path("/definitely/not/here.yaml");
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
