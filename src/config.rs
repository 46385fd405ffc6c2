use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub auth: AuthConfig,

    pub smtp: SmtpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Directory where uploaded article images are stored and served from.
    pub images_path: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/bedu.db".to_string(),
            log_level: "info".to_string(),
            images_path: "images".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Whether to set the Secure flag on the auth cookie.
    /// Default: true for production safety. Set to false for local development without HTTPS.
    pub secure_cookies: bool,

    /// Upper bound on the `limit` query parameter for paginated lists.
    pub max_page_size: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            cors_allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            secure_cookies: true,
            max_page_size: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 signing secret. Override with `BEDU_JWT_SECRET` in production.
    pub jwt_secret: String,

    /// Token lifetime in minutes (default: 60).
    pub token_ttl_minutes: i64,

    /// Whether a soft-deleted account's email/username may be taken by a
    /// new registration. When false, uniqueness checks also consider
    /// soft-deleted rows.
    pub allow_reclaim_deleted_identities: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me".to_string(),
            token_ttl_minutes: 60,
            allow_reclaim_deleted_identities: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub enabled: bool,

    pub host: String,

    pub port: u16,

    pub username: String,

    /// Override with `BEDU_SMTP_PASSWORD` rather than storing it here.
    pub password: String,

    pub from_address: String,

    pub from_name: String,

    /// Base URL of the frontend, used to build verification and reset links.
    pub client_origin: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: "smtp.example.com".to_string(),
            port: 587,
            username: String::new(),
            password: String::new(),
            from_address: "noreply@bedu.local".to_string(),
            from_name: "bEDU".to_string(),
            client_origin: "http://localhost:3000".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                let mut config = Self::load_from_path(path)?;
                config.apply_env_overrides();
                return Ok(config);
            }
        }

        info!("No config file found, using defaults");
        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Secrets win from the environment over anything in the file.
    fn apply_env_overrides(&mut self) {
        if let Ok(secret) = std::env::var("BEDU_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Ok(password) = std::env::var("BEDU_SMTP_PASSWORD") {
            self.smtp.password = password;
        }
        if let Ok(db) = std::env::var("BEDU_DATABASE_PATH") {
            self.general.database_path = db;
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::default_config_path();
        self.save_to_path(&path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        if let Ok(path) = std::env::var("BEDU_CONFIG") {
            paths.push(PathBuf::from(path));
        }

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("bedu").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            anyhow::bail!("JWT secret cannot be empty");
        }

        if self.auth.token_ttl_minutes <= 0 {
            anyhow::bail!("Token TTL must be > 0 minutes");
        }

        if self.server.max_page_size == 0 {
            anyhow::bail!("Maximum page size must be > 0");
        }

        if self.smtp.enabled && self.smtp.host.is_empty() {
            anyhow::bail!("SMTP host cannot be empty when SMTP is enabled");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.auth.token_ttl_minutes, 60);
        assert_eq!(config.server.max_page_size, 100);
        assert!(!config.auth.allow_reclaim_deleted_identities);
        assert!(!config.smtp.enabled);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[server]"));
        assert!(toml_str.contains("[auth]"));
        assert!(toml_str.contains("[smtp]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [server]
            max_page_size = 50
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.server.max_page_size, 50);

        assert_eq!(config.auth.token_ttl_minutes, 60);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.server.max_page_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.auth.jwt_secret = String::new();
        assert!(config.validate().is_err());
    }
}
