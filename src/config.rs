use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

pub const JWT_SECRET_ENV: &str = "FEEDBACKD_JWT_SECRET";
pub const DATABASE_URL_ENV: &str = "FEEDBACKD_DATABASE_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub security: SecurityConfig,

    pub bootstrap: BootstrapConfig,

    pub mail: MailConfig,

    pub requests: RequestConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Tokio worker count; 0 means one per core.
    pub worker_threads: usize,

    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/feedbackd.db".to_string(),
            log_level: "info".to_string(),
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
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Argon2 memory cost in KiB
    pub argon2_memory_cost_kib: u32,

    pub argon2_time_cost: u32,

    pub argon2_parallelism: u32,

    /// HS256 signing secret for bearer tokens.
    pub jwt_secret: String,

    pub token_ttl_minutes: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
            jwt_secret: "change-me".to_string(),
            token_ttl_minutes: 60,
        }
    }
}

/// Credentials for the first admin account, created at startup when no
/// admin exists yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub admin_email: Option<String>,

    pub admin_password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub enabled: bool,

    /// HTTP endpoint accepting `{from, to, subject, html}`. When unset the
    /// invitation is only logged.
    pub relay_url: Option<String>,

    pub from_address: String,

    /// Display name used in the From header and the signature.
    pub sender_name: String,

    pub subject: String,

    /// Base URL of the candidate-facing site; links are `{base}/submit/{token}`.
    pub feedback_url_base: String,

    pub queue_size: usize,

    pub request_timeout_seconds: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            relay_url: None,
            from_address: "noreply@example.com".to_string(),
            sender_name: "Recruitment".to_string(),
            subject: "Interview Feedback Request".to_string(),
            feedback_url_base: "http://localhost:3000".to_string(),
            queue_size: 100,
            request_timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    /// Hours after which a pending request expires. Disabled when unset.
    pub expiry_hours: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            json_logs: false,
        }
    }
}

impl Config {
    /// First existing file among the search paths, then environment
    /// overrides. Falls back to defaults when no file is found.
    pub fn load() -> Result<Self> {
        let mut config = match Self::search_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => {
                info!(path = %path.display(), "Reading configuration");
                Self::load_from_path(&path)?
            }
            None => {
                info!("No configuration file present; running with defaults");
                Self::default()
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display()))?;

        toml::from_str(&raw).with_context(|| format!("Malformed TOML in {}", path.display()))
    }

    pub fn apply_env_overrides(&mut self) {
        if let Some(secret) = non_empty_env(JWT_SECRET_ENV) {
            self.security.jwt_secret = secret;
        }

        if let Some(url) = non_empty_env(DATABASE_URL_ENV) {
            self.general.database_path = url;
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create {}", dir.display()))?;
        }

        let rendered = toml::to_string_pretty(self).context("Failed to render configuration")?;
        std::fs::write(path, rendered).with_context(|| format!("Cannot write {}", path.display()))?;
        info!(path = %path.display(), "Configuration written");
        Ok(())
    }

    fn search_paths() -> Vec<PathBuf> {
        let user_dirs = [
            dirs::config_dir().map(|d| d.join("feedbackd")),
            dirs::home_dir().map(|d| d.join(".feedbackd")),
        ];

        std::iter::once(Self::default_config_path())
            .chain(user_dirs.into_iter().flatten().map(|d| d.join("config.toml")))
            .collect()
    }

    #[must_use]
    pub fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    /// Writes a default `config.toml` in the working directory. Returns
    /// `false` when one is already there.
    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            return Ok(false);
        }

        Self::default().save_to_path(&path)?;
        Ok(true)
    }

    pub fn validate(&self) -> Result<()> {
        if self.security.jwt_secret.trim().is_empty() {
            anyhow::bail!("security.jwt_secret cannot be empty");
        }

        if self.security.token_ttl_minutes == 0 {
            anyhow::bail!("security.token_ttl_minutes must be > 0");
        }

        url::Url::parse(&self.mail.feedback_url_base)
            .context("mail.feedback_url_base is not a valid URL")?;

        if let Some(relay) = &self.mail.relay_url {
            url::Url::parse(relay).context("mail.relay_url is not a valid URL")?;
        }

        if self.mail.queue_size == 0 {
            anyhow::bail!("mail.queue_size must be > 0");
        }

        if self.bootstrap.admin_email.is_some() != self.bootstrap.admin_password.is_some() {
            anyhow::bail!("bootstrap.admin_email and bootstrap.admin_password must be set together");
        }

        Ok(())
    }

    /// Expiry window for pending requests, if configured.
    #[must_use]
    pub fn request_expiry(&self) -> Option<chrono::Duration> {
        self.requests
            .expiry_hours
            .map(|h| chrono::Duration::hours(i64::from(h)))
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
