//! Application configuration loaded from `config.toml` with environment
//! fallbacks. All tunables the auth core depends on (argon2 cost, lockout
//! policy, token lifetimes) live here so they can change without a rebuild.

use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_acquire_timeout() -> u64 { 30 }

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

/// Auth tunables. Argon2 parameters are recorded inside each PHC hash
/// string, so changing them here never invalidates stored hashes.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// HS256 signing secret; the `JWT_SECRET` env var overrides.
    #[serde(default)]
    pub jwt_secret: Option<String>,
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_minutes: i64,
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_days: i64,
    #[serde(default = "default_verification_ttl")]
    pub verification_token_ttl_hours: i64,
    #[serde(default = "default_reset_ttl")]
    pub reset_token_ttl_minutes: i64,
    #[serde(default = "default_lockout_threshold")]
    pub lockout_threshold: u32,
    #[serde(default = "default_lockout_window")]
    pub lockout_window_minutes: i64,
    #[serde(default = "default_require_verified")]
    pub require_verified_email: bool,
    #[serde(default = "default_argon2_memory")]
    pub argon2_memory_kib: u32,
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
}

fn default_access_ttl() -> i64 { 15 }
fn default_refresh_ttl() -> i64 { 30 }
fn default_verification_ttl() -> i64 { 24 }
fn default_reset_ttl() -> i64 { 30 }
fn default_lockout_threshold() -> u32 { 5 }
fn default_lockout_window() -> i64 { 15 }
fn default_require_verified() -> bool { true }
fn default_argon2_memory() -> u32 { 19 * 1024 }
fn default_argon2_iterations() -> u32 { 2 }
fn default_argon2_parallelism() -> u32 { 1 }

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            access_token_ttl_minutes: default_access_ttl(),
            refresh_token_ttl_days: default_refresh_ttl(),
            verification_token_ttl_hours: default_verification_ttl(),
            reset_token_ttl_minutes: default_reset_ttl(),
            lockout_threshold: default_lockout_threshold(),
            lockout_window_minutes: default_lockout_window(),
            require_verified_email: default_require_verified(),
            argon2_memory_kib: default_argon2_memory(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
        }
    }
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to pure-env
    /// defaults when the file is missing, then normalize and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default().unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        self.auth.normalize_from_env();
        self.auth.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        // Fill the URL from the environment when the TOML omits it.
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!(
                "database.url is empty; set it in config.toml or the DATABASE_URL env var"
            ));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl AuthSettings {
    pub fn normalize_from_env(&mut self) {
        if self.jwt_secret.as_deref().map(|s| s.trim().is_empty()).unwrap_or(true) {
            if let Ok(secret) = std::env::var("JWT_SECRET") {
                self.jwt_secret = Some(secret);
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.lockout_threshold == 0 {
            return Err(anyhow!("auth.lockout_threshold must be >= 1"));
        }
        if self.lockout_window_minutes <= 0 {
            return Err(anyhow!("auth.lockout_window_minutes must be positive"));
        }
        if self.access_token_ttl_minutes <= 0
            || self.refresh_token_ttl_days <= 0
            || self.verification_token_ttl_hours <= 0
            || self.reset_token_ttl_minutes <= 0
        {
            return Err(anyhow!("auth token lifetimes must be positive"));
        }
        if self.argon2_memory_kib < 8 || self.argon2_iterations == 0 || self.argon2_parallelism == 0
        {
            return Err(anyhow!("auth argon2 parameters out of range"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        let mut auth = AuthSettings::default();
        auth.normalize_from_env();
        auth.validate().unwrap();
        assert_eq!(auth.lockout_threshold, 5);
        assert_eq!(auth.lockout_window_minutes, 15);
        assert!(auth.require_verified_email);
    }

    #[test]
    fn zero_lockout_threshold_rejected() {
        let auth = AuthSettings { lockout_threshold: 0, ..Default::default() };
        assert!(auth.validate().is_err());
    }

    #[test]
    fn database_url_scheme_checked() {
        let db = DatabaseConfig {
            url: "mysql://nope".into(),
            max_connections: 10,
            min_connections: 2,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
            acquire_timeout_secs: 30,
            sqlx_logging: false,
        };
        assert!(db.validate().is_err());
    }

    #[test]
    fn toml_parse_with_auth_section() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8081

            [database]
            url = "postgres://localhost/fieldserve"

            [auth]
            lockout_threshold = 3
            require_verified_email = false
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 8081);
        assert_eq!(cfg.auth.lockout_threshold, 3);
        assert!(!cfg.auth.require_verified_email);
        // unspecified fields fall back to defaults
        assert_eq!(cfg.auth.refresh_token_ttl_days, 30);
    }
}
