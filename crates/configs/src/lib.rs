use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

pub const DEFAULT_ORIGINS: [&str; 2] = ["http://localhost:5174", "http://localhost:5173"];

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4) }
    }
}

/// Location of the file-backed document collections.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_db_name")]
    pub name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { data_dir: default_data_dir(), name: default_db_name() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret. `None` means the binary falls back to a dev secret.
    #[serde(default)]
    pub token_secret: Option<String>,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: u64,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: None,
            token_ttl_hours: default_token_ttl_hours(),
            cookie_name: default_cookie_name(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self { allowed_origins: default_origins() }
    }
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 3000 }
fn default_data_dir() -> String { "data".into() }
fn default_db_name() -> String { "carDoctors".into() }
fn default_token_ttl_hours() -> u64 { 1000 }
fn default_cookie_name() -> String { "token".into() }
fn default_origins() -> Vec<String> { DEFAULT_ORIGINS.iter().map(|s| s.to_string()).collect() }

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
    /// Load `config.toml` if present (defaults otherwise), apply environment
    /// overrides, then normalize.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default().unwrap_or_default();
        cfg.apply_env(|key| std::env::var(key).ok())?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Overlay values from an environment lookup. Taking the lookup as a
    /// closure keeps tests away from process-global state.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| anyhow!("PORT must be an integer in 1..=65535, got {port:?}"))?;
        }
        if let Some(w) = lookup("TOKIO_WORKER_THREADS").and_then(|v| v.trim().parse().ok()) {
            self.server.worker_threads = Some(w);
        }
        if let Some(dir) = lookup("DATA_DIR") {
            self.database.data_dir = dir;
        }
        if let Some(name) = lookup("DB_NAME") {
            self.database.name = name;
        }
        if let Some(secret) = lookup("ACCESS_TOKEN_SECRET") {
            self.auth.token_secret = Some(secret);
        }
        if let Some(ttl) = lookup("TOKEN_TTL_HOURS") {
            self.auth.token_ttl_hours = ttl
                .trim()
                .parse()
                .map_err(|_| anyhow!("TOKEN_TTL_HOURS must be a positive integer, got {ttl:?}"))?;
        }
        if let Some(origins) = lookup("CORS_ORIGINS") {
            self.cors.allowed_origins = origins.split(',').map(|s| s.trim().to_string()).collect();
        }
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.validate()?;
        self.auth.normalize()?;
        self.cors.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
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
    pub fn validate(&self) -> Result<()> {
        if self.data_dir.trim().is_empty() {
            return Err(anyhow!("database.data_dir is empty; set it in config.toml or DATA_DIR"));
        }
        if self.name.trim().is_empty() || self.name.contains(['/', '\\']) {
            return Err(anyhow!("database.name must be a plain, non-empty name"));
        }
        Ok(())
    }
}

impl AuthConfig {
    fn normalize(&mut self) -> Result<()> {
        if matches!(self.token_secret.as_deref(), Some(s) if s.trim().is_empty()) {
            self.token_secret = None;
        }
        if self.token_ttl_hours == 0 {
            return Err(anyhow!("auth.token_ttl_hours must be >= 1"));
        }
        if self.cookie_name.trim().is_empty() {
            self.cookie_name = default_cookie_name();
        }
        Ok(())
    }
}

impl CorsConfig {
    fn validate(&self) -> Result<()> {
        if self.allowed_origins.iter().any(|o| o.trim().is_empty()) {
            return Err(anyhow!("cors.allowed_origins contains an empty entry"));
        }
        if self.allowed_origins.iter().any(|o| o == "*") {
            return Err(anyhow!("cors.allowed_origins cannot be '*' when credentials are allowed"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_match_legacy_server() {
        let mut cfg = AppConfig::default();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.database.name, "carDoctors");
        assert_eq!(cfg.auth.token_ttl_hours, 1000);
        assert_eq!(cfg.auth.cookie_name, "token");
        assert_eq!(cfg.cors.allowed_origins, vec!["http://localhost:5174", "http://localhost:5173"]);
        assert!(cfg.auth.token_secret.is_none());
    }

    #[test]
    fn env_overrides_apply() {
        let mut cfg = AppConfig::default();
        cfg.apply_env(env(&[
            ("PORT", "4000"),
            ("ACCESS_TOKEN_SECRET", "s3cret"),
            ("DATA_DIR", "/tmp/cd"),
            ("CORS_ORIGINS", "http://a.test, http://b.test"),
        ]))
        .unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.port, 4000);
        assert_eq!(cfg.auth.token_secret.as_deref(), Some("s3cret"));
        assert_eq!(cfg.database.data_dir, "/tmp/cd");
        assert_eq!(cfg.cors.allowed_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn bad_port_is_rejected() {
        let mut cfg = AppConfig::default();
        assert!(cfg.apply_env(env(&[("PORT", "not-a-port")])).is_err());
        let mut cfg = AppConfig::default();
        cfg.server.port = 0;
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn blank_secret_treated_as_missing() {
        let mut cfg = AppConfig::default();
        cfg.auth.token_secret = Some("   ".into());
        cfg.normalize_and_validate().unwrap();
        assert!(cfg.auth.token_secret.is_none());
    }

    #[test]
    fn wildcard_origin_rejected() {
        let mut cfg = AppConfig::default();
        cfg.cors.allowed_origins = vec!["*".into()];
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn parses_toml_sections() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            port = 8088

            [database]
            data_dir = "var/db"

            [auth]
            token_ttl_hours = 12
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 8088);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.database.data_dir, "var/db");
        assert_eq!(cfg.database.name, "carDoctors");
        assert_eq!(cfg.auth.token_ttl_hours, 12);
    }
}
