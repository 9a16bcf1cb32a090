use anyhow::{anyhow, Context, Result};

use crate::templates::LinkDisplay;

const DEFAULT_MAX_EXPORT_BYTES: usize = 2 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup on malformed values.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. Without it documents live in memory.
    pub database_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// Project link labelling when a request does not choose one.
    pub link_display: LinkDisplay,
    /// Request body limit for export and document endpoints.
    pub max_export_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let link_display = match get("LINK_DISPLAY") {
            None => LinkDisplay::default(),
            Some(raw) => LinkDisplay::parse(&raw)
                .ok_or_else(|| anyhow!("LINK_DISPLAY must be 'short' or 'full', got '{raw}'"))?,
        };

        Ok(Config {
            database_url: get("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            link_display,
            max_export_bytes: match get("MAX_EXPORT_BYTES") {
                None => DEFAULT_MAX_EXPORT_BYTES,
                Some(raw) => raw
                    .parse::<usize>()
                    .context("MAX_EXPORT_BYTES must be a byte count")?,
            },
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: None,
            port: 8080,
            rust_log: "info".to_string(),
            link_display: LinkDisplay::default(),
            max_export_bytes: DEFAULT_MAX_EXPORT_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert!(config.database_url.is_none());
        assert_eq!(config.link_display, LinkDisplay::Short);
        assert_eq!(config.max_export_bytes, 2 * 1024 * 1024);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("PORT", "9000"),
            ("DATABASE_URL", "postgres://localhost/folio"),
            ("LINK_DISPLAY", "Full"),
            ("MAX_EXPORT_BYTES", "1024"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/folio"));
        assert_eq!(config.link_display, LinkDisplay::Full);
        assert_eq!(config.max_export_bytes, 1024);
    }

    #[test]
    fn test_invalid_values_fail() {
        assert!(load(&[("PORT", "eighty")]).is_err());
        assert!(load(&[("LINK_DISPLAY", "long")]).is_err());
        assert!(load(&[("MAX_EXPORT_BYTES", "-1")]).is_err());
    }
}
