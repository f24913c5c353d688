use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::storage::ResolveMode;

pub const DEFAULT_SIGNED_URL_TTL_SECS: u64 = 3600;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub catalog: CatalogConfig,
    pub retry: RetrySettings,
    pub content: ContentConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
    pub static_dir: Option<PathBuf>,
}

#[derive(Clone, Deserialize)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
    pub timeout_secs: u64,
}

// Keep the anon key out of startup logs.
impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url)
            .field("anon_key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub collection: String,
    pub images_bucket: String,
    pub videos_bucket: String,
    pub url_mode: ResolveMode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetrySettings {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 200,
            max_delay_ms: 2_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentConfig {
    /// Optional JSON file replacing the built-in portfolio content.
    pub file: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            collection: "motion_graphics_projects".to_string(),
            images_bucket: "images".to_string(),
            videos_bucket: "videos".to_string(),
            url_mode: ResolveMode::Public,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Backend credentials are mandatory; everything else has a default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |keys: &[&str]| keys.iter().find_map(|k| lookup(*k).filter(|v| !v.trim().is_empty()));

        let url = var(&["SUPABASE_URL", "VITE_SUPABASE_URL"])
            .ok_or_else(|| anyhow!("SUPABASE_URL (or VITE_SUPABASE_URL) must be set"))?;
        let anon_key = var(&["SUPABASE_ANON_KEY", "VITE_SUPABASE_ANON_KEY"])
            .ok_or_else(|| anyhow!("SUPABASE_ANON_KEY (or VITE_SUPABASE_ANON_KEY) must be set"))?;

        let signed_ttl: u64 = var(&["SIGNED_URL_TTL_SECS"])
            .map(|v| v.parse::<u64>().context("SIGNED_URL_TTL_SECS must be an integer"))
            .transpose()?
            .unwrap_or(DEFAULT_SIGNED_URL_TTL_SECS);

        let url_mode = match var(&["MEDIA_URL_MODE"]).as_deref().map(str::to_ascii_lowercase) {
            None => ResolveMode::Public,
            Some(mode) if mode == "public" => ResolveMode::Public,
            Some(mode) if mode == "signed" => ResolveMode::Signed { ttl_secs: signed_ttl },
            Some(other) => return Err(anyhow!("MEDIA_URL_MODE must be 'public' or 'signed', got '{}'", other)),
        };

        let defaults = CatalogConfig::default();
        let retry_defaults = RetrySettings::default();

        Ok(Self {
            server: ServerConfig {
                port: var(&["PORT"])
                    .unwrap_or_else(|| "3000".to_string())
                    .parse()
                    .context("PORT must be a valid port number")?,
                host: var(&["HOST"]).unwrap_or_else(|| "0.0.0.0".to_string()),
                cors_allowed_origins: var(&["ALLOWED_ORIGINS"])
                    .unwrap_or_else(|| "http://localhost:3000,http://localhost:5173".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                static_dir: var(&["STATIC_DIR"]).map(PathBuf::from),
            },
            backend: BackendConfig {
                url: url.trim_end_matches('/').to_string(),
                anon_key,
                timeout_secs: var(&["HTTP_TIMEOUT_SECS"])
                    .unwrap_or_else(|| "15".to_string())
                    .parse()
                    .context("HTTP_TIMEOUT_SECS must be an integer")?,
            },
            catalog: CatalogConfig {
                collection: var(&["CATALOG_COLLECTION"]).unwrap_or(defaults.collection),
                images_bucket: var(&["IMAGES_BUCKET"]).unwrap_or(defaults.images_bucket),
                videos_bucket: var(&["VIDEOS_BUCKET"]).unwrap_or(defaults.videos_bucket),
                url_mode,
            },
            retry: RetrySettings {
                max_attempts: var(&["RETRY_MAX_ATTEMPTS"])
                    .map(|v| v.parse::<u32>().context("RETRY_MAX_ATTEMPTS must be an integer"))
                    .transpose()?
                    .unwrap_or(retry_defaults.max_attempts)
                    .max(1),
                base_delay_ms: var(&["RETRY_BASE_DELAY_MS"])
                    .map(|v| v.parse::<u64>().context("RETRY_BASE_DELAY_MS must be an integer"))
                    .transpose()?
                    .unwrap_or(retry_defaults.base_delay_ms),
                max_delay_ms: retry_defaults.max_delay_ms,
            },
            content: ContentConfig {
                file: var(&["CONTENT_FILE"]).map(PathBuf::from),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_missing_credentials_is_an_error() {
        let result = Config::from_lookup(lookup(&[("SUPABASE_URL", "https://x.supabase.co")]));
        assert!(result.is_err());

        let result = Config::from_lookup(lookup(&[]));
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("VITE_SUPABASE_URL", "https://x.supabase.co/"),
            ("VITE_SUPABASE_ANON_KEY", "anon"),
        ]))
        .unwrap();

        assert_eq!(config.backend.url, "https://x.supabase.co");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.catalog.collection, "motion_graphics_projects");
        assert_eq!(config.catalog.images_bucket, "images");
        assert_eq!(config.catalog.videos_bucket, "videos");
        assert_eq!(config.catalog.url_mode, ResolveMode::Public);
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn test_signed_mode_uses_ttl() {
        let config = Config::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://x.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
            ("MEDIA_URL_MODE", "Signed"),
            ("SIGNED_URL_TTL_SECS", "600"),
        ]))
        .unwrap();

        assert_eq!(config.catalog.url_mode, ResolveMode::Signed { ttl_secs: 600 });
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let result = Config::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://x.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
            ("MEDIA_URL_MODE", "private"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = Config::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://x.supabase.co"),
            ("SUPABASE_ANON_KEY", "super-secret"),
        ]))
        .unwrap();

        let printed = format!("{:?}", config.backend);
        assert!(!printed.contains("super-secret"));
    }
}
