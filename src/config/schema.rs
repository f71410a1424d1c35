//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Process mode (production or development).
    pub runtime: RuntimeConfig,

    /// Affiliate link settings.
    pub affiliate: AffiliateConfig,

    /// Product search provider settings.
    pub search: SearchConfig,

    /// Hosted auth + database service settings.
    pub supabase: SupabaseConfig,

    /// Public site settings (robots.txt).
    pub site: SiteConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time allowed for handling one inbound request, in seconds.
    pub request_secs: u64,

    /// Timeout for a single call to an upstream service, in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            upstream_secs: 10,
        }
    }
}

/// Whether the process runs in a production-like mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    Production,
    #[default]
    Development,
}

impl RuntimeMode {
    pub fn is_production(self) -> bool {
        self == RuntimeMode::Production
    }
}

impl std::str::FromStr for RuntimeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(RuntimeMode::Production),
            "development" | "dev" | "test" => Ok(RuntimeMode::Development),
            other => Err(format!("unknown runtime mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RuntimeConfig {
    pub mode: RuntimeMode,
}

/// Affiliate program configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AffiliateConfig {
    /// Amazon Associates partner tag. Falls back to the built-in tag when unset.
    pub partner_tag: Option<String>,
}

/// Product search provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search endpoint URL.
    pub endpoint: String,

    /// API key sent as a bearer token.
    pub api_key: String,

    /// Result count used when the caller omits `maxResults`.
    pub default_max_results: u32,

    /// Upper bound applied to `maxResults`.
    pub max_results_cap: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8787/search".to_string(),
            api_key: String::new(),
            default_max_results: 8,
            max_results_cap: 24,
        }
    }
}

/// Hosted auth/database service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SupabaseConfig {
    /// Project URL (e.g., "https://xyz.supabase.co").
    pub url: String,

    /// Public anon key, sent as the `apikey` header.
    pub anon_key: String,

    /// Table holding user profiles.
    pub profiles_table: String,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:54321".to_string(),
            anon_key: String::new(),
            profiles_table: "profiles".to_string(),
        }
    }
}

/// Public site configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Canonical base URL of the deployment.
    pub base_url: String,

    /// Path prefixes crawlers should not index.
    pub disallow: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://giftperch.com".to_string(),
            disallow: vec![
                "/api/".to_string(),
                "/auth/".to_string(),
                "/portal/".to_string(),
                "/settings".to_string(),
            ],
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024, // 64KB
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.runtime.mode, RuntimeMode::Development);
        assert!(config.affiliate.partner_tag.is_none());
        assert_eq!(config.search.default_max_results, 8);
        assert_eq!(config.supabase.profiles_table, "profiles");
    }

    #[test]
    fn test_minimal_toml() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [runtime]
            mode = "production"

            [affiliate]
            partner_tag = "mytag-20"
            "#,
        )
        .unwrap();
        assert!(config.runtime.mode.is_production());
        assert_eq!(config.affiliate.partner_tag.as_deref(), Some("mytag-20"));
        assert_eq!(config.timeouts.request_secs, 30);
    }

    #[test]
    fn test_runtime_mode_parse() {
        assert_eq!("PROD".parse::<RuntimeMode>().unwrap(), RuntimeMode::Production);
        assert_eq!("development".parse::<RuntimeMode>().unwrap(), RuntimeMode::Development);
        assert!("staging".parse::<RuntimeMode>().is_err());
    }
}
