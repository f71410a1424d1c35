//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from an optional TOML file.
///
/// Without a path the defaults are used. Environment overrides are applied
/// before validation in both cases.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str::<GatewayConfig>(&content)?
        }
        None => GatewayConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay deployment environment variables onto the file configuration.
///
/// `lookup` is injected so tests don't have to mutate the process environment.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(mode) = lookup("GIFTPERCH_ENV") {
        match mode.parse() {
            Ok(mode) => config.runtime.mode = mode,
            Err(e) => tracing::warn!(error = %e, "Ignoring GIFTPERCH_ENV"),
        }
    }
    if let Some(tag) = lookup("AMAZON_PARTNER_TAG") {
        config.affiliate.partner_tag = Some(tag);
    }
    if let Some(key) = lookup("SEARCH_API_KEY") {
        config.search.api_key = key;
    }
    if let Some(url) = lookup("SUPABASE_URL") {
        config.supabase.url = url;
    }
    if let Some(key) = lookup("SUPABASE_ANON_KEY") {
        config.supabase.anon_key = key;
    }
    if let Some(url) = lookup("SITE_URL") {
        config.site.base_url = url;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RuntimeMode;
    use std::collections::HashMap;

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("GIFTPERCH_ENV", "production"),
            ("AMAZON_PARTNER_TAG", "envtag-20"),
            ("SITE_URL", "https://staging.giftperch.com"),
        ]
        .into_iter()
        .collect();

        let mut config = GatewayConfig::default();
        apply_env_overrides(&mut config, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.runtime.mode, RuntimeMode::Production);
        assert_eq!(config.affiliate.partner_tag.as_deref(), Some("envtag-20"));
        assert_eq!(config.site.base_url, "https://staging.giftperch.com");
        assert_eq!(config.supabase.profiles_table, "profiles");
    }

    #[test]
    fn test_bad_mode_is_ignored() {
        let mut config = GatewayConfig::default();
        apply_env_overrides(&mut config, |k| (k == "GIFTPERCH_ENV").then(|| "qa".to_string()));
        assert_eq!(config.runtime.mode, RuntimeMode::Development);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir()
            .join(format!("giftperch_loader_test_{}.toml", uuid::Uuid::new_v4()));
        fs::write(
            &path,
            "[listener]\nbind_address = \"127.0.0.1:9999\"\n[search]\ndefault_max_results = 4\n",
        )
        .unwrap();

        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9999");
        assert_eq!(config.search.default_max_results, 4);

        fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_invalid_file_reports_validation() {
        let path = std::env::temp_dir()
            .join(format!("giftperch_loader_invalid_{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, "[timeouts]\nrequest_secs = 0\n").unwrap();

        let err = load_config(Some(path.as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("timeouts.request_secs"));

        fs::remove_file(&path).unwrap_or_default();
    }
}
