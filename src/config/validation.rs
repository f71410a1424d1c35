//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, result limits)
//! - Check addresses and URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("invalid URL for {field}: '{value}'")]
    Url { field: &'static str, value: String },

    #[error("search.default_max_results ({default}) exceeds search.max_results_cap ({cap})")]
    ResultLimits { default: u32, cap: u32 },

    #[error("site.disallow entry '{0}' must start with '/'")]
    DisallowPrefix(String),

    #[error("affiliate.partner_tag '{0}' may only contain ASCII letters, digits and '-'")]
    PartnerTag(String),
}

pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.request_secs"));
    }
    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.upstream_secs"));
    }

    for (field, value) in [
        ("site.base_url", &config.site.base_url),
        ("search.endpoint", &config.search.endpoint),
        ("supabase.url", &config.supabase.url),
    ] {
        if url::Url::parse(value).is_err() {
            errors.push(ValidationError::Url {
                field,
                value: value.clone(),
            });
        }
    }

    let search = &config.search;
    if search.max_results_cap == 0 || search.default_max_results > search.max_results_cap {
        errors.push(ValidationError::ResultLimits {
            default: search.default_max_results,
            cap: search.max_results_cap,
        });
    }

    for prefix in &config.site.disallow {
        if !prefix.starts_with('/') {
            errors.push(ValidationError::DisallowPrefix(prefix.clone()));
        }
    }

    if let Some(tag) = &config.affiliate.partner_tag {
        let tag = tag.trim();
        if !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            errors.push(ValidationError::PartnerTag(tag.to_string()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.timeouts.upstream_secs = 0;
        config.site.base_url = "giftperch.com".into();
        config.site.disallow.push("private".into());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::ZeroTimeout("timeouts.upstream_secs")));
        assert!(errors.contains(&ValidationError::DisallowPrefix("private".into())));
    }

    #[test]
    fn test_result_limits() {
        let mut config = GatewayConfig::default();
        config.search.default_max_results = 50;
        config.search.max_results_cap = 10;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::ResultLimits { default: 50, cap: 10 }]);
    }

    #[test]
    fn test_partner_tag_charset() {
        let mut config = GatewayConfig::default();
        config.affiliate.partner_tag = Some(" giftperch-20 ".into());
        assert!(validate_config(&config).is_ok());

        config.affiliate.partner_tag = Some("a&k=evil".into());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::PartnerTag("a&k=evil".into())]);
    }
}
