//! Affiliate link rewriting.
//!
//! Turns a product reference into a monetized Amazon link. Anything that
//! can't be tagged in place degrades to a search link for the title, so
//! the caller always gets a navigable URL back.

use std::sync::atomic::{AtomicBool, Ordering};

use url::{form_urlencoded, Url};

use crate::config::{AffiliateConfig, RuntimeMode};
use crate::observability::metrics;

/// Partner tag used when none is configured.
pub const FALLBACK_PARTNER_TAG: &str = "giftperch-20";

/// Search phrase used when the title is missing or blank.
pub const FALLBACK_TITLE: &str = "gift ideas";

const SEARCH_BASE: &str = "https://www.amazon.com/s";
const PRODUCT_MARKER: &str = "amazon.";
const TAG_PARAM: &str = "tag";

/// Process-wide guard for the "partner tag missing" warning.
static MISSING_TAG_WARNING: EmitOnce = EmitOnce::new();

/// A flag that lets exactly one caller through.
#[derive(Debug, Default)]
pub struct EmitOnce(AtomicBool);

impl EmitOnce {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Returns `true` for the first caller only.
    pub fn fire(&self) -> bool {
        !self.0.swap(true, Ordering::Relaxed)
    }
}

/// Which branch produced a rewritten link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// The product URL was tagged in place.
    Product,
    /// A search URL was built from the title.
    Search,
}

impl LinkKind {
    fn as_str(self) -> &'static str {
        match self {
            LinkKind::Product => "product",
            LinkKind::Search => "search",
        }
    }
}

/// Builds monetized outbound Amazon links.
#[derive(Debug, Clone)]
pub struct AffiliateLinkRewriter {
    partner_tag: Option<String>,
    mode: RuntimeMode,
    missing_tag_warning: &'static EmitOnce,
}

impl AffiliateLinkRewriter {
    /// Create a rewriter. A blank tag counts as unset.
    pub fn new(partner_tag: Option<String>, mode: RuntimeMode) -> Self {
        let partner_tag = partner_tag
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        Self {
            partner_tag,
            mode,
            missing_tag_warning: &MISSING_TAG_WARNING,
        }
    }

    #[cfg(test)]
    fn with_warning_flag(mut self, flag: &'static EmitOnce) -> Self {
        self.missing_tag_warning = flag;
        self
    }

    pub fn from_config(config: &AffiliateConfig, mode: RuntimeMode) -> Self {
        Self::new(config.partner_tag.clone(), mode)
    }

    /// The tag appended to outbound links.
    pub fn partner_tag(&self) -> &str {
        match &self.partner_tag {
            Some(tag) => tag,
            None => {
                if !self.mode.is_production() && self.missing_tag_warning.fire() {
                    tracing::warn!(
                        fallback_tag = FALLBACK_PARTNER_TAG,
                        "Amazon partner tag is not configured, using fallback tag"
                    );
                }
                FALLBACK_PARTNER_TAG
            }
        }
    }

    /// Rewrite a product reference into an affiliate link.
    pub fn rewrite(&self, product_url: Option<&str>, title: Option<&str>) -> String {
        self.rewrite_with_kind(product_url, title).0
    }

    /// Like [`rewrite`](Self::rewrite), also reporting which branch was taken.
    pub fn rewrite_with_kind(
        &self,
        product_url: Option<&str>,
        title: Option<&str>,
    ) -> (String, LinkKind) {
        let tag = self.partner_tag();

        let tagged = product_url
            .filter(|candidate| candidate.contains(PRODUCT_MARKER))
            .and_then(|candidate| match Url::parse(candidate) {
                Ok(url) => Some(set_tag(url, tag)),
                Err(e) => {
                    tracing::debug!(url = %candidate, error = %e, "Unparseable product URL, using search link");
                    None
                }
            });

        let (link, kind) = match tagged {
            Some(link) => (link, LinkKind::Product),
            None => (search_url(title, tag), LinkKind::Search),
        };

        metrics::record_affiliate_link(kind.as_str());
        (link, kind)
    }

    /// The search link for `title`, ignoring any product URL.
    pub fn search_link(&self, title: Option<&str>) -> String {
        let link = search_url(title, self.partner_tag());
        metrics::record_affiliate_link(LinkKind::Search.as_str());
        link
    }
}

/// Set `tag` on the URL: the first occurrence is replaced in place, later
/// duplicates are dropped, and it is appended when absent.
fn set_tag(mut url: Url, tag: &str) -> String {
    let mut seen = false;
    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    pairs.retain_mut(|(key, value)| {
        if key != TAG_PARAM {
            return true;
        }
        if seen {
            return false;
        }
        seen = true;
        *value = tag.to_string();
        true
    });
    if !seen {
        pairs.push((TAG_PARAM.to_string(), tag.to_string()));
    }

    url.query_pairs_mut().clear().extend_pairs(pairs);
    url.into()
}

fn search_url(title: Option<&str>, tag: &str) -> String {
    let title = title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(FALLBACK_TITLE);
    format!(
        "{}?k={}&{}={}",
        SEARCH_BASE,
        encode_component(title),
        TAG_PARAM,
        encode_component(tag)
    )
}

/// Percent-encode a query component with spaces as `%20`.
///
/// `byte_serialize` escapes a literal `+` as `%2B`, so every `+` left in its
/// output stands for a space.
fn encode_component(input: &str) -> String {
    form_urlencoded::byte_serialize(input.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
