//! Affiliate link subsystem.
//!
//! # Data Flow
//! ```text
//! (product URL?, title?)
//!     → contains "amazon." and parses?
//!         yes → set `tag` query parameter       → product link
//!         no  → https://www.amazon.com/s?k=…    → search link
//! ```
//!
//! # Design Decisions
//! - Total function: malformed input degrades to the search link
//! - Classification is a substring check, not a host allowlist
//! - Missing partner tag warns once per process outside production

pub mod rewriter;

pub use rewriter::{AffiliateLinkRewriter, LinkKind, FALLBACK_PARTNER_TAG, FALLBACK_TITLE};
