//! Product search subsystem.
//!
//! # Data Flow
//! ```text
//! SearchQuery (validated by the route)
//!     → client.rs (POST to provider, single attempt)
//!     → provider items, in provider order
//!     → affiliate rewrite of each product link
//!     → Vec<Product>
//! ```
//!
//! # Design Decisions
//! - One provider call per search; no retries
//! - `ProductSearch` is a trait so routes can be tested without a provider

pub mod client;
pub mod types;

pub use client::HttpProductSearch;
pub use types::{Product, ProductSearch, SearchError, SearchQuery};
