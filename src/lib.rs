//! GiftPerch gateway library.
//!
//! Backend for the GiftPerch web app: affiliate link rewriting and the
//! API routes that validate input and forward it to the product search
//! provider and the hosted auth/database service.

pub mod affiliate;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod preferences;
pub mod search;
pub mod supabase;

pub use affiliate::AffiliateLinkRewriter;
pub use config::schema::GatewayConfig;
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
