//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, span)
//!     → route handler:
//!         validate body        → 400 (response.rs)
//!         authenticate caller  → 401 (auth.rs, profile route only)
//!         one upstream call    → 500 on failure
//!     → JSON response
//! ```
//!
//! # Design Decisions
//! - Invalid input never reaches an upstream service
//! - No retries: a failed request is terminal, the client resubmits
//! - Collaborators come from `AppState`, never from globals

pub mod auth;
pub mod profile;
pub mod request;
pub mod response;
pub mod search;
pub mod server;
pub mod site;
pub mod state;

pub use request::X_REQUEST_ID;
pub use response::ApiError;
pub use server::HttpServer;
pub use state::{AppState, AppStateBuilder, StartupError};
