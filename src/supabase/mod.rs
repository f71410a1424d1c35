//! Hosted auth and database collaborators.
//!
//! # Data Flow
//! ```text
//! Authorization: Bearer <token>
//!     → auth.rs (GET /auth/v1/user)     → Principal | IdentityError
//!     → profiles.rs (POST /rest/v1/…)   → () | StoreError
//! ```
//!
//! # Design Decisions
//! - Profile writes carry the caller's token so row-level policies apply
//! - Both collaborators sit behind traits; routes never see HTTP details

pub mod auth;
pub mod profiles;
pub mod types;

pub use auth::SupabaseAuth;
pub use profiles::SupabaseProfiles;
pub use types::{IdentityError, IdentityProvider, Principal, ProfileChanges, ProfileStore, StoreError};
