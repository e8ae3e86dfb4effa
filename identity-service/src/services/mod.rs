//! Services layer for the identity engine.
//!
//! Business logic for identity reconciliation, token lifecycle, access
//! resolution and organization membership.

mod access;
mod auth;
mod defaults;
mod membership;
mod providers;
mod token;

pub mod error;

pub use access::AccessService;
pub use auth::AuthService;
pub use defaults::{DefaultRoleResolver, StoreDefaultRoleResolver};
pub use error::ServiceError;
pub use membership::{Advisory, MembershipService};
pub use providers::{ProviderConfig, ProviderRegistry};
pub use token::{AccessClaims, TokenResponse, TokenService};
