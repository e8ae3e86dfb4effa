pub mod auth;
pub mod membership;

pub use auth::{AuthResponse, ExternalIdentity, LoginRequest, RegisterRequest};
pub use membership::CreateOrganizationRequest;
