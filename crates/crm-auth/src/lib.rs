//! Freelancer CRM auth: the built-in identity provider. Argon2id
//! password hashing and EdDSA access tokens whose subject is the tenant
//! id used by every CRM repository.

pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthService, LoginOutput, Session};
pub use token::AccessTokenClaims;
