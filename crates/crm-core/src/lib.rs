//! Freelancer CRM core: domain models, the error taxonomy, repository
//! traits and the request validators shared by the HTTP layer.

pub mod error;
pub mod models;
pub mod repository;
pub mod validation;
