use serde::Deserialize;
use validator::{Validate, ValidationError};

use super::{FieldErrors, IntoValidated, non_blank, required};

/// Email and password as submitted to sign-up and login.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_both_present"))]
pub struct CredentialsPayload {
    #[validate(email(message = "Invalid email"))]
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Normalized credentials. `email` is trimmed and lowercased; the
/// password is passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

fn validate_both_present(payload: &CredentialsPayload) -> Result<(), ValidationError> {
    let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
    if present(&payload.email) && present(&payload.password) {
        Ok(())
    } else {
        Err(ValidationError::new("credentials")
            .with_message("Email and password are required".into()))
    }
}

impl IntoValidated for CredentialsPayload {
    type Output = Credentials;

    fn into_validated(self) -> Result<Credentials, FieldErrors> {
        let payload = CredentialsPayload {
            email: non_blank(self.email).map(|e| e.to_lowercase()),
            password: self.password,
        };
        payload.validate()?;

        Ok(Credentials {
            email: required("email", payload.email)?,
            password: required("password", payload.password)?,
        })
    }
}
