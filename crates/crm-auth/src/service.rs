//! Authentication service: sign-up, login and request authentication.

use chrono::{DateTime, Utc};
use crm_core::error::{CrmError, CrmResult};
use crm_core::models::account::{Account, CreateAccount};
use crm_core::repository::AccountRepository;
use crm_core::validation::{Credentials, FieldErrors};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

/// Bearer session handed back on login.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub access_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
    pub expires_at: DateTime<Utc>,
}

/// Successful login result.
#[derive(Debug, Clone)]
pub struct LoginOutput {
    pub session: Session,
    pub account: Account,
}

/// Authentication service.
///
/// Generic over the account repository so that the auth layer has no
/// dependency on the database crate.
pub struct AuthService<A: AccountRepository> {
    account_repo: A,
    config: AuthConfig,
}

impl<A: AccountRepository> AuthService<A> {
    pub fn new(account_repo: A, config: AuthConfig) -> Self {
        Self {
            account_repo,
            config,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Register a new account. The email is expected normalized.
    pub async fn sign_up(&self, credentials: Credentials) -> CrmResult<Account> {
        let min = self.config.min_password_length;
        if credentials.password.chars().count() < min {
            return Err(FieldErrors::single(
                "password",
                format!("Password must be at least {min} characters"),
            )
            .into());
        }

        let password_hash =
            password::hash_password(&credentials.password, self.config.pepper.as_deref())?;

        let account = self
            .account_repo
            .create(CreateAccount {
                email: credentials.email,
                password_hash,
            })
            .await?;

        info!(account_id = %account.id, "Account signed up");
        Ok(account)
    }

    /// Verify credentials and issue an access token.
    ///
    /// An unknown email and a wrong password fail identically.
    pub async fn login(&self, credentials: Credentials) -> CrmResult<LoginOutput> {
        let account = match self.account_repo.get_by_email(&credentials.email).await {
            Ok(account) => account,
            Err(CrmError::NotFound { .. }) => return Err(AuthError::InvalidCredentials.into()),
            Err(e) => return Err(e),
        };

        let valid = password::verify_password(
            &credentials.password,
            &account.password_hash,
            self.config.pepper.as_deref(),
        )?;
        if !valid {
            debug!(account_id = %account.id, "Password mismatch");
            return Err(AuthError::InvalidCredentials.into());
        }

        let issued = token::issue_access_token(account.id, &account.email, &self.config)?;

        info!(account_id = %account.id, "Login succeeded");
        Ok(LoginOutput {
            session: Session {
                access_token: issued.token,
                token_type: "bearer",
                expires_in: self.config.access_token_lifetime_secs,
                expires_at: issued.expires_at,
            },
            account,
        })
    }

    /// Resolve a bearer token to the tenant id it was issued for.
    pub fn authenticate(&self, access_token: &str) -> Result<Uuid, AuthError> {
        token::decode_access_token(access_token, &self.config)?.account_id()
    }
}
