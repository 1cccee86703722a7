//! Service location and credentials.
//!
//! Values come from the environment so the same suite can target the live
//! service or a local mock. Only the valid email and password are required.

use crate::error::ApiError;
use crate::types::Credentials;

pub const DEFAULT_BASE_URL: &str = "https://petfriends.skillfactory.ru";

pub const ENV_BASE_URL: &str = "PETFRIENDS_BASE_URL";
pub const ENV_EMAIL: &str = "PETFRIENDS_EMAIL";
pub const ENV_PASSWORD: &str = "PETFRIENDS_PASSWORD";
pub const ENV_INVALID_EMAIL: &str = "PETFRIENDS_INVALID_EMAIL";
pub const ENV_INVALID_PASSWORD: &str = "PETFRIENDS_INVALID_PASSWORD";

const DEFAULT_INVALID_EMAIL: &str = "nobody@petfriends.invalid";
const DEFAULT_INVALID_PASSWORD: &str = "not-the-password";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub valid: Credentials,
    pub invalid_email: String,
    pub invalid_password: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from any variable source; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let email = get(ENV_EMAIL).ok_or(ApiError::MissingSetting(ENV_EMAIL))?;
        let password = get(ENV_PASSWORD).ok_or(ApiError::MissingSetting(ENV_PASSWORD))?;

        Ok(Self {
            base_url: get(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            valid: Credentials::new(email, password),
            invalid_email: get(ENV_INVALID_EMAIL).unwrap_or_else(|| DEFAULT_INVALID_EMAIL.to_string()),
            invalid_password: get(ENV_INVALID_PASSWORD).unwrap_or_else(|| DEFAULT_INVALID_PASSWORD.to_string()),
        })
    }

    /// Settings for a known base URL and user, with default invalid values.
    pub fn with_credentials(base_url: &str, valid: Credentials) -> Self {
        Self {
            base_url: base_url.to_string(),
            valid,
            invalid_email: DEFAULT_INVALID_EMAIL.to_string(),
            invalid_password: DEFAULT_INVALID_PASSWORD.to_string(),
        }
    }

    /// An unknown email with a wrong password.
    pub fn invalid(&self) -> Credentials {
        Credentials::new(self.invalid_email.clone(), self.invalid_password.clone())
    }

    /// The valid email with a wrong password.
    pub fn wrong_password(&self) -> Credentials {
        Credentials::new(self.valid.email.clone(), self.invalid_password.clone())
    }
}
