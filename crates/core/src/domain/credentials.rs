// Database Credentials

use crate::error::{AppError, Result};

/// Address, principal and secret used to open the managed connection
///
/// Address and principal must be non-blank. The secret must be present but
/// may be empty (password-less accounts are legal).
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    address: String,
    principal: String,
    secret: String,
}

impl Credentials {
    /// Validate and build credentials
    ///
    /// # Errors
    /// - `AppError::InvalidCredentials` if `address` or `principal` is blank,
    ///   or if `secret` is `None`
    pub fn new(address: &str, principal: &str, secret: Option<&str>) -> Result<Self> {
        if address.trim().is_empty() {
            return Err(AppError::InvalidCredentials(
                "address cannot be empty".to_string(),
            ));
        }
        if principal.trim().is_empty() {
            return Err(AppError::InvalidCredentials(
                "principal cannot be empty".to_string(),
            ));
        }
        let secret = secret.ok_or_else(|| {
            AppError::InvalidCredentials("secret cannot be missing".to_string())
        })?;

        Ok(Self {
            address: address.to_string(),
            principal: principal.to_string(),
            secret: secret.to_string(),
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn principal(&self) -> &str {
        &self.principal
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("address", &self.address)
            .field("principal", &self.principal)
            .field("secret", &"<redacted>")
            .finish()
    }
}
