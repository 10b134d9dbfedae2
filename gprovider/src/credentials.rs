//! In-memory credential storage for a configured adapter instance.

use std::sync::{Mutex, PoisonError};

use crate::ProviderError;

/// Secret wrapper that redacts `Debug` output and zeroes its bytes on
/// drop.
#[derive(PartialEq, Eq)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn expose(&self) -> &str {
        self.value.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        unsafe {
            self.value.as_mut_vec().fill(0);
        }
    }
}

/// Holds the single API key an adapter was configured with.
///
/// `set` is idempotent and performs no I/O; a poisoned lock is recovered
/// because the slot holds nothing but the secret itself.
#[derive(Debug, Default)]
pub struct CredentialSlot {
    secret: Mutex<Option<SecretString>>,
}

impl CredentialSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, api_key: impl Into<String>) -> Result<(), ProviderError> {
        let api_key = SecretString::new(api_key);
        if api_key.is_empty() {
            return Err(ProviderError::invalid_credential(
                "api key must not be empty",
            ));
        }

        *self
            .secret
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(api_key);
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        self.secret
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|secret| !secret.is_empty())
    }

    pub fn with_secret<R>(&self, f: impl FnOnce(&str) -> R) -> Option<R> {
        self.secret
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .filter(|secret| !secret.is_empty())
            .map(|secret| f(secret.expose()))
    }
}
