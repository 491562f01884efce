use anyhow::{anyhow, Result};
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use argon2::Argon2;
use rand::{rng, Rng as _};

pub(crate) fn hash_password(password: &str) -> Result<String> {
    let salt_bytes: [u8; 16] = rng().random();
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| anyhow!("invalid salt: {e}"))?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("failed to hash password: {e}"))?;
    Ok(hash.to_string())
}

pub(crate) fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| anyhow!("stored password hash is malformed: {e}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// The rules a new password has to satisfy.
#[derive(Debug, Clone)]
pub(crate) struct PasswordPolicy {
    pub(crate) min_length: usize,
    pub(crate) require_digit: bool,
    pub(crate) require_lowercase: bool,
    pub(crate) require_uppercase: bool,
    pub(crate) require_non_alphanumeric: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 6,
            require_digit: true,
            require_lowercase: true,
            require_uppercase: true,
            require_non_alphanumeric: true,
        }
    }
}

impl PasswordPolicy {
    /// Describes every rule the password breaks, empty if it is acceptable.
    pub(crate) fn violations(&self, password: &str) -> Vec<String> {
        let mut violations = Vec::new();
        if password.chars().count() < self.min_length {
            violations.push(format!(
                "Passwords must be at least {} characters.",
                self.min_length
            ));
        }
        if self.require_non_alphanumeric && password.chars().all(char::is_alphanumeric) {
            violations.push("Passwords must have at least one non alphanumeric character.".to_owned());
        }
        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            violations.push("Passwords must have at least one digit ('0'-'9').".to_owned());
        }
        if self.require_lowercase && !password.chars().any(char::is_lowercase) {
            violations.push("Passwords must have at least one lowercase ('a'-'z').".to_owned());
        }
        if self.require_uppercase && !password.chars().any(char::is_uppercase) {
            violations.push("Passwords must have at least one uppercase ('A'-'Z').".to_owned());
        }
        violations
    }
}
