//! User registration input and api-key hashing

use sha2::{Digest, Sha256};

use super::ValidationError;

/// Maximum length for user names and raw api keys
const MAX_FIELD_LEN: usize = 100;

fn bounded(field: &'static str, s: &str) -> Result<String, ValidationError> {
    if s.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if s.chars().count() > MAX_FIELD_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_FIELD_LEN,
        });
    }
    Ok(s.to_owned())
}

/// Validated display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded("name", s).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Raw api key as supplied by a client on registration.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded("token", s).map(Self)
    }

    pub fn digest(&self) -> String {
        hash_token(&self.0)
    }
}

impl std::fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiToken(..)")
    }
}

/// Lowercase hex SHA-256 of a raw api key. Only this digest is stored.
pub fn hash_token(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}
