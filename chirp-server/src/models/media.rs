//! Upload filename validation

use super::ValidationError;
use crate::error::messages;

/// Extensions accepted for uploaded pictures (compared case-insensitively)
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// Client-supplied filename of an uploaded picture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageName(String);

impl ImageName {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let allowed = s
            .rsplit_once('.')
            .map(|(_, ext)| {
                ALLOWED_EXTENSIONS
                    .iter()
                    .any(|a| a.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false);

        if !allowed {
            return Err(ValidationError::InvalidFormat {
                field: "file",
                reason: messages::EXTENSION_NOT_ALLOWED,
            });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_image_extensions() {
        for name in ["a.png", "b.JPG", "c.d.jpeg", "e.WebP"] {
            assert!(ImageName::new(name).is_ok(), "{}", name);
        }
    }

    #[test]
    fn rejects_other_files() {
        for name in ["a.gif", "png", "archive.png.zip", "", "noext."] {
            assert!(ImageName::new(name).is_err(), "{}", name);
        }
    }
}
