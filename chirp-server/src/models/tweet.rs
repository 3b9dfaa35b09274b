//! Tweet content and attachment list validation

use super::ids::MEDIA_ID_LIMIT;
use super::ValidationError;

/// Validated tweet text (non-empty)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TweetContent(String);

impl TweetContent {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty {
                field: "tweet_data",
            });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Media ids a new tweet attaches.
///
/// Every id must be positive and below [`MEDIA_ID_LIMIT`]; anything else is
/// malformed client input and is rejected before storage is touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaIds(Vec<i64>);

impl MediaIds {
    pub fn new(ids: Vec<i64>) -> Result<Self, ValidationError> {
        if ids.iter().any(|id| *id < 1 || *id >= MEDIA_ID_LIMIT) {
            return Err(ValidationError::OutOfRange {
                field: "tweet_media_ids",
                min: 1,
                max: MEDIA_ID_LIMIT - 1,
            });
        }
        Ok(Self(ids))
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_must_not_be_empty() {
        assert!(TweetContent::new("hello").is_ok());
        assert_eq!(
            TweetContent::new("").unwrap_err(),
            ValidationError::Empty {
                field: "tweet_data"
            }
        );
    }

    #[test]
    fn media_ids_bounds() {
        assert!(MediaIds::new(vec![]).unwrap().as_slice().is_empty());
        assert_eq!(
            MediaIds::new(vec![1, 999_999]).unwrap().as_slice(),
            &[1, 999_999]
        );
        assert!(MediaIds::new(vec![1, 1_000_000]).is_err());
        assert!(MediaIds::new(vec![0]).is_err());
        assert!(MediaIds::new(vec![-3, 2]).is_err());
    }
}
