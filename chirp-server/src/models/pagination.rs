//! Feed pagination window

use serde::Deserialize;

use super::ids::check_id;
use super::ValidationError;

/// Offset/limit window over the ranked feed.
///
/// `offset` is a 1-based page number and `limit` the page size. The window
/// only applies when both are present; otherwise the whole feed is returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedWindow {
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

impl FeedWindow {
    /// No window: the full result set.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn page(offset: u32, limit: u32) -> Self {
        Self {
            offset: Some(offset),
            limit: Some(limit),
        }
    }

    /// SQL `(LIMIT, OFFSET)` pair. A `None` limit means no limit.
    pub fn bounds(&self) -> (Option<i64>, i64) {
        match (self.offset, self.limit) {
            (Some(offset), Some(limit)) if offset > 0 && limit > 0 => {
                let limit = i64::from(limit);
                (Some(limit), (i64::from(offset) - 1) * limit)
            }
            _ => (None, 0),
        }
    }
}

/// Query parameters for the feed
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedParams {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl TryFrom<FeedParams> for FeedWindow {
    type Error = ValidationError;

    fn try_from(params: FeedParams) -> Result<Self, Self::Error> {
        let offset = params.offset.map(|v| check_id("offset", v)).transpose()?;
        let limit = params.limit.map(|v| check_id("limit", v)).transpose()?;

        // Both values were range checked against MAX_ID, which fits in u32.
        Ok(Self {
            offset: offset.map(|v| v as u32),
            limit: limit.map(|v| v as u32),
        })
    }
}
