//! Status enums reported by the remote catalog.

use serde::{Deserialize, Serialize};

/// Product publication status.
///
/// Maps to Shopify's `ProductStatus` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    Active,
    Archived,
    #[default]
    Draft,
    Unlisted,
    /// A status this build does not know about.
    #[serde(other)]
    Unknown,
}

/// Processing status of an attached media item.
///
/// Media is ingested asynchronously; freshly attached images are usually
/// `Uploaded` or `Processing` when the attach mutation returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaStatus {
    #[default]
    Uploaded,
    Processing,
    Ready,
    Failed,
    #[serde(other)]
    Unknown,
}

impl MediaStatus {
    /// Whether remote processing has definitively failed.
    #[must_use]
    pub const fn is_failed(self) -> bool {
        matches!(self, Self::Failed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_status_wire_format() {
        let status: ProductStatus = serde_json::from_str("\"ACTIVE\"").unwrap();
        assert_eq!(status, ProductStatus::Active);
        assert_eq!(
            serde_json::to_string(&ProductStatus::Draft).unwrap(),
            "\"DRAFT\""
        );
    }

    #[test]
    fn test_unknown_statuses_do_not_fail() {
        let status: ProductStatus = serde_json::from_str("\"SOMETHING_NEW\"").unwrap();
        assert_eq!(status, ProductStatus::Unknown);

        let media: MediaStatus = serde_json::from_str("\"QUEUED\"").unwrap();
        assert_eq!(media, MediaStatus::Unknown);
    }

    #[test]
    fn test_media_status_failed() {
        assert!(MediaStatus::Failed.is_failed());
        assert!(!MediaStatus::Processing.is_failed());
    }
}
