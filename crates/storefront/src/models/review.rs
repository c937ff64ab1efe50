//! Product review types.

use serde::{Deserialize, Serialize};

use vintage_core::timestamp::deserialize_lenient;
use vintage_core::{ProductId, Rating, RatingError, Timestamp, UserId};

/// Review as submitted by a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewInput {
    pub rating: Rating,
    pub comment: String,
}

impl ReviewInput {
    /// Validate a raw star count.
    ///
    /// # Errors
    ///
    /// Returns `RatingError::OutOfRange` unless `rating` is between 1 and 5.
    pub fn new(rating: i64, comment: impl Into<String>) -> Result<Self, RatingError> {
        Ok(Self {
            rating: Rating::new(rating)?,
            comment: comment.into(),
        })
    }
}

/// A stored review under `products/{id}/reviews`. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub product_id: ProductId,
    pub user_id: UserId,
    pub user_name: String,
    pub rating: Rating,
    #[serde(default)]
    pub comment: String,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub created_at: Option<Timestamp>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_input_validates_rating() {
        assert!(ReviewInput::new(0, "meh").is_err());
        assert!(ReviewInput::new(6, "wow").is_err());
        assert_eq!(ReviewInput::new(4, "nice").unwrap().rating.stars(), 4);
    }

    #[test]
    fn test_decode_review_with_native_date() {
        let review: Review = serde_json::from_value(json!({
            "productId": "p1",
            "userId": "u1",
            "userName": "Ana",
            "rating": 5,
            "createdAt": {"seconds": 1714557600, "nanoseconds": 0}
        }))
        .unwrap();

        assert_eq!(review.comment, "");
        assert_eq!(review.created_at, Timestamp::from_parts(1_714_557_600, 0));
    }
}
