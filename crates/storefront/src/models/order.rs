//! Order types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use vintage_core::{Price, ProductId, Timestamp, UserId};

use super::LineItem;
use crate::remote::Fields;

/// `userId` stored on orders placed without a signed-in identity.
pub const GUEST_USER_ID: &str = "GUEST";

/// Item keys that may carry the product id in stored orders.
///
/// Orders written by the current client use `id` (the flattened product);
/// older orders used `productId`.
const ITEM_PRODUCT_KEYS: [&str; 2] = ["id", "productId"];

/// Record keys set by [`Order::new`]; checkout details never override them.
const RESERVED_KEYS: [&str; 4] = ["items", "userId", "createdAt", "total"];

/// Order data handed over by checkout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderPayload {
    /// Snapshot of the cart lines.
    pub items: Vec<LineItem>,
    /// Additional checkout fields (shipping address, payment method, ...).
    pub details: Fields,
}

/// Who placed an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderOwner {
    User(UserId),
    Guest,
}

impl From<String> for OrderOwner {
    fn from(value: String) -> Self {
        if value == GUEST_USER_ID {
            Self::Guest
        } else {
            Self::User(UserId::new(value))
        }
    }
}

impl From<OrderOwner> for String {
    fn from(owner: OrderOwner) -> Self {
        match owner {
            OrderOwner::User(uid) => uid.into_inner(),
            OrderOwner::Guest => GUEST_USER_ID.to_owned(),
        }
    }
}

impl From<Option<UserId>> for OrderOwner {
    fn from(uid: Option<UserId>) -> Self {
        uid.map_or(Self::Guest, Self::User)
    }
}

/// An immutable order record stored under `orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub items: Vec<LineItem>,
    pub user_id: OrderOwner,
    pub created_at: Timestamp,
    pub total: Price,
    #[serde(flatten)]
    pub details: Fields,
}

impl Order {
    /// Build the record for `payload`, deriving the total from its items.
    ///
    /// Details named like a record field are dropped.
    #[must_use]
    pub fn new(payload: OrderPayload, owner: OrderOwner, created_at: Timestamp) -> Self {
        let total = payload.items.iter().map(LineItem::line_total).sum();
        let mut details = payload.details;
        for key in RESERVED_KEYS {
            if details.remove(key).is_some() {
                tracing::warn!(key, "Ignoring checkout detail that shadows an order field");
            }
        }
        Self {
            items: payload.items,
            user_id: owner,
            created_at,
            total,
            details,
        }
    }
}

/// Whether a stored order's item list references `product_id`.
///
/// Works on raw fields so orders written by older clients still match.
#[must_use]
pub fn references_product(order: &Fields, product_id: &ProductId) -> bool {
    order
        .get("items")
        .and_then(Value::as_array)
        .is_some_and(|items| {
            items.iter().any(|item| {
                ITEM_PRODUCT_KEYS
                    .iter()
                    .any(|key| item.get(key).and_then(Value::as_str) == Some(product_id.as_str()))
            })
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::Product;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => Fields::new(),
        }
    }

    #[test]
    fn test_total_is_derived_from_items() {
        let mut jacket = LineItem::new(Product::new("p1", "Jacket", Price::from_cents(10_000)));
        jacket.quantity = 2;
        let scarf = LineItem::new(Product::new("p2", "Scarf", Price::from_cents(2_550)));

        let order = Order::new(
            OrderPayload {
                items: vec![jacket, scarf],
                details: Fields::new(),
            },
            OrderOwner::Guest,
            Timestamp::epoch(),
        );

        assert_eq!(order.total, Price::from_cents(22_550));
    }

    #[test]
    fn test_owner_wire_format() {
        assert_eq!(
            serde_json::to_value(OrderOwner::Guest).unwrap(),
            json!("GUEST")
        );
        assert_eq!(
            serde_json::to_value(OrderOwner::from(Some(UserId::new("u1")))).unwrap(),
            json!("u1")
        );
        let parsed: OrderOwner = serde_json::from_value(json!("GUEST")).unwrap();
        assert_eq!(parsed, OrderOwner::Guest);
    }

    #[test]
    fn test_details_flatten_into_record() {
        let mut details = Fields::new();
        details.insert("address".to_owned(), json!("Jl. Braga 12"));
        let order = Order::new(
            OrderPayload {
                items: vec![],
                details,
            },
            OrderOwner::Guest,
            Timestamp::epoch(),
        );

        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value.get("address"), Some(&json!("Jl. Braga 12")));
        assert_eq!(value.get("userId"), Some(&json!("GUEST")));
    }

    #[test]
    fn test_details_cannot_override_record_fields() {
        let mut details = Fields::new();
        details.insert("userId".to_owned(), json!("someone-else"));
        details.insert("total".to_owned(), json!("0"));
        details.insert("createdAt".to_owned(), json!("1999-01-01T00:00:00Z"));
        details.insert("items".to_owned(), json!([]));
        details.insert("address".to_owned(), json!("Jl. Braga 12"));
        let owner = OrderOwner::User(UserId::new("u1"));
        let order = Order::new(
            OrderPayload {
                items: vec![LineItem::new(Product::new("p1", "Scarf", Price::from_cents(1000)))],
                details,
            },
            owner.clone(),
            Timestamp::epoch(),
        );

        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value.get("userId"), Some(&json!("u1")));
        assert_eq!(value.get("createdAt"), Some(&json!("1970-01-01T00:00:00Z")));
        assert_eq!(value.get("address"), Some(&json!("Jl. Braga 12")));
        assert_eq!(value["items"].as_array().map(Vec::len), Some(1));

        let back: Order = serde_json::from_value(value).unwrap();
        assert_eq!(back.user_id, owner);
        assert_eq!(back.total, Price::from_cents(1000));
    }

    #[test]
    fn test_references_product_by_either_key() {
        let p1 = ProductId::new("p1");
        assert!(references_product(
            &fields(json!({"items": [{"id": "p1"}]})),
            &p1
        ));
        assert!(references_product(
            &fields(json!({"items": [{"productId": "p1"}]})),
            &p1
        ));
        assert!(!references_product(
            &fields(json!({"items": [{"id": "p2", "sku": "p1"}]})),
            &p1
        ));
        assert!(!references_product(&fields(json!({"items": "p1"})), &p1));
        assert!(!references_product(&Fields::new(), &p1));
    }
}
