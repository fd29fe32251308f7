//! Billing subscription snapshot

use serde::{Deserialize, Serialize};

/// Card on file for a subscription
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub last4: String,
}

/// Last known subscription state of a billing customer.
///
/// Written by billing sync and read on demand; never expires on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSnapshot {
    #[serde(default)]
    pub subscription_id: String,
    pub status: String,
    #[serde(default)]
    pub price_id: String,
    #[serde(default)]
    pub current_period_start: i64,
    #[serde(default)]
    pub current_period_end: i64,
    #[serde(default)]
    pub cancel_at_period_end: bool,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

impl SubscriptionSnapshot {
    pub const STATUS_ACTIVE: &'static str = "active";
    pub const STATUS_NONE: &'static str = "none";

    /// Snapshot for a customer without any subscription
    pub fn none() -> Self {
        Self {
            status: Self::STATUS_NONE.to_string(),
            ..Default::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == Self::STATUS_ACTIVE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserializes_stored_snapshot() {
        let stored = json!({
            "subscriptionId": "sub_123",
            "status": "active",
            "priceId": "price_1",
            "currentPeriodStart": 1700000000,
            "currentPeriodEnd": 1702592000,
            "paymentMethod": {"brand": "visa", "last4": "4242"}
        });

        let snapshot: SubscriptionSnapshot = serde_json::from_value(stored).unwrap();

        assert!(snapshot.is_active());
        assert_eq!(snapshot.payment_method.last4, "4242");
        assert!(!snapshot.cancel_at_period_end);
    }

    #[test]
    fn test_none_snapshot() {
        let snapshot = SubscriptionSnapshot::none();

        assert!(!snapshot.is_active());
        assert_eq!(serde_json::to_value(&snapshot).unwrap()["status"], "none");
    }
}
