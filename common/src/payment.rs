use serde::Deserialize;

use crate::enums::PaymentStatus;
use crate::error::{ValidationError, optional_text, require, require_text};
use crate::types::{SubscriptionId, UserId};

/// 決済結果の記録。実際の課金は外部の決済プロバイダで完結しており、
/// ここでは結果（金額・手段・ステータス・外部トランザクションID）のみを受ける。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaymentInput {
    pub user_id: Option<String>,
    pub subscription_id: Option<String>,
    /// 最小通貨単位の整数（例: セント）
    pub amount: Option<i64>,
    pub payment_method: Option<String>,
    pub status: Option<String>,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub user_id: UserId,
    pub subscription_id: SubscriptionId,
    pub amount: i64,
    pub payment_method: String,
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
}

impl PaymentInput {
    pub fn validate(self) -> Result<NewPayment, ValidationError> {
        let user_id = UserId(require_text("user_id", self.user_id)?);
        let subscription_id = SubscriptionId(require_text("subscription_id", self.subscription_id)?);
        let amount = require("amount", self.amount)?;
        if amount < 0 {
            return Err(ValidationError::invalid(
                "amount",
                "non-negative integer in minor currency units",
                amount.to_string(),
            ));
        }
        let payment_method = require_text("payment_method", self.payment_method)?;
        let status = PaymentStatus::parse_field("status", &require_text("status", self.status)?)?;
        let transaction_id = optional_text("transaction_id", self.transaction_id)?;

        Ok(NewPayment {
            user_id,
            subscription_id,
            amount,
            payment_method,
            status,
            transaction_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(v: serde_json::Value) -> PaymentInput {
        serde_json::from_value(v).unwrap()
    }

    fn base() -> serde_json::Value {
        json!({
            "user_id": "u-1",
            "subscription_id": "s-1",
            "amount": 1999,
            "payment_method": "card",
            "status": "succeeded",
        })
    }

    #[test]
    fn valid_payment_passes() {
        let new = input(base()).validate().unwrap();
        assert_eq!(new.amount, 1999);
        assert_eq!(new.status, PaymentStatus::Succeeded);
        assert!(new.transaction_id.is_none());
    }

    #[test]
    fn amount_is_required() {
        let mut v = base();
        v.as_object_mut().unwrap().remove("amount");
        assert_eq!(
            input(v).validate().unwrap_err(),
            ValidationError::missing("amount")
        );
    }

    #[test]
    fn negative_amount_is_rejected() {
        let mut v = base();
        v["amount"] = json!(-1);
        assert_eq!(input(v).validate().unwrap_err().field(), "amount");
    }

    #[test]
    fn status_has_no_default() {
        let mut v = base();
        v.as_object_mut().unwrap().remove("status");
        assert_eq!(
            input(v).validate().unwrap_err(),
            ValidationError::missing("status")
        );
    }

    #[test]
    fn unknown_status_is_rejected() {
        let mut v = base();
        v["status"] = json!("charged_back");
        assert_eq!(input(v).validate().unwrap_err().field(), "status");
    }
}
