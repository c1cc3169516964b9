use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::enums::SubscriptionPlan;
use crate::error::{ValidationError, require_text};
use crate::types::UserId;

/// サブスクリプション作成の入力。開始日時はストレージ側で付与される。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubscriptionInput {
    pub user_id: Option<String>,
    pub plan: Option<String>,
    pub end_date: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub user_id: UserId,
    pub plan: SubscriptionPlan,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl SubscriptionInput {
    pub fn validate(self) -> Result<NewSubscription, ValidationError> {
        let user_id = UserId(require_text("user_id", self.user_id)?);
        let plan = match self.plan {
            Some(s) => SubscriptionPlan::parse_field("plan", &s)?,
            None => SubscriptionPlan::default(),
        };
        let end_date = self
            .end_date
            .map(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .map(|d| d.with_timezone(&Utc))
                    .map_err(|_| {
                        ValidationError::invalid("end_date", "RFC 3339 timestamp", s)
                    })
            })
            .transpose()?;

        Ok(NewSubscription {
            user_id,
            plan,
            end_date,
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(v: serde_json::Value) -> SubscriptionInput {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn user_id_alone_defaults_to_active_free_plan() {
        let new = input(json!({ "user_id": "u-1" })).validate().unwrap();
        assert_eq!(new.plan, SubscriptionPlan::Free);
        assert!(new.is_active);
        assert!(new.end_date.is_none());
    }

    #[test]
    fn missing_user_id_is_reported() {
        let err = input(json!({ "plan": "premium" })).validate().unwrap_err();
        assert_eq!(err, ValidationError::missing("user_id"));
    }

    #[test]
    fn plan_outside_closed_set_is_rejected() {
        let err = input(json!({ "user_id": "u-1", "plan": "enterprise" }))
            .validate()
            .unwrap_err();
        assert_eq!(err.field(), "plan");
    }

    #[test]
    fn end_date_must_be_rfc3339() {
        let err = input(json!({ "user_id": "u-1", "end_date": "next tuesday" }))
            .validate()
            .unwrap_err();
        assert_eq!(err.field(), "end_date");

        let new = input(json!({ "user_id": "u-1", "end_date": "2026-12-31T00:00:00Z" }))
            .validate()
            .unwrap();
        assert!(new.end_date.is_some());
    }
}
