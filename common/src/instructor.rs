use serde::Deserialize;

use crate::enums::OnlineStatus;
use crate::error::{ValidationError, optional_text, require_text};
use crate::types::UserId;

/// 講師プロフィールの入力。ユーザー1人につき1件（user_id一意）で、
/// 一意性の強制はストレージ層のUNIQUE制約が担う。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstructorInput {
    pub user_id: Option<String>,
    pub specialization: Option<String>,
    pub bio: Option<String>,
    pub is_available: Option<bool>,
    pub online_status: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewInstructor {
    pub user_id: UserId,
    pub specialization: Option<String>,
    pub bio: Option<String>,
    pub is_available: bool,
    pub online_status: OnlineStatus,
}

impl InstructorInput {
    pub fn validate(self) -> Result<NewInstructor, ValidationError> {
        let user_id = UserId(require_text("user_id", self.user_id)?);
        let specialization = optional_text("specialization", self.specialization)?;
        let bio = optional_text("bio", self.bio)?;
        let online_status = match self.online_status {
            Some(s) => OnlineStatus::parse_field("online_status", &s)?,
            None => OnlineStatus::default(),
        };

        Ok(NewInstructor {
            user_id,
            specialization,
            bio,
            is_available: self.is_available.unwrap_or(true),
            online_status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(v: serde_json::Value) -> InstructorInput {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn user_id_alone_is_enough() {
        let new = input(json!({ "user_id": "u-1" })).validate().unwrap();
        assert!(new.is_available);
        assert_eq!(new.online_status, OnlineStatus::Offline);
        assert!(new.specialization.is_none());
    }

    #[test]
    fn user_id_is_required() {
        let err = input(json!({ "bio": "hi" })).validate().unwrap_err();
        assert_eq!(err, ValidationError::missing("user_id"));
    }

    #[test]
    fn online_status_outside_closed_set_is_rejected() {
        let err = input(json!({ "user_id": "u-1", "online_status": "busy" }))
            .validate()
            .unwrap_err();
        assert_eq!(err.field(), "online_status");
    }
}
