use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! newtype_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new_v4() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

newtype_id!(UserId);
newtype_id!(SubscriptionId);
newtype_id!(PaymentId);
newtype_id!(EnrollmentId);
newtype_id!(InstructorId);
newtype_id!(ConversationId);
newtype_id!(ParticipantId);
newtype_id!(MessageId);

/// 静的コースカタログへの外部参照。
/// DBの外部キーではないため、サーバ側でIDを生成しない。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(pub String);

impl CourseId {
    /// カタログ参照として妥当な形式か検証する（空文字・空白のみを拒否）
    pub fn validate(field: &'static str, s: &str) -> Result<Self, ValidationError> {
        if s.trim().is_empty() {
            return Err(ValidationError::invalid(field, "non-empty course reference", s));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CourseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_id_accepts_catalog_slug() {
        assert!(CourseId::validate("course_id", "rust-101").is_ok());
    }

    #[test]
    fn course_id_rejects_blank() {
        let err = CourseId::validate("course_id", "  ").unwrap_err();
        assert_eq!(err.field(), "course_id");
    }

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(UserId::new_v4(), UserId::new_v4());
    }
}
