use serde::Deserialize;

use crate::error::{ValidationError, require_text};
use crate::types::{CourseId, UserId};

/// 進捗率の許容範囲（百分率）
pub const PROGRESS_MIN: i64 = 0;
pub const PROGRESS_MAX: i64 = 100;

/// 進捗率の範囲チェック。受講登録の作成と進捗更新の両方から使う。
pub fn validate_progress(value: i64) -> Result<i32, ValidationError> {
    if !(PROGRESS_MIN..=PROGRESS_MAX).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: "progress",
            value,
            min: PROGRESS_MIN,
            max: PROGRESS_MAX,
        });
    }
    Ok(value as i32)
}

/// 受講登録の入力。course_idは静的カタログへの参照でFKではない。
/// 完了日時・修了証は後続の完了操作で付与される。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnrollmentInput {
    pub user_id: Option<String>,
    pub course_id: Option<String>,
    pub progress: Option<i64>,
    pub is_completed: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NewEnrollment {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub progress: i32,
    pub is_completed: bool,
}

impl EnrollmentInput {
    pub fn validate(self) -> Result<NewEnrollment, ValidationError> {
        let user_id = UserId(require_text("user_id", self.user_id)?);
        let course_id =
            CourseId::validate("course_id", &require_text("course_id", self.course_id)?)?;
        let progress = validate_progress(self.progress.unwrap_or(0))?;

        Ok(NewEnrollment {
            user_id,
            course_id,
            progress,
            is_completed: self.is_completed.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(v: serde_json::Value) -> EnrollmentInput {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn progress_defaults_to_zero() {
        let new = input(json!({ "user_id": "u-1", "course_id": "rust-101" }))
            .validate()
            .unwrap();
        assert_eq!(new.progress, 0);
        assert!(!new.is_completed);
    }

    #[test]
    fn course_id_is_required() {
        let err = input(json!({ "user_id": "u-1" })).validate().unwrap_err();
        assert_eq!(err, ValidationError::missing("course_id"));
    }

    #[test]
    fn progress_above_hundred_is_out_of_range() {
        let err = input(json!({ "user_id": "u-1", "course_id": "rust-101", "progress": 101 }))
            .validate()
            .unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { field: "progress", .. }));
        assert!(validate_progress(-1).is_err());
        assert_eq!(validate_progress(100).unwrap(), 100);
    }
}
