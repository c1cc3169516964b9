/// 挿入ペイロードの検証エラー。
/// どのフィールドがどの制約に違反したかを呼び出し側へ同期的に返す。
/// 一意性違反や外部キー違反はストレージ層の責務であり、ここでは扱わない。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },
    #[error("invalid value for {field}: expected {expected}, got {actual:?}")]
    InvalidValue {
        field: &'static str,
        expected: &'static str,
        actual: String,
    },
    #[error("unknown value {value:?} for {field} (allowed: {allowed:?})")]
    UnknownEnumValue {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },
    #[error("{field} out of range: {value} (allowed: {min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}

impl ValidationError {
    pub fn missing(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    pub fn invalid(field: &'static str, expected: &'static str, actual: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            expected,
            actual: actual.into(),
        }
    }

    /// 違反したフィールド名を返す（APIレスポンスのfieldキーに使用）
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field }
            | Self::InvalidValue { field, .. }
            | Self::UnknownEnumValue { field, .. }
            | Self::OutOfRange { field, .. } => field,
        }
    }
}

/// 必須フィールドの存在チェック
pub(crate) fn require<T>(field: &'static str, value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::MissingField { field })
}

/// 必須の文字列フィールド。欠落はMissingField、空白のみはInvalidValue。
pub(crate) fn require_text(
    field: &'static str,
    value: Option<String>,
) -> Result<String, ValidationError> {
    let value = require(field, value)?;
    if value.trim().is_empty() {
        return Err(ValidationError::invalid(field, "non-empty string", value));
    }
    Ok(value)
}

/// 任意の文字列フィールド。存在する場合は空白のみを拒否する。
pub(crate) fn optional_text(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<String>, ValidationError> {
    match value {
        None => Ok(None),
        Some(v) if v.trim().is_empty() => {
            Err(ValidationError::invalid(field, "non-empty string", v))
        }
        Some(v) => Ok(Some(v)),
    }
}
