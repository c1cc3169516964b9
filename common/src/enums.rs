use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// 閉じた文字列列挙型を定義する。
/// ワイヤ上・ストレージ上は小文字の文字列、Rust上は網羅的にmatchできるenum。
/// 許可外の値のパースは `ALLOWED` 付きの検証エラーになる。
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALLOWED: &'static [&'static str] = &[$($text),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }

            pub fn parse(s: &str) -> Option<Self> {
                match s {
                    $($text => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// 入力フィールドの文字列を検証付きでパースする
            pub fn parse_field(field: &'static str, s: &str) -> Result<Self, ValidationError> {
                Self::parse(s).ok_or_else(|| ValidationError::UnknownEnumValue {
                    field,
                    value: s.to_string(),
                    allowed: Self::ALLOWED,
                })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(UserRole {
    Student => "student",
    Instructor => "instructor",
    Admin => "admin",
});

str_enum!(SubscriptionPlan {
    Free => "free",
    Premium => "premium",
    Pro => "pro",
});

str_enum!(PaymentStatus {
    Pending => "pending",
    Succeeded => "succeeded",
    Failed => "failed",
    Refunded => "refunded",
});

str_enum!(OnlineStatus {
    Online => "online",
    Offline => "offline",
    Away => "away",
});

str_enum!(MessageType {
    Text => "text",
    File => "file",
    Audio => "audio",
});

str_enum!(ParticipantRole {
    Student => "student",
    Instructor => "instructor",
});

str_enum!(Theme {
    Light => "light",
    Dark => "dark",
    System => "system",
});

impl Default for UserRole {
    fn default() -> Self {
        Self::Student
    }
}

impl Default for SubscriptionPlan {
    fn default() -> Self {
        Self::Free
    }
}

impl Default for OnlineStatus {
    fn default() -> Self {
        Self::Offline
    }
}

impl Default for MessageType {
    fn default() -> Self {
        Self::Text
    }
}

impl Default for ParticipantRole {
    fn default() -> Self {
        Self::Student
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips() {
        for s in UserRole::ALLOWED {
            assert_eq!(UserRole::parse(s).unwrap().as_str(), *s);
        }
        for s in PaymentStatus::ALLOWED {
            assert_eq!(PaymentStatus::parse(s).unwrap().as_str(), *s);
        }
    }

    #[test]
    fn parse_rejects_unknown_value() {
        assert!(UserRole::parse("superadmin").is_none());
        let err = UserRole::parse_field("role", "superadmin").unwrap_err();
        assert_eq!(err.field(), "role");
        assert!(matches!(
            err,
            ValidationError::UnknownEnumValue { allowed, .. } if allowed == UserRole::ALLOWED
        ));
    }

    #[test]
    fn parse_is_case_sensitive() {
        // ストレージ上の正規形は小文字のみ
        assert!(SubscriptionPlan::parse("Free").is_none());
    }

    #[test]
    fn serde_uses_lowercase_form() {
        assert_eq!(serde_json::to_string(&MessageType::Audio).unwrap(), "\"audio\"");
        let parsed: Theme = serde_json::from_str("\"dark\"").unwrap();
        assert_eq!(parsed, Theme::Dark);
    }
}
