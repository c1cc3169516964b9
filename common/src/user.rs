use serde::{Deserialize, Serialize};

use crate::enums::{Theme, UserRole};
use crate::error::{ValidationError, optional_text, require_text};

/// ユーザー名に許可する文字: 英数字, `_`, `.`, `-`
/// 先頭・末尾のドットと連続ドットは禁止。
fn validate_username(s: &str) -> Result<(), ValidationError> {
    let invalid = |actual: &str| {
        ValidationError::invalid(
            "username",
            "alphanumeric, `_`, `.`, `-`, no leading/trailing/consecutive dots",
            actual,
        )
    };
    if !s
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err(invalid(s));
    }
    if s.starts_with('.') || s.ends_with('.') || s.contains("..") {
        return Err(invalid(s));
    }
    Ok(())
}

/// メールアドレスの形式チェック。`local@domain` の両パートが非空であること。
/// 厳密なRFC検証はしない（到達性の確認は上位レイヤの責務）。
fn validate_email(s: &str) -> Result<(), ValidationError> {
    match s.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ValidationError::invalid("email", "email address", s)),
    }
}

/// 通知設定とテーマ。未指定のフラグは有効、テーマはlight。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub theme: Theme,
    pub email_notifications: bool,
    pub push_notifications: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PreferencesInput {
    pub theme: Option<String>,
    pub email_notifications: Option<bool>,
    pub push_notifications: Option<bool>,
}

impl PreferencesInput {
    pub fn validate(self) -> Result<Preferences, ValidationError> {
        let theme = match self.theme {
            Some(s) => Theme::parse_field("preferences.theme", &s)?,
            None => Theme::Light,
        };
        Ok(Preferences {
            theme,
            email_notifications: self.email_notifications.unwrap_or(true),
            push_notifications: self.push_notifications.unwrap_or(true),
        })
    }
}

/// ユーザー登録の入力。id・参加日時はサーバ側で採番される。
/// `password` は呼び出し側でハッシュ済みの資格情報（ここでは不透明な文字列として扱う）。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserInput {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub profile_picture_url: Option<String>,
    pub role: Option<String>,
    pub preferences: Option<PreferencesInput>,
}

/// 検証済みのユーザー作成ペイロード
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub profile_picture_url: Option<String>,
    pub role: UserRole,
    pub preferences: Option<Preferences>,
}

impl UserInput {
    pub fn validate(self) -> Result<NewUser, ValidationError> {
        let username = require_text("username", self.username)?;
        validate_username(&username)?;
        let password_hash = require_text("password", self.password)?;
        let email = require_text("email", self.email)?;
        validate_email(&email)?;
        let full_name = require_text("full_name", self.full_name)?;
        let phone = optional_text("phone", self.phone)?;
        let profile_picture_url = optional_text("profile_picture_url", self.profile_picture_url)?;
        let role = match self.role {
            Some(s) => UserRole::parse_field("role", &s)?,
            None => UserRole::default(),
        };
        let preferences = self.preferences.map(PreferencesInput::validate).transpose()?;

        Ok(NewUser {
            username,
            password_hash,
            email,
            full_name,
            phone,
            profile_picture_url,
            role,
            preferences,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(v: serde_json::Value) -> UserInput {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn minimal_payload_gets_defaults() {
        let new = input(json!({
            "username": "ann",
            "password": "x",
            "email": "ann@x.com",
            "full_name": "Ann A",
        }))
        .validate()
        .unwrap();
        assert_eq!(new.role, UserRole::Student);
        assert!(new.preferences.is_none());
        assert!(new.phone.is_none());
        assert_eq!(new.password_hash, "x");
    }

    #[test]
    fn missing_username_names_the_field() {
        let err = input(json!({
            "password": "x",
            "email": "ann@x.com",
            "full_name": "Ann A",
        }))
        .validate()
        .unwrap_err();
        assert_eq!(err, ValidationError::missing("username"));
    }

    #[test]
    fn role_outside_closed_set_is_rejected() {
        let err = input(json!({
            "username": "ann",
            "password": "x",
            "email": "ann@x.com",
            "full_name": "Ann A",
            "role": "superadmin",
        }))
        .validate()
        .unwrap_err();
        assert_eq!(err.field(), "role");
    }

    #[test]
    fn explicit_role_is_kept() {
        let new = input(json!({
            "username": "bob",
            "password": "x",
            "email": "bob@x.com",
            "full_name": "Bob B",
            "role": "instructor",
        }))
        .validate()
        .unwrap();
        assert_eq!(new.role, UserRole::Instructor);
    }

    #[test]
    fn malformed_email_is_rejected() {
        for email in ["annx.com", "@x.com", "ann@localhost"] {
            let err = input(json!({
                "username": "ann",
                "password": "x",
                "email": email,
                "full_name": "Ann A",
            }))
            .validate()
            .unwrap_err();
            assert_eq!(err.field(), "email", "email {email:?} should be rejected");
        }
    }

    #[test]
    fn username_charset_is_enforced() {
        for bad in ["ann smith", "ann..b", ".ann", "ann@x"] {
            let err = input(json!({
                "username": bad,
                "password": "x",
                "email": "ann@x.com",
                "full_name": "Ann A",
            }))
            .validate()
            .unwrap_err();
            assert_eq!(err.field(), "username", "username {bad:?} should be rejected");
        }
    }

    #[test]
    fn preferences_validate_theme_and_default_flags() {
        let new = input(json!({
            "username": "ann",
            "password": "x",
            "email": "ann@x.com",
            "full_name": "Ann A",
            "preferences": { "theme": "dark" },
        }))
        .validate()
        .unwrap();
        let prefs = new.preferences.unwrap();
        assert_eq!(prefs.theme, Theme::Dark);
        assert!(prefs.email_notifications);
        assert!(prefs.push_notifications);

        let err = input(json!({
            "username": "ann",
            "password": "x",
            "email": "ann@x.com",
            "full_name": "Ann A",
            "preferences": { "theme": "solarized" },
        }))
        .validate()
        .unwrap_err();
        assert_eq!(err.field(), "preferences.theme");
    }

    #[test]
    fn unknown_fields_fail_deserialization() {
        // idやdate_joinedなどサーバ採番フィールドは入力に含められない
        let result: Result<UserInput, _> = serde_json::from_value(json!({
            "username": "ann",
            "id": "u-1",
        }));
        assert!(result.is_err());
    }
}
