use serde::Deserialize;

use crate::enums::{MessageType, ParticipantRole};
use crate::error::{ValidationError, require_text};
use crate::types::{ConversationId, CourseId, UserId};

/// 会話の入力。作成・更新日時はストレージ側で付与される。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConversationInput {
    pub course_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewConversation {
    pub course_id: CourseId,
}

impl ConversationInput {
    pub fn validate(self) -> Result<NewConversation, ValidationError> {
        let course_id =
            CourseId::validate("course_id", &require_text("course_id", self.course_id)?)?;
        Ok(NewConversation { course_id })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParticipantInput {
    pub conversation_id: Option<String>,
    pub user_id: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewParticipant {
    pub conversation_id: ConversationId,
    pub user_id: UserId,
    pub role: ParticipantRole,
}

impl ParticipantInput {
    pub fn validate(self) -> Result<NewParticipant, ValidationError> {
        let conversation_id = ConversationId(require_text("conversation_id", self.conversation_id)?);
        let user_id = UserId(require_text("user_id", self.user_id)?);
        let role = match self.role {
            Some(s) => ParticipantRole::parse_field("role", &s)?,
            None => ParticipantRole::default(),
        };
        Ok(NewParticipant {
            conversation_id,
            user_id,
            role,
        })
    }
}

/// チャットメッセージの入力。
/// message_typeに対応する本文フィールド（content / file_url / audio_url）は
/// ちょうど1つだけ設定されていなければならない。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageInput {
    pub conversation_id: Option<String>,
    pub sender_id: Option<String>,
    pub message_type: Option<String>,
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub audio_url: Option<String>,
    pub is_read: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NewChatMessage {
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub message_type: MessageType,
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub audio_url: Option<String>,
    pub is_read: bool,
}

impl MessageInput {
    pub fn validate(self) -> Result<NewChatMessage, ValidationError> {
        let conversation_id = ConversationId(require_text("conversation_id", self.conversation_id)?);
        let sender_id = UserId(require_text("sender_id", self.sender_id)?);
        let message_type = match self.message_type {
            Some(s) => MessageType::parse_field("message_type", &s)?,
            None => MessageType::default(),
        };

        // 型ごとに必須の本文フィールドと、設定されていてはならないフィールドを決める
        let (required, required_value, extras) = match message_type {
            MessageType::Text => (
                "content",
                self.content,
                [("file_url", self.file_url), ("audio_url", self.audio_url)],
            ),
            MessageType::File => (
                "file_url",
                self.file_url,
                [("content", self.content), ("audio_url", self.audio_url)],
            ),
            MessageType::Audio => (
                "audio_url",
                self.audio_url,
                [("content", self.content), ("file_url", self.file_url)],
            ),
        };
        let body = require_text(required, required_value)?;
        for (field, value) in extras {
            if let Some(value) = value {
                return Err(ValidationError::InvalidValue {
                    field,
                    expected: match message_type {
                        MessageType::Text => "absent for message_type=text",
                        MessageType::File => "absent for message_type=file",
                        MessageType::Audio => "absent for message_type=audio",
                    },
                    actual: value,
                });
            }
        }

        let (content, file_url, audio_url) = match message_type {
            MessageType::Text => (Some(body), None, None),
            MessageType::File => (None, Some(body), None),
            MessageType::Audio => (None, None, Some(body)),
        };

        Ok(NewChatMessage {
            conversation_id,
            sender_id,
            message_type,
            content,
            file_url,
            audio_url,
            is_read: self.is_read.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(v: serde_json::Value) -> MessageInput {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn content_alone_defaults_to_text_message() {
        let new = message(json!({
            "conversation_id": "c-1",
            "sender_id": "u-2",
            "content": "hi",
        }))
        .validate()
        .unwrap();
        assert_eq!(new.message_type, MessageType::Text);
        assert_eq!(new.content.as_deref(), Some("hi"));
        assert!(!new.is_read);
        assert!(new.file_url.is_none() && new.audio_url.is_none());
    }

    #[test]
    fn file_message_requires_file_url() {
        let err = message(json!({
            "conversation_id": "c-1",
            "sender_id": "u-2",
            "message_type": "file",
        }))
        .validate()
        .unwrap_err();
        assert_eq!(err, ValidationError::missing("file_url"));
    }

    #[test]
    fn payload_field_must_match_message_type() {
        let err = message(json!({
            "conversation_id": "c-1",
            "sender_id": "u-2",
            "content": "hi",
            "file_url": "https://cdn.example.com/f.pdf",
        }))
        .validate()
        .unwrap_err();
        assert_eq!(err.field(), "file_url");
    }

    #[test]
    fn audio_message_carries_only_audio_url() {
        let new = message(json!({
            "conversation_id": "c-1",
            "sender_id": "u-2",
            "message_type": "audio",
            "audio_url": "https://cdn.example.com/a.ogg",
        }))
        .validate()
        .unwrap();
        assert_eq!(new.message_type, MessageType::Audio);
        assert!(new.content.is_none());
    }

    #[test]
    fn unknown_message_type_is_rejected() {
        let err = message(json!({
            "conversation_id": "c-1",
            "sender_id": "u-2",
            "message_type": "video",
            "content": "hi",
        }))
        .validate()
        .unwrap_err();
        assert_eq!(err.field(), "message_type");
    }

    #[test]
    fn participant_role_defaults_to_student() {
        let new: ParticipantInput = serde_json::from_value(json!({
            "conversation_id": "c-1",
            "user_id": "u-2",
        }))
        .unwrap();
        assert_eq!(new.validate().unwrap().role, ParticipantRole::Student);
    }

    #[test]
    fn conversation_requires_course_reference() {
        let err = ConversationInput::default().validate().unwrap_err();
        assert_eq!(err, ValidationError::missing("course_id"));
    }
}
