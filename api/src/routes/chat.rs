use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use studyhall_common::chat::{ConversationInput, MessageInput, NewParticipant, ParticipantInput};
use studyhall_common::types::{ConversationId, CourseId, MessageId, ParticipantId, UserId};

use crate::AppState;
use crate::db;
use crate::error::AppError;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/conversations", post(create_conversation))
        .route("/conversations/{id}", get(get_conversation))
        .route(
            "/conversations/{id}/participants",
            post(add_participant),
        )
        .route(
            "/conversations/{id}/messages",
            get(get_messages).post(post_message),
        )
        .route("/conversations/{id}/read", post(mark_read))
        .route("/users/{id}/conversations", get(list_user_conversations))
        .route(
            "/courses/{course_id}/conversations",
            get(list_course_conversations),
        )
}

#[derive(Deserialize)]
struct ParticipantEntry {
    user_id: String,
    role: Option<String>,
}

#[derive(Deserialize)]
struct CreateConversationBody {
    course_id: Option<String>,
    #[serde(default)]
    participants: Vec<ParticipantEntry>,
}

/// 会話を初期参加者ごと作成する。参加者の検証も挿入前に完結させ、
/// 途中で失敗した場合に部分的な書き込みが残らないようにする。
async fn create_conversation(
    State(state): State<AppState>,
    Json(body): Json<CreateConversationBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let new = ConversationInput {
        course_id: body.course_id,
    }
    .validate()?;

    let conversation_id = ConversationId::new_v4();
    let mut participants: Vec<NewParticipant> = Vec::with_capacity(body.participants.len());
    for entry in body.participants {
        let participant = ParticipantInput {
            conversation_id: Some(conversation_id.as_str().to_string()),
            user_id: Some(entry.user_id),
            role: entry.role,
        }
        .validate()?;
        if !db::users::exists(&state.pool, &participant.user_id).await? {
            return Err(AppError::NotFound(format!(
                "user {} not found",
                participant.user_id
            )));
        }
        participants.push(participant);
    }

    db::conversations::create_conversation(&state.pool, &conversation_id, &new, &participants)
        .await?;

    Ok(Json(serde_json::json!({ "id": conversation_id.as_str() })))
}

async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = ConversationId(id);
    let conversation = db::conversations::get_conversation(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("conversation not found".into()))?;
    let participants = db::conversations::get_participants(&state.pool, &id).await?;

    Ok(Json(serde_json::json!({
        "conversation": conversation,
        "participants": participants,
    })))
}

async fn add_participant(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ParticipantInput>,
) -> Result<Json<serde_json::Value>, AppError> {
    let input = ParticipantInput {
        conversation_id: Some(id),
        ..input
    };
    let new = input.validate()?;

    if db::conversations::get_conversation(&state.pool, &new.conversation_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("conversation not found".into()));
    }
    if !db::users::exists(&state.pool, &new.user_id).await? {
        return Err(AppError::NotFound("user not found".into()));
    }
    if db::conversations::is_participant(&state.pool, &new.conversation_id, &new.user_id).await? {
        return Err(AppError::Conflict("already a participant".into()));
    }

    let participant_id = ParticipantId::new_v4();
    db::conversations::add_participant(&state.pool, &participant_id, &new).await?;

    Ok(Json(serde_json::json!({ "id": participant_id.as_str() })))
}

async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<MessageInput>,
) -> Result<Json<serde_json::Value>, AppError> {
    let input = MessageInput {
        conversation_id: Some(id),
        ..input
    };
    let new = input.validate()?;

    if db::conversations::get_conversation(&state.pool, &new.conversation_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("conversation not found".into()));
    }
    if !db::conversations::is_participant(&state.pool, &new.conversation_id, &new.sender_id).await?
    {
        return Err(AppError::Forbidden(
            "sender is not a participant of this conversation".into(),
        ));
    }

    let message_id = MessageId::new_v4();
    db::messages::create_message(&state.pool, &message_id, &new).await?;

    Ok(Json(serde_json::json!({ "id": message_id.as_str() })))
}

#[derive(Deserialize)]
struct MessagesQuery {
    /// 最新からの負のオフセット（デフォルト: 直近50件）
    from: Option<i64>,
    until: Option<i64>,
}

async fn get_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<MessagesQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = ConversationId(id);
    if db::conversations::get_conversation(&state.pool, &id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("conversation not found".into()));
    }

    let from = query.from.unwrap_or(-50);
    let until = query.until.unwrap_or(0);
    if from > until {
        return Err(AppError::BadRequest("from must not exceed until".into()));
    }

    let (messages, total) = db::messages::get_messages(&state.pool, &id, from, until).await?;
    Ok(Json(serde_json::json!({
        "messages": messages,
        "total": total,
    })))
}

#[derive(Deserialize)]
struct MarkReadBody {
    user_id: String,
}

async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<MarkReadBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = ConversationId(id);
    let user_id = UserId(body.user_id);

    if !db::conversations::is_participant(&state.pool, &id, &user_id).await? {
        return Err(AppError::Forbidden(
            "not a participant of this conversation".into(),
        ));
    }

    let marked = db::messages::mark_read(&state.pool, &id, &user_id).await?;
    Ok(Json(serde_json::json!({ "marked_read": marked })))
}

async fn list_user_conversations(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let conversations =
        db::conversations::get_user_conversations(&state.pool, &UserId(id)).await?;
    Ok(Json(serde_json::json!({ "conversations": conversations })))
}

async fn list_course_conversations(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let conversations =
        db::conversations::get_course_conversations(&state.pool, &CourseId(course_id)).await?;
    Ok(Json(serde_json::json!({ "conversations": conversations })))
}
