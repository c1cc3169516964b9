use studyhall_common::chat::{NewConversation, NewParticipant};
use studyhall_common::types::{ConversationId, CourseId, ParticipantId, UserId};

use super::models::{ConversationRow, ParticipantRow};
use super::{Db, sql};

#[tracing::instrument(skip(pool, new, participants), err)]
pub async fn create_conversation(
    pool: &Db,
    id: &ConversationId,
    new: &NewConversation,
    participants: &[NewParticipant],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    let q = sql("INSERT INTO conversations (id, course_id) VALUES (?, ?)");
    sqlx::query(&q)
        .bind(id.as_str())
        .bind(new.course_id.as_str())
        .execute(&mut *tx)
        .await?;

    // 初期参加者も同一トランザクションで登録
    let q = sql(
        "INSERT INTO conversation_participants (id, conversation_id, user_id, role) VALUES (?, ?, ?, ?)",
    );
    for p in participants {
        sqlx::query(&q)
            .bind(ParticipantId::new_v4().as_str())
            .bind(id.as_str())
            .bind(p.user_id.as_str())
            .bind(p.role.as_str())
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}

#[tracing::instrument(skip(pool), err)]
pub async fn get_conversation(
    pool: &Db,
    id: &ConversationId,
) -> Result<Option<ConversationRow>, sqlx::Error> {
    let q = sql("SELECT * FROM conversations WHERE id = ?");
    sqlx::query_as::<_, ConversationRow>(&q)
        .bind(id.as_str())
        .fetch_optional(pool)
        .await
}

#[tracing::instrument(skip(pool), err)]
pub async fn get_course_conversations(
    pool: &Db,
    course_id: &CourseId,
) -> Result<Vec<ConversationRow>, sqlx::Error> {
    let q = sql("SELECT * FROM conversations WHERE course_id = ? ORDER BY updated_at DESC");
    sqlx::query_as::<_, ConversationRow>(&q)
        .bind(course_id.as_str())
        .fetch_all(pool)
        .await
}

#[tracing::instrument(skip(pool), err)]
pub async fn get_user_conversations(
    pool: &Db,
    user_id: &UserId,
) -> Result<Vec<ConversationRow>, sqlx::Error> {
    let q = sql(
        "SELECT c.* FROM conversations c
         INNER JOIN conversation_participants p ON c.id = p.conversation_id
         WHERE p.user_id = ?
         ORDER BY c.updated_at DESC",
    );
    sqlx::query_as::<_, ConversationRow>(&q)
        .bind(user_id.as_str())
        .fetch_all(pool)
        .await
}

#[tracing::instrument(skip(pool, new), err)]
pub async fn add_participant(
    pool: &Db,
    id: &ParticipantId,
    new: &NewParticipant,
) -> Result<(), sqlx::Error> {
    let q = sql(
        "INSERT INTO conversation_participants (id, conversation_id, user_id, role) VALUES (?, ?, ?, ?)",
    );
    sqlx::query(&q)
        .bind(id.as_str())
        .bind(new.conversation_id.as_str())
        .bind(new.user_id.as_str())
        .bind(new.role.as_str())
        .execute(pool)
        .await?;
    Ok(())
}

#[tracing::instrument(skip(pool), err)]
pub async fn get_participants(
    pool: &Db,
    conversation_id: &ConversationId,
) -> Result<Vec<ParticipantRow>, sqlx::Error> {
    let q = sql("SELECT * FROM conversation_participants WHERE conversation_id = ?");
    sqlx::query_as::<_, ParticipantRow>(&q)
        .bind(conversation_id.as_str())
        .fetch_all(pool)
        .await
}

#[tracing::instrument(skip(pool), err)]
pub async fn is_participant(
    pool: &Db,
    conversation_id: &ConversationId,
    user_id: &UserId,
) -> Result<bool, sqlx::Error> {
    let q = sql("SELECT 1 FROM conversation_participants WHERE conversation_id = ? AND user_id = ?");
    let row: Option<(i32,)> = sqlx::query_as(&q)
        .bind(conversation_id.as_str())
        .bind(user_id.as_str())
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}
