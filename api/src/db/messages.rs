use studyhall_common::chat::NewChatMessage;
use studyhall_common::types::{ConversationId, MessageId, UserId};

use super::models::MessageRow;
use super::{Db, sql};

#[tracing::instrument(skip(pool, new), err)]
pub async fn create_message(
    pool: &Db,
    id: &MessageId,
    new: &NewChatMessage,
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    let q = sql(
        "INSERT INTO messages (id, conversation_id, sender_id, message_type, content, file_url, audio_url, is_read)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    );
    sqlx::query(&q)
        .bind(id.as_str())
        .bind(new.conversation_id.as_str())
        .bind(new.sender_id.as_str())
        .bind(new.message_type.as_str())
        .bind(new.content.as_deref())
        .bind(new.file_url.as_deref())
        .bind(new.audio_url.as_deref())
        .bind(new.is_read)
        .execute(&mut *tx)
        .await?;

    // 会話のupdated_atを同一トランザクションで進める
    let q = sql("UPDATE conversations SET updated_at = CURRENT_TIMESTAMP WHERE id = ?");
    sqlx::query(&q)
        .bind(new.conversation_id.as_str())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// 負のオフセットを正のOFFSET/LIMITに変換する。
/// from=-30, until=-10 は最新30件目〜10件目を意味する。
fn page_bounds(total: i64, from: i64, until: i64) -> (i64, i64) {
    let skip = (total + from).max(0);
    let limit = (until - from).max(0);
    (skip, limit)
}

/// メッセージをページネーションで取得。
/// `from` と `until` は最新からの負のオフセット。
#[tracing::instrument(skip(pool), err)]
pub async fn get_messages(
    pool: &Db,
    conversation_id: &ConversationId,
    from: i64,
    until: i64,
) -> Result<(Vec<MessageRow>, i64), sqlx::Error> {
    let q = sql("SELECT COUNT(*) FROM messages WHERE conversation_id = ?");
    let total: (i64,) = sqlx::query_as(&q)
        .bind(conversation_id.as_str())
        .fetch_one(pool)
        .await?;
    let total = total.0;

    let (skip, limit) = page_bounds(total, from, until);

    let q = sql(
        "SELECT * FROM messages WHERE conversation_id = ?
         ORDER BY sent_at ASC
         LIMIT ? OFFSET ?",
    );
    let messages = sqlx::query_as::<_, MessageRow>(&q)
        .bind(conversation_id.as_str())
        .bind(limit)
        .bind(skip)
        .fetch_all(pool)
        .await?;

    Ok((messages, total))
}

/// 会話内の未読メッセージを既読にする（自分が送ったものは対象外）。
/// 参加者のlast_read_atも同一トランザクションで更新し、既読件数を返す。
#[tracing::instrument(skip(pool), err)]
pub async fn mark_read(
    pool: &Db,
    conversation_id: &ConversationId,
    reader: &UserId,
) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let q = sql(
        "UPDATE messages SET is_read = TRUE
         WHERE conversation_id = ? AND sender_id != ? AND is_read = FALSE",
    );
    let result = sqlx::query(&q)
        .bind(conversation_id.as_str())
        .bind(reader.as_str())
        .execute(&mut *tx)
        .await?;

    let q = sql(
        "UPDATE conversation_participants SET last_read_at = CURRENT_TIMESTAMP
         WHERE conversation_id = ? AND user_id = ?",
    );
    sqlx::query(&q)
        .bind(conversation_id.as_str())
        .bind(reader.as_str())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::page_bounds;

    #[test]
    fn window_inside_history() {
        // 全50件から最新30件目〜10件目
        assert_eq!(page_bounds(50, -30, -10), (20, 20));
    }

    #[test]
    fn window_larger_than_history_is_clamped() {
        assert_eq!(page_bounds(5, -30, -10), (0, 20));
        assert_eq!(page_bounds(0, -30, 0), (0, 30));
    }

    #[test]
    fn inverted_window_yields_empty_page() {
        assert_eq!(page_bounds(50, -10, -30), (40, 0));
    }
}
