use studyhall_common::types::UserId;
use studyhall_common::user::NewUser;

use super::models::UserRow;
use super::{Db, sql};

#[tracing::instrument(skip(pool, new), err)]
pub async fn create_user(pool: &Db, id: &UserId, new: &NewUser) -> Result<(), sqlx::Error> {
    // preferencesはJSONテキストとして保存（未設定ならNULL）
    let preferences = new
        .preferences
        .as_ref()
        .map(|p| serde_json::to_string(p).expect("serialize preferences"));

    let q = sql(
        "INSERT INTO users (id, username, password_hash, email, full_name, phone, profile_picture_url, role, preferences)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    );
    sqlx::query(&q)
        .bind(id.as_str())
        .bind(&new.username)
        .bind(&new.password_hash)
        .bind(&new.email)
        .bind(&new.full_name)
        .bind(new.phone.as_deref())
        .bind(new.profile_picture_url.as_deref())
        .bind(new.role.as_str())
        .bind(preferences)
        .execute(pool)
        .await?;
    Ok(())
}

#[tracing::instrument(skip(pool), err)]
pub async fn get_user(pool: &Db, id: &UserId) -> Result<Option<UserRow>, sqlx::Error> {
    let q = sql("SELECT * FROM users WHERE id = ?");
    sqlx::query_as::<_, UserRow>(&q)
        .bind(id.as_str())
        .fetch_optional(pool)
        .await
}

#[tracing::instrument(skip(pool), err)]
pub async fn get_user_by_username(
    pool: &Db,
    username: &str,
) -> Result<Option<UserRow>, sqlx::Error> {
    let q = sql("SELECT * FROM users WHERE username = ?");
    sqlx::query_as::<_, UserRow>(&q)
        .bind(username)
        .fetch_optional(pool)
        .await
}

#[tracing::instrument(skip(pool), err)]
pub async fn get_user_by_email(pool: &Db, email: &str) -> Result<Option<UserRow>, sqlx::Error> {
    let q = sql("SELECT * FROM users WHERE email = ?");
    sqlx::query_as::<_, UserRow>(&q)
        .bind(email)
        .fetch_optional(pool)
        .await
}

#[tracing::instrument(skip(pool), err)]
pub async fn exists(pool: &Db, id: &UserId) -> Result<bool, sqlx::Error> {
    let q = sql("SELECT 1 FROM users WHERE id = ?");
    let row: Option<(i32,)> = sqlx::query_as(&q)
        .bind(id.as_str())
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

#[tracing::instrument(skip(pool), err)]
pub async fn touch_last_active(pool: &Db, id: &UserId) -> Result<bool, sqlx::Error> {
    let q = sql("UPDATE users SET last_active_at = CURRENT_TIMESTAMP WHERE id = ?");
    let result = sqlx::query(&q).bind(id.as_str()).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
