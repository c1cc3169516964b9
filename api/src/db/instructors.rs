use studyhall_common::enums::OnlineStatus;
use studyhall_common::instructor::NewInstructor;
use studyhall_common::types::{InstructorId, UserId};

use super::models::InstructorRow;
use super::{Db, sql};

#[tracing::instrument(skip(pool, new), err)]
pub async fn create_instructor(
    pool: &Db,
    id: &InstructorId,
    new: &NewInstructor,
) -> Result<(), sqlx::Error> {
    let q = sql(
        "INSERT INTO instructors (id, user_id, specialization, bio, is_available, online_status)
         VALUES (?, ?, ?, ?, ?, ?)",
    );
    sqlx::query(&q)
        .bind(id.as_str())
        .bind(new.user_id.as_str())
        .bind(new.specialization.as_deref())
        .bind(new.bio.as_deref())
        .bind(new.is_available)
        .bind(new.online_status.as_str())
        .execute(pool)
        .await?;
    Ok(())
}

#[tracing::instrument(skip(pool), err)]
pub async fn get_instructor_by_user(
    pool: &Db,
    user_id: &UserId,
) -> Result<Option<InstructorRow>, sqlx::Error> {
    let q = sql("SELECT * FROM instructors WHERE user_id = ?");
    sqlx::query_as::<_, InstructorRow>(&q)
        .bind(user_id.as_str())
        .fetch_optional(pool)
        .await
}

#[tracing::instrument(skip(pool), err)]
pub async fn list_available_instructors(pool: &Db) -> Result<Vec<InstructorRow>, sqlx::Error> {
    let q = sql("SELECT * FROM instructors WHERE is_available = TRUE ORDER BY user_id");
    sqlx::query_as::<_, InstructorRow>(&q).fetch_all(pool).await
}

#[tracing::instrument(skip(pool), err)]
pub async fn set_online_status(
    pool: &Db,
    user_id: &UserId,
    status: OnlineStatus,
) -> Result<bool, sqlx::Error> {
    let q = sql("UPDATE instructors SET online_status = ? WHERE user_id = ?");
    let result = sqlx::query(&q)
        .bind(status.as_str())
        .bind(user_id.as_str())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[tracing::instrument(skip(pool), err)]
pub async fn set_availability(
    pool: &Db,
    user_id: &UserId,
    is_available: bool,
) -> Result<bool, sqlx::Error> {
    let q = sql("UPDATE instructors SET is_available = ? WHERE user_id = ?");
    let result = sqlx::query(&q)
        .bind(is_available)
        .bind(user_id.as_str())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
