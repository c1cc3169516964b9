use studyhall_common::enrollment::NewEnrollment;
use studyhall_common::types::{EnrollmentId, UserId};

use super::models::EnrollmentRow;
use super::{Db, sql};

#[tracing::instrument(skip(pool, new), err)]
pub async fn create_enrollment(
    pool: &Db,
    id: &EnrollmentId,
    new: &NewEnrollment,
) -> Result<(), sqlx::Error> {
    let q = sql(
        "INSERT INTO enrollments (id, user_id, course_id, progress, is_completed) VALUES (?, ?, ?, ?, ?)",
    );
    sqlx::query(&q)
        .bind(id.as_str())
        .bind(new.user_id.as_str())
        .bind(new.course_id.as_str())
        .bind(new.progress)
        .bind(new.is_completed)
        .execute(pool)
        .await?;
    Ok(())
}

#[tracing::instrument(skip(pool), err)]
pub async fn get_enrollment(
    pool: &Db,
    id: &EnrollmentId,
) -> Result<Option<EnrollmentRow>, sqlx::Error> {
    let q = sql("SELECT * FROM enrollments WHERE id = ?");
    sqlx::query_as::<_, EnrollmentRow>(&q)
        .bind(id.as_str())
        .fetch_optional(pool)
        .await
}

#[tracing::instrument(skip(pool), err)]
pub async fn get_user_enrollments(
    pool: &Db,
    user_id: &UserId,
) -> Result<Vec<EnrollmentRow>, sqlx::Error> {
    let q = sql("SELECT * FROM enrollments WHERE user_id = ? ORDER BY enrolled_at DESC");
    sqlx::query_as::<_, EnrollmentRow>(&q)
        .bind(user_id.as_str())
        .fetch_all(pool)
        .await
}

/// 進捗は単調非減少。現在値より小さい値への更新は行われず false を返す。
#[tracing::instrument(skip(pool), err)]
pub async fn update_progress(
    pool: &Db,
    id: &EnrollmentId,
    progress: i32,
) -> Result<bool, sqlx::Error> {
    let q = sql("UPDATE enrollments SET progress = ? WHERE id = ? AND progress <= ?");
    let result = sqlx::query(&q)
        .bind(progress)
        .bind(id.as_str())
        .bind(progress)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// 受講完了: 進捗100%・完了日時を記録し、任意で修了証IDを紐付ける
#[tracing::instrument(skip(pool), err)]
pub async fn complete_enrollment(
    pool: &Db,
    id: &EnrollmentId,
    certificate_id: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let q = sql(
        "UPDATE enrollments
         SET progress = 100, is_completed = TRUE, completed_at = CURRENT_TIMESTAMP, certificate_id = ?
         WHERE id = ? AND is_completed = FALSE",
    );
    let result = sqlx::query(&q)
        .bind(certificate_id)
        .bind(id.as_str())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
