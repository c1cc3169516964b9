use studyhall_common::subscription::NewSubscription;
use studyhall_common::types::{SubscriptionId, UserId};

use super::models::SubscriptionRow;
use super::{Db, sql};

#[tracing::instrument(skip(pool, new), err)]
pub async fn create_subscription(
    pool: &Db,
    id: &SubscriptionId,
    new: &NewSubscription,
) -> Result<(), sqlx::Error> {
    let q = sql(
        "INSERT INTO subscriptions (id, user_id, plan, end_date, is_active) VALUES (?, ?, ?, ?, ?)",
    );
    #[cfg(not(feature = "postgres"))]
    let end_date = new
        .end_date
        .map(|d| d.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string());
    #[cfg(feature = "postgres")]
    let end_date = new.end_date;
    sqlx::query(&q)
        .bind(id.as_str())
        .bind(new.user_id.as_str())
        .bind(new.plan.as_str())
        .bind(end_date)
        .bind(new.is_active)
        .execute(pool)
        .await?;
    Ok(())
}

#[tracing::instrument(skip(pool), err)]
pub async fn get_subscription(
    pool: &Db,
    id: &SubscriptionId,
) -> Result<Option<SubscriptionRow>, sqlx::Error> {
    let q = sql("SELECT * FROM subscriptions WHERE id = ?");
    sqlx::query_as::<_, SubscriptionRow>(&q)
        .bind(id.as_str())
        .fetch_optional(pool)
        .await
}

#[tracing::instrument(skip(pool), err)]
pub async fn get_user_subscriptions(
    pool: &Db,
    user_id: &UserId,
) -> Result<Vec<SubscriptionRow>, sqlx::Error> {
    let q = sql("SELECT * FROM subscriptions WHERE user_id = ? ORDER BY start_date DESC");
    sqlx::query_as::<_, SubscriptionRow>(&q)
        .bind(user_id.as_str())
        .fetch_all(pool)
        .await
}

/// 解約: 終了日時を現在にしてis_activeを落とす。既に解約済みなら何もしない。
#[tracing::instrument(skip(pool), err)]
pub async fn cancel_subscription(pool: &Db, id: &SubscriptionId) -> Result<bool, sqlx::Error> {
    let q = sql(
        "UPDATE subscriptions SET is_active = FALSE, end_date = CURRENT_TIMESTAMP
         WHERE id = ? AND is_active = TRUE",
    );
    let result = sqlx::query(&q).bind(id.as_str()).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
