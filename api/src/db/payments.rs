use studyhall_common::payment::NewPayment;
use studyhall_common::types::{PaymentId, SubscriptionId, UserId};

use super::models::PaymentRow;
use super::{Db, sql};

#[tracing::instrument(skip(pool, new), err)]
pub async fn record_payment(pool: &Db, id: &PaymentId, new: &NewPayment) -> Result<(), sqlx::Error> {
    let q = sql(
        "INSERT INTO payment_history (id, user_id, subscription_id, amount, payment_method, status, transaction_id)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    );
    sqlx::query(&q)
        .bind(id.as_str())
        .bind(new.user_id.as_str())
        .bind(new.subscription_id.as_str())
        .bind(new.amount)
        .bind(&new.payment_method)
        .bind(new.status.as_str())
        .bind(new.transaction_id.as_deref())
        .execute(pool)
        .await?;
    Ok(())
}

#[tracing::instrument(skip(pool), err)]
pub async fn get_payment(pool: &Db, id: &PaymentId) -> Result<Option<PaymentRow>, sqlx::Error> {
    let q = sql("SELECT * FROM payment_history WHERE id = ?");
    sqlx::query_as::<_, PaymentRow>(&q)
        .bind(id.as_str())
        .fetch_optional(pool)
        .await
}

#[tracing::instrument(skip(pool), err)]
pub async fn get_user_payments(pool: &Db, user_id: &UserId) -> Result<Vec<PaymentRow>, sqlx::Error> {
    let q = sql("SELECT * FROM payment_history WHERE user_id = ? ORDER BY paid_at DESC");
    sqlx::query_as::<_, PaymentRow>(&q)
        .bind(user_id.as_str())
        .fetch_all(pool)
        .await
}

#[tracing::instrument(skip(pool), err)]
pub async fn get_subscription_payments(
    pool: &Db,
    subscription_id: &SubscriptionId,
) -> Result<Vec<PaymentRow>, sqlx::Error> {
    let q = sql("SELECT * FROM payment_history WHERE subscription_id = ? ORDER BY paid_at DESC");
    sqlx::query_as::<_, PaymentRow>(&q)
        .bind(subscription_id.as_str())
        .fetch_all(pool)
        .await
}
