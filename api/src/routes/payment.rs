use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use studyhall_common::payment::PaymentInput;
use studyhall_common::types::{PaymentId, SubscriptionId, UserId};

use crate::AppState;
use crate::db;
use crate::error::AppError;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments", post(record_payment))
        .route("/payments/{id}", get(get_payment))
        .route("/users/{id}/payments", get(list_user_payments))
        .route(
            "/subscriptions/{id}/payments",
            get(list_subscription_payments),
        )
}

/// 決済結果の記録（決済自体は外部プロバイダで完了している）。
/// transaction_idの一意性はDB制約が担い、違反は409で返る。
async fn record_payment(
    State(state): State<AppState>,
    Json(input): Json<PaymentInput>,
) -> Result<Json<serde_json::Value>, AppError> {
    let new = input.validate()?;

    if !db::users::exists(&state.pool, &new.user_id).await? {
        return Err(AppError::NotFound("user not found".into()));
    }
    let subscription = db::subscriptions::get_subscription(&state.pool, &new.subscription_id)
        .await?
        .ok_or_else(|| AppError::NotFound("subscription not found".into()))?;
    if subscription.user_id != new.user_id.as_str() {
        return Err(AppError::BadRequest(
            "subscription does not belong to this user".into(),
        ));
    }

    let id = PaymentId::new_v4();
    db::payments::record_payment(&state.pool, &id, &new).await?;

    Ok(Json(serde_json::json!({ "id": id.as_str() })))
}

async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let payment = db::payments::get_payment(&state.pool, &PaymentId(id))
        .await?
        .ok_or_else(|| AppError::NotFound("payment not found".into()))?;
    Ok(Json(serde_json::json!(payment)))
}

async fn list_user_payments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let payments = db::payments::get_user_payments(&state.pool, &UserId(id)).await?;
    Ok(Json(serde_json::json!({ "payments": payments })))
}

async fn list_subscription_payments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let payments =
        db::payments::get_subscription_payments(&state.pool, &SubscriptionId(id)).await?;
    Ok(Json(serde_json::json!({ "payments": payments })))
}
