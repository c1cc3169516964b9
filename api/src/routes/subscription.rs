use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use studyhall_common::subscription::SubscriptionInput;
use studyhall_common::types::{SubscriptionId, UserId};

use crate::AppState;
use crate::db;
use crate::error::AppError;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/subscriptions", post(create_subscription))
        .route("/subscriptions/{id}", get(get_subscription))
        .route("/subscriptions/{id}/cancel", post(cancel_subscription))
        .route("/users/{id}/subscriptions", get(list_user_subscriptions))
}

async fn create_subscription(
    State(state): State<AppState>,
    Json(input): Json<SubscriptionInput>,
) -> Result<Json<serde_json::Value>, AppError> {
    let new = input.validate()?;

    if !db::users::exists(&state.pool, &new.user_id).await? {
        return Err(AppError::NotFound("user not found".into()));
    }

    let id = SubscriptionId::new_v4();
    db::subscriptions::create_subscription(&state.pool, &id, &new).await?;

    Ok(Json(serde_json::json!({ "id": id.as_str() })))
}

async fn get_subscription(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let subscription = db::subscriptions::get_subscription(&state.pool, &SubscriptionId(id))
        .await?
        .ok_or_else(|| AppError::NotFound("subscription not found".into()))?;
    Ok(Json(serde_json::json!(subscription)))
}

async fn cancel_subscription(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = SubscriptionId(id);
    let cancelled = db::subscriptions::cancel_subscription(&state.pool, &id).await?;
    if !cancelled {
        // 存在しないIDか、既に解約済み
        if db::subscriptions::get_subscription(&state.pool, &id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("subscription not found".into()));
        }
        return Err(AppError::Conflict("subscription already cancelled".into()));
    }
    Ok(Json(serde_json::json!({ "cancelled": true })))
}

async fn list_user_subscriptions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let subscriptions =
        db::subscriptions::get_user_subscriptions(&state.pool, &UserId(id)).await?;
    Ok(Json(serde_json::json!({ "subscriptions": subscriptions })))
}
