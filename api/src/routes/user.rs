use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use studyhall_common::types::UserId;
use studyhall_common::user::UserInput;

use crate::AppState;
use crate::db;
use crate::error::AppError;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(register_user))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/last-active", post(touch_last_active))
}

/// ユーザー登録。検証はストレージに触れる前に完結する。
/// username / email の重複は事前に確認して409を返す
/// （競合時の最終的な強制はDBのUNIQUE制約）。
async fn register_user(
    State(state): State<AppState>,
    Json(input): Json<UserInput>,
) -> Result<Json<serde_json::Value>, AppError> {
    let new = input.validate()?;

    if db::users::get_user_by_username(&state.pool, &new.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("username already taken".into()));
    }
    if db::users::get_user_by_email(&state.pool, &new.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("email already registered".into()));
    }

    let user_id = UserId::new_v4();
    db::users::create_user(&state.pool, &user_id, &new).await?;

    Ok(Json(serde_json::json!({ "id": user_id.as_str() })))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = db::users::get_user(&state.pool, &UserId(id))
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".into()))?;
    Ok(Json(serde_json::json!(user)))
}

async fn touch_last_active(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let updated = db::users::touch_last_active(&state.pool, &UserId(id)).await?;
    if !updated {
        return Err(AppError::NotFound("user not found".into()));
    }
    Ok(Json(serde_json::json!({ "updated": true })))
}
