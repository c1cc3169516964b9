use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;

use studyhall_common::enums::OnlineStatus;
use studyhall_common::instructor::InstructorInput;
use studyhall_common::types::{InstructorId, UserId};

use crate::AppState;
use crate::db;
use crate::error::AppError;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/instructors", post(create_instructor).get(list_available))
        .route("/instructors/{user_id}", get(get_instructor))
        .route("/instructors/{user_id}/status", put(set_online_status))
        .route("/instructors/{user_id}/availability", put(set_availability))
}

/// 講師プロフィール作成。ユーザー1人につき1件で、
/// 2件目のINSERTはDBのUNIQUE制約違反として409になる。
async fn create_instructor(
    State(state): State<AppState>,
    Json(input): Json<InstructorInput>,
) -> Result<Json<serde_json::Value>, AppError> {
    let new = input.validate()?;

    if !db::users::exists(&state.pool, &new.user_id).await? {
        return Err(AppError::NotFound("user not found".into()));
    }

    let id = InstructorId::new_v4();
    db::instructors::create_instructor(&state.pool, &id, &new).await?;

    Ok(Json(serde_json::json!({ "id": id.as_str() })))
}

async fn get_instructor(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let instructor = db::instructors::get_instructor_by_user(&state.pool, &UserId(user_id))
        .await?
        .ok_or_else(|| AppError::NotFound("instructor not found".into()))?;
    Ok(Json(serde_json::json!(instructor)))
}

async fn list_available(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let instructors = db::instructors::list_available_instructors(&state.pool).await?;
    Ok(Json(serde_json::json!({ "instructors": instructors })))
}

#[derive(Deserialize)]
struct SetStatusBody {
    online_status: String,
}

async fn set_online_status(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<SetStatusBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let status = OnlineStatus::parse_field("online_status", &body.online_status)?;
    let updated =
        db::instructors::set_online_status(&state.pool, &UserId(user_id), status).await?;
    if !updated {
        return Err(AppError::NotFound("instructor not found".into()));
    }
    Ok(Json(serde_json::json!({ "online_status": status.as_str() })))
}

#[derive(Deserialize)]
struct SetAvailabilityBody {
    is_available: bool,
}

async fn set_availability(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<SetAvailabilityBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let updated =
        db::instructors::set_availability(&state.pool, &UserId(user_id), body.is_available).await?;
    if !updated {
        return Err(AppError::NotFound("instructor not found".into()));
    }
    Ok(Json(serde_json::json!({ "is_available": body.is_available })))
}
