use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;

use studyhall_common::enrollment::{EnrollmentInput, validate_progress};
use studyhall_common::types::{EnrollmentId, UserId};

use crate::AppState;
use crate::db;
use crate::error::AppError;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/enrollments", post(create_enrollment))
        .route("/enrollments/{id}", get(get_enrollment))
        .route("/enrollments/{id}/progress", put(update_progress))
        .route("/enrollments/{id}/complete", post(complete_enrollment))
        .route("/users/{id}/enrollments", get(list_user_enrollments))
}

async fn create_enrollment(
    State(state): State<AppState>,
    Json(input): Json<EnrollmentInput>,
) -> Result<Json<serde_json::Value>, AppError> {
    let new = input.validate()?;

    if !db::users::exists(&state.pool, &new.user_id).await? {
        return Err(AppError::NotFound("user not found".into()));
    }

    let id = EnrollmentId::new_v4();
    db::enrollments::create_enrollment(&state.pool, &id, &new).await?;

    Ok(Json(serde_json::json!({ "id": id.as_str() })))
}

async fn get_enrollment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let enrollment = db::enrollments::get_enrollment(&state.pool, &EnrollmentId(id))
        .await?
        .ok_or_else(|| AppError::NotFound("enrollment not found".into()))?;
    Ok(Json(serde_json::json!(enrollment)))
}

#[derive(Deserialize)]
struct UpdateProgressBody {
    progress: i64,
}

/// 進捗更新。進捗は単調非減少で、現在値より小さい値は409で拒否する。
async fn update_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateProgressBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let progress = validate_progress(body.progress)?;
    let id = EnrollmentId(id);

    let updated = db::enrollments::update_progress(&state.pool, &id, progress).await?;
    if !updated {
        if db::enrollments::get_enrollment(&state.pool, &id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("enrollment not found".into()));
        }
        return Err(AppError::Conflict(
            "progress may not decrease".into(),
        ));
    }
    Ok(Json(serde_json::json!({ "progress": progress })))
}

#[derive(Deserialize)]
struct CompleteBody {
    certificate_id: Option<String>,
}

async fn complete_enrollment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CompleteBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = EnrollmentId(id);
    let completed =
        db::enrollments::complete_enrollment(&state.pool, &id, body.certificate_id.as_deref())
            .await?;
    if !completed {
        if db::enrollments::get_enrollment(&state.pool, &id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("enrollment not found".into()));
        }
        return Err(AppError::Conflict("enrollment already completed".into()));
    }
    Ok(Json(serde_json::json!({ "completed": true })))
}

async fn list_user_enrollments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let enrollments = db::enrollments::get_user_enrollments(&state.pool, &UserId(id)).await?;
    Ok(Json(serde_json::json!({ "enrollments": enrollments })))
}
