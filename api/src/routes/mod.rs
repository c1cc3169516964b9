mod chat;
mod enrollment;
mod instructor;
mod payment;
mod subscription;
mod user;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(user::routes())
        .merge(subscription::routes())
        .merge(payment::routes())
        .merge(enrollment::routes())
        .merge(instructor::routes())
        .merge(chat::routes());

    Router::new()
        .nest("/v1", api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
