use axum::{routing::get, routing::post, Router};

use crate::AppState;
use crate::http::handlers;

pub fn health() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health))
}

pub fn jobs() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(handlers::list_jobs).post(handlers::create_job))
        .route("/jobs/saved", get(handlers::list_saved_jobs))
        .route("/jobs/refresh", post(handlers::refresh_jobs))
        .route(
            "/jobs/:id",
            get(handlers::get_job)
                .patch(handlers::update_job)
                .delete(handlers::delete_job),
        )
        .route("/jobs/:id/status", get(handlers::job_status))
        .route("/jobs/:id/like", post(handlers::toggle_like))
        .route("/jobs/:id/save", post(handlers::toggle_save))
        .route("/jobs/:id/comments", post(handlers::comment_job))
        .route(
            "/jobs/:id/comments/:comment_id/replies",
            post(handlers::reply_comment),
        )
}

pub fn session() -> Router<AppState> {
    Router::new().route(
        "/session",
        get(handlers::get_session)
            .put(handlers::sign_in)
            .delete(handlers::sign_out),
    )
}

pub fn notifications() -> Router<AppState> {
    Router::new().route("/notifications", get(handlers::list_notifications))
}
