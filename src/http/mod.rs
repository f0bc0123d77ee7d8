use axum::Router;

use crate::AppState;

mod error;
mod handlers;
mod routes;

pub use error::AppError;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health())
        .merge(routes::jobs())
        .merge(routes::session())
        .merge(routes::notifications())
        .with_state(state)
}
