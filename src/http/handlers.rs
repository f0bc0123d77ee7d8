use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::app::session::Identity;
use crate::domain::job::{Job, JobPatch, NewJob};
use crate::domain::notification::Notice;
use crate::domain::user::ActingUser;
use crate::http::AppError;
use crate::AppState;

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
    loading: bool,
    error: Option<String>,
    jobs: usize,
}

#[derive(Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
}

#[derive(Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub source: &'static str,
    pub jobs: usize,
}

#[derive(Deserialize)]
pub struct ContentRequest {
    pub content: String,
}

#[derive(Serialize)]
pub struct LikeResponse {
    pub liked: bool,
    pub likes_count: u64,
}

#[derive(Serialize)]
pub struct SaveResponse {
    pub saved: bool,
}

#[derive(Serialize)]
pub struct JobStatusResponse {
    pub liked: bool,
    pub saved: bool,
    pub likes_count: u64,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub user: Option<ActingUser>,
}

/// Store operations answer `None` both for an anonymous session and for a
/// missing target; the session tells the two apart.
fn rejected(state: &AppState, target: &str) -> AppError {
    if state.session.current_user().is_none() {
        AppError::unauthorized("sign in required")
    } else {
        AppError::not_found(format!("{} not found", target))
    }
}

fn require_content(content: &str) -> Result<(), AppError> {
    if content.trim().is_empty() {
        return Err(AppError::bad_request("content is required"));
    }
    Ok(())
}

pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let error = state.store.error().await;
    let status = if error.is_none() { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        loading: state.store.is_loading().await,
        error,
        jobs: state.store.jobs().await.len(),
    })
}

pub async fn list_jobs(State(state): State<AppState>) -> Json<ListResponse<Job>> {
    Json(ListResponse {
        items: state.store.jobs().await,
    })
}

pub async fn list_saved_jobs(State(state): State<AppState>) -> Json<ListResponse<Job>> {
    Json(ListResponse {
        items: state.store.saved_jobs().await,
    })
}

pub async fn refresh_jobs(
    State(state): State<AppState>,
) -> Result<Json<RefreshResponse>, AppError> {
    let Some(source) = state.store.refresh().await else {
        let error = state.store.error().await;
        tracing::error!(error = ?error, "failed to refresh jobs");
        return Err(AppError::internal("failed to load jobs"));
    };

    Ok(Json(RefreshResponse {
        source,
        jobs: state.store.jobs().await.len(),
    }))
}

pub async fn create_job(
    State(state): State<AppState>,
    Json(payload): Json<NewJob>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError::bad_request("title is required"));
    }
    if !payload.budget.is_finite() || payload.budget < 0.0 {
        return Err(AppError::bad_request("budget must be a non-negative number"));
    }

    let id = state.store.add_job(payload).await.map_err(|err| {
        tracing::error!(error = ?err, "failed to add job");
        AppError::internal("failed to add job")
    })?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

pub async fn get_job(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Job>, AppError> {
    state
        .store
        .get_job(&id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::not_found("job not found"))
}

pub async fn update_job(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<JobPatch>,
) -> Result<Json<Job>, AppError> {
    if payload.is_empty() {
        return Err(AppError::bad_request("no fields to update"));
    }

    let updated = state.store.update_job(&id, payload).await.map_err(|err| {
        tracing::error!(error = ?err, job_id = %id, "failed to update job");
        AppError::internal("failed to update job")
    })?;
    if !updated {
        return Err(AppError::not_found("job not found"));
    }

    state
        .store
        .get_job(&id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::not_found("job not found"))
}

pub async fn delete_job(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let deleted = state.store.delete_job(&id).await.map_err(|err| {
        tracing::error!(error = ?err, job_id = %id, "failed to delete job");
        AppError::internal("failed to delete job")
    })?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("job not found"))
    }
}

pub async fn comment_job(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<ContentRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    require_content(&payload.content)?;

    let comment_id = state
        .store
        .add_comment_to_job(&id, &payload.content)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, job_id = %id, "failed to add comment");
            AppError::internal("failed to add comment")
        })?
        .ok_or_else(|| rejected(&state, "job"))?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id: comment_id })))
}

pub async fn reply_comment(
    Path((id, comment_id)): Path<(String, String)>,
    State(state): State<AppState>,
    Json(payload): Json<ContentRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    require_content(&payload.content)?;

    let added = state
        .store
        .add_reply_to_comment(&id, &comment_id, &payload.content)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, job_id = %id, comment_id = %comment_id, "failed to add reply");
            AppError::internal("failed to add reply")
        })?;
    let Some(reply_id) = added else {
        let target = if state.store.get_job(&id).await.is_some() {
            "comment"
        } else {
            "job"
        };
        return Err(rejected(&state, target));
    };

    Ok((StatusCode::CREATED, Json(CreatedResponse { id: reply_id })))
}

pub async fn toggle_like(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LikeResponse>, AppError> {
    let like = state
        .store
        .toggle_job_like(&id)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, job_id = %id, "failed to toggle like");
            AppError::internal("failed to toggle like")
        })?
        .ok_or_else(|| rejected(&state, "job"))?;

    Ok(Json(LikeResponse {
        liked: like.liked,
        likes_count: like.likes_count,
    }))
}

pub async fn toggle_save(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<SaveResponse>, AppError> {
    let saved = state
        .store
        .toggle_save_job(&id)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, job_id = %id, "failed to toggle save");
            AppError::internal("failed to toggle save")
        })?
        .ok_or_else(|| rejected(&state, "job"))?;

    Ok(Json(SaveResponse { saved }))
}

pub async fn job_status(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<JobStatusResponse>, AppError> {
    let job = state
        .store
        .get_job(&id)
        .await
        .ok_or_else(|| AppError::not_found("job not found"))?;
    let user = state.session.current_user();

    Ok(Json(JobStatusResponse {
        liked: user.as_ref().is_some_and(|u| job.is_liked_by(&u.id)),
        saved: user.as_ref().is_some_and(|u| job.is_saved_by(&u.id)),
        likes_count: job.likes_count,
    }))
}

pub async fn get_session(State(state): State<AppState>) -> Json<SessionResponse> {
    Json(SessionResponse {
        user: state.session.current_user(),
    })
}

pub async fn sign_in(
    State(state): State<AppState>,
    Json(payload): Json<ActingUser>,
) -> Result<Json<SessionResponse>, AppError> {
    if payload.id.trim().is_empty() || payload.name.trim().is_empty() {
        return Err(AppError::bad_request("id and name are required"));
    }

    state.session.sign_in(payload.clone());
    Ok(Json(SessionResponse {
        user: Some(payload),
    }))
}

pub async fn sign_out(State(state): State<AppState>) -> StatusCode {
    state.session.sign_out();
    StatusCode::NO_CONTENT
}

pub async fn list_notifications(State(state): State<AppState>) -> Json<ListResponse<Notice>> {
    Json(ListResponse {
        items: state.notices.recent(),
    })
}
