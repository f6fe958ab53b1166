use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::domain::{Actor, ApplicationId, JobOfferId, NotificationId, UserId};
use super::notify::NotificationDispatcher;
use super::service::{BoardError, BoardService};
use super::store::BoardStore;

/// Header carrying the authenticated subject id. Stands in for the real
/// authentication layer: the id is trusted as already verified, the role is
/// always re-read from the directory.
pub const ACTOR_HEADER: &str = "x-actor";

/// Router builder exposing the board's HTTP surface.
pub fn board_router<S, N>(service: Arc<BoardService<S, N>>) -> Router
where
    S: BoardStore + 'static,
    N: NotificationDispatcher + 'static,
{
    Router::new()
        .route(
            "/api/v1/applications",
            post(create_application_handler::<S, N>),
        )
        .route(
            "/api/v1/applications/bulk-status",
            post(bulk_status_handler::<S, N>),
        )
        .route(
            "/api/v1/applications/:application_id",
            get(get_application_handler::<S, N>)
                .patch(update_content_handler::<S, N>)
                .delete(delete_application_handler::<S, N>),
        )
        .route(
            "/api/v1/applications/:application_id/status",
            patch(update_status_handler::<S, N>),
        )
        .route("/api/v1/job-offers", post(post_job_offer_handler::<S, N>))
        .route(
            "/api/v1/job-offers/:job_offer_id",
            patch(update_job_offer_handler::<S, N>),
        )
        .route(
            "/api/v1/job-offers/:job_offer_id/applications",
            get(job_applications_handler::<S, N>),
        )
        .route(
            "/api/v1/job-offers/:job_offer_id/can-apply",
            get(can_apply_handler::<S, N>),
        )
        .route("/api/v1/notifications", get(notifications_handler::<S, N>))
        .route(
            "/api/v1/notifications/:notification_id/read",
            post(mark_read_handler::<S, N>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateApplicationRequest {
    pub(crate) job_offer_id: String,
    #[serde(default)]
    pub(crate) cover_note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateStatusRequest {
    pub(crate) status: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkStatusRequest {
    pub(crate) application_ids: Vec<String>,
    pub(crate) status: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateContentRequest {
    #[serde(default)]
    pub(crate) cover_note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostJobOfferRequest {
    pub(crate) title: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateJobOfferRequest {
    pub(crate) is_active: bool,
}

fn require_actor<S, N>(
    service: &BoardService<S, N>,
    headers: &HeaderMap,
) -> Result<Actor, Response>
where
    S: BoardStore + 'static,
    N: NotificationDispatcher + 'static,
{
    let subject = headers
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let Some(subject) = subject else {
        let payload = json!({ "error": "missing x-actor header" });
        return Err((StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response());
    };

    match service.resolve_actor(&UserId(subject.to_string())) {
        Ok(actor) => Ok(actor),
        Err(BoardError::NotFound(_)) => {
            let payload = json!({ "error": "unknown subject" });
            Err((StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response())
        }
        Err(other) => Err(error_response(other)),
    }
}

fn error_response(error: BoardError) -> Response {
    let status = match &error {
        BoardError::Forbidden(_) => StatusCode::FORBIDDEN,
        BoardError::NotFound(_) => StatusCode::NOT_FOUND,
        BoardError::Conflict | BoardError::TerminalState { .. } => StatusCode::CONFLICT,
        BoardError::InvalidStatus(_) | BoardError::EmptyBulk(_) => StatusCode::BAD_REQUEST,
        BoardError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn create_application_handler<S, N>(
    State(service): State<Arc<BoardService<S, N>>>,
    headers: HeaderMap,
    axum::Json(payload): axum::Json<CreateApplicationRequest>,
) -> Response
where
    S: BoardStore + 'static,
    N: NotificationDispatcher + 'static,
{
    let actor = match require_actor(&service, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    let job_offer_id = JobOfferId(payload.job_offer_id);
    match service.create_application(&actor, &job_offer_id, payload.cover_note) {
        Ok(application) => (StatusCode::CREATED, axum::Json(application)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_application_handler<S, N>(
    State(service): State<Arc<BoardService<S, N>>>,
    headers: HeaderMap,
    Path(application_id): Path<String>,
) -> Response
where
    S: BoardStore + 'static,
    N: NotificationDispatcher + 'static,
{
    let actor = match require_actor(&service, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    let id = ApplicationId(application_id);
    match service.application(&actor, &id) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_content_handler<S, N>(
    State(service): State<Arc<BoardService<S, N>>>,
    headers: HeaderMap,
    Path(application_id): Path<String>,
    axum::Json(payload): axum::Json<UpdateContentRequest>,
) -> Response
where
    S: BoardStore + 'static,
    N: NotificationDispatcher + 'static,
{
    let actor = match require_actor(&service, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    let id = ApplicationId(application_id);
    match service.update_application_content(&actor, &id, payload.cover_note) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_application_handler<S, N>(
    State(service): State<Arc<BoardService<S, N>>>,
    headers: HeaderMap,
    Path(application_id): Path<String>,
) -> Response
where
    S: BoardStore + 'static,
    N: NotificationDispatcher + 'static,
{
    let actor = match require_actor(&service, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    let id = ApplicationId(application_id);
    match service.delete_application(&actor, &id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_status_handler<S, N>(
    State(service): State<Arc<BoardService<S, N>>>,
    headers: HeaderMap,
    Path(application_id): Path<String>,
    axum::Json(payload): axum::Json<UpdateStatusRequest>,
) -> Response
where
    S: BoardStore + 'static,
    N: NotificationDispatcher + 'static,
{
    let actor = match require_actor(&service, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    let new_status = match payload.status.parse() {
        Ok(status) => status,
        Err(err) => return error_response(BoardError::InvalidStatus(err)),
    };

    let id = ApplicationId(application_id);
    match service.update_application_status(&actor, &id, new_status) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn bulk_status_handler<S, N>(
    State(service): State<Arc<BoardService<S, N>>>,
    headers: HeaderMap,
    axum::Json(payload): axum::Json<BulkStatusRequest>,
) -> Response
where
    S: BoardStore + 'static,
    N: NotificationDispatcher + 'static,
{
    let actor = match require_actor(&service, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    let new_status = match payload.status.parse() {
        Ok(status) => status,
        Err(err) => return error_response(BoardError::InvalidStatus(err)),
    };

    let ids: Vec<ApplicationId> = payload
        .application_ids
        .into_iter()
        .map(ApplicationId)
        .collect();

    match service.bulk_update_application_status(&actor, &ids, new_status) {
        Ok(outcome) => {
            let succeeded: Vec<&str> = outcome
                .succeeded
                .iter()
                .map(|id| id.0.as_str())
                .collect();
            let failed: serde_json::Map<String, Value> = outcome
                .failed
                .iter()
                .map(|(id, failure)| (id.0.clone(), json!(failure.label())))
                .collect();

            let payload = json!({
                "succeeded": succeeded,
                "failed": failed,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn job_applications_handler<S, N>(
    State(service): State<Arc<BoardService<S, N>>>,
    headers: HeaderMap,
    Path(job_offer_id): Path<String>,
) -> Response
where
    S: BoardStore + 'static,
    N: NotificationDispatcher + 'static,
{
    let actor = match require_actor(&service, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    let id = JobOfferId(job_offer_id);
    match service.job_applications(&actor, &id) {
        Ok(applications) => (StatusCode::OK, axum::Json(applications)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn can_apply_handler<S, N>(
    State(service): State<Arc<BoardService<S, N>>>,
    headers: HeaderMap,
    Path(job_offer_id): Path<String>,
) -> Response
where
    S: BoardStore + 'static,
    N: NotificationDispatcher + 'static,
{
    let actor = match require_actor(&service, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    let id = JobOfferId(job_offer_id);
    match service.can_apply(&actor, &id) {
        Ok(can_apply) => {
            let payload = json!({
                "job_offer_id": id.0,
                "can_apply": can_apply,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn post_job_offer_handler<S, N>(
    State(service): State<Arc<BoardService<S, N>>>,
    headers: HeaderMap,
    axum::Json(payload): axum::Json<PostJobOfferRequest>,
) -> Response
where
    S: BoardStore + 'static,
    N: NotificationDispatcher + 'static,
{
    let actor = match require_actor(&service, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match service.post_job_offer(&actor, payload.title) {
        Ok(offer) => (StatusCode::CREATED, axum::Json(offer)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_job_offer_handler<S, N>(
    State(service): State<Arc<BoardService<S, N>>>,
    headers: HeaderMap,
    Path(job_offer_id): Path<String>,
    axum::Json(payload): axum::Json<UpdateJobOfferRequest>,
) -> Response
where
    S: BoardStore + 'static,
    N: NotificationDispatcher + 'static,
{
    let actor = match require_actor(&service, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    let id = JobOfferId(job_offer_id);
    match service.set_job_offer_active(&actor, &id, payload.is_active) {
        Ok(offer) => (StatusCode::OK, axum::Json(offer)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn notifications_handler<S, N>(
    State(service): State<Arc<BoardService<S, N>>>,
    headers: HeaderMap,
) -> Response
where
    S: BoardStore + 'static,
    N: NotificationDispatcher + 'static,
{
    let actor = match require_actor(&service, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match service.notifications(&actor) {
        Ok(notifications) => (StatusCode::OK, axum::Json(notifications)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn mark_read_handler<S, N>(
    State(service): State<Arc<BoardService<S, N>>>,
    headers: HeaderMap,
    Path(notification_id): Path<String>,
) -> Response
where
    S: BoardStore + 'static,
    N: NotificationDispatcher + 'static,
{
    let actor = match require_actor(&service, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    let id = NotificationId(notification_id);
    match service.mark_notification_read(&actor, &id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}
