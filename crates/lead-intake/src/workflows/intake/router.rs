use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::service::{FormValue, GapView, IntakeService, IntakeServiceError, SessionId};
use super::transport::RecordTransport;
use super::wizard::SubmitRejected;

/// Body of a field-change event.
#[derive(Debug, Deserialize)]
pub struct FieldChange {
    pub field: String,
    #[serde(default)]
    pub value: String,
}

/// Router exposing the wizard sessions and the one-shot lead submission.
pub fn intake_router<T>(service: Arc<IntakeService<T>>) -> Router
where
    T: RecordTransport + 'static,
{
    Router::new()
        .route("/api/v1/intake/sessions", post(open_handler::<T>))
        .route(
            "/api/v1/intake/sessions/:session_id",
            get(view_handler::<T>).delete(close_handler::<T>),
        )
        .route(
            "/api/v1/intake/sessions/:session_id/fields",
            put(field_handler::<T>),
        )
        .route(
            "/api/v1/intake/sessions/:session_id/next",
            post(next_handler::<T>),
        )
        .route(
            "/api/v1/intake/sessions/:session_id/back",
            post(back_handler::<T>),
        )
        .route(
            "/api/v1/intake/sessions/:session_id/submit",
            post(submit_handler::<T>),
        )
        .route(
            "/api/v1/intake/sessions/:session_id/dismiss",
            post(dismiss_handler::<T>),
        )
        .route("/api/v1/leads", post(submit_form_handler::<T>))
        .with_state(service)
}

pub(crate) async fn open_handler<T>(State(service): State<Arc<IntakeService<T>>>) -> Response
where
    T: RecordTransport + 'static,
{
    let view = service.open_session();
    (StatusCode::CREATED, axum::Json(view)).into_response()
}

pub(crate) async fn view_handler<T>(
    State(service): State<Arc<IntakeService<T>>>,
    Path(session_id): Path<String>,
) -> Response
where
    T: RecordTransport + 'static,
{
    session_response(service.view(&SessionId(session_id)))
}

pub(crate) async fn field_handler<T>(
    State(service): State<Arc<IntakeService<T>>>,
    Path(session_id): Path<String>,
    axum::Json(change): axum::Json<FieldChange>,
) -> Response
where
    T: RecordTransport + 'static,
{
    session_response(service.change_field(&SessionId(session_id), &change.field, change.value))
}

pub(crate) async fn next_handler<T>(
    State(service): State<Arc<IntakeService<T>>>,
    Path(session_id): Path<String>,
) -> Response
where
    T: RecordTransport + 'static,
{
    session_response(service.next(&SessionId(session_id)))
}

pub(crate) async fn back_handler<T>(
    State(service): State<Arc<IntakeService<T>>>,
    Path(session_id): Path<String>,
) -> Response
where
    T: RecordTransport + 'static,
{
    session_response(service.back(&SessionId(session_id)))
}

pub(crate) async fn submit_handler<T>(
    State(service): State<Arc<IntakeService<T>>>,
    Path(session_id): Path<String>,
) -> Response
where
    T: RecordTransport + 'static,
{
    session_response(service.submit(&SessionId(session_id)).await)
}

pub(crate) async fn dismiss_handler<T>(
    State(service): State<Arc<IntakeService<T>>>,
    Path(session_id): Path<String>,
) -> Response
where
    T: RecordTransport + 'static,
{
    session_response(service.dismiss_error(&SessionId(session_id)))
}

pub(crate) async fn close_handler<T>(
    State(service): State<Arc<IntakeService<T>>>,
    Path(session_id): Path<String>,
) -> Response
where
    T: RecordTransport + 'static,
{
    match service.close(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn submit_form_handler<T>(
    State(service): State<Arc<IntakeService<T>>>,
    axum::Json(form): axum::Json<BTreeMap<String, Option<FormValue>>>,
) -> Response
where
    T: RecordTransport + 'static,
{
    match service.submit_form(form).await {
        Ok(record_id) => {
            let payload = json!({
                "message": "Form submitted successfully",
                "record_id": record_id.0,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => {
            let (status, mut payload) = error_payload(&err);
            payload["message"] = json!("Error submitting form");
            (status, axum::Json(payload)).into_response()
        }
    }
}

fn session_response<V>(result: Result<V, IntakeServiceError>) -> Response
where
    V: serde::Serialize,
{
    match result {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: IntakeServiceError) -> Response {
    let (status, payload) = error_payload(&err);
    (status, axum::Json(payload)).into_response()
}

fn error_payload(err: &IntakeServiceError) -> (StatusCode, Value) {
    let status = match err {
        IntakeServiceError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        IntakeServiceError::Submit(
            SubmitRejected::AlreadySubmitting | SubmitRejected::AlreadySubmitted,
        ) => StatusCode::CONFLICT,
        IntakeServiceError::UnknownField(_)
        | IntakeServiceError::Submit(_)
        | IntakeServiceError::Incomplete { .. }
        | IntakeServiceError::Mapping(_) => StatusCode::UNPROCESSABLE_ENTITY,
        IntakeServiceError::Transport(_) => StatusCode::BAD_GATEWAY,
    };

    let mut payload = json!({ "error": err.to_string() });
    if let IntakeServiceError::Incomplete { gaps } = err {
        payload["gaps"] = json!(gaps.iter().map(GapView::from).collect::<Vec<_>>());
    }

    (status, payload)
}
