use crate::{AppState, StorageError};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use qscore_model::{validate_submission, ValidationError};
use serde_json::{json, Value};
use std::sync::atomic::Ordering;
use tracing::{error, info};

pub(crate) fn make_request_id(state: &AppState) -> String {
    let id = state.request_id_seed.fetch_add(1, Ordering::Relaxed);
    format!("req-{id:016x}")
}

pub(crate) fn propagated_request_id(headers: &HeaderMap, state: &AppState) -> String {
    if let Some(raw) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    make_request_id(state)
}

pub(crate) fn with_request_id(mut response: Response, request_id: &str) -> Response {
    if let Ok(v) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert("x-request-id", v);
    }
    response
}

fn validation_error_response(err: ValidationError) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": "Validation Error", "message": err.to_string()})),
    )
        .into_response()
}

/// Storage detail never leaks to the caller outside dev mode; the full
/// error is already on the log by the time this is built.
fn storage_error_response(state: &AppState, generic: &str, err: &StorageError) -> Response {
    let message = if state.api.expose_error_detail {
        err.to_string()
    } else {
        generic.to_string()
    };
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "Internal Server Error", "message": message})),
    )
        .into_response()
}

pub(crate) async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let request_id = make_request_id(&state);
    let resp = Json(json!({
        "status": "OK",
        "timestamp": Utc::now(),
        "service": state.api.service_name,
    }))
    .into_response();
    with_request_id(resp, &request_id)
}

pub(crate) async fn landing_handler(State(state): State<AppState>) -> impl IntoResponse {
    let request_id = make_request_id(&state);
    let resp = Json(json!({
        "message": state.api.service_name,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /api/questionnaires": "Submit a questionnaire response",
            "GET /api/questionnaires": "Get all questionnaire responses",
            "GET /api/questionnaires/summaries": "Get questionnaire summaries",
            "GET /api/questionnaires/:name": "Get questionnaire responses for a specific name",
            "GET /health": "Health check",
        },
        "sampleSubmission": {
            "name": "John Doe",
            "questionnaireRef": "optional-questionnaire-ref",
            "sections": [
                {
                    "sectionName": "Communication Skills",
                    "questions": [
                        {
                            "questionId": "q1",
                            "questionText": "Rate communication effectiveness",
                            "score": 4,
                        },
                        {
                            "questionId": "q2",
                            "questionText": "How well do you listen to others?",
                            "score": 5,
                        },
                    ],
                },
                {
                    "sectionName": "Leadership",
                    "questions": [
                        {
                            "questionId": "q3",
                            "questionText": "Rate your leadership abilities",
                            "score": 3,
                        },
                    ],
                },
            ],
        },
    }))
    .into_response();
    with_request_id(resp, &request_id)
}

pub(crate) async fn submit_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let submission = match validate_submission(&payload) {
        Ok(s) => s,
        Err(e) => {
            info!(request_id = %request_id, rule = ?e, "submission rejected: {e}");
            return with_request_id(validation_error_response(e), &request_id);
        }
    };
    match state.store.insert(submission).await {
        Ok(stored) => {
            info!(request_id = %request_id, id = %stored.id, name = %stored.name, "submission stored");
            let resp = (
                StatusCode::CREATED,
                Json(json!({
                    "success": true,
                    "message": "Questionnaire response submitted successfully",
                    "data": stored,
                })),
            )
                .into_response();
            with_request_id(resp, &request_id)
        }
        Err(e) => {
            error!(request_id = %request_id, "submission insert failed: {e}");
            with_request_id(
                storage_error_response(&state, "Failed to submit questionnaire response", &e),
                &request_id,
            )
        }
    }
}

pub(crate) async fn list_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    match state.store.find_all().await {
        Ok(responses) => {
            let resp = Json(json!({"success": true, "data": responses})).into_response();
            with_request_id(resp, &request_id)
        }
        Err(e) => {
            error!(request_id = %request_id, "listing submissions failed: {e}");
            with_request_id(
                storage_error_response(&state, "Failed to fetch questionnaire responses", &e),
                &request_id,
            )
        }
    }
}

pub(crate) async fn by_name_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    match state.store.find_by_name(&name).await {
        Ok(responses) => {
            let resp = Json(json!({"success": true, "data": responses})).into_response();
            with_request_id(resp, &request_id)
        }
        Err(e) => {
            error!(request_id = %request_id, name = %name, "listing submissions by name failed: {e}");
            with_request_id(
                storage_error_response(&state, "Failed to fetch questionnaire responses", &e),
                &request_id,
            )
        }
    }
}

pub(crate) async fn summaries_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    // Always recomputed from current stored state; never cached.
    match state.store.find_all().await {
        Ok(responses) => {
            let summaries = qscore_summary::questionnaire_summaries(&responses);
            let resp = Json(json!({"success": true, "data": summaries})).into_response();
            with_request_id(resp, &request_id)
        }
        Err(e) => {
            error!(request_id = %request_id, "computing summaries failed: {e}");
            with_request_id(
                storage_error_response(&state, "Failed to fetch questionnaire summaries", &e),
                &request_id,
            )
        }
    }
}

pub(crate) async fn not_found_handler(method: Method, uri: Uri) -> Response {
    // Echo the full request target, query string included.
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Endpoint not found",
            "path": path,
            "method": method.as_str(),
        })),
    )
        .into_response()
}
