//! HTTP handlers and router assembly
//!
//! Handlers stay thin: extract the bearer token and the body, call the
//! workflow, map the domain error to a status code. Guard failures map to
//! 422 so callers can distinguish a lost race from a broken request.

use crate::api::schemas::{
    EcgReportRequest, ErrorResponse, LoginRequest, LoginResponse, MeResponse, MessageResponse,
    NextExamResponse,
};
use crate::core::{ApprovalWorkflow, ApproveReportCommand, AssignmentWorkflow, LoginWorkflow, ProfileWorkflow};
use crate::domain::LaudoError;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;

/// Shared state for all request handlers
#[derive(Clone)]
pub struct AppState {
    pub login: LoginWorkflow,
    pub profile: ProfileWorkflow,
    pub assignment: AssignmentWorkflow,
    pub approval: ApprovalWorkflow,
}

/// Builds the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/exams/ecg/next", get(next_ecg_exam))
        .route("/exams/ecg/report", post(create_ecg_report))
        .with_state(state)
}

/// Maps a domain error onto the wire
///
/// Everything outside the expected taxonomy becomes a generic 500; the
/// underlying detail is logged, never returned.
fn error_response(err: LaudoError) -> Response {
    let (status, details) = match err {
        LaudoError::Unauthorized => (StatusCode::UNAUTHORIZED, err.to_string()),
        LaudoError::Forbidden => (StatusCode::FORBIDDEN, err.to_string()),
        LaudoError::Unprocessable(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
        LaudoError::Validation(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
        other => {
            tracing::error!(error = %other, "Unhandled error in request handler");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    };
    (status, Json(ErrorResponse { details })).into_response()
}

/// Extracts the bearer token from the `Authorization` header
///
/// Accepts both `Bearer <token>` and the bare token, which is what the
/// existing mobile clients send.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

async fn health() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "ok".to_string(),
    })
}

async fn login(State(state): State<AppState>, Json(body): Json<LoginRequest>) -> Response {
    match state.login.login(&body.username, &body.password).await {
        Ok(access_token) => Json(LoginResponse { access_token }).into_response(),
        Err(err) => error_response(err),
    }
}

async fn me(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match state.profile.me(bearer_token(&headers)).await {
        Ok(user) => Json(MeResponse::from(user)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn next_ecg_exam(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match state.assignment.next_exam(bearer_token(&headers)).await {
        Ok(exam) => Json(NextExamResponse { exam }).into_response(),
        Err(err) => error_response(err),
    }
}

async fn create_ecg_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<EcgReportRequest>,
) -> Response {
    let command = ApproveReportCommand {
        exam_id: body.exam_id,
        report_id: body.report_id,
        classification: body.report,
        segmentation: body.report_segmentation,
    };
    match state.approval.approve(bearer_token(&headers), command).await {
        Ok(()) => Json(MessageResponse {
            message: "report approved".to_string(),
        })
        .into_response(),
        Err(err) => error_response(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_with_prefix() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_token_bare() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("abc.def.ghi"));
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_token_missing_or_empty() {
        let headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
