//! Thread API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::{AppState, REPORTED, THREAD_DELETED};
use crate::board::{DeleteOutcome, ReportOutcome, Thread};
use crate::web::dto::{
    non_empty, CreateThreadRequest, DeleteThreadRequest, MessageResponse, Payload, QueryParams,
    ReportThreadRequest, ThreadQuery, ThreadResponse, ValidatedPayload,
};
use crate::web::error::ApiError;

/// POST /api/threads/:board - Create a thread.
///
/// Responds with the full stored thread, password included.
pub async fn create_thread(
    State(state): State<Arc<AppState>>,
    Path(board): Path<String>,
    ValidatedPayload(req): ValidatedPayload<CreateThreadRequest>,
) -> Result<(StatusCode, Json<ThreadResponse>), ApiError> {
    let text = req.text.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    let thread = state
        .board_service()
        .create_thread(&board, &text, &password)
        .await?;

    Ok((StatusCode::CREATED, Json(ThreadResponse::full(thread))))
}

/// GET /api/threads/:board - List threads.
///
/// With `threadId`, returns that single thread with every reply, or an
/// empty list. Otherwise returns the most recently bumped threads with
/// their latest replies.
pub async fn list_threads(
    State(state): State<Arc<AppState>>,
    Path(board): Path<String>,
    QueryParams(query): QueryParams<ThreadQuery>,
) -> Result<Json<Vec<ThreadResponse>>, ApiError> {
    let service = state.board_service();

    let threads: Vec<Thread> = match non_empty(&query.thread_id) {
        Some(thread_id) => service
            .get_thread(&board, thread_id)
            .await?
            .into_iter()
            .collect(),
        None => service.list_threads(&board).await?,
    };

    Ok(Json(threads.into_iter().map(ThreadResponse::public).collect()))
}

/// DELETE /api/threads/:board - Delete a thread with its password.
pub async fn delete_thread(
    State(state): State<Arc<AppState>>,
    Path(board): Path<String>,
    Payload(req): Payload<DeleteThreadRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let outcome = state
        .board_service()
        .delete_thread(&board, non_empty(&req.thread_id), non_empty(&req.password))
        .await?;

    match outcome {
        DeleteOutcome::Deleted => Ok(Json(MessageResponse::new(THREAD_DELETED))),
        DeleteOutcome::IncorrectPassword => Err(ApiError::incorrect_password()),
    }
}

/// PUT /api/threads/:board - Report a thread.
pub async fn report_thread(
    State(state): State<Arc<AppState>>,
    Path(board): Path<String>,
    Payload(req): Payload<ReportThreadRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let thread_id = non_empty(&req.thread_id).ok_or_else(ApiError::thread_id_missing)?;

    match state.board_service().report_thread(&board, thread_id).await? {
        ReportOutcome::Reported => Ok(Json(MessageResponse::new(REPORTED))),
        ReportOutcome::NotFound => Err(ApiError::thread_not_found()),
    }
}
