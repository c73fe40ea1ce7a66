//! Reply API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::{AppState, REPLY_DELETED, REPORTED};
use crate::board::{DeleteOutcome, ReplyOutcome, ReportOutcome};
use crate::web::dto::{
    non_empty, CreateReplyRequest, DeleteReplyRequest, MessageResponse, Payload, QueryParams,
    ReportReplyRequest, ThreadQuery, ThreadResponse, ValidatedPayload,
};
use crate::web::error::ApiError;

/// POST /api/replies/:board - Reply to a thread.
///
/// Field validation runs before the thread id is looked at. Responds with
/// the full bumped thread and all of its replies.
pub async fn create_reply(
    State(state): State<Arc<AppState>>,
    Path(board): Path<String>,
    ValidatedPayload(req): ValidatedPayload<CreateReplyRequest>,
) -> Result<(StatusCode, Json<ThreadResponse>), ApiError> {
    let thread_id = non_empty(&req.thread_id).ok_or_else(ApiError::thread_id_missing)?;
    let text = req.text.as_deref().unwrap_or_default();
    let password = req.password.as_deref().unwrap_or_default();

    match state
        .board_service()
        .create_reply(&board, thread_id, text, password)
        .await?
    {
        ReplyOutcome::Created(thread) => {
            Ok((StatusCode::CREATED, Json(ThreadResponse::full(thread))))
        }
        ReplyOutcome::ThreadNotFound => Err(ApiError::thread_not_found()),
    }
}

/// GET /api/replies/:board?threadId= - Get a thread with every reply.
pub async fn get_thread_replies(
    State(state): State<Arc<AppState>>,
    Path(board): Path<String>,
    QueryParams(query): QueryParams<ThreadQuery>,
) -> Result<Json<ThreadResponse>, ApiError> {
    let thread_id = non_empty(&query.thread_id).ok_or_else(ApiError::thread_id_missing)?;

    let thread = state
        .board_service()
        .get_thread(&board, thread_id)
        .await?
        .ok_or_else(ApiError::thread_not_found)?;

    Ok(Json(ThreadResponse::public(thread)))
}

/// DELETE /api/replies/:board - Delete a reply with its password.
///
/// The reply stays in the thread with its text replaced.
pub async fn delete_reply(
    State(state): State<Arc<AppState>>,
    Path(board): Path<String>,
    Payload(req): Payload<DeleteReplyRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let outcome = state
        .board_service()
        .delete_reply(
            &board,
            non_empty(&req.thread_id),
            non_empty(&req.reply_id),
            non_empty(&req.password),
        )
        .await?;

    match outcome {
        DeleteOutcome::Deleted => Ok(Json(MessageResponse::new(REPLY_DELETED))),
        DeleteOutcome::IncorrectPassword => Err(ApiError::incorrect_password()),
    }
}

/// PUT /api/replies/:board - Report a reply.
pub async fn report_reply(
    State(state): State<Arc<AppState>>,
    Path(board): Path<String>,
    Payload(req): Payload<ReportReplyRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let thread_id = non_empty(&req.thread_id).ok_or_else(ApiError::thread_id_missing)?;
    let reply_id = non_empty(&req.reply_id).ok_or_else(ApiError::reply_id_missing)?;

    match state
        .board_service()
        .report_reply(&board, thread_id, reply_id)
        .await?
    {
        ReportOutcome::Reported => Ok(Json(MessageResponse::new(REPORTED))),
        ReportOutcome::NotFound => Err(ApiError::reply_not_found()),
    }
}
