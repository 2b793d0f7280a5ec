use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use super::{deleted, found};
use crate::{
    AppState,
    auth::AuthUser,
    error::{AppError, AppResult, ErrorBody},
    models::{CreateMessageRequest, Message},
    validation::ValidatedJson,
};

/// list_messages
///
/// [Authenticated Route] Messages the caller sent or received, newest first.
#[utoipa::path(
    get,
    path = "/api/messages",
    responses(
        (status = 200, description = "The caller's messages", body = [Message]),
        (status = 401, description = "No session", body = ErrorBody)
    )
)]
pub async fn list_messages(user: AuthUser, State(state): State<AppState>) -> AppResult<Json<Vec<Message>>> {
    Ok(Json(state.repo.list_messages(user.id).await?))
}

/// get_message
///
/// [Authenticated Route] Readable by either participant and by admins.
#[utoipa::path(
    get,
    path = "/api/messages/{id}",
    params(("id" = Uuid, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Message found", body = Message),
        (status = 403, description = "Not a participant", body = ErrorBody),
        (status = 404, description = "Message not found", body = ErrorBody)
    )
)]
pub async fn get_message(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Message>> {
    let message = found(state.repo.get_message(id).await?)?;
    if message.recipient_id != user.id {
        user.ensure_owner_or_admin(message.sender_id)?;
    }
    Ok(Json(message))
}

/// send_message
///
/// [Authenticated Route] 404 when the recipient does not exist.
#[utoipa::path(
    post,
    path = "/api/messages",
    request_body = CreateMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = Message),
        (status = 400, description = "Invalid payload", body = ErrorBody),
        (status = 404, description = "Recipient not found", body = ErrorBody)
    )
)]
pub async fn send_message(
    sender: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateMessageRequest>,
) -> AppResult<(StatusCode, Json<Message>)> {
    if payload.recipient_id == sender.id {
        return Err(AppError::field("recipientId", "cannot message yourself"));
    }
    found(state.repo.get_user(payload.recipient_id).await?)?;

    let message = state.repo.create_message(payload, sender.id).await?;
    tracing::debug!(message_id = %message.id, sender_id = %sender.id, "message sent");
    Ok((StatusCode::CREATED, Json(message)))
}

/// mark_message_read
///
/// [Authenticated Route] Only the recipient can mark a message as read. Idempotent.
#[utoipa::path(
    put,
    path = "/api/messages/{id}/read",
    params(("id" = Uuid, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Message marked as read", body = Message),
        (status = 403, description = "Not the recipient", body = ErrorBody),
        (status = 404, description = "Message not found", body = ErrorBody)
    )
)]
pub async fn mark_message_read(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Message>> {
    let message = found(state.repo.get_message(id).await?)?;
    user.ensure_owner(message.recipient_id)?;

    Ok(Json(found(state.repo.mark_message_read(id).await?)?))
}

/// delete_message
///
/// [Authenticated Route] The sender or an admin.
#[utoipa::path(
    delete,
    path = "/api/messages/{id}",
    params(("id" = Uuid, Path, description = "Message ID")),
    responses(
        (status = 204, description = "Message deleted"),
        (status = 403, description = "Not the sender", body = ErrorBody),
        (status = 404, description = "Message not found", body = ErrorBody)
    )
)]
pub async fn delete_message(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let message = found(state.repo.get_message(id).await?)?;
    user.ensure_owner_or_admin(message.sender_id)?;

    deleted(state.repo.delete_message(id).await?)
}
