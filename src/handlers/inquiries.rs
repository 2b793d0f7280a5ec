//! Inquiries: questions a signed-in client sends to the practice.
//!
//! Clients only ever see their own inquiries; administrators see all of them.

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
    error::{AppResult, ErrorBody},
    models::{CreateInquiryRequest, Inquiry, UpdateInquiryRequest},
    validation::ValidatedJson,
};

#[utoipa::path(
    get,
    path = "/api/inquiries",
    responses(
        (status = 200, description = "The caller's inquiries (all of them for an admin)", body = [Inquiry]),
        (status = 401, description = "No session", body = ErrorBody)
    )
)]
pub async fn list_inquiries(user: AuthUser, State(state): State<AppState>) -> AppResult<Json<Vec<Inquiry>>> {
    let sender = (!user.is_admin()).then_some(user.id);
    Ok(Json(state.repo.list_inquiries(sender).await?))
}

#[utoipa::path(
    get,
    path = "/api/inquiries/{id}",
    params(("id" = Uuid, Path, description = "Inquiry ID")),
    responses(
        (status = 200, description = "Inquiry found", body = Inquiry),
        (status = 403, description = "Not the sender", body = ErrorBody),
        (status = 404, description = "Inquiry not found", body = ErrorBody)
    )
)]
pub async fn get_inquiry(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Inquiry>> {
    let inquiry = found(state.repo.get_inquiry(id).await?)?;
    user.ensure_owner_or_admin(inquiry.sender_id)?;
    Ok(Json(inquiry))
}

#[utoipa::path(
    post,
    path = "/api/inquiries",
    request_body = CreateInquiryRequest,
    responses(
        (status = 201, description = "Inquiry created", body = Inquiry),
        (status = 400, description = "Invalid payload", body = ErrorBody)
    )
)]
pub async fn create_inquiry(
    user: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateInquiryRequest>,
) -> AppResult<(StatusCode, Json<Inquiry>)> {
    let inquiry = state.repo.create_inquiry(payload, user.id).await?;
    tracing::info!(inquiry_id = %inquiry.id, sender_id = %user.id, "inquiry submitted");
    Ok((StatusCode::CREATED, Json(inquiry)))
}

#[utoipa::path(
    put,
    path = "/api/inquiries/{id}",
    params(("id" = Uuid, Path, description = "Inquiry ID")),
    request_body = UpdateInquiryRequest,
    responses(
        (status = 200, description = "Inquiry updated", body = Inquiry),
        (status = 403, description = "Not the sender", body = ErrorBody),
        (status = 404, description = "Inquiry not found", body = ErrorBody)
    )
)]
pub async fn update_inquiry(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateInquiryRequest>,
) -> AppResult<Json<Inquiry>> {
    let inquiry = found(state.repo.get_inquiry(id).await?)?;
    user.ensure_owner_or_admin(inquiry.sender_id)?;

    Ok(Json(found(state.repo.update_inquiry(id, payload).await?)?))
}

#[utoipa::path(
    delete,
    path = "/api/inquiries/{id}",
    params(("id" = Uuid, Path, description = "Inquiry ID")),
    responses(
        (status = 204, description = "Inquiry deleted"),
        (status = 403, description = "Not the sender", body = ErrorBody),
        (status = 404, description = "Inquiry not found", body = ErrorBody)
    )
)]
pub async fn delete_inquiry(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let inquiry = found(state.repo.get_inquiry(id).await?)?;
    user.ensure_owner_or_admin(inquiry.sender_id)?;

    deleted(state.repo.delete_inquiry(id).await?)
}
