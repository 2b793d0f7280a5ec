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
    models::{
        Consultation, ConsultationStatus, CreateConsultationRequest, UpdateConsultationRequest,
        UpdateConsultationStatusRequest,
    },
    validation::ValidatedJson,
};

/// list_consultations
///
/// [Authenticated Route] A client's own bookings; every booking for an admin.
#[utoipa::path(
    get,
    path = "/api/consultations",
    responses(
        (status = 200, description = "Consultations visible to the caller", body = [Consultation]),
        (status = 401, description = "No session", body = ErrorBody)
    )
)]
pub async fn list_consultations(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Consultation>>> {
    let client = (!user.is_admin()).then_some(user.id);
    Ok(Json(state.repo.list_consultations(client).await?))
}

#[utoipa::path(
    get,
    path = "/api/consultations/{id}",
    params(("id" = Uuid, Path, description = "Consultation ID")),
    responses(
        (status = 200, description = "Consultation found", body = Consultation),
        (status = 403, description = "Not the client", body = ErrorBody),
        (status = 404, description = "Consultation not found", body = ErrorBody)
    )
)]
pub async fn get_consultation(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Consultation>> {
    let consultation = found(state.repo.get_consultation(id).await?)?;
    user.ensure_owner_or_admin(consultation.client_id)?;
    Ok(Json(consultation))
}

/// create_consultation
///
/// [Authenticated Route] Books a consultation for the caller. The slot must be in the
/// future; new bookings start as PENDING.
#[utoipa::path(
    post,
    path = "/api/consultations",
    request_body = CreateConsultationRequest,
    responses(
        (status = 201, description = "Consultation booked", body = Consultation),
        (status = 400, description = "Invalid payload", body = ErrorBody)
    )
)]
pub async fn create_consultation(
    user: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateConsultationRequest>,
) -> AppResult<(StatusCode, Json<Consultation>)> {
    let consultation = state.repo.create_consultation(payload, user.id).await?;
    tracing::info!(
        consultation_id = %consultation.id,
        client_id = %user.id,
        scheduled_for = %consultation.scheduled_for,
        "consultation booked"
    );
    Ok((StatusCode::CREATED, Json(consultation)))
}

/// update_consultation
///
/// [Authenticated Route] Reschedule or edit notes. Closed bookings (cancelled or completed)
/// are frozen.
#[utoipa::path(
    put,
    path = "/api/consultations/{id}",
    params(("id" = Uuid, Path, description = "Consultation ID")),
    request_body = UpdateConsultationRequest,
    responses(
        (status = 200, description = "Consultation updated", body = Consultation),
        (status = 400, description = "Consultation is closed", body = ErrorBody),
        (status = 403, description = "Not the client", body = ErrorBody),
        (status = 404, description = "Consultation not found", body = ErrorBody)
    )
)]
pub async fn update_consultation(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateConsultationRequest>,
) -> AppResult<Json<Consultation>> {
    let consultation = found(state.repo.get_consultation(id).await?)?;
    user.ensure_owner_or_admin(consultation.client_id)?;

    if matches!(
        consultation.status,
        ConsultationStatus::Cancelled | ConsultationStatus::Completed
    ) {
        return Err(AppError::BadRequest(format!(
            "consultation is {:?} and can no longer be changed",
            consultation.status
        )));
    }

    Ok(Json(found(state.repo.update_consultation(id, payload).await?)?))
}

/// set_consultation_status
///
/// [Admin Route] Moves a booking through PENDING, CONFIRMED, CANCELLED and COMPLETED.
#[utoipa::path(
    put,
    path = "/api/consultations/{id}/status",
    params(("id" = Uuid, Path, description = "Consultation ID")),
    request_body = UpdateConsultationStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = Consultation),
        (status = 403, description = "Not an admin", body = ErrorBody),
        (status = 404, description = "Consultation not found", body = ErrorBody)
    )
)]
pub async fn set_consultation_status(
    admin: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateConsultationStatusRequest>,
) -> AppResult<Json<Consultation>> {
    let consultation = found(state.repo.set_consultation_status(id, payload.status).await?)?;
    tracing::info!(
        consultation_id = %id,
        admin_id = %admin.id,
        status = ?consultation.status,
        "consultation status changed"
    );
    Ok(Json(consultation))
}

#[utoipa::path(
    delete,
    path = "/api/consultations/{id}",
    params(("id" = Uuid, Path, description = "Consultation ID")),
    responses(
        (status = 204, description = "Consultation deleted"),
        (status = 403, description = "Not the client", body = ErrorBody),
        (status = 404, description = "Consultation not found", body = ErrorBody)
    )
)]
pub async fn delete_consultation(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let consultation = found(state.repo.get_consultation(id).await?)?;
    user.ensure_owner_or_admin(consultation.client_id)?;

    deleted(state.repo.delete_consultation(id).await?)
}
