use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use super::{deleted, found, normalize_email};
use crate::{
    AppState,
    auth::AuthUser,
    error::{AppResult, ErrorBody},
    models::{Contact, CreateContactRequest},
    validation::ValidatedJson,
};

/// submit_contact
///
/// [Public Route] The contact form. Visitors may submit anonymously; a signed-in user's
/// submission is linked to their account.
#[utoipa::path(
    post,
    path = "/api/contacts",
    request_body = CreateContactRequest,
    responses(
        (status = 201, description = "Contact form received", body = Contact),
        (status = 400, description = "Invalid payload", body = ErrorBody)
    )
)]
pub async fn submit_contact(
    user: Option<AuthUser>,
    State(state): State<AppState>,
    ValidatedJson(mut payload): ValidatedJson<CreateContactRequest>,
) -> AppResult<(StatusCode, Json<Contact>)> {
    payload.email = normalize_email(&payload.email);
    let contact = state
        .repo
        .create_contact(payload, user.map(|u| u.id))
        .await?;
    tracing::info!(contact_id = %contact.id, linked = contact.user_id.is_some(), "contact form received");
    Ok((StatusCode::CREATED, Json(contact)))
}

#[utoipa::path(
    get,
    path = "/api/contacts",
    responses(
        (status = 200, description = "All contact submissions", body = [Contact]),
        (status = 403, description = "Not an admin", body = ErrorBody)
    )
)]
pub async fn list_contacts(State(state): State<AppState>) -> AppResult<Json<Vec<Contact>>> {
    Ok(Json(state.repo.list_contacts().await?))
}

#[utoipa::path(
    get,
    path = "/api/contacts/{id}",
    params(("id" = Uuid, Path, description = "Contact ID")),
    responses(
        (status = 200, description = "Contact found", body = Contact),
        (status = 404, description = "Contact not found", body = ErrorBody)
    )
)]
pub async fn get_contact(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<Contact>> {
    Ok(Json(found(state.repo.get_contact(id).await?)?))
}

#[utoipa::path(
    delete,
    path = "/api/contacts/{id}",
    params(("id" = Uuid, Path, description = "Contact ID")),
    responses(
        (status = 204, description = "Contact deleted"),
        (status = 404, description = "Contact not found", body = ErrorBody)
    )
)]
pub async fn delete_contact(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    deleted(state.repo.delete_contact(id).await?)
}
