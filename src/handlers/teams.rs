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
    models::{CreateTeamRequest, Team, UpdateTeamRequest},
    validation::ValidatedJson,
};

/// list_teams
///
/// [Public Route] Team members in the order they were added.
#[utoipa::path(
    get,
    path = "/api/teams",
    responses((status = 200, description = "All team members", body = [Team]))
)]
pub async fn list_teams(State(state): State<AppState>) -> AppResult<Json<Vec<Team>>> {
    Ok(Json(state.repo.list_teams().await?))
}

#[utoipa::path(
    get,
    path = "/api/teams/{id}",
    params(("id" = Uuid, Path, description = "Team member ID")),
    responses(
        (status = 200, description = "Team member found", body = Team),
        (status = 404, description = "Team member not found", body = ErrorBody)
    )
)]
pub async fn get_team(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<Team>> {
    Ok(Json(found(state.repo.get_team(id).await?)?))
}

#[utoipa::path(
    post,
    path = "/api/teams",
    request_body = CreateTeamRequest,
    responses(
        (status = 201, description = "Team member created", body = Team),
        (status = 400, description = "Invalid payload", body = ErrorBody),
        (status = 401, description = "No session", body = ErrorBody),
        (status = 403, description = "Not an admin", body = ErrorBody)
    )
)]
pub async fn create_team(
    AuthUser { id: created_by, .. }: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateTeamRequest>,
) -> AppResult<(StatusCode, Json<Team>)> {
    let team = state.repo.create_team(payload, created_by).await?;
    Ok((StatusCode::CREATED, Json(team)))
}

#[utoipa::path(
    put,
    path = "/api/teams/{id}",
    params(("id" = Uuid, Path, description = "Team member ID")),
    request_body = UpdateTeamRequest,
    responses(
        (status = 200, description = "Team member updated", body = Team),
        (status = 404, description = "Team member not found", body = ErrorBody)
    )
)]
pub async fn update_team(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateTeamRequest>,
) -> AppResult<Json<Team>> {
    Ok(Json(found(state.repo.update_team(id, payload).await?)?))
}

#[utoipa::path(
    delete,
    path = "/api/teams/{id}",
    params(("id" = Uuid, Path, description = "Team member ID")),
    responses(
        (status = 204, description = "Team member deleted"),
        (status = 404, description = "Team member not found", body = ErrorBody)
    )
)]
pub async fn delete_team(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    deleted(state.repo.delete_team(id).await?)
}
