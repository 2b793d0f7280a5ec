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
    models::{CreateStoryRequest, Story, UpdateStoryRequest},
    validation::ValidatedJson,
};

/// list_stories
///
/// [Public Route] Newest first.
#[utoipa::path(
    get,
    path = "/api/stories",
    responses((status = 200, description = "All stories", body = [Story]))
)]
pub async fn list_stories(State(state): State<AppState>) -> AppResult<Json<Vec<Story>>> {
    Ok(Json(state.repo.list_stories().await?))
}

#[utoipa::path(
    get,
    path = "/api/stories/{id}",
    params(("id" = Uuid, Path, description = "Story ID")),
    responses(
        (status = 200, description = "Story found", body = Story),
        (status = 404, description = "Story not found", body = ErrorBody)
    )
)]
pub async fn get_story(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<Story>> {
    Ok(Json(found(state.repo.get_story(id).await?)?))
}

/// create_story
///
/// [Admin Route] The caller becomes the story's author.
#[utoipa::path(
    post,
    path = "/api/stories",
    request_body = CreateStoryRequest,
    responses(
        (status = 201, description = "Story created", body = Story),
        (status = 400, description = "Invalid payload", body = ErrorBody),
        (status = 403, description = "Not an admin", body = ErrorBody)
    )
)]
#[tracing::instrument(skip_all, fields(author_id = %author.id))]
pub async fn create_story(
    author: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateStoryRequest>,
) -> AppResult<(StatusCode, Json<Story>)> {
    let story = state.repo.create_story(payload, author.id).await?;
    tracing::info!(story_id = %story.id, "story created");
    Ok((StatusCode::CREATED, Json(story)))
}

#[utoipa::path(
    put,
    path = "/api/stories/{id}",
    params(("id" = Uuid, Path, description = "Story ID")),
    request_body = UpdateStoryRequest,
    responses(
        (status = 200, description = "Story updated", body = Story),
        (status = 404, description = "Story not found", body = ErrorBody)
    )
)]
pub async fn update_story(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateStoryRequest>,
) -> AppResult<Json<Story>> {
    Ok(Json(found(state.repo.update_story(id, payload).await?)?))
}

#[utoipa::path(
    delete,
    path = "/api/stories/{id}",
    params(("id" = Uuid, Path, description = "Story ID")),
    responses(
        (status = 204, description = "Story deleted"),
        (status = 404, description = "Story not found", body = ErrorBody)
    )
)]
pub async fn delete_story(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    deleted(state.repo.delete_story(id).await?)
}
