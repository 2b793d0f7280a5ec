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
    models::{Comment, CommentRequest},
    validation::ValidatedJson,
};

/// list_comments
///
/// [Public Route] Oldest first. 404 when the article does not exist, so an empty list always
/// means "no comments yet".
#[utoipa::path(
    get,
    path = "/api/articles/{id}/comments",
    params(("id" = Uuid, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Comments on the article", body = [Comment]),
        (status = 404, description = "Article not found", body = ErrorBody)
    )
)]
pub async fn list_comments(
    State(state): State<AppState>,
    Path(article_id): Path<Uuid>,
) -> AppResult<Json<Vec<Comment>>> {
    found(state.repo.get_article(article_id).await?)?;
    Ok(Json(state.repo.list_comments(article_id).await?))
}

/// create_comment
///
/// [Authenticated Route] Any signed-in user may comment.
#[utoipa::path(
    post,
    path = "/api/articles/{id}/comments",
    params(("id" = Uuid, Path, description = "Article ID")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment created", body = Comment),
        (status = 404, description = "Article not found", body = ErrorBody)
    )
)]
pub async fn create_comment(
    author: AuthUser,
    State(state): State<AppState>,
    Path(article_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CommentRequest>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    found(state.repo.get_article(article_id).await?)?;
    let comment = state
        .repo
        .create_comment(article_id, author.id, payload.content)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// update_comment
///
/// [Authenticated Route] Only the author may edit a comment.
#[utoipa::path(
    put,
    path = "/api/comments/{id}",
    params(("id" = Uuid, Path, description = "Comment ID")),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Comment updated", body = Comment),
        (status = 403, description = "Not the author", body = ErrorBody),
        (status = 404, description = "Comment not found", body = ErrorBody)
    )
)]
pub async fn update_comment(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CommentRequest>,
) -> AppResult<Json<Comment>> {
    let comment = found(state.repo.get_comment(id).await?)?;
    user.ensure_owner(comment.author_id)?;

    Ok(Json(found(state.repo.update_comment(id, payload.content).await?)?))
}

/// delete_comment
///
/// [Authenticated Route] The author or an admin (moderation).
#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    params(("id" = Uuid, Path, description = "Comment ID")),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 403, description = "Neither author nor admin", body = ErrorBody),
        (status = 404, description = "Comment not found", body = ErrorBody)
    )
)]
pub async fn delete_comment(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let comment = found(state.repo.get_comment(id).await?)?;
    user.ensure_owner_or_admin(comment.author_id)?;

    deleted(state.repo.delete_comment(id).await?)
}
