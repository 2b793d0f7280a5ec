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
    models::{Article, CreateArticleRequest, UpdateArticleRequest},
    validation::ValidatedJson,
};

#[utoipa::path(
    get,
    path = "/api/articles",
    responses((status = 200, description = "All articles, newest first", body = [Article]))
)]
pub async fn list_articles(State(state): State<AppState>) -> AppResult<Json<Vec<Article>>> {
    Ok(Json(state.repo.list_articles().await?))
}

#[utoipa::path(
    get,
    path = "/api/articles/{id}",
    params(("id" = Uuid, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Article found", body = Article),
        (status = 404, description = "Article not found", body = ErrorBody)
    )
)]
pub async fn get_article(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<Article>> {
    Ok(Json(found(state.repo.get_article(id).await?)?))
}

/// create_article
///
/// [Admin Route] Publishes an article authored by the caller.
#[utoipa::path(
    post,
    path = "/api/articles",
    request_body = CreateArticleRequest,
    responses(
        (status = 201, description = "Article created", body = Article),
        (status = 400, description = "Invalid payload", body = ErrorBody),
        (status = 403, description = "Not an admin", body = ErrorBody)
    )
)]
pub async fn create_article(
    author: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateArticleRequest>,
) -> AppResult<(StatusCode, Json<Article>)> {
    let article = state.repo.create_article(payload, author.id).await?;
    tracing::info!(article_id = %article.id, author_id = %author.id, "article created");
    Ok((StatusCode::CREATED, Json(article)))
}

#[utoipa::path(
    put,
    path = "/api/articles/{id}",
    params(("id" = Uuid, Path, description = "Article ID")),
    request_body = UpdateArticleRequest,
    responses(
        (status = 200, description = "Article updated", body = Article),
        (status = 404, description = "Article not found", body = ErrorBody)
    )
)]
pub async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateArticleRequest>,
) -> AppResult<Json<Article>> {
    Ok(Json(found(state.repo.update_article(id, payload).await?)?))
}

/// delete_article
///
/// [Admin Route] Also removes the article's comments.
#[utoipa::path(
    delete,
    path = "/api/articles/{id}",
    params(("id" = Uuid, Path, description = "Article ID")),
    responses(
        (status = 204, description = "Article deleted"),
        (status = 404, description = "Article not found", body = ErrorBody)
    )
)]
pub async fn delete_article(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    deleted(state.repo.delete_article(id).await?)
}
