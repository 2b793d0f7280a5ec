use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints open to anonymous visitors. `GET`/`POST` on `/login` and `/register` still pass
/// through the request gate, which sends signed-in visitors to their home page.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // Liveness probe for load balancers.
        .route("/health", get(|| async { "ok" }))
        // --- Public pages and the session issuer ---
        .route(
            "/login",
            get(handlers::pages::login_page).post(handlers::account::login),
        )
        .route(
            "/register",
            get(handlers::pages::register_page).post(handlers::account::register_user),
        )
        .route("/logout", post(handlers::account::logout))
        // --- Published content (read-only) ---
        .route("/api/stories", get(handlers::stories::list_stories))
        .route("/api/stories/{id}", get(handlers::stories::get_story))
        .route("/api/articles", get(handlers::articles::list_articles))
        .route("/api/articles/{id}", get(handlers::articles::get_article))
        .route(
            "/api/articles/{id}/comments",
            get(handlers::comments::list_comments),
        )
        .route("/api/teams", get(handlers::teams::list_teams))
        .route("/api/teams/{id}", get(handlers::teams::get_team))
        // POST /api/contacts
        // Anonymous submissions are accepted; a session, when present, links the record.
        .route("/api/contacts", post(handlers::contacts::submit_contact))
}
