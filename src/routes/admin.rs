use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Admin Router Module
///
/// Content management and moderation. The whole router is wrapped in `require_admin`, so
/// handlers here can assume an ADMIN caller.
///
/// Paths shared with the public router (e.g. `/api/stories/{id}`) are merged per method:
/// `GET` stays public, `PUT`/`DELETE` land here.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // --- Protected admin page ---
        .route("/admin/dashboard", get(handlers::dashboard::admin_dashboard))
        .route("/api/users", get(handlers::account::list_users))
        // --- Content management ---
        .route("/api/stories", post(handlers::stories::create_story))
        .route(
            "/api/stories/{id}",
            put(handlers::stories::update_story).delete(handlers::stories::delete_story),
        )
        .route("/api/articles", post(handlers::articles::create_article))
        .route(
            "/api/articles/{id}",
            put(handlers::articles::update_article).delete(handlers::articles::delete_article),
        )
        .route("/api/teams", post(handlers::teams::create_team))
        .route(
            "/api/teams/{id}",
            put(handlers::teams::update_team).delete(handlers::teams::delete_team),
        )
        // --- Moderation ---
        .route(
            "/api/consultations/{id}/status",
            put(handlers::consultations::set_consultation_status),
        )
        .route("/api/contacts", get(handlers::contacts::list_contacts))
        .route(
            "/api/contacts/{id}",
            get(handlers::contacts::get_contact).delete(handlers::contacts::delete_contact),
        )
}
