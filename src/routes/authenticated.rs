use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Authenticated Router Module
///
/// Routes for any signed-in user, CLIENT or ADMIN. Handlers receive the resolved `AuthUser`
/// and enforce record ownership themselves (owner, or owner-or-admin, per resource).
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // --- Account ---
        .route(
            "/api/me",
            get(handlers::account::get_me).put(handlers::account::update_me),
        )
        .route("/api/me/password", put(handlers::account::change_password))
        // --- Comments ---
        // Listing is public; writing needs a session.
        .route(
            "/api/articles/{id}/comments",
            post(handlers::comments::create_comment),
        )
        .route(
            "/api/comments/{id}",
            put(handlers::comments::update_comment).delete(handlers::comments::delete_comment),
        )
        // --- Inquiries ---
        .route(
            "/api/inquiries",
            get(handlers::inquiries::list_inquiries).post(handlers::inquiries::create_inquiry),
        )
        .route(
            "/api/inquiries/{id}",
            get(handlers::inquiries::get_inquiry)
                .put(handlers::inquiries::update_inquiry)
                .delete(handlers::inquiries::delete_inquiry),
        )
        // --- Consultations ---
        // Status changes are admin-only and live in the admin router.
        .route(
            "/api/consultations",
            get(handlers::consultations::list_consultations)
                .post(handlers::consultations::create_consultation),
        )
        .route(
            "/api/consultations/{id}",
            get(handlers::consultations::get_consultation)
                .put(handlers::consultations::update_consultation)
                .delete(handlers::consultations::delete_consultation),
        )
        // --- Messages ---
        .route(
            "/api/messages",
            get(handlers::messages::list_messages).post(handlers::messages::send_message),
        )
        .route(
            "/api/messages/{id}",
            get(handlers::messages::get_message).delete(handlers::messages::delete_message),
        )
        .route(
            "/api/messages/{id}/read",
            put(handlers::messages::mark_message_read),
        )
        // --- Protected client page ---
        .route("/client/dashboard", get(handlers::dashboard::client_dashboard))
}
