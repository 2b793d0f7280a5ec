//! Request gate for the page routes.
//!
//! Every request first goes through [`request_gate`]. Paths outside the gate's matcher
//! (API, health, docs) pass straight through; gated paths are allowed or redirected
//! according to [`decide`]. The gate never produces an error body.

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use uuid::Uuid;

use crate::{AppState, models::Role, session};

pub const LOGIN_PATH: &str = "/login";

/// Pages open to visitors without a session. Exact match.
pub const PUBLIC_PATHS: &[&str] = &[LOGIN_PATH, "/register"];

const ADMIN_AREA: &str = "/admin";
const CLIENT_AREA: &str = "/client";

/// Classification of a gated path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    Public,
    ProtectedClient,
    ProtectedAdmin,
}

/// The session as the gate sees it: taken from the verified token, no store lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateSession {
    pub user_id: Uuid,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Redirect(&'static str),
}

/// Returns `None` for paths the gate does not handle.
pub fn classify(path: &str) -> Option<PathClass> {
    if PUBLIC_PATHS.contains(&path) {
        Some(PathClass::Public)
    } else if in_area(path, ADMIN_AREA) {
        Some(PathClass::ProtectedAdmin)
    } else if in_area(path, CLIENT_AREA) {
        Some(PathClass::ProtectedClient)
    } else {
        None
    }
}

// `/admin` and `/admin/...`, but not `/administrator`.
fn in_area(path: &str, area: &str) -> bool {
    path.strip_prefix(area)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// decide
///
/// The gate's transition table, evaluated in order:
/// 1. public path with a session: go to the role's home,
/// 2. protected path without a session: go to the login page,
/// 3. admin area with a non-admin session: go to the client home,
/// 4. otherwise allow.
pub fn decide(class: PathClass, session: Option<GateSession>) -> GateDecision {
    match (class, session) {
        (PathClass::Public, Some(session)) => GateDecision::Redirect(session.role.home_path()),
        (PathClass::Public, None) => GateDecision::Allow,
        (_, None) => GateDecision::Redirect(LOGIN_PATH),
        (PathClass::ProtectedAdmin, Some(session)) if session.role != Role::Admin => {
            GateDecision::Redirect(Role::Client.home_path())
        }
        _ => GateDecision::Allow,
    }
}

/// Reads the session for the gate. Every failure is "no session" (fail-closed).
pub fn read_session(request: &Request, secret: &str) -> Option<GateSession> {
    let token = session::token_from_headers(request.headers())?;
    session::decode_token(&token, secret)
        .ok()
        .map(|claims| GateSession {
            user_id: claims.sub,
            role: claims.role,
        })
}

/// 307 keeps the method, which is right for page loads. A form post (say `POST /login`
/// with a live session) gets 303 instead, so the browser follows with a GET.
pub fn redirect(method: &Method, location: &'static str) -> Response {
    if method == Method::GET || method == Method::HEAD {
        Redirect::temporary(location).into_response()
    } else {
        Redirect::to(location).into_response()
    }
}

/// request_gate
///
/// Middleware applied to the whole router. See [`redirect`] for the status used.
pub async fn request_gate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(class) = classify(request.uri().path()) else {
        return next.run(request).await;
    };

    let session = read_session(&request, &state.config.jwt_secret);

    match decide(class, session) {
        GateDecision::Allow => next.run(request).await,
        GateDecision::Redirect(location) => {
            tracing::debug!(
                path = %request.uri().path(),
                ?class,
                user_id = ?session.map(|s| s.user_id),
                %location,
                "gate redirect"
            );
            redirect(request.method(), location)
        }
    }
}
