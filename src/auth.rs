use axum::{
    extract::{FromRef, FromRequestParts, OptionalFromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    error::{AppError, AppResult},
    models::Role,
    repository::RepositoryState,
    session,
};

/// AuthUser
///
/// The resolved identity of an authenticated request. Handlers take it as an argument;
/// its presence means the session token was valid and the user still exists.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    /// Current role, read from the store rather than the token so demotions apply immediately.
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Owner-or-admin check used before mutating a user-owned record.
    pub fn ensure_owner_or_admin(&self, owner_id: Uuid) -> AppResult<()> {
        if self.id == owner_id || self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    /// Strict ownership; administrators get no override.
    pub fn ensure_owner(&self, owner_id: Uuid) -> AppResult<()> {
        if self.id == owner_id {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

/// AuthUser Extractor Implementation
///
/// 1. Reuses an identity already resolved by `require_session`/`require_admin` on this request.
/// 2. Reads the token from the `session` cookie or `Authorization: Bearer`.
/// 3. Verifies signature and expiry.
/// 4. Looks the user up so deleted accounts lose access and role changes take effect.
///
/// Rejection: `Unauthorized` (401) on any failure except a store error, which is a 500.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);

        let token = session::token_from_headers(&parts.headers).ok_or(AppError::Unauthorized)?;
        let claims = session::decode_token(&token, &config.jwt_secret)?;

        let user = repo
            .get_user(claims.sub)
            .await?
            // A valid token for a user that no longer exists.
            .ok_or(AppError::Unauthorized)?;

        let auth_user = AuthUser {
            id: user.id,
            role: user.role,
        };
        parts.extensions.insert(auth_user.clone());
        Ok(auth_user)
    }
}

/// `Option<AuthUser>`: anonymous callers (no or invalid session) resolve to `None`.
/// Store failures still reject the request.
impl<S> OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Option<Self>, Self::Rejection> {
        match <AuthUser as FromRequestParts<S>>::from_request_parts(parts, state).await {
            Ok(user) => Ok(Some(user)),
            Err(AppError::Unauthorized) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// require_session
///
/// Route layer for the authenticated router: the `AuthUser` extractor rejects the request
/// with 401 before any handler runs. The resolved identity is stored in the request
/// extensions for the handler to reuse.
pub async fn require_session(user: AuthUser, mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(user);
    next.run(request).await
}

/// require_admin
///
/// Route layer for admin-only routes: 401 without a session, 403 for any role but ADMIN.
pub async fn require_admin(
    user: AuthUser,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !user.is_admin() {
        tracing::warn!(user_id = %user.id, path = %request.uri().path(), "admin route refused");
        return Err(AppError::Forbidden);
    }
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
