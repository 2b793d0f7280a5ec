use axum::http::{HeaderMap, HeaderValue, header};
use chrono::Utc;
use cookie::{Cookie, SameSite, time::Duration};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::{AppConfig, BootstrapAdmin, Env},
    error::{AppError, AppResult},
    models::{NewUser, Role, User},
    password,
    repository::RepositoryState,
};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// Claims
///
/// Payload of a session token. Signed with the configured secret (HS256) and validated on
/// every request that reads the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's id.
    pub sub: Uuid,
    /// Role at the time of issuance. The request gate trusts this without a store lookup.
    pub role: Role,
    /// Issued at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
}

/// Builds and signs a session token for `user`, valid for `ttl_secs`.
pub fn issue_token(user_id: Uuid, role: Role, secret: &str, ttl_secs: i64) -> AppResult<String> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role,
        iat: now,
        exp: now + ttl_secs,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("token signing failed: {e}")))
}

/// Verifies signature and expiry. Any failure (bad signature, malformed, expired) is `Unauthorized`.
pub fn decode_token(token: &str, secret: &str) -> AppResult<Claims> {
    let mut validation = Validation::default();
    validation.validate_exp = true;
    // Expiry is enforced to the second; the gate and the API must agree.
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!(error = ?e.kind(), "session token rejected");
        AppError::Unauthorized
    })
}

/// authenticate
///
/// The session issuer: looks up the user by email and checks the password.
///
/// Errors: `NotFound` when no user has this email, `InvalidCredential` when the password
/// does not match. Store failures propagate as-is.
///
/// An unknown email still pays for one argon2 verification, so both failures take as long.
pub async fn authenticate(repo: &RepositoryState, email: &str, plaintext: &str) -> AppResult<User> {
    let Some(user) = repo.get_user_by_email(email).await? else {
        password::verify(plaintext.to_string(), password::dummy_hash().await?).await?;
        return Err(AppError::NotFound);
    };

    if !password::verify(plaintext.to_string(), user.password_hash.clone()).await? {
        return Err(AppError::InvalidCredential);
    }
    Ok(user)
}

/// Pulls the raw session token out of a request: the `session` cookie wins over an
/// `Authorization: Bearer` header.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    cookie_token(headers).or_else(|| bearer_token(headers))
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE && !cookie.value().is_empty())
        .map(|cookie| cookie.value().to_string())
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// `Set-Cookie` value that stores the session token in the browser.
pub fn session_cookie(token: &str, config: &AppConfig) -> AppResult<HeaderValue> {
    let cookie = Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.env == Env::Production)
        .max_age(Duration::seconds(config.session_ttl_secs))
        .build();
    header_value(cookie)
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(config: &AppConfig) -> AppResult<HeaderValue> {
    let cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.env == Env::Production)
        .max_age(Duration::ZERO)
        .build();
    header_value(cookie)
}

fn header_value(cookie: Cookie<'_>) -> AppResult<HeaderValue> {
    HeaderValue::from_str(&cookie.to_string())
        .map_err(|e| AppError::Internal(format!("invalid cookie header: {e}")))
}

/// ensure_admin
///
/// Creates the configured bootstrap administrator unless the email is already registered.
/// Returns whether an account was created. An existing account is left as it is, role
/// included.
pub async fn ensure_admin(repo: &RepositoryState, admin: &BootstrapAdmin) -> AppResult<bool> {
    let email = admin.email.trim().to_lowercase();
    if repo.get_user_by_email(&email).await?.is_some() {
        return Ok(false);
    }

    let password_hash = password::hash(admin.password.clone()).await?;
    repo.create_user(NewUser {
        name: "Administrator".to_string(),
        email,
        password_hash,
        role: Role::Admin,
    })
    .await?;
    Ok(true)
}
