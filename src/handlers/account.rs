use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};

use super::{found, normalize_email};
use crate::{
    AppState,
    auth::AuthUser,
    error::{AppError, AppResult, ErrorBody},
    models::{
        ChangePasswordRequest, LoginRequest, LoginResponse, NewUser, RegisterUserRequest, Role,
        UpdateProfileRequest, UserProfile,
    },
    password, session,
    validation::ValidatedJson,
};

/// register_user
///
/// [Public Page] Creates a user in the credential store. The role defaults to CLIENT;
/// ADMIN accounts can only be self-registered when `ALLOW_ADMIN_REGISTRATION` is on.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "Registered", body = UserProfile),
        (status = 400, description = "Invalid payload", body = ErrorBody),
        (status = 403, description = "Admin registration disabled", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterUserRequest>,
) -> AppResult<(StatusCode, Json<UserProfile>)> {
    let role = payload.role.unwrap_or_default();
    if role == Role::Admin && !state.config.allow_admin_registration {
        return Err(AppError::Forbidden);
    }

    let email = normalize_email(&payload.email);
    // Checked up front so a duplicate does not pay for a password hash; the store's
    // unique constraint still decides races.
    if state.repo.get_user_by_email(&email).await?.is_some() {
        return Err(AppError::AlreadyExists("user".to_string()));
    }

    let password_hash = password::hash(payload.password).await?;
    let user = state
        .repo
        .create_user(NewUser {
            name: payload.name.trim().to_string(),
            email,
            password_hash,
            role,
        })
        .await?;

    tracing::info!(user_id = %user.id, role = ?user.role, "user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// login
///
/// [Public Page] The session issuer's HTTP face. Unknown email and wrong password are
/// reported identically so the endpoint does not reveal which emails exist.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in; also sets the session cookie", body = LoginResponse),
        (status = 401, description = "Invalid email or password", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let email = normalize_email(&payload.email);

    let user = match session::authenticate(&state.repo, &email, &payload.password).await {
        Ok(user) => user,
        Err(AppError::NotFound | AppError::InvalidCredential) => {
            tracing::warn!(%email, "login failed");
            return Err(AppError::InvalidCredential);
        }
        Err(e) => return Err(e),
    };

    let token = session::issue_token(
        user.id,
        user.role,
        &state.config.jwt_secret,
        state.config.session_ttl_secs,
    )?;
    let cookie = session::session_cookie(&token, &state.config)?;

    tracing::info!(user_id = %user.id, %email, "login succeeded");
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// logout
///
/// Clears the session cookie. Tokens are not revoked; a copied bearer token stays valid
/// until it expires.
#[utoipa::path(
    post,
    path = "/logout",
    responses((status = 204, description = "Session cookie cleared"))
)]
pub async fn logout(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let cookie = session::clear_session_cookie(&state.config)?;
    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]))
}

/// get_me
///
/// [Authenticated Route] The caller's profile.
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 401, description = "No session", body = ErrorBody)
    )
)]
pub async fn get_me(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<UserProfile>> {
    let user = found(state.repo.get_user(id).await?)?;
    Ok(Json(user.into()))
}

/// update_me
///
/// [Authenticated Route] Partial profile update (name, email).
#[utoipa::path(
    put,
    path = "/api/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 409, description = "Email already registered", body = ErrorBody)
    )
)]
pub async fn update_me(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(mut payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<UserProfile>> {
    payload.name = payload.name.map(|name| name.trim().to_string());
    payload.email = payload.email.as_deref().map(normalize_email);

    let user = found(state.repo.update_user_profile(id, payload).await?)?;
    Ok(Json(user.into()))
}

/// change_password
///
/// [Authenticated Route] Replaces the password after verifying the current one. A wrong
/// current password is a 400 and leaves the stored hash untouched.
#[utoipa::path(
    put,
    path = "/api/me/password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Current password is incorrect", body = ErrorBody)
    )
)]
pub async fn change_password(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    let user = found(state.repo.get_user(id).await?)?;

    if !password::verify(payload.current_password, user.password_hash).await? {
        tracing::warn!(user_id = %id, "password change rejected: wrong current password");
        return Err(AppError::BadRequest("current password is incorrect".to_string()));
    }

    let new_hash = password::hash(payload.new_password).await?;
    if !state.repo.update_password_hash(id, new_hash).await? {
        return Err(AppError::NotFound);
    }

    tracing::info!(user_id = %id, "password changed");
    Ok(StatusCode::NO_CONTENT)
}

/// list_users
///
/// [Admin Route] Every registered user.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users", body = [UserProfile]),
        (status = 403, description = "Not an admin", body = ErrorBody)
    )
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserProfile>>> {
    let users = state.repo.list_users().await?;
    Ok(Json(users.into_iter().map(UserProfile::from).collect()))
}
