#![allow(dead_code)]

use consult_portal::{
    AppConfig, AppState, InMemoryRepository,
    models::{NewUser, Role, User},
    password,
    repository::RepositoryState,
    session,
};
use std::sync::Arc;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// State backed by a fresh in-memory store and the default (test) config.
pub fn test_state() -> AppState {
    let repo: RepositoryState = Arc::new(InMemoryRepository::new());
    AppState {
        repo,
        config: AppConfig::default(),
    }
}

/// Inserts a user whose password is `TEST_PASSWORD`.
pub async fn seed_user(state: &AppState, email: &str, role: Role) -> User {
    let password_hash = password::hash_blocking(TEST_PASSWORD).expect("hash");
    state
        .repo
        .create_user(NewUser {
            name: email.split('@').next().unwrap_or("user").to_string(),
            email: email.to_string(),
            password_hash,
            role,
        })
        .await
        .expect("seed user")
}

/// A valid session token for `user`, signed with the state's secret.
pub fn token_for(state: &AppState, user: &User) -> String {
    session::issue_token(
        user.id,
        user.role,
        &state.config.jwt_secret,
        state.config.session_ttl_secs,
    )
    .expect("issue token")
}
