//! Resource handlers.
//!
//! Each handler validates its input (`ValidatedJson`), relies on the route layer or the
//! `AuthUser` extractor for authentication, performs one logical store operation and maps
//! the outcome to JSON. Ownership checks that need the stored record happen here.

use axum::http::StatusCode;

use crate::error::{AppError, AppResult};

pub mod account;
pub mod articles;
pub mod comments;
pub mod consultations;
pub mod contacts;
pub mod dashboard;
pub mod inquiries;
pub mod messages;
pub mod pages;
pub mod stories;
pub mod teams;

/// `None` from the store becomes a 404.
pub(crate) fn found<T>(record: Option<T>) -> AppResult<T> {
    record.ok_or(AppError::NotFound)
}

/// 204 when a row was removed, 404 when there was nothing to remove (repeat deletes included).
pub(crate) fn deleted(removed: bool) -> AppResult<StatusCode> {
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

/// Emails are compared case-insensitively; they are stored trimmed and lowercased.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
