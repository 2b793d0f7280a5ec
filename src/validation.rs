use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use crate::error::{AppError, FieldError};

/// Validate
///
/// Field-level checks run on every request payload after deserialization.
/// Implementations push one `FieldError` per failing field and never stop early,
/// so the client sees every problem at once.
pub trait Validate {
    fn check(&self, errors: &mut Vec<FieldError>);

    fn validate(&self) -> Result<(), AppError> {
        let mut errors = Vec::new();
        self.check(&mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

/// ValidatedJson
///
/// Drop-in replacement for `Json<T>` that rejects malformed bodies and failed
/// `Validate` checks with a 400 `VALIDATION_ERROR` instead of axum's plain-text 422.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        value.validate()?;
        Ok(Self(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    AppError::Validation(vec![FieldError::new("body", rejection.body_text())])
}

// --- Field checks ---

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_TEXT_LEN: usize = 10_000;
pub const MAX_EMAIL_LEN: usize = 254;
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;

/// Non-blank text of at most `max` characters.
pub fn required_text(errors: &mut Vec<FieldError>, field: &str, value: &str, max: usize) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "must not be empty"));
    } else if value.chars().count() > max {
        errors.push(FieldError::new(field, format!("must be at most {max} characters")));
    }
}

/// Same as `required_text`, but only when the field was supplied.
pub fn optional_text(errors: &mut Vec<FieldError>, field: &str, value: Option<&str>, max: usize) {
    if let Some(value) = value {
        required_text(errors, field, value, max);
    }
}

/// Surrounding whitespace is ignored; handlers store the trimmed, lowercased form.
pub fn email(errors: &mut Vec<FieldError>, field: &str, value: &str) {
    let value = value.trim();
    if value.chars().count() > MAX_EMAIL_LEN || !looks_like_email(value) {
        errors.push(FieldError::new(field, "must be a valid email address"));
    }
}

pub fn password(errors: &mut Vec<FieldError>, field: &str, value: &str) {
    let len = value.chars().count();
    if len < MIN_PASSWORD_LEN {
        errors.push(FieldError::new(
            field,
            format!("must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    } else if len > MAX_PASSWORD_LEN {
        errors.push(FieldError::new(
            field,
            format!("must be at most {MAX_PASSWORD_LEN} characters"),
        ));
    }
}

/// Absolute http(s) URL or a site-relative path.
pub fn optional_url(errors: &mut Vec<FieldError>, field: &str, value: Option<&str>) {
    let Some(value) = value else { return };
    let ok = value.starts_with("https://")
        || value.starts_with("http://")
        || (value.starts_with('/') && !value.starts_with("//"));
    if !ok || value.chars().any(char::is_whitespace) {
        errors.push(FieldError::new(field, "must be an http(s) URL or a path starting with '/'"));
    }
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.chars().any(char::is_whitespace)
}
