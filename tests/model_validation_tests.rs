use axum::{http::StatusCode, response::IntoResponse};
use chrono::{Duration, Utc};
use consult_portal::{
    AppError,
    models::{
        ConsultationStatus, CreateConsultationRequest, CreateContactRequest, CreateStoryRequest,
        RegisterUserRequest, Role, UpdateStoryRequest, User, UserProfile,
    },
    validation::Validate,
};
use uuid::Uuid;

fn failing_fields(result: Result<(), AppError>) -> Vec<String> {
    match result {
        Err(AppError::Validation(errors)) => errors.into_iter().map(|e| e.field).collect(),
        other => panic!("expected a validation error, got {other:?}"),
    }
}

// --- Wire format ---

#[test]
fn test_enums_serialize_uppercase() {
    assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""ADMIN""#);
    assert_eq!(serde_json::to_string(&Role::Client).unwrap(), r#""CLIENT""#);
    assert_eq!(
        serde_json::from_str::<ConsultationStatus>(r#""CONFIRMED""#).unwrap(),
        ConsultationStatus::Confirmed
    );
    assert!(serde_json::from_str::<Role>(r#""SUPERUSER""#).is_err());
}

#[test]
fn test_user_profile_never_carries_the_hash() {
    let user = User {
        id: Uuid::new_v4(),
        name: "Jane".to_string(),
        email: "jane@example.com".to_string(),
        password_hash: "$argon2id$v=19$secret".to_string(),
        role: Role::Client,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let json = serde_json::to_string(&UserProfile::from(user)).unwrap();
    assert!(!json.contains("argon2"));
    assert!(json.contains(r#""createdAt""#));
    assert!(json.contains(r#""role":"CLIENT""#));
}

#[test]
fn test_register_request_role_is_optional() {
    let req: RegisterUserRequest = serde_json::from_str(
        r#"{"name":"Jane","email":"jane@example.com","password":"long-enough"}"#,
    )
    .unwrap();
    assert_eq!(req.role, None);
    assert!(req.validate().is_ok());
}

#[test]
fn test_update_request_omits_absent_fields() {
    let partial = UpdateStoryRequest {
        title: Some("New Title Only".to_string()),
        ..Default::default()
    };

    let json = serde_json::to_string(&partial).unwrap();
    assert!(json.contains(r#""title":"New Title Only""#));
    assert!(!json.contains("content"));
    assert!(!json.contains("imageUrl"));
}

// --- Validation ---

#[test]
fn test_register_validation_reports_every_field() {
    let req = RegisterUserRequest {
        name: "   ".to_string(),
        email: "not-an-email".to_string(),
        password: "short".to_string(),
        role: Some(Role::Client),
    };

    assert_eq!(failing_fields(req.validate()), ["name", "email", "password"]);
}

#[test]
fn test_story_validation() {
    let ok = CreateStoryRequest {
        title: "Title".to_string(),
        content: "Body".to_string(),
        image_url: Some("/uploads/a.png".to_string()),
    };
    assert!(ok.validate().is_ok());

    let bad = CreateStoryRequest {
        title: "x".repeat(201),
        content: String::new(),
        image_url: Some("javascript:alert(1)".to_string()),
    };
    assert_eq!(failing_fields(bad.validate()), ["title", "content", "imageUrl"]);
}

#[test]
fn test_consultation_must_be_in_the_future() {
    let past = CreateConsultationRequest {
        topic: "Check-up".to_string(),
        scheduled_for: Utc::now() - Duration::hours(1),
        notes: None,
    };
    assert_eq!(failing_fields(past.validate()), ["scheduledFor"]);

    let future = CreateConsultationRequest {
        scheduled_for: Utc::now() + Duration::hours(1),
        ..past
    };
    assert!(future.validate().is_ok());
}

#[test]
fn test_contact_phone_validation() {
    let mut req = CreateContactRequest {
        name: "Visitor".to_string(),
        email: " visitor@example.com ".to_string(),
        phone: Some("+44 20 7946 0958".to_string()),
        message: "Hello".to_string(),
    };
    assert!(req.validate().is_ok());

    req.phone = Some("call me maybe".to_string());
    assert_eq!(failing_fields(req.validate()), ["phone"]);
}

// --- Error responses ---

#[test]
fn test_error_status_mapping() {
    let cases = [
        (AppError::field("title", "must not be empty"), StatusCode::BAD_REQUEST),
        (AppError::BadRequest("nope".into()), StatusCode::BAD_REQUEST),
        (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
        (AppError::InvalidCredential, StatusCode::UNAUTHORIZED),
        (AppError::Forbidden, StatusCode::FORBIDDEN),
        (AppError::NotFound, StatusCode::NOT_FOUND),
        (AppError::AlreadyExists("user".into()), StatusCode::CONFLICT),
        (AppError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
    ];

    for (error, status) in cases {
        assert_eq!(error.into_response().status(), status);
    }
}

#[tokio::test]
async fn test_error_body_shape_hides_internal_details() {
    let response = AppError::Internal("db password is hunter2".into()).into_response();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["error"], "INTERNAL_ERROR");
    assert!(!body.to_string().contains("hunter2"));

    let response = AppError::field("email", "must be a valid email address").into_response();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(body["details"][0]["field"], "email");
}
