//! Handlers called directly against the in-memory store, without the router.

mod common;

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::{Duration, Utc};
use common::{TEST_PASSWORD, seed_user, test_state};
use consult_portal::{
    AppError, AppState,
    auth::AuthUser,
    handlers,
    models::{
        ChangePasswordRequest, CommentRequest, ConsultationStatus, CreateArticleRequest,
        CreateConsultationRequest, CreateContactRequest, CreateInquiryRequest,
        CreateMessageRequest, CreateStoryRequest, CreateTeamRequest, LoginRequest,
        RegisterUserRequest, Role,
        UpdateConsultationRequest, UpdateConsultationStatusRequest, UpdateStoryRequest,
        UpdateTeamRequest, User,
    },
    password,
    validation::ValidatedJson,
};
use uuid::Uuid;

fn as_auth(user: &User) -> AuthUser {
    AuthUser {
        id: user.id,
        role: user.role,
    }
}

fn register_request(email: &str, role: Option<Role>) -> RegisterUserRequest {
    RegisterUserRequest {
        name: "Jane Doe".to_string(),
        email: email.to_string(),
        password: "a-long-password".to_string(),
        role,
    }
}

async fn seed_article(state: &AppState, admin: &User) -> Uuid {
    let (_, Json(article)) = handlers::articles::create_article(
        as_auth(admin),
        State(state.clone()),
        ValidatedJson(CreateArticleRequest {
            title: "Sleep hygiene".to_string(),
            content: "Keep a schedule.".to_string(),
            ..Default::default()
        }),
    )
    .await
    .unwrap();
    article.id
}

// --- Registration & login ---

#[tokio::test]
async fn test_register_defaults_to_client_and_hides_password() {
    let state = test_state();

    let (status, Json(profile)) = handlers::account::register_user(
        State(state.clone()),
        ValidatedJson(register_request("  Jane@Example.COM ", None)),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(profile.role, Role::Client);
    assert_eq!(profile.email, "jane@example.com");

    let body = serde_json::to_value(&profile).unwrap();
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());

    let stored = state.repo.get_user(profile.id).await.unwrap().unwrap();
    assert_ne!(stored.password_hash, "a-long-password");
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let state = test_state();
    seed_user(&state, "jane@example.com", Role::Client).await;

    let result = handlers::account::register_user(
        State(state.clone()),
        ValidatedJson(register_request("JANE@example.com", None)),
    )
    .await;

    let err = result.unwrap_err();
    assert!(matches!(err, AppError::AlreadyExists(_)));
    assert_eq!(err.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_admin_registration_respects_flag() {
    let mut state = test_state();
    state.config.allow_admin_registration = false;

    let refused = handlers::account::register_user(
        State(state.clone()),
        ValidatedJson(register_request("boss@example.com", Some(Role::Admin))),
    )
    .await;
    assert!(matches!(refused, Err(AppError::Forbidden)));

    state.config.allow_admin_registration = true;
    let (_, Json(profile)) = handlers::account::register_user(
        State(state.clone()),
        ValidatedJson(register_request("boss@example.com", Some(Role::Admin))),
    )
    .await
    .unwrap();
    assert_eq!(profile.role, Role::Admin);
}

#[tokio::test]
async fn test_login_sets_cookie_and_hides_which_field_was_wrong() {
    let state = test_state();
    seed_user(&state, "client@example.com", Role::Client).await;

    let response = handlers::account::login(
        State(state.clone()),
        ValidatedJson(LoginRequest {
            email: "Client@Example.com".to_string(),
            password: TEST_PASSWORD.to_string(),
        }),
    )
    .await
    .unwrap()
    .into_response();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response.headers().get(header::SET_COOKIE).unwrap();
    assert!(cookie.to_str().unwrap().starts_with("session="));

    let wrong_password = handlers::account::login(
        State(state.clone()),
        ValidatedJson(LoginRequest {
            email: "client@example.com".to_string(),
            password: "nope-nope-nope".to_string(),
        }),
    )
    .await
    .err()
    .expect("wrong password is rejected");
    let unknown_email = handlers::account::login(
        State(state.clone()),
        ValidatedJson(LoginRequest {
            email: "ghost@example.com".to_string(),
            password: TEST_PASSWORD.to_string(),
        }),
    )
    .await
    .err()
    .expect("unknown email is rejected");

    let (a, b) = (wrong_password, unknown_email);
    assert!(matches!(a, AppError::InvalidCredential));
    assert!(matches!(b, AppError::InvalidCredential));
    assert_eq!(a.to_string(), b.to_string());
}

// --- Account ---

#[tokio::test]
async fn test_change_password_with_wrong_current_keeps_hash() {
    let state = test_state();
    let user = seed_user(&state, "client@example.com", Role::Client).await;

    let result = handlers::account::change_password(
        as_auth(&user),
        State(state.clone()),
        ValidatedJson(ChangePasswordRequest {
            current_password: "not-my-password".to_string(),
            new_password: "brand-new-password".to_string(),
        }),
    )
    .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let stored = state.repo.get_user(user.id).await.unwrap().unwrap();
    assert_eq!(stored.password_hash, user.password_hash);
}

#[tokio::test]
async fn test_change_password_success() {
    let state = test_state();
    let user = seed_user(&state, "client@example.com", Role::Client).await;

    let status = handlers::account::change_password(
        as_auth(&user),
        State(state.clone()),
        ValidatedJson(ChangePasswordRequest {
            current_password: TEST_PASSWORD.to_string(),
            new_password: "brand-new-password".to_string(),
        }),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let stored = state.repo.get_user(user.id).await.unwrap().unwrap();
    assert!(password::verify_blocking("brand-new-password", &stored.password_hash).unwrap());
    assert!(!password::verify_blocking(TEST_PASSWORD, &stored.password_hash).unwrap());
}

// --- Content ---

#[tokio::test]
async fn test_story_update_and_repeat_delete() {
    let state = test_state();
    let admin = seed_user(&state, "admin@example.com", Role::Admin).await;

    let (status, Json(story)) = handlers::stories::create_story(
        as_auth(&admin),
        State(state.clone()),
        ValidatedJson(CreateStoryRequest {
            title: "Recovery".to_string(),
            content: "A patient's journey.".to_string(),
            image_url: None,
        }),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(story.author_id, admin.id);

    let Json(updated) = handlers::stories::update_story(
        State(state.clone()),
        Path(story.id),
        ValidatedJson(UpdateStoryRequest {
            title: Some("Recovery, part one".to_string()),
            ..Default::default()
        }),
    )
    .await
    .unwrap();
    assert_eq!(updated.title, "Recovery, part one");
    assert_eq!(updated.content, story.content);

    let first = handlers::stories::delete_story(State(state.clone()), Path(story.id)).await;
    assert_eq!(first.unwrap(), StatusCode::NO_CONTENT);
    let second = handlers::stories::delete_story(State(state.clone()), Path(story.id)).await;
    assert!(matches!(second, Err(AppError::NotFound)));

    let missing = handlers::stories::get_story(State(state), Path(story.id)).await;
    assert!(matches!(missing, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_story_image_is_kept_when_omitted_and_cleared_by_null() {
    let state = test_state();
    let admin = seed_user(&state, "admin@example.com", Role::Admin).await;

    let (_, Json(story)) = handlers::stories::create_story(
        as_auth(&admin),
        State(state.clone()),
        ValidatedJson(CreateStoryRequest {
            title: "Before and after".to_string(),
            content: "Photos inside.".to_string(),
            image_url: Some("/uploads/before.png".to_string()),
        }),
    )
    .await
    .unwrap();

    let omitted: UpdateStoryRequest = serde_json::from_str(r#"{"title":"Renamed"}"#).unwrap();
    let Json(kept) =
        handlers::stories::update_story(State(state.clone()), Path(story.id), ValidatedJson(omitted))
            .await
            .unwrap();
    assert_eq!(kept.title, "Renamed");
    assert_eq!(kept.image_url.as_deref(), Some("/uploads/before.png"));

    let cleared: UpdateStoryRequest = serde_json::from_str(r#"{"imageUrl":null}"#).unwrap();
    let Json(cleared) =
        handlers::stories::update_story(State(state.clone()), Path(story.id), ValidatedJson(cleared))
            .await
            .unwrap();
    assert_eq!(cleared.image_url, None);
    assert_eq!(cleared.title, "Renamed");
}

#[tokio::test]
async fn test_team_bio_can_be_cleared() {
    let state = test_state();
    let admin = seed_user(&state, "admin@example.com", Role::Admin).await;

    let (_, Json(member)) = handlers::teams::create_team(
        as_auth(&admin),
        State(state.clone()),
        ValidatedJson(CreateTeamRequest {
            name: "Dr. Grey".to_string(),
            position: "Surgeon".to_string(),
            bio: Some("Twenty years in practice.".to_string()),
            image_url: None,
        }),
    )
    .await
    .unwrap();

    let Json(updated) = handlers::teams::update_team(
        State(state.clone()),
        Path(member.id),
        ValidatedJson(UpdateTeamRequest {
            bio: Some(None),
            ..Default::default()
        }),
    )
    .await
    .unwrap();
    assert_eq!(updated.bio, None);
    assert_eq!(updated.position, "Surgeon");
}

// --- Comments ---

#[tokio::test]
async fn test_comment_permissions() {
    let state = test_state();
    let admin = seed_user(&state, "admin@example.com", Role::Admin).await;
    let author = seed_user(&state, "author@example.com", Role::Client).await;
    let other = seed_user(&state, "other@example.com", Role::Client).await;
    let article_id = seed_article(&state, &admin).await;

    let (_, Json(comment)) = handlers::comments::create_comment(
        as_auth(&author),
        State(state.clone()),
        Path(article_id),
        ValidatedJson(CommentRequest {
            content: "Helpful, thanks".to_string(),
        }),
    )
    .await
    .unwrap();

    // Another client can neither edit nor delete it.
    let edit = handlers::comments::update_comment(
        as_auth(&other),
        State(state.clone()),
        Path(comment.id),
        ValidatedJson(CommentRequest {
            content: "hijacked".to_string(),
        }),
    )
    .await;
    assert!(matches!(edit, Err(AppError::Forbidden)));
    let delete =
        handlers::comments::delete_comment(as_auth(&other), State(state.clone()), Path(comment.id))
            .await;
    assert!(matches!(delete, Err(AppError::Forbidden)));

    // Admins moderate but do not edit.
    let admin_edit = handlers::comments::update_comment(
        as_auth(&admin),
        State(state.clone()),
        Path(comment.id),
        ValidatedJson(CommentRequest {
            content: "edited by admin".to_string(),
        }),
    )
    .await;
    assert!(matches!(admin_edit, Err(AppError::Forbidden)));

    let Json(edited) = handlers::comments::update_comment(
        as_auth(&author),
        State(state.clone()),
        Path(comment.id),
        ValidatedJson(CommentRequest {
            content: "Very helpful, thanks".to_string(),
        }),
    )
    .await
    .unwrap();
    assert_eq!(edited.content, "Very helpful, thanks");

    let removed =
        handlers::comments::delete_comment(as_auth(&admin), State(state.clone()), Path(comment.id))
            .await
            .unwrap();
    assert_eq!(removed, StatusCode::NO_CONTENT);

    let Json(comments) =
        handlers::comments::list_comments(State(state.clone()), Path(article_id)).await.unwrap();
    assert!(comments.is_empty());
}

#[tokio::test]
async fn test_comments_on_missing_article_are_not_found() {
    let state = test_state();
    let user = seed_user(&state, "client@example.com", Role::Client).await;

    let listed = handlers::comments::list_comments(State(state.clone()), Path(Uuid::new_v4())).await;
    assert!(matches!(listed, Err(AppError::NotFound)));

    let created = handlers::comments::create_comment(
        as_auth(&user),
        State(state),
        Path(Uuid::new_v4()),
        ValidatedJson(CommentRequest {
            content: "hello".to_string(),
        }),
    )
    .await;
    assert!(matches!(created, Err(AppError::NotFound)));
}

// --- Inquiries & consultations ---

#[tokio::test]
async fn test_clients_only_see_their_own_records() {
    let state = test_state();
    let admin = seed_user(&state, "admin@example.com", Role::Admin).await;
    let alice = seed_user(&state, "alice@example.com", Role::Client).await;
    let bob = seed_user(&state, "bob@example.com", Role::Client).await;

    for user in [&alice, &bob] {
        handlers::inquiries::create_inquiry(
            as_auth(user),
            State(state.clone()),
            ValidatedJson(CreateInquiryRequest {
                subject: "Pricing".to_string(),
                message: "How much is a session?".to_string(),
            }),
        )
        .await
        .unwrap();
    }

    let Json(mine) = handlers::inquiries::list_inquiries(as_auth(&alice), State(state.clone()))
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].sender_id, alice.id);

    let Json(all) = handlers::inquiries::list_inquiries(as_auth(&admin), State(state.clone()))
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let bobs = all.iter().find(|i| i.sender_id == bob.id).unwrap();
    let peek =
        handlers::inquiries::get_inquiry(as_auth(&alice), State(state.clone()), Path(bobs.id)).await;
    assert!(matches!(peek, Err(AppError::Forbidden)));
}

#[tokio::test]
async fn test_consultation_lifecycle() {
    let state = test_state();
    let admin = seed_user(&state, "admin@example.com", Role::Admin).await;
    let client = seed_user(&state, "client@example.com", Role::Client).await;

    let (status, Json(booking)) = handlers::consultations::create_consultation(
        as_auth(&client),
        State(state.clone()),
        ValidatedJson(CreateConsultationRequest {
            topic: "Back pain".to_string(),
            scheduled_for: Utc::now() + Duration::days(3),
            notes: None,
        }),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booking.status, ConsultationStatus::Pending);
    assert_eq!(booking.client_id, client.id);

    let Json(cancelled) = handlers::consultations::set_consultation_status(
        as_auth(&admin),
        State(state.clone()),
        Path(booking.id),
        ValidatedJson(UpdateConsultationStatusRequest {
            status: ConsultationStatus::Cancelled,
        }),
    )
    .await
    .unwrap();
    assert_eq!(cancelled.status, ConsultationStatus::Cancelled);

    // Closed bookings are frozen.
    let edit = handlers::consultations::update_consultation(
        as_auth(&client),
        State(state.clone()),
        Path(booking.id),
        ValidatedJson(UpdateConsultationRequest {
            notes: Some(Some("Bring X-rays".to_string())),
            ..Default::default()
        }),
    )
    .await;
    assert!(matches!(edit, Err(AppError::BadRequest(_))));
}

// --- Messages ---

#[tokio::test]
async fn test_message_rules() {
    let state = test_state();
    let alice = seed_user(&state, "alice@example.com", Role::Client).await;
    let bob = seed_user(&state, "bob@example.com", Role::Client).await;
    let eve = seed_user(&state, "eve@example.com", Role::Client).await;

    let unknown = handlers::messages::send_message(
        as_auth(&alice),
        State(state.clone()),
        ValidatedJson(CreateMessageRequest {
            recipient_id: Uuid::new_v4(),
            body: "hello?".to_string(),
        }),
    )
    .await;
    assert!(matches!(unknown, Err(AppError::NotFound)));

    let (_, Json(message)) = handlers::messages::send_message(
        as_auth(&alice),
        State(state.clone()),
        ValidatedJson(CreateMessageRequest {
            recipient_id: bob.id,
            body: "See you Monday".to_string(),
        }),
    )
    .await
    .unwrap();
    assert!(!message.is_read);

    let outsider =
        handlers::messages::get_message(as_auth(&eve), State(state.clone()), Path(message.id)).await;
    assert!(matches!(outsider, Err(AppError::Forbidden)));

    // Only the recipient marks as read.
    let by_sender =
        handlers::messages::mark_message_read(as_auth(&alice), State(state.clone()), Path(message.id))
            .await;
    assert!(matches!(by_sender, Err(AppError::Forbidden)));

    let Json(dashboard) =
        handlers::dashboard::client_dashboard(as_auth(&bob), State(state.clone())).await.unwrap();
    assert_eq!(dashboard.unread_messages, 1);

    let Json(read) =
        handlers::messages::mark_message_read(as_auth(&bob), State(state.clone()), Path(message.id))
            .await
            .unwrap();
    assert!(read.is_read);

    let Json(dashboard) =
        handlers::dashboard::client_dashboard(as_auth(&bob), State(state.clone())).await.unwrap();
    assert_eq!(dashboard.unread_messages, 0);

    // Recipients cannot delete; senders can.
    let by_recipient =
        handlers::messages::delete_message(as_auth(&bob), State(state.clone()), Path(message.id)).await;
    assert!(matches!(by_recipient, Err(AppError::Forbidden)));
    let by_owner =
        handlers::messages::delete_message(as_auth(&alice), State(state), Path(message.id)).await;
    assert_eq!(by_owner.unwrap(), StatusCode::NO_CONTENT);
}

// --- Contacts & dashboards ---

#[tokio::test]
async fn test_contact_links_session_user_when_present() {
    let state = test_state();
    let user = seed_user(&state, "client@example.com", Role::Client).await;
    let form = || CreateContactRequest {
        name: "Visitor".to_string(),
        email: "Visitor@Example.com".to_string(),
        phone: Some("+1 (555) 010-0000".to_string()),
        message: "Please call me back".to_string(),
    };

    let (status, Json(anonymous)) =
        handlers::contacts::submit_contact(None, State(state.clone()), ValidatedJson(form()))
            .await
            .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(anonymous.user_id, None);
    assert_eq!(anonymous.email, "visitor@example.com");

    let (_, Json(linked)) = handlers::contacts::submit_contact(
        Some(as_auth(&user)),
        State(state.clone()),
        ValidatedJson(form()),
    )
    .await
    .unwrap();
    assert_eq!(linked.user_id, Some(user.id));

    let Json(stats) = handlers::dashboard::admin_dashboard(State(state)).await.unwrap();
    assert_eq!(stats.total_contacts, 2);
    assert_eq!(stats.total_users, 1);
    assert_eq!(stats.total_clients, 1);
}

#[tokio::test]
async fn test_pages_describe_their_form() {
    let Json(login) = handlers::pages::login_page().await;
    assert_eq!(login.page, "login");
    assert_eq!(login.action, "/login");

    let Json(register) = handlers::pages::register_page().await;
    assert_eq!(register.action, "/register");
}
