use consult_portal::{
    AppError,
    models::{
        ConsultationStatus, CreateArticleRequest, CreateConsultationRequest, CreateMessageRequest,
        CreateStoryRequest, NewUser, Role, UpdateProfileRequest, UpdateStoryRequest, User,
    },
    repository::{InMemoryRepository, PostgresRepository, Repository},
};
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

// --- Test Data Helpers ---

async fn create_test_user(repo: &dyn Repository, role: Role) -> User {
    // Unique per call so the Postgres run can share a database with other data.
    let email = format!("{}-{}@test.com", role_name(role), Uuid::new_v4());
    repo.create_user(NewUser {
        name: "Test".to_string(),
        email,
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        role,
    })
    .await
    .expect("Failed to create test user")
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::Admin => "admin",
        Role::Client => "client",
    }
}

// --- Contract shared by every store ---

/// Behaviour every `Repository` implementation must agree on.
async fn exercise_store(repo: &dyn Repository) {
    let admin = create_test_user(repo, Role::Admin).await;
    let client = create_test_user(repo, Role::Client).await;

    // Email uniqueness.
    let duplicate = repo
        .create_user(NewUser {
            name: "Copy".to_string(),
            email: client.email.clone(),
            password_hash: client.password_hash.clone(),
            role: Role::Client,
        })
        .await;
    assert!(matches!(duplicate, Err(AppError::AlreadyExists(_))));

    let taken = repo
        .update_user_profile(
            admin.id,
            UpdateProfileRequest {
                email: Some(client.email.clone()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(taken, Err(AppError::AlreadyExists(_))));

    let found = repo.get_user_by_email(&client.email).await.unwrap().unwrap();
    assert_eq!(found.id, client.id);
    assert_eq!(found.role, Role::Client);

    // Partial update keeps absent fields.
    let story = repo
        .create_story(
            CreateStoryRequest {
                title: "Original".to_string(),
                content: "Body".to_string(),
                image_url: Some("/img/a.png".to_string()),
            },
            admin.id,
        )
        .await
        .unwrap();
    let updated = repo
        .update_story(
            story.id,
            UpdateStoryRequest {
                title: Some("Renamed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.content, "Body");
    assert_eq!(updated.image_url.as_deref(), Some("/img/a.png"));
    assert!(repo.update_story(Uuid::new_v4(), UpdateStoryRequest::default()).await.unwrap().is_none());

    // An explicit null clears a nullable column.
    let cleared = repo
        .update_story(
            story.id,
            UpdateStoryRequest {
                image_url: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cleared.image_url, None);
    assert_eq!(cleared.title, "Renamed");

    // Deletes report whether anything was removed.
    assert!(repo.delete_story(story.id).await.unwrap());
    assert!(!repo.delete_story(story.id).await.unwrap());

    // Comments go away with their article.
    let article = repo
        .create_article(
            CreateArticleRequest {
                title: "Article".to_string(),
                content: "Text".to_string(),
                ..Default::default()
            },
            admin.id,
        )
        .await
        .unwrap();
    let comment = repo
        .create_comment(article.id, client.id, "Nice".to_string())
        .await
        .unwrap();
    assert_eq!(repo.list_comments(article.id).await.unwrap().len(), 1);
    assert!(repo.delete_article(article.id).await.unwrap());
    assert!(repo.get_comment(comment.id).await.unwrap().is_none());

    // Consultations start pending and filter by client.
    let booking = repo
        .create_consultation(
            CreateConsultationRequest {
                topic: "Follow-up".to_string(),
                scheduled_for: Utc::now() + Duration::days(1),
                notes: None,
            },
            client.id,
        )
        .await
        .unwrap();
    assert_eq!(booking.status, ConsultationStatus::Pending);
    let mine = repo.list_consultations(Some(client.id)).await.unwrap();
    assert!(mine.iter().all(|c| c.client_id == client.id));
    assert!(mine.iter().any(|c| c.id == booking.id));
    assert!(repo.list_consultations(Some(admin.id)).await.unwrap().is_empty());

    let confirmed = repo
        .set_consultation_status(booking.id, ConsultationStatus::Confirmed)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(confirmed.status, ConsultationStatus::Confirmed);

    // Messages: both participants see them; unread counts the recipient's inbox.
    let message = repo
        .create_message(
            CreateMessageRequest {
                recipient_id: admin.id,
                body: "Question about my booking".to_string(),
            },
            client.id,
        )
        .await
        .unwrap();
    assert!(repo.list_messages(client.id).await.unwrap().iter().any(|m| m.id == message.id));
    assert!(repo.list_messages(admin.id).await.unwrap().iter().any(|m| m.id == message.id));
    assert_eq!(repo.count_unread_messages(admin.id).await.unwrap(), 1);
    assert_eq!(repo.count_unread_messages(client.id).await.unwrap(), 0);

    let read = repo.mark_message_read(message.id).await.unwrap().unwrap();
    assert!(read.is_read);
    assert_eq!(repo.count_unread_messages(admin.id).await.unwrap(), 0);
}

// --- Tests ---

#[tokio::test]
async fn test_in_memory_store_contract() {
    let repo = InMemoryRepository::new();
    exercise_store(&repo).await;
}

#[tokio::test]
async fn test_in_memory_lists_newest_first() {
    let repo = InMemoryRepository::new();
    let admin = create_test_user(&repo, Role::Admin).await;

    for title in ["first", "second", "third"] {
        repo.create_story(
            CreateStoryRequest {
                title: title.to_string(),
                content: "x".to_string(),
                image_url: None,
            },
            admin.id,
        )
        .await
        .unwrap();
    }

    let titles: Vec<String> = repo
        .list_stories()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.title)
        .collect();
    assert_eq!(titles, ["third", "second", "first"]);
}

#[tokio::test]
async fn test_in_memory_stats() {
    let repo = InMemoryRepository::new();
    create_test_user(&repo, Role::Admin).await;
    let client = create_test_user(&repo, Role::Client).await;
    repo.create_consultation(
        CreateConsultationRequest {
            topic: "Intro".to_string(),
            scheduled_for: Utc::now() + Duration::hours(2),
            notes: None,
        },
        client.id,
    )
    .await
    .unwrap();

    let stats = repo.get_stats().await.unwrap();
    assert_eq!(stats.total_users, 2);
    assert_eq!(stats.total_clients, 1);
    assert_eq!(stats.pending_consultations, 1);
    assert_eq!(stats.total_stories, 0);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a disposable Postgres database"]
async fn test_postgres_store_contract() {
    dotenv::dotenv().ok();
    let db_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set to run integration tests");

    let pool = PgPool::connect(&db_url)
        .await
        .expect("Failed to connect to database for integration tests.");
    let repo = PostgresRepository::new(pool);
    repo.migrate().await.expect("Failed to run database migrations.");

    exercise_store(&repo).await;
}
