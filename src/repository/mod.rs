use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        AdminDashboardStats, Article, Comment, Consultation, ConsultationStatus, Contact,
        CreateArticleRequest, CreateConsultationRequest, CreateContactRequest,
        CreateInquiryRequest, CreateMessageRequest, CreateStoryRequest, CreateTeamRequest,
        Inquiry, Message, NewUser, Story, Team, UpdateArticleRequest, UpdateConsultationRequest,
        UpdateInquiryRequest, UpdateProfileRequest, UpdateStoryRequest, UpdateTeamRequest, User,
    },
};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryRepository;
pub use postgres::PostgresRepository;

/// Repository Trait
///
/// The data-store contract consumed by handlers, the session issuer and the auth extractor.
/// Each method is one logical operation on one record type.
///
/// Conventions:
/// - lookups by id return `Ok(None)` when the row is missing,
/// - updates return `Ok(None)` when the row is missing (absent fields are left untouched),
/// - deletes return `Ok(false)` when nothing was deleted,
/// - everything else that goes wrong is an `Err`.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users / Credential store ---
    // Fails with `AlreadyExists` when the email is taken.
    async fn create_user(&self, user: NewUser) -> AppResult<User>;
    async fn get_user(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn list_users(&self) -> AppResult<Vec<User>>;
    async fn update_user_profile(&self, id: Uuid, req: UpdateProfileRequest) -> AppResult<Option<User>>;
    async fn update_password_hash(&self, id: Uuid, password_hash: String) -> AppResult<bool>;

    // --- Stories ---
    async fn list_stories(&self) -> AppResult<Vec<Story>>;
    async fn get_story(&self, id: Uuid) -> AppResult<Option<Story>>;
    async fn create_story(&self, req: CreateStoryRequest, author_id: Uuid) -> AppResult<Story>;
    async fn update_story(&self, id: Uuid, req: UpdateStoryRequest) -> AppResult<Option<Story>>;
    async fn delete_story(&self, id: Uuid) -> AppResult<bool>;

    // --- Articles ---
    async fn list_articles(&self) -> AppResult<Vec<Article>>;
    async fn get_article(&self, id: Uuid) -> AppResult<Option<Article>>;
    async fn create_article(&self, req: CreateArticleRequest, author_id: Uuid) -> AppResult<Article>;
    async fn update_article(&self, id: Uuid, req: UpdateArticleRequest) -> AppResult<Option<Article>>;
    async fn delete_article(&self, id: Uuid) -> AppResult<bool>;

    // --- Team ---
    async fn list_teams(&self) -> AppResult<Vec<Team>>;
    async fn get_team(&self, id: Uuid) -> AppResult<Option<Team>>;
    async fn create_team(&self, req: CreateTeamRequest, created_by: Uuid) -> AppResult<Team>;
    async fn update_team(&self, id: Uuid, req: UpdateTeamRequest) -> AppResult<Option<Team>>;
    async fn delete_team(&self, id: Uuid) -> AppResult<bool>;

    // --- Comments ---
    // Oldest first, as a thread reads.
    async fn list_comments(&self, article_id: Uuid) -> AppResult<Vec<Comment>>;
    async fn get_comment(&self, id: Uuid) -> AppResult<Option<Comment>>;
    async fn create_comment(&self, article_id: Uuid, author_id: Uuid, content: String) -> AppResult<Comment>;
    async fn update_comment(&self, id: Uuid, content: String) -> AppResult<Option<Comment>>;
    async fn delete_comment(&self, id: Uuid) -> AppResult<bool>;

    // --- Inquiries ---
    // `sender = None` lists every inquiry (admin view).
    async fn list_inquiries(&self, sender: Option<Uuid>) -> AppResult<Vec<Inquiry>>;
    async fn get_inquiry(&self, id: Uuid) -> AppResult<Option<Inquiry>>;
    async fn create_inquiry(&self, req: CreateInquiryRequest, sender_id: Uuid) -> AppResult<Inquiry>;
    async fn update_inquiry(&self, id: Uuid, req: UpdateInquiryRequest) -> AppResult<Option<Inquiry>>;
    async fn delete_inquiry(&self, id: Uuid) -> AppResult<bool>;

    // --- Consultations ---
    // `client = None` lists every consultation (admin view).
    async fn list_consultations(&self, client: Option<Uuid>) -> AppResult<Vec<Consultation>>;
    async fn get_consultation(&self, id: Uuid) -> AppResult<Option<Consultation>>;
    async fn create_consultation(&self, req: CreateConsultationRequest, client_id: Uuid) -> AppResult<Consultation>;
    async fn update_consultation(&self, id: Uuid, req: UpdateConsultationRequest) -> AppResult<Option<Consultation>>;
    async fn set_consultation_status(&self, id: Uuid, status: ConsultationStatus) -> AppResult<Option<Consultation>>;
    async fn delete_consultation(&self, id: Uuid) -> AppResult<bool>;

    // --- Messages ---
    // Messages the user sent or received, newest first.
    async fn list_messages(&self, user_id: Uuid) -> AppResult<Vec<Message>>;
    async fn get_message(&self, id: Uuid) -> AppResult<Option<Message>>;
    async fn create_message(&self, req: CreateMessageRequest, sender_id: Uuid) -> AppResult<Message>;
    async fn mark_message_read(&self, id: Uuid) -> AppResult<Option<Message>>;
    async fn delete_message(&self, id: Uuid) -> AppResult<bool>;
    async fn count_unread_messages(&self, recipient_id: Uuid) -> AppResult<i64>;

    // --- Contacts ---
    async fn list_contacts(&self) -> AppResult<Vec<Contact>>;
    async fn get_contact(&self, id: Uuid) -> AppResult<Option<Contact>>;
    async fn create_contact(&self, req: CreateContactRequest, user_id: Option<Uuid>) -> AppResult<Contact>;
    async fn delete_contact(&self, id: Uuid) -> AppResult<bool>;

    // --- Dashboard ---
    async fn get_stats(&self) -> AppResult<AdminDashboardStats>;
}

/// RepositoryState
///
/// The handle shared through the application state. Built once in `main` and injected;
/// there is no process-global connection.
pub type RepositoryState = Arc<dyn Repository>;
