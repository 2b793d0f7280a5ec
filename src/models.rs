use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::FieldError,
    validation::{self, MAX_NAME_LEN, MAX_TEXT_LEN, MAX_TITLE_LEN, Validate},
};

// --- Enums (mapped to Postgres enum types) ---

/// Role
///
/// The RBAC tag carried by every user and embedded in the session token.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS, ToSchema, sqlx::Type,
)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    #[default]
    Client,
}

impl Role {
    /// Landing page of the role's dashboard area.
    pub fn home_path(self) -> &'static str {
        match self {
            Role::Admin => "/admin/dashboard",
            Role::Client => "/client/dashboard",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS, ToSchema, sqlx::Type,
)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "consultation_status", rename_all = "UPPERCASE")]
pub enum ConsultationStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

// --- Core Records (Mapped to Database) ---

/// User
///
/// Credential-store row. Never serialized to clients; see `UserProfile`.
#[derive(Debug, Clone, FromRow, Default)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// UserProfile
///
/// The outward view of a user. Carries no credential material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Input to `Repository::create_user`; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub image_url: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Team
///
/// A member of the public team page. Only administrators manage these entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: Uuid,
    pub created_by: Uuid,
    pub name: String,
    pub position: String,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub article_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub subject: String,
    pub message: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Consultation {
    pub id: Uuid,
    pub client_id: Uuid,
    pub topic: String,
    #[ts(type = "string")]
    pub scheduled_for: DateTime<Utc>,
    pub notes: Option<String>,
    pub status: ConsultationStatus,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub body: String,
    pub is_read: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Contact
///
/// A submission of the public contact form. `user_id` is set when the visitor was signed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

// --- Request Payloads (Input Schemas) ---

/// RegisterUserRequest
///
/// Input for `POST /register`. The plaintext password is hashed before it touches the store
/// and is never logged.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    #[ts(optional)]
    pub role: Option<Role>,
}

impl Validate for RegisterUserRequest {
    fn check(&self, errors: &mut Vec<FieldError>) {
        validation::required_text(errors, "name", &self.name, MAX_NAME_LEN);
        validation::email(errors, "email", &self.email);
        validation::password(errors, "password", &self.password);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn check(&self, errors: &mut Vec<FieldError>) {
        validation::required_text(errors, "email", &self.email, validation::MAX_EMAIL_LEN);
        if self.password.is_empty() {
            errors.push(FieldError::new("password", "must not be empty"));
        }
    }
}

/// LoginResponse
///
/// The issued session token (also set as the `session` cookie) and the signed-in profile.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub email: Option<String>,
}

impl Validate for UpdateProfileRequest {
    fn check(&self, errors: &mut Vec<FieldError>) {
        validation::optional_text(errors, "name", self.name.as_deref(), MAX_NAME_LEN);
        if let Some(email) = &self.email {
            validation::email(errors, "email", email);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl Validate for ChangePasswordRequest {
    fn check(&self, errors: &mut Vec<FieldError>) {
        if self.current_password.is_empty() {
            errors.push(FieldError::new("currentPassword", "must not be empty"));
        }
        validation::password(errors, "newPassword", &self.new_password);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoryRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    #[ts(optional)]
    pub image_url: Option<String>,
}

impl Validate for CreateStoryRequest {
    fn check(&self, errors: &mut Vec<FieldError>) {
        validation::required_text(errors, "title", &self.title, MAX_TITLE_LEN);
        validation::required_text(errors, "content", &self.content, MAX_TEXT_LEN);
        validation::optional_url(errors, "imageUrl", self.image_url.as_deref());
    }
}

/// Inner value of a nullable update field, for validation. Absent and `null` both skip
/// the check.
fn nullable(field: &Option<Option<String>>) -> Option<&str> {
    field.as_ref().and_then(|value| value.as_deref())
}

/// UpdateStoryRequest
///
/// Partial update; absent fields keep their stored value. Nullable fields take `null`
/// to clear the stored value.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStoryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "::serde_with::rust::double_option")]
    #[ts(optional, as = "Option<Option<String>>")]
    #[schema(value_type = Option<String>)]
    pub image_url: Option<Option<String>>,
}

impl Validate for UpdateStoryRequest {
    fn check(&self, errors: &mut Vec<FieldError>) {
        validation::optional_text(errors, "title", self.title.as_deref(), MAX_TITLE_LEN);
        validation::optional_text(errors, "content", self.content.as_deref(), MAX_TEXT_LEN);
        validation::optional_url(errors, "imageUrl", nullable(&self.image_url));
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleRequest {
    pub title: String,
    #[serde(default)]
    #[ts(optional)]
    pub excerpt: Option<String>,
    pub content: String,
    #[serde(default)]
    #[ts(optional)]
    pub image_url: Option<String>,
}

impl Validate for CreateArticleRequest {
    fn check(&self, errors: &mut Vec<FieldError>) {
        validation::required_text(errors, "title", &self.title, MAX_TITLE_LEN);
        validation::optional_text(errors, "excerpt", self.excerpt.as_deref(), 500);
        validation::required_text(errors, "content", &self.content, MAX_TEXT_LEN);
        validation::optional_url(errors, "imageUrl", self.image_url.as_deref());
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticleRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "::serde_with::rust::double_option")]
    #[ts(optional, as = "Option<Option<String>>")]
    #[schema(value_type = Option<String>)]
    pub excerpt: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "::serde_with::rust::double_option")]
    #[ts(optional, as = "Option<Option<String>>")]
    #[schema(value_type = Option<String>)]
    pub image_url: Option<Option<String>>,
}

impl Validate for UpdateArticleRequest {
    fn check(&self, errors: &mut Vec<FieldError>) {
        validation::optional_text(errors, "title", self.title.as_deref(), MAX_TITLE_LEN);
        validation::optional_text(errors, "excerpt", nullable(&self.excerpt), 500);
        validation::optional_text(errors, "content", self.content.as_deref(), MAX_TEXT_LEN);
        validation::optional_url(errors, "imageUrl", nullable(&self.image_url));
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    pub name: String,
    pub position: String,
    #[serde(default)]
    #[ts(optional)]
    pub bio: Option<String>,
    #[serde(default)]
    #[ts(optional)]
    pub image_url: Option<String>,
}

impl Validate for CreateTeamRequest {
    fn check(&self, errors: &mut Vec<FieldError>) {
        validation::required_text(errors, "name", &self.name, MAX_NAME_LEN);
        validation::required_text(errors, "position", &self.position, MAX_NAME_LEN);
        validation::optional_text(errors, "bio", self.bio.as_deref(), MAX_TEXT_LEN);
        validation::optional_url(errors, "imageUrl", self.image_url.as_deref());
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeamRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "::serde_with::rust::double_option")]
    #[ts(optional, as = "Option<Option<String>>")]
    #[schema(value_type = Option<String>)]
    pub bio: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "::serde_with::rust::double_option")]
    #[ts(optional, as = "Option<Option<String>>")]
    #[schema(value_type = Option<String>)]
    pub image_url: Option<Option<String>>,
}

impl Validate for UpdateTeamRequest {
    fn check(&self, errors: &mut Vec<FieldError>) {
        validation::optional_text(errors, "name", self.name.as_deref(), MAX_NAME_LEN);
        validation::optional_text(errors, "position", self.position.as_deref(), MAX_NAME_LEN);
        validation::optional_text(errors, "bio", nullable(&self.bio), MAX_TEXT_LEN);
        validation::optional_url(errors, "imageUrl", nullable(&self.image_url));
    }
}

/// CommentRequest
///
/// Body of both `POST /api/articles/{id}/comments` and `PUT /api/comments/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub content: String,
}

impl Validate for CommentRequest {
    fn check(&self, errors: &mut Vec<FieldError>) {
        validation::required_text(errors, "content", &self.content, 2_000);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateInquiryRequest {
    pub subject: String,
    pub message: String,
}

impl Validate for CreateInquiryRequest {
    fn check(&self, errors: &mut Vec<FieldError>) {
        validation::required_text(errors, "subject", &self.subject, MAX_TITLE_LEN);
        validation::required_text(errors, "message", &self.message, MAX_TEXT_LEN);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInquiryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub message: Option<String>,
}

impl Validate for UpdateInquiryRequest {
    fn check(&self, errors: &mut Vec<FieldError>) {
        validation::optional_text(errors, "subject", self.subject.as_deref(), MAX_TITLE_LEN);
        validation::optional_text(errors, "message", self.message.as_deref(), MAX_TEXT_LEN);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateConsultationRequest {
    pub topic: String,
    #[ts(type = "string")]
    pub scheduled_for: DateTime<Utc>,
    #[serde(default)]
    #[ts(optional)]
    pub notes: Option<String>,
}

impl Validate for CreateConsultationRequest {
    fn check(&self, errors: &mut Vec<FieldError>) {
        validation::required_text(errors, "topic", &self.topic, MAX_TITLE_LEN);
        if self.scheduled_for <= Utc::now() {
            errors.push(FieldError::new("scheduledFor", "must be in the future"));
        }
        validation::optional_text(errors, "notes", self.notes.as_deref(), 2_000);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConsultationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub scheduled_for: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "::serde_with::rust::double_option")]
    #[ts(optional, as = "Option<Option<String>>")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}

impl Validate for UpdateConsultationRequest {
    fn check(&self, errors: &mut Vec<FieldError>) {
        validation::optional_text(errors, "topic", self.topic.as_deref(), MAX_TITLE_LEN);
        if self.scheduled_for.is_some_and(|at| at <= Utc::now()) {
            errors.push(FieldError::new("scheduledFor", "must be in the future"));
        }
        validation::optional_text(errors, "notes", nullable(&self.notes), 2_000);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConsultationStatusRequest {
    pub status: ConsultationStatus,
}

impl Validate for UpdateConsultationStatusRequest {
    fn check(&self, _errors: &mut Vec<FieldError>) {}
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageRequest {
    pub recipient_id: Uuid,
    pub body: String,
}

impl Validate for CreateMessageRequest {
    fn check(&self, errors: &mut Vec<FieldError>) {
        if self.recipient_id.is_nil() {
            errors.push(FieldError::new("recipientId", "must be a user id"));
        }
        validation::required_text(errors, "body", &self.body, MAX_TEXT_LEN);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    #[ts(optional)]
    pub phone: Option<String>,
    pub message: String,
}

impl Validate for CreateContactRequest {
    fn check(&self, errors: &mut Vec<FieldError>) {
        validation::required_text(errors, "name", &self.name, MAX_NAME_LEN);
        validation::email(errors, "email", &self.email);
        if let Some(phone) = &self.phone {
            let digits = phone.chars().filter(char::is_ascii_digit).count();
            let allowed = phone
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));
            if !allowed || !(6..=20).contains(&digits) {
                errors.push(FieldError::new("phone", "must be a phone number"));
            }
        }
        validation::required_text(errors, "message", &self.message, MAX_TEXT_LEN);
    }
}

// --- Dashboard Schemas (Output) ---

/// AdminDashboardStats
///
/// Output of `GET /admin/dashboard`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboardStats {
    pub total_users: i64,
    pub total_clients: i64,
    pub total_stories: i64,
    pub total_articles: i64,
    pub total_team_members: i64,
    pub total_inquiries: i64,
    pub total_contacts: i64,
    pub pending_consultations: i64,
}

/// ClientDashboard
///
/// Output of `GET /client/dashboard`: everything the signed-in client owns.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ClientDashboard {
    pub profile: UserProfile,
    pub inquiries: Vec<Inquiry>,
    pub consultations: Vec<Consultation>,
    pub unread_messages: i64,
}

/// PageDescriptor
///
/// Returned by the gated `GET /login` and `GET /register` pages; tells the frontend which
/// endpoint the page's form posts to.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PageDescriptor {
    pub page: String,
    pub action: String,
}
