use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::Repository;
use crate::{
    error::AppResult,
    models::{
        AdminDashboardStats, Article, Comment, Consultation, ConsultationStatus, Contact,
        CreateArticleRequest, CreateConsultationRequest, CreateContactRequest,
        CreateInquiryRequest, CreateMessageRequest, CreateStoryRequest, CreateTeamRequest,
        Inquiry, Message, NewUser, Role, Story, Team, UpdateArticleRequest,
        UpdateConsultationRequest, UpdateInquiryRequest, UpdateProfileRequest,
        UpdateStoryRequest, UpdateTeamRequest, User,
    },
};

const USER_COLUMNS: &str = "id, name, email, password_hash, role, created_at, updated_at";
const STORY_COLUMNS: &str = "id, author_id, title, content, image_url, created_at, updated_at";
const ARTICLE_COLUMNS: &str =
    "id, author_id, title, excerpt, content, image_url, created_at, updated_at";
const TEAM_COLUMNS: &str =
    "id, created_by, name, position, bio, image_url, created_at, updated_at";
const COMMENT_COLUMNS: &str = "id, article_id, author_id, content, created_at, updated_at";
const INQUIRY_COLUMNS: &str = "id, sender_id, subject, message, created_at, updated_at";
const CONSULTATION_COLUMNS: &str =
    "id, client_id, topic, scheduled_for, notes, status, created_at, updated_at";
const MESSAGE_COLUMNS: &str = "id, sender_id, recipient_id, body, is_read, created_at";
const CONTACT_COLUMNS: &str = "id, user_id, name, email, phone, message, created_at";

/// PostgresRepository
///
/// `Repository` backed by Postgres through an `sqlx` pool. Queries are checked at runtime
/// so the crate builds without a live database; the schema lives in `migrations/`.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded migrations. Called once at startup.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!().run(&self.pool).await
    }

    async fn delete_by_id(&self, table: &str, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(&format!("DELETE FROM {table} WHERE id = $1"))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self, sql: &str) -> AppResult<i64> {
        Ok(sqlx::query_scalar::<_, i64>(sql).fetch_one(&self.pool).await?)
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    // --- USERS ---

    /// create_user
    ///
    /// Email uniqueness is enforced by the `users_email_key` constraint; the violation is
    /// mapped to `AlreadyExists` by `From<sqlx::Error>`.
    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        let sql = format!(
            "INSERT INTO users (id, name, email, password_hash, role, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, NOW(), NOW()) RETURNING {USER_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(user.name)
            .bind(user.email)
            .bind(user.password_hash)
            .bind(user.role)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn get_user(&self, id: Uuid) -> AppResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC");
        Ok(sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?)
    }

    /// update_user_profile
    ///
    /// Partial update through `COALESCE`: a `NULL` bind keeps the stored column.
    async fn update_user_profile(&self, id: Uuid, req: UpdateProfileRequest) -> AppResult<Option<User>> {
        let sql = format!(
            "UPDATE users SET name = COALESCE($2, name), email = COALESCE($3, email), \
             updated_at = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(req.name)
            .bind(req.email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: String) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(password_hash)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- STORIES ---

    async fn list_stories(&self) -> AppResult<Vec<Story>> {
        let sql = format!("SELECT {STORY_COLUMNS} FROM stories ORDER BY created_at DESC");
        Ok(sqlx::query_as::<_, Story>(&sql).fetch_all(&self.pool).await?)
    }

    async fn get_story(&self, id: Uuid) -> AppResult<Option<Story>> {
        let sql = format!("SELECT {STORY_COLUMNS} FROM stories WHERE id = $1");
        Ok(sqlx::query_as::<_, Story>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_story(&self, req: CreateStoryRequest, author_id: Uuid) -> AppResult<Story> {
        let sql = format!(
            "INSERT INTO stories (id, author_id, title, content, image_url, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, NOW(), NOW()) RETURNING {STORY_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Story>(&sql)
            .bind(Uuid::new_v4())
            .bind(author_id)
            .bind(req.title)
            .bind(req.content)
            .bind(req.image_url)
            .fetch_one(&self.pool)
            .await?)
    }

    /// Nullable columns are bound with a presence flag (`CASE WHEN $flag THEN $value`), so a
    /// `null` in the request clears the column while an absent field keeps it.
    async fn update_story(&self, id: Uuid, req: UpdateStoryRequest) -> AppResult<Option<Story>> {
        let sql = format!(
            "UPDATE stories SET title = COALESCE($2, title), content = COALESCE($3, content), \
             image_url = CASE WHEN $5 THEN $4 ELSE image_url END, updated_at = NOW() \
             WHERE id = $1 RETURNING {STORY_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Story>(&sql)
            .bind(id)
            .bind(req.title)
            .bind(req.content)
            .bind(req.image_url.clone().flatten())
            .bind(req.image_url.is_some())
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_story(&self, id: Uuid) -> AppResult<bool> {
        self.delete_by_id("stories", id).await
    }

    // --- ARTICLES ---

    async fn list_articles(&self) -> AppResult<Vec<Article>> {
        let sql = format!("SELECT {ARTICLE_COLUMNS} FROM articles ORDER BY created_at DESC");
        Ok(sqlx::query_as::<_, Article>(&sql).fetch_all(&self.pool).await?)
    }

    async fn get_article(&self, id: Uuid) -> AppResult<Option<Article>> {
        let sql = format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = $1");
        Ok(sqlx::query_as::<_, Article>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_article(&self, req: CreateArticleRequest, author_id: Uuid) -> AppResult<Article> {
        let sql = format!(
            "INSERT INTO articles (id, author_id, title, excerpt, content, image_url, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW()) RETURNING {ARTICLE_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Article>(&sql)
            .bind(Uuid::new_v4())
            .bind(author_id)
            .bind(req.title)
            .bind(req.excerpt)
            .bind(req.content)
            .bind(req.image_url)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_article(&self, id: Uuid, req: UpdateArticleRequest) -> AppResult<Option<Article>> {
        let sql = format!(
            "UPDATE articles SET title = COALESCE($2, title), \
             excerpt = CASE WHEN $6 THEN $3 ELSE excerpt END, content = COALESCE($4, content), \
             image_url = CASE WHEN $7 THEN $5 ELSE image_url END, \
             updated_at = NOW() WHERE id = $1 RETURNING {ARTICLE_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Article>(&sql)
            .bind(id)
            .bind(req.title)
            .bind(req.excerpt.clone().flatten())
            .bind(req.content)
            .bind(req.image_url.clone().flatten())
            .bind(req.excerpt.is_some())
            .bind(req.image_url.is_some())
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_article(&self, id: Uuid) -> AppResult<bool> {
        self.delete_by_id("articles", id).await
    }

    // --- TEAM ---

    async fn list_teams(&self) -> AppResult<Vec<Team>> {
        let sql = format!("SELECT {TEAM_COLUMNS} FROM teams ORDER BY created_at ASC");
        Ok(sqlx::query_as::<_, Team>(&sql).fetch_all(&self.pool).await?)
    }

    async fn get_team(&self, id: Uuid) -> AppResult<Option<Team>> {
        let sql = format!("SELECT {TEAM_COLUMNS} FROM teams WHERE id = $1");
        Ok(sqlx::query_as::<_, Team>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_team(&self, req: CreateTeamRequest, created_by: Uuid) -> AppResult<Team> {
        let sql = format!(
            "INSERT INTO teams (id, created_by, name, position, bio, image_url, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW()) RETURNING {TEAM_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Team>(&sql)
            .bind(Uuid::new_v4())
            .bind(created_by)
            .bind(req.name)
            .bind(req.position)
            .bind(req.bio)
            .bind(req.image_url)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_team(&self, id: Uuid, req: UpdateTeamRequest) -> AppResult<Option<Team>> {
        let sql = format!(
            "UPDATE teams SET name = COALESCE($2, name), position = COALESCE($3, position), \
             bio = CASE WHEN $6 THEN $4 ELSE bio END, \
             image_url = CASE WHEN $7 THEN $5 ELSE image_url END, updated_at = NOW() \
             WHERE id = $1 RETURNING {TEAM_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Team>(&sql)
            .bind(id)
            .bind(req.name)
            .bind(req.position)
            .bind(req.bio.clone().flatten())
            .bind(req.image_url.clone().flatten())
            .bind(req.bio.is_some())
            .bind(req.image_url.is_some())
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_team(&self, id: Uuid) -> AppResult<bool> {
        self.delete_by_id("teams", id).await
    }

    // --- COMMENTS ---

    async fn list_comments(&self, article_id: Uuid) -> AppResult<Vec<Comment>> {
        let sql = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE article_id = $1 ORDER BY created_at ASC"
        );
        Ok(sqlx::query_as::<_, Comment>(&sql)
            .bind(article_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_comment(&self, id: Uuid) -> AppResult<Option<Comment>> {
        let sql = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1");
        Ok(sqlx::query_as::<_, Comment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_comment(&self, article_id: Uuid, author_id: Uuid, content: String) -> AppResult<Comment> {
        let sql = format!(
            "INSERT INTO comments (id, article_id, author_id, content, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, NOW(), NOW()) RETURNING {COMMENT_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Comment>(&sql)
            .bind(Uuid::new_v4())
            .bind(article_id)
            .bind(author_id)
            .bind(content)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_comment(&self, id: Uuid, content: String) -> AppResult<Option<Comment>> {
        let sql = format!(
            "UPDATE comments SET content = $2, updated_at = NOW() WHERE id = $1 RETURNING {COMMENT_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Comment>(&sql)
            .bind(id)
            .bind(content)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_comment(&self, id: Uuid) -> AppResult<bool> {
        self.delete_by_id("comments", id).await
    }

    // --- INQUIRIES ---

    async fn list_inquiries(&self, sender: Option<Uuid>) -> AppResult<Vec<Inquiry>> {
        let sql = format!(
            "SELECT {INQUIRY_COLUMNS} FROM inquiries \
             WHERE ($1::uuid IS NULL OR sender_id = $1) ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, Inquiry>(&sql)
            .bind(sender)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_inquiry(&self, id: Uuid) -> AppResult<Option<Inquiry>> {
        let sql = format!("SELECT {INQUIRY_COLUMNS} FROM inquiries WHERE id = $1");
        Ok(sqlx::query_as::<_, Inquiry>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_inquiry(&self, req: CreateInquiryRequest, sender_id: Uuid) -> AppResult<Inquiry> {
        let sql = format!(
            "INSERT INTO inquiries (id, sender_id, subject, message, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, NOW(), NOW()) RETURNING {INQUIRY_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Inquiry>(&sql)
            .bind(Uuid::new_v4())
            .bind(sender_id)
            .bind(req.subject)
            .bind(req.message)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_inquiry(&self, id: Uuid, req: UpdateInquiryRequest) -> AppResult<Option<Inquiry>> {
        let sql = format!(
            "UPDATE inquiries SET subject = COALESCE($2, subject), message = COALESCE($3, message), \
             updated_at = NOW() WHERE id = $1 RETURNING {INQUIRY_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Inquiry>(&sql)
            .bind(id)
            .bind(req.subject)
            .bind(req.message)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_inquiry(&self, id: Uuid) -> AppResult<bool> {
        self.delete_by_id("inquiries", id).await
    }

    // --- CONSULTATIONS ---

    async fn list_consultations(&self, client: Option<Uuid>) -> AppResult<Vec<Consultation>> {
        let sql = format!(
            "SELECT {CONSULTATION_COLUMNS} FROM consultations \
             WHERE ($1::uuid IS NULL OR client_id = $1) ORDER BY scheduled_for ASC"
        );
        Ok(sqlx::query_as::<_, Consultation>(&sql)
            .bind(client)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_consultation(&self, id: Uuid) -> AppResult<Option<Consultation>> {
        let sql = format!("SELECT {CONSULTATION_COLUMNS} FROM consultations WHERE id = $1");
        Ok(sqlx::query_as::<_, Consultation>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_consultation(&self, req: CreateConsultationRequest, client_id: Uuid) -> AppResult<Consultation> {
        let sql = format!(
            "INSERT INTO consultations (id, client_id, topic, scheduled_for, notes, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW()) RETURNING {CONSULTATION_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Consultation>(&sql)
            .bind(Uuid::new_v4())
            .bind(client_id)
            .bind(req.topic)
            .bind(req.scheduled_for)
            .bind(req.notes)
            .bind(ConsultationStatus::Pending)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_consultation(&self, id: Uuid, req: UpdateConsultationRequest) -> AppResult<Option<Consultation>> {
        let sql = format!(
            "UPDATE consultations SET topic = COALESCE($2, topic), \
             scheduled_for = COALESCE($3, scheduled_for), \
             notes = CASE WHEN $5 THEN $4 ELSE notes END, \
             updated_at = NOW() WHERE id = $1 RETURNING {CONSULTATION_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Consultation>(&sql)
            .bind(id)
            .bind(req.topic)
            .bind(req.scheduled_for)
            .bind(req.notes.clone().flatten())
            .bind(req.notes.is_some())
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn set_consultation_status(&self, id: Uuid, status: ConsultationStatus) -> AppResult<Option<Consultation>> {
        let sql = format!(
            "UPDATE consultations SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {CONSULTATION_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Consultation>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_consultation(&self, id: Uuid) -> AppResult<bool> {
        self.delete_by_id("consultations", id).await
    }

    // --- MESSAGES ---

    async fn list_messages(&self, user_id: Uuid) -> AppResult<Vec<Message>> {
        let sql = format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages \
             WHERE sender_id = $1 OR recipient_id = $1 ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, Message>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_message(&self, id: Uuid) -> AppResult<Option<Message>> {
        let sql = format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = $1");
        Ok(sqlx::query_as::<_, Message>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_message(&self, req: CreateMessageRequest, sender_id: Uuid) -> AppResult<Message> {
        let sql = format!(
            "INSERT INTO messages (id, sender_id, recipient_id, body, is_read, created_at) \
             VALUES ($1, $2, $3, $4, FALSE, NOW()) RETURNING {MESSAGE_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Message>(&sql)
            .bind(Uuid::new_v4())
            .bind(sender_id)
            .bind(req.recipient_id)
            .bind(req.body)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn mark_message_read(&self, id: Uuid) -> AppResult<Option<Message>> {
        let sql = format!("UPDATE messages SET is_read = TRUE WHERE id = $1 RETURNING {MESSAGE_COLUMNS}");
        Ok(sqlx::query_as::<_, Message>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_message(&self, id: Uuid) -> AppResult<bool> {
        self.delete_by_id("messages", id).await
    }

    async fn count_unread_messages(&self, recipient_id: Uuid) -> AppResult<i64> {
        Ok(sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM messages WHERE recipient_id = $1 AND is_read = FALSE",
        )
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await?)
    }

    // --- CONTACTS ---

    async fn list_contacts(&self) -> AppResult<Vec<Contact>> {
        let sql = format!("SELECT {CONTACT_COLUMNS} FROM contacts ORDER BY created_at DESC");
        Ok(sqlx::query_as::<_, Contact>(&sql).fetch_all(&self.pool).await?)
    }

    async fn get_contact(&self, id: Uuid) -> AppResult<Option<Contact>> {
        let sql = format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = $1");
        Ok(sqlx::query_as::<_, Contact>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_contact(&self, req: CreateContactRequest, user_id: Option<Uuid>) -> AppResult<Contact> {
        let sql = format!(
            "INSERT INTO contacts (id, user_id, name, email, phone, message, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, NOW()) RETURNING {CONTACT_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Contact>(&sql)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(req.name)
            .bind(req.email)
            .bind(req.phone)
            .bind(req.message)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn delete_contact(&self, id: Uuid) -> AppResult<bool> {
        self.delete_by_id("contacts", id).await
    }

    // --- DASHBOARD ---

    /// get_stats
    ///
    /// Compiles the admin dashboard counters.
    async fn get_stats(&self) -> AppResult<AdminDashboardStats> {
        let total_clients = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(Role::Client)
            .fetch_one(&self.pool)
            .await?;
        let pending_consultations =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM consultations WHERE status = $1")
                .bind(ConsultationStatus::Pending)
                .fetch_one(&self.pool)
                .await?;

        Ok(AdminDashboardStats {
            total_users: self.count("SELECT COUNT(*) FROM users").await?,
            total_clients,
            total_stories: self.count("SELECT COUNT(*) FROM stories").await?,
            total_articles: self.count("SELECT COUNT(*) FROM articles").await?,
            total_team_members: self.count("SELECT COUNT(*) FROM teams").await?,
            total_inquiries: self.count("SELECT COUNT(*) FROM inquiries").await?,
            total_contacts: self.count("SELECT COUNT(*) FROM contacts").await?,
            pending_consultations,
        })
    }
}
