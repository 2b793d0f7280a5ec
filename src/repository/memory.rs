use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::{
        AdminDashboardStats, Article, Comment, Consultation, ConsultationStatus, Contact,
        CreateArticleRequest, CreateConsultationRequest, CreateContactRequest,
        CreateInquiryRequest, CreateMessageRequest, CreateStoryRequest, CreateTeamRequest,
        Inquiry, Message, NewUser, Role, Story, Team, UpdateArticleRequest,
        UpdateConsultationRequest, UpdateInquiryRequest, UpdateProfileRequest,
        UpdateStoryRequest, UpdateTeamRequest, User,
    },
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    stories: Vec<Story>,
    articles: Vec<Article>,
    teams: Vec<Team>,
    comments: Vec<Comment>,
    inquiries: Vec<Inquiry>,
    consultations: Vec<Consultation>,
    messages: Vec<Message>,
    contacts: Vec<Contact>,
}

/// InMemoryRepository
///
/// `Repository` kept entirely in process memory. Backs the test suite and local runs
/// without `DATABASE_URL`. Rows are kept in insertion order; every operation takes the
/// lock once, so each call is atomic like a single-statement query.
#[derive(Default)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first.
fn newest_first<T: Clone>(rows: impl DoubleEndedIterator<Item = T>) -> Vec<T> {
    rows.rev().collect()
}

fn remove_by<T>(rows: &mut Vec<T>, pred: impl Fn(&T) -> bool) -> bool {
    let before = rows.len();
    rows.retain(|row| !pred(row));
    rows.len() != before
}

// Absent keeps the slot. For nullable columns `T` is itself an `Option`, so `Some(None)` clears.
fn set_if_some<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    // --- USERS ---

    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        let mut tables = self.tables.write();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::AlreadyExists("user".to_string()));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.tables.read().users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.tables.read().users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        Ok(newest_first(self.tables.read().users.iter().cloned()))
    }

    async fn update_user_profile(&self, id: Uuid, req: UpdateProfileRequest) -> AppResult<Option<User>> {
        let mut tables = self.tables.write();
        if let Some(email) = &req.email {
            if tables.users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(AppError::AlreadyExists("user".to_string()));
            }
        }
        let Some(user) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        set_if_some(&mut user.name, req.name);
        set_if_some(&mut user.email, req.email);
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: String) -> AppResult<bool> {
        let mut tables = self.tables.write();
        match tables.users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.password_hash = password_hash;
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // --- STORIES ---

    async fn list_stories(&self) -> AppResult<Vec<Story>> {
        Ok(newest_first(self.tables.read().stories.iter().cloned()))
    }

    async fn get_story(&self, id: Uuid) -> AppResult<Option<Story>> {
        Ok(self.tables.read().stories.iter().find(|s| s.id == id).cloned())
    }

    async fn create_story(&self, req: CreateStoryRequest, author_id: Uuid) -> AppResult<Story> {
        let now = Utc::now();
        let story = Story {
            id: Uuid::new_v4(),
            author_id,
            title: req.title,
            content: req.content,
            image_url: req.image_url,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().stories.push(story.clone());
        Ok(story)
    }

    async fn update_story(&self, id: Uuid, req: UpdateStoryRequest) -> AppResult<Option<Story>> {
        let mut tables = self.tables.write();
        let Some(story) = tables.stories.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        set_if_some(&mut story.title, req.title);
        set_if_some(&mut story.content, req.content);
        set_if_some(&mut story.image_url, req.image_url);
        story.updated_at = Utc::now();
        Ok(Some(story.clone()))
    }

    async fn delete_story(&self, id: Uuid) -> AppResult<bool> {
        Ok(remove_by(&mut self.tables.write().stories, |s| s.id == id))
    }

    // --- ARTICLES ---

    async fn list_articles(&self) -> AppResult<Vec<Article>> {
        Ok(newest_first(self.tables.read().articles.iter().cloned()))
    }

    async fn get_article(&self, id: Uuid) -> AppResult<Option<Article>> {
        Ok(self.tables.read().articles.iter().find(|a| a.id == id).cloned())
    }

    async fn create_article(&self, req: CreateArticleRequest, author_id: Uuid) -> AppResult<Article> {
        let now = Utc::now();
        let article = Article {
            id: Uuid::new_v4(),
            author_id,
            title: req.title,
            excerpt: req.excerpt,
            content: req.content,
            image_url: req.image_url,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().articles.push(article.clone());
        Ok(article)
    }

    async fn update_article(&self, id: Uuid, req: UpdateArticleRequest) -> AppResult<Option<Article>> {
        let mut tables = self.tables.write();
        let Some(article) = tables.articles.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        set_if_some(&mut article.title, req.title);
        set_if_some(&mut article.content, req.content);
        set_if_some(&mut article.excerpt, req.excerpt);
        set_if_some(&mut article.image_url, req.image_url);
        article.updated_at = Utc::now();
        Ok(Some(article.clone()))
    }

    /// Comments go with their article, as `ON DELETE CASCADE` does in Postgres.
    async fn delete_article(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write();
        let removed = remove_by(&mut tables.articles, |a| a.id == id);
        if removed {
            tables.comments.retain(|c| c.article_id != id);
        }
        Ok(removed)
    }

    // --- TEAM ---

    async fn list_teams(&self) -> AppResult<Vec<Team>> {
        // Team page reads in the order members were added.
        Ok(self.tables.read().teams.clone())
    }

    async fn get_team(&self, id: Uuid) -> AppResult<Option<Team>> {
        Ok(self.tables.read().teams.iter().find(|t| t.id == id).cloned())
    }

    async fn create_team(&self, req: CreateTeamRequest, created_by: Uuid) -> AppResult<Team> {
        let now = Utc::now();
        let team = Team {
            id: Uuid::new_v4(),
            created_by,
            name: req.name,
            position: req.position,
            bio: req.bio,
            image_url: req.image_url,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().teams.push(team.clone());
        Ok(team)
    }

    async fn update_team(&self, id: Uuid, req: UpdateTeamRequest) -> AppResult<Option<Team>> {
        let mut tables = self.tables.write();
        let Some(team) = tables.teams.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        set_if_some(&mut team.name, req.name);
        set_if_some(&mut team.position, req.position);
        set_if_some(&mut team.bio, req.bio);
        set_if_some(&mut team.image_url, req.image_url);
        team.updated_at = Utc::now();
        Ok(Some(team.clone()))
    }

    async fn delete_team(&self, id: Uuid) -> AppResult<bool> {
        Ok(remove_by(&mut self.tables.write().teams, |t| t.id == id))
    }

    // --- COMMENTS ---

    async fn list_comments(&self, article_id: Uuid) -> AppResult<Vec<Comment>> {
        Ok(self
            .tables
            .read()
            .comments
            .iter()
            .filter(|c| c.article_id == article_id)
            .cloned()
            .collect())
    }

    async fn get_comment(&self, id: Uuid) -> AppResult<Option<Comment>> {
        Ok(self.tables.read().comments.iter().find(|c| c.id == id).cloned())
    }

    async fn create_comment(&self, article_id: Uuid, author_id: Uuid, content: String) -> AppResult<Comment> {
        let mut tables = self.tables.write();
        if !tables.articles.iter().any(|a| a.id == article_id) {
            return Err(AppError::NotFound);
        }
        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            article_id,
            author_id,
            content,
            created_at: now,
            updated_at: now,
        };
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn update_comment(&self, id: Uuid, content: String) -> AppResult<Option<Comment>> {
        let mut tables = self.tables.write();
        let Some(comment) = tables.comments.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        comment.content = content;
        comment.updated_at = Utc::now();
        Ok(Some(comment.clone()))
    }

    async fn delete_comment(&self, id: Uuid) -> AppResult<bool> {
        Ok(remove_by(&mut self.tables.write().comments, |c| c.id == id))
    }

    // --- INQUIRIES ---

    async fn list_inquiries(&self, sender: Option<Uuid>) -> AppResult<Vec<Inquiry>> {
        let tables = self.tables.read();
        Ok(newest_first(
            tables
                .inquiries
                .iter()
                .filter(|i| sender.is_none_or(|s| i.sender_id == s))
                .cloned(),
        ))
    }

    async fn get_inquiry(&self, id: Uuid) -> AppResult<Option<Inquiry>> {
        Ok(self.tables.read().inquiries.iter().find(|i| i.id == id).cloned())
    }

    async fn create_inquiry(&self, req: CreateInquiryRequest, sender_id: Uuid) -> AppResult<Inquiry> {
        let now = Utc::now();
        let inquiry = Inquiry {
            id: Uuid::new_v4(),
            sender_id,
            subject: req.subject,
            message: req.message,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().inquiries.push(inquiry.clone());
        Ok(inquiry)
    }

    async fn update_inquiry(&self, id: Uuid, req: UpdateInquiryRequest) -> AppResult<Option<Inquiry>> {
        let mut tables = self.tables.write();
        let Some(inquiry) = tables.inquiries.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };
        set_if_some(&mut inquiry.subject, req.subject);
        set_if_some(&mut inquiry.message, req.message);
        inquiry.updated_at = Utc::now();
        Ok(Some(inquiry.clone()))
    }

    async fn delete_inquiry(&self, id: Uuid) -> AppResult<bool> {
        Ok(remove_by(&mut self.tables.write().inquiries, |i| i.id == id))
    }

    // --- CONSULTATIONS ---

    async fn list_consultations(&self, client: Option<Uuid>) -> AppResult<Vec<Consultation>> {
        let mut rows: Vec<Consultation> = self
            .tables
            .read()
            .consultations
            .iter()
            .filter(|c| client.is_none_or(|id| c.client_id == id))
            .cloned()
            .collect();
        rows.sort_by_key(|c| c.scheduled_for);
        Ok(rows)
    }

    async fn get_consultation(&self, id: Uuid) -> AppResult<Option<Consultation>> {
        Ok(self.tables.read().consultations.iter().find(|c| c.id == id).cloned())
    }

    async fn create_consultation(&self, req: CreateConsultationRequest, client_id: Uuid) -> AppResult<Consultation> {
        let now = Utc::now();
        let consultation = Consultation {
            id: Uuid::new_v4(),
            client_id,
            topic: req.topic,
            scheduled_for: req.scheduled_for,
            notes: req.notes,
            status: ConsultationStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().consultations.push(consultation.clone());
        Ok(consultation)
    }

    async fn update_consultation(&self, id: Uuid, req: UpdateConsultationRequest) -> AppResult<Option<Consultation>> {
        let mut tables = self.tables.write();
        let Some(consultation) = tables.consultations.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        set_if_some(&mut consultation.topic, req.topic);
        set_if_some(&mut consultation.scheduled_for, req.scheduled_for);
        set_if_some(&mut consultation.notes, req.notes);
        consultation.updated_at = Utc::now();
        Ok(Some(consultation.clone()))
    }

    async fn set_consultation_status(&self, id: Uuid, status: ConsultationStatus) -> AppResult<Option<Consultation>> {
        let mut tables = self.tables.write();
        let Some(consultation) = tables.consultations.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        consultation.status = status;
        consultation.updated_at = Utc::now();
        Ok(Some(consultation.clone()))
    }

    async fn delete_consultation(&self, id: Uuid) -> AppResult<bool> {
        Ok(remove_by(&mut self.tables.write().consultations, |c| c.id == id))
    }

    // --- MESSAGES ---

    async fn list_messages(&self, user_id: Uuid) -> AppResult<Vec<Message>> {
        let tables = self.tables.read();
        Ok(newest_first(
            tables
                .messages
                .iter()
                .filter(|m| m.sender_id == user_id || m.recipient_id == user_id)
                .cloned(),
        ))
    }

    async fn get_message(&self, id: Uuid) -> AppResult<Option<Message>> {
        Ok(self.tables.read().messages.iter().find(|m| m.id == id).cloned())
    }

    async fn create_message(&self, req: CreateMessageRequest, sender_id: Uuid) -> AppResult<Message> {
        let mut tables = self.tables.write();
        if !tables.users.iter().any(|u| u.id == req.recipient_id) {
            return Err(AppError::NotFound);
        }
        let message = Message {
            id: Uuid::new_v4(),
            sender_id,
            recipient_id: req.recipient_id,
            body: req.body,
            is_read: false,
            created_at: Utc::now(),
        };
        tables.messages.push(message.clone());
        Ok(message)
    }

    async fn mark_message_read(&self, id: Uuid) -> AppResult<Option<Message>> {
        let mut tables = self.tables.write();
        let Some(message) = tables.messages.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };
        message.is_read = true;
        Ok(Some(message.clone()))
    }

    async fn delete_message(&self, id: Uuid) -> AppResult<bool> {
        Ok(remove_by(&mut self.tables.write().messages, |m| m.id == id))
    }

    async fn count_unread_messages(&self, recipient_id: Uuid) -> AppResult<i64> {
        let tables = self.tables.read();
        Ok(tables
            .messages
            .iter()
            .filter(|m| m.recipient_id == recipient_id && !m.is_read)
            .count() as i64)
    }

    // --- CONTACTS ---

    async fn list_contacts(&self) -> AppResult<Vec<Contact>> {
        Ok(newest_first(self.tables.read().contacts.iter().cloned()))
    }

    async fn get_contact(&self, id: Uuid) -> AppResult<Option<Contact>> {
        Ok(self.tables.read().contacts.iter().find(|c| c.id == id).cloned())
    }

    async fn create_contact(&self, req: CreateContactRequest, user_id: Option<Uuid>) -> AppResult<Contact> {
        let contact = Contact {
            id: Uuid::new_v4(),
            user_id,
            name: req.name,
            email: req.email,
            phone: req.phone,
            message: req.message,
            created_at: Utc::now(),
        };
        self.tables.write().contacts.push(contact.clone());
        Ok(contact)
    }

    async fn delete_contact(&self, id: Uuid) -> AppResult<bool> {
        Ok(remove_by(&mut self.tables.write().contacts, |c| c.id == id))
    }

    // --- DASHBOARD ---

    async fn get_stats(&self) -> AppResult<AdminDashboardStats> {
        let tables = self.tables.read();
        let count = |n: usize| n as i64;
        Ok(AdminDashboardStats {
            total_users: count(tables.users.len()),
            total_clients: count(tables.users.iter().filter(|u| u.role == Role::Client).count()),
            total_stories: count(tables.stories.len()),
            total_articles: count(tables.articles.len()),
            total_team_members: count(tables.teams.len()),
            total_inquiries: count(tables.inquiries.len()),
            total_contacts: count(tables.contacts.len()),
            pending_consultations: count(
                tables
                    .consultations
                    .iter()
                    .filter(|c| c.status == ConsultationStatus::Pending)
                    .count(),
            ),
        })
    }
}
