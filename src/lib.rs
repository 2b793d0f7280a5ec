use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Identity: session tokens, password hashing, extractors and the page gate.
pub mod auth;
pub mod gate;
pub mod password;
pub mod session;

// Core application services and components.
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod validation;

// Module for routing segregation (Public, Authenticated, Admin).
pub mod routes;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use repository::{InMemoryRepository, PostgresRepository, RepositoryState};

/// ApiDoc
///
/// OpenAPI document aggregated from the `#[utoipa::path]` handlers and `ToSchema` models.
/// Served at `/api-docs/openapi.json`, browsable at `/swagger-ui`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::pages::login_page, handlers::pages::register_page,
        handlers::account::register_user, handlers::account::login, handlers::account::logout,
        handlers::account::get_me, handlers::account::update_me, handlers::account::change_password,
        handlers::account::list_users,
        handlers::dashboard::admin_dashboard, handlers::dashboard::client_dashboard,
        handlers::stories::list_stories, handlers::stories::get_story, handlers::stories::create_story,
        handlers::stories::update_story, handlers::stories::delete_story,
        handlers::articles::list_articles, handlers::articles::get_article,
        handlers::articles::create_article, handlers::articles::update_article,
        handlers::articles::delete_article,
        handlers::teams::list_teams, handlers::teams::get_team, handlers::teams::create_team,
        handlers::teams::update_team, handlers::teams::delete_team,
        handlers::comments::list_comments, handlers::comments::create_comment,
        handlers::comments::update_comment, handlers::comments::delete_comment,
        handlers::inquiries::list_inquiries, handlers::inquiries::get_inquiry,
        handlers::inquiries::create_inquiry, handlers::inquiries::update_inquiry,
        handlers::inquiries::delete_inquiry,
        handlers::consultations::list_consultations, handlers::consultations::get_consultation,
        handlers::consultations::create_consultation, handlers::consultations::update_consultation,
        handlers::consultations::set_consultation_status,
        handlers::consultations::delete_consultation,
        handlers::messages::list_messages, handlers::messages::get_message,
        handlers::messages::send_message, handlers::messages::mark_message_read,
        handlers::messages::delete_message,
        handlers::contacts::submit_contact, handlers::contacts::list_contacts,
        handlers::contacts::get_contact, handlers::contacts::delete_contact,
    ),
    components(
        schemas(
            models::Role, models::ConsultationStatus, models::UserProfile,
            models::RegisterUserRequest, models::LoginRequest, models::LoginResponse,
            models::UpdateProfileRequest, models::ChangePasswordRequest,
            models::Story, models::CreateStoryRequest, models::UpdateStoryRequest,
            models::Article, models::CreateArticleRequest, models::UpdateArticleRequest,
            models::Team, models::CreateTeamRequest, models::UpdateTeamRequest,
            models::Comment, models::CommentRequest,
            models::Inquiry, models::CreateInquiryRequest, models::UpdateInquiryRequest,
            models::Consultation, models::CreateConsultationRequest,
            models::UpdateConsultationRequest, models::UpdateConsultationStatusRequest,
            models::Message, models::CreateMessageRequest,
            models::Contact, models::CreateContactRequest,
            models::AdminDashboardStats, models::ClientDashboard, models::PageDescriptor,
            error::ErrorBody, error::FieldError,
        )
    ),
    tags(
        (name = "consult-portal", description = "Consulting site backend API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single shared state: the store behind its trait object and the immutable config.
#[derive(Clone)]
pub struct AppState {
    pub repo: RepositoryState,
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles routing, access layers and the observability stack.
///
/// Order of checks for a request:
/// 1. request id, trace span, CORS (outermost),
/// 2. the request gate (page paths only; redirects),
/// 3. the route layer of the matched router (`require_session` / `require_admin`),
/// 4. the handler (ownership checks, validation).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth::require_session,
            )),
        )
        .merge(
            admin::admin_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth::require_admin,
            )),
        )
        // Applied to every path, matched or not, so unknown `/admin/...` paths are gated too.
        .layer(middleware::from_fn_with_state(state.clone(), gate::request_gate))
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for `TraceLayer`: method, uri and the `x-request-id` set by `SetRequestIdLayer`, so
/// every log line of one request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
