use axum::Json;

use crate::models::PageDescriptor;

fn page(name: &str, action: &str) -> Json<PageDescriptor> {
    Json(PageDescriptor {
        page: name.to_string(),
        action: action.to_string(),
    })
}

/// login_page
///
/// [Public Page] Only reached without a session; signed-in visitors are redirected home.
#[utoipa::path(
    get,
    path = "/login",
    responses(
        (status = 200, description = "Login page", body = PageDescriptor),
        (status = 307, description = "Already signed in")
    )
)]
pub async fn login_page() -> Json<PageDescriptor> {
    page("login", "/login")
}

#[utoipa::path(
    get,
    path = "/register",
    responses(
        (status = 200, description = "Registration page", body = PageDescriptor),
        (status = 307, description = "Already signed in")
    )
)]
pub async fn register_page() -> Json<PageDescriptor> {
    page("register", "/register")
}
