use axum::{Json, extract::State};

use super::found;
use crate::{
    AppState,
    auth::AuthUser,
    error::AppResult,
    models::{AdminDashboardStats, ClientDashboard},
};

/// admin_dashboard
///
/// [Protected Admin Page] Site-wide counters.
#[utoipa::path(
    get,
    path = "/admin/dashboard",
    responses(
        (status = 200, description = "Dashboard counters", body = AdminDashboardStats),
        (status = 307, description = "No session, or not an admin")
    )
)]
pub async fn admin_dashboard(State(state): State<AppState>) -> AppResult<Json<AdminDashboardStats>> {
    Ok(Json(state.repo.get_stats().await?))
}

/// client_dashboard
///
/// [Protected Client Page] The signed-in user's profile, bookings, inquiries and unread count.
#[utoipa::path(
    get,
    path = "/client/dashboard",
    responses(
        (status = 200, description = "The caller's dashboard", body = ClientDashboard),
        (status = 307, description = "No session")
    )
)]
pub async fn client_dashboard(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ClientDashboard>> {
    let profile = found(state.repo.get_user(id).await?)?;
    let inquiries = state.repo.list_inquiries(Some(id)).await?;
    let consultations = state.repo.list_consultations(Some(id)).await?;
    let unread_messages = state.repo.count_unread_messages(id).await?;

    Ok(Json(ClientDashboard {
        profile: profile.into(),
        inquiries,
        consultations,
        unread_messages,
    }))
}
