/// Router Module Index
///
/// Routes are split by the access level the route layer enforces. Page paths
/// (`/login`, `/register`, `/admin/...`, `/client/...`) are additionally screened by the
/// request gate, which is applied to the whole router in `create_router`.

/// No session required. Public pages, read-only content and the contact form.
pub mod public;

/// Wrapped in `require_session`: 401 before the handler runs when there is no valid session.
pub mod authenticated;

/// Wrapped in `require_admin`: 401 without a session, 403 for any role but ADMIN.
pub mod admin;
