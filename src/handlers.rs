use crate::{
    AppState,
    auth::{AdminUser, AuthUser, issue_token},
    error::{AppError, ErrorBody},
    filter::{ItemFilter, SearchScope, filter_items, status_counts},
    models::{
        AdminDashboardStats, AdminItem, Item, LoginRequest, NewItemRequest, RegisterRequest,
        SessionResponse, UpdateStatusRequest, User,
    },
    session::Session,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

fn session_response(state: &AppState, session: Session) -> Result<SessionResponse, AppError> {
    let token = issue_token(&state.config, &session)?;
    Ok(SessionResponse {
        token,
        user: session.user,
    })
}

// --- Session Handlers ---

/// register
///
/// [Public Route] Creates a student account and logs it in straight away.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered and logged in", body = SessionResponse),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 409, description = "Email already in use", body = ErrorBody)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    payload.validate()?;
    let session = state
        .sessions
        .register(&payload.name, &payload.email, &payload.password)
        .await?;
    Ok((StatusCode::CREATED, Json(session_response(&state, session)?)))
}

/// login
///
/// [Public Route] Opens a session for an existing email. Unknown email and any other
/// failure look the same to the client.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = SessionResponse),
        (status = 401, description = "Invalid email or password", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    payload.validate()?;
    let session = state
        .sessions
        .login(&payload.email, &payload.password, false)
        .await?;
    Ok(Json(session_response(&state, session)?))
}

/// admin_login
///
/// [Public Route] Same as `login`, but only succeeds for administrator accounts.
#[utoipa::path(
    post,
    path = "/auth/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = SessionResponse),
        (status = 401, description = "Invalid credentials or not an administrator", body = ErrorBody)
    )
)]
pub async fn admin_login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    payload.validate()?;
    let session = state
        .sessions
        .login(&payload.email, &payload.password, true)
        .await?;
    Ok(Json(session_response(&state, session)?))
}

/// logout
///
/// [Authenticated Route] Closes the caller's session; its token stops working.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 204, description = "Logged out"))
)]
pub async fn logout(
    AuthUser { session_id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    // Header-bypass requests have no session to close.
    if let Some(id) = session_id {
        state.sessions.logout(id).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// get_me
///
/// [Authenticated Route] The user record of the current session.
#[utoipa::path(
    get,
    path = "/me",
    responses((status = 200, description = "Current user", body = User))
)]
pub async fn get_me(AuthUser { user, .. }: AuthUser) -> Json<User> {
    Json(user)
}

// --- Item Handlers ---

/// get_items
///
/// [Public Route] Browse all reports with search and type/status filters.
#[utoipa::path(
    get,
    path = "/items",
    params(ItemFilter),
    responses((status = 200, description = "Filtered items", body = [Item]))
)]
pub async fn get_items(
    State(state): State<AppState>,
    Query(filter): Query<ItemFilter>,
) -> Json<Vec<Item>> {
    let items = state.items.list_all().await;
    Json(filter_items(&items, &filter, SearchScope::Listing))
}

/// get_my_items
///
/// [Authenticated Route] The caller's own reports, with the same filters as the listing.
#[utoipa::path(
    get,
    path = "/me/items",
    params(ItemFilter),
    responses((status = 200, description = "My items", body = [Item]))
)]
pub async fn get_my_items(
    AuthUser { user, .. }: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<ItemFilter>,
) -> Json<Vec<Item>> {
    let items = state.items.list_for_user(&user.id).await;
    Json(filter_items(&items, &filter, SearchScope::Listing))
}

/// get_item
///
/// [Authenticated Route] Detail view of any item. A missing id answers 404 with a
/// redirect back to the listing.
#[utoipa::path(
    get,
    path = "/items/{id}",
    params(("id" = u64, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Found", body = Item),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn get_item(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Item>, AppError> {
    state
        .items
        .get_item_by_id(id)
        .await
        .map(Json)
        .ok_or(AppError::ItemNotFound(id))
}

/// create_item
///
/// [Authenticated Route] Report a lost or found item. The reporter is always the
/// session user, never a field of the payload.
#[utoipa::path(
    post,
    path = "/items",
    request_body = NewItemRequest,
    responses(
        (status = 201, description = "Reported", body = Item),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 409, description = "A report from this user is already being submitted", body = ErrorBody)
    )
)]
pub async fn create_item(
    AuthUser { user, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<NewItemRequest>,
) -> Result<(StatusCode, Json<Item>), AppError> {
    let item = state.items.add_item(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

// --- Admin Handlers ---

/// get_admin_items
///
/// [Admin Route] Moderation listing. The text query also matches the reporter's name,
/// and every row carries the status changes still available for it.
#[utoipa::path(
    get,
    path = "/admin/items",
    params(ItemFilter),
    responses((status = 200, description = "All items", body = [AdminItem]))
)]
pub async fn get_admin_items(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(filter): Query<ItemFilter>,
) -> Json<Vec<AdminItem>> {
    let items = state.items.list_all().await;
    Json(
        filter_items(&items, &filter, SearchScope::Moderation)
            .into_iter()
            .map(AdminItem::from)
            .collect(),
    )
}

/// get_admin_stats
///
/// [Admin Route] Item counts per status and type, plus the directory size.
#[utoipa::path(
    get,
    path = "/admin/stats",
    responses((status = 200, description = "Stats", body = AdminDashboardStats))
)]
pub async fn get_admin_stats(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Json<AdminDashboardStats> {
    let items = state.items.list_all().await;
    let mut stats = status_counts(&items);
    stats.total_users = state.sessions.directory().len().await;
    Json(stats)
}

/// update_item_status
///
/// [Admin Route] Verify or resolve an item. The repository performs the role check
/// itself; this handler only forwards the caller.
#[utoipa::path(
    put,
    path = "/admin/items/{id}/status",
    params(("id" = u64, Path, description = "Item ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated", body = Item),
        (status = 403, description = "Not an administrator", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody),
        (status = 409, description = "Update already in progress", body = ErrorBody)
    )
)]
pub async fn update_item_status(
    AuthUser { user, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Item>, AppError> {
    let item = state
        .items
        .update_item_status(id, payload.status, &user)
        .await?;
    Ok(Json(item))
}
