use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::error::AppError;

// --- Core Records ---

/// Role
///
/// The RBAC field of a user. Every self-registered account is a `Student`;
/// administrators only exist through seeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    #[default]
    Student,
    Admin,
}

/// User
///
/// A directory entry. Email is the lookup key for login; uniqueness is only
/// checked when registering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ItemType {
    #[default]
    Lost,
    Found,
}

/// ItemStatus
///
/// Lifecycle stage of a report: pending → verified → resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ItemStatus {
    #[default]
    Pending,
    Verified,
    Resolved,
}

impl ItemStatus {
    /// The status changes an administrator is offered for an item in this state.
    /// Resolved items get none, although the repository itself accepts any write.
    pub fn admin_actions(self) -> Vec<ItemStatus> {
        match self {
            ItemStatus::Pending => vec![ItemStatus::Verified, ItemStatus::Resolved],
            ItemStatus::Verified => vec![ItemStatus::Resolved],
            ItemStatus::Resolved => vec![],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Verified => "verified",
            ItemStatus::Resolved => "resolved",
        }
    }
}

/// Item
///
/// A single lost/found report. `user_id`/`user_name` are a snapshot of the
/// reporter taken at creation time and are never refreshed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Item {
    #[ts(type = "number")]
    pub id: u64,
    pub user_id: String,
    pub user_name: String,
    pub item_name: String,

    // 'type' is a reserved keyword in Rust; it keeps its name on the wire.
    #[serde(rename = "type")]
    pub item_type: ItemType,

    pub description: String,

    // Day the item was lost or found, as opposed to when it was reported.
    #[ts(type = "string")]
    pub date: NaiveDate,
    pub location: String,

    // Opaque preview URL supplied by the client. Nothing is uploaded.
    pub image_url: Option<String>,
    pub contact_info: String,
    pub status: ItemStatus,

    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,

    // Last administrator to change the status. Absent until the first update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_id: Option<String>,
}

// --- Request Payloads (Input Schemas) ---

/// RegisterRequest
///
/// Input payload for POST /auth/register. The password is accepted but never stored.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_password: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Name is required".into()));
        }
        if let Some(confirm) = &self.confirm_password {
            if confirm != &self.password {
                return Err(AppError::Validation("Passwords do not match".into()));
            }
        }
        require_credentials(&self.email, &self.password)
    }
}

/// LoginRequest
///
/// Input payload for POST /auth/login and POST /auth/admin/login.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_credentials(&self.email, &self.password)
    }
}

fn require_credentials(email: &str, password: &str) -> Result<(), AppError> {
    if email.trim().is_empty() {
        return Err(AppError::Validation("Email is required".into()));
    }
    if password.is_empty() {
        return Err(AppError::Validation("Password is required".into()));
    }
    Ok(())
}

/// NewItemRequest
///
/// Input payload for reporting an item (POST /items). Everything the repository
/// assigns itself (id, reporter, status, createdAt) is absent here.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewItemRequest {
    pub item_name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[serde(default)]
    pub description: String,
    // Defaults to the day of the report.
    #[serde(default)]
    #[ts(type = "string | null")]
    pub date: Option<NaiveDate>,
    pub location: String,
    #[serde(default)]
    pub image_url: Option<String>,
    // Defaults to the reporter's email.
    #[serde(default)]
    pub contact_info: Option<String>,
}

impl NewItemRequest {
    /// Fills the reporter-derived defaults and checks the required fields.
    pub fn normalize(mut self, reporter: &User) -> Result<Self, AppError> {
        if self.contact_info.is_none() {
            self.contact_info = Some(reporter.email.clone());
        }
        if self.item_name.trim().is_empty() {
            return Err(AppError::Validation("Item name is required".into()));
        }
        if self.location.trim().is_empty() {
            return Err(AppError::Validation("Location is required".into()));
        }
        if self.contact_info.as_deref().is_none_or(|c| c.trim().is_empty()) {
            return Err(AppError::Validation(
                "Contact information is required".into(),
            ));
        }
        Ok(self)
    }
}

/// UpdateStatusRequest
///
/// Input payload for the admin status endpoint (PUT /admin/items/{id}/status).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UpdateStatusRequest {
    pub status: ItemStatus,
}

// --- Responses (Output Schemas) ---

/// SessionResponse
///
/// Returned by login and registration: the bearer token for subsequent requests
/// and the user record the session was opened for.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SessionResponse {
    pub token: String,
    pub user: User,
}

/// AdminItem
///
/// One row of the moderation listing: the item plus the status changes the
/// dashboard should offer for it.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AdminItem {
    pub item: Item,
    pub actions: Vec<ItemStatus>,
}

impl From<Item> for AdminItem {
    fn from(item: Item) -> Self {
        let actions = item.status.admin_actions();
        Self { item, actions }
    }
}

/// AdminDashboardStats
///
/// Output schema for GET /admin/stats.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AdminDashboardStats {
    pub total_items: usize,
    pub total_users: usize,
    pub pending: usize,
    pub verified: usize,
    pub resolved: usize,
    pub lost: usize,
    pub found: usize,
}
