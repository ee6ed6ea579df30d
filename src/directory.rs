use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

use crate::{
    error::AppError,
    models::{Role, User},
};

/// UserDirectory
///
/// In-memory list of known users in insertion order.
pub struct UserDirectory {
    users: RwLock<Vec<User>>,
    next_id: AtomicU64,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::with_users(Vec::new())
    }

    /// Builds a directory from seed records. New ids continue after the highest
    /// numeric seed id so they are never handed out twice.
    pub fn with_users(users: Vec<User>) -> Self {
        let highest = users
            .iter()
            .filter_map(|u| u.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            users: RwLock::new(users),
            next_id: AtomicU64::new(highest + 1),
        }
    }

    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        self.users
            .read()
            .await
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }

    pub async fn get(&self, id: &str) -> Option<User> {
        self.users.read().await.iter().find(|u| u.id == id).cloned()
    }

    pub async fn all(&self) -> Vec<User> {
        self.users.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    /// register_student
    ///
    /// Appends a new `student`. The duplicate-email check and the append happen under
    /// one write lock, so two concurrent registrations of the same address cannot both win.
    pub async fn register_student(&self, name: &str, email: &str) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == email) {
            return Err(AppError::EmailTaken);
        }
        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst).to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role: Role::Student,
        };
        users.push(user.clone());
        Ok(user)
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}
