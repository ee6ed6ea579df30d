use std::{
    collections::{BTreeMap, HashMap},
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::{directory::UserDirectory, error::AppError, inflight::InFlight, models::User};

/// Session
///
/// One logged-in client. The user record is copied in when the session opens and is
/// what the request extractors hand to the handlers afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub user: User,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// A session lives for `ttl` after it was opened, the same span as its token.
    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        match (now - self.created_at).to_std() {
            Ok(age) => age >= ttl,
            // Opened "in the future" (clock skew): not expired.
            Err(_) => false,
        }
    }
}

// --- Persistence ---

/// SessionStore
///
/// Key/value persistence for open sessions: read once at startup, written on
/// login/registration, cleared on logout.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load_all(&self) -> Result<Vec<Session>, AppError>;
    async fn save(&self, session: &Session) -> Result<(), AppError>;
    async fn remove(&self, id: Uuid) -> Result<(), AppError>;
}

pub type SessionStoreState = Arc<dyn SessionStore>;

/// JsonFileSessionStore
///
/// Keeps every session in a single JSON document keyed by session id. Writes are
/// whole-file rewrites serialized behind a mutex.
pub struct JsonFileSessionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_document(&self) -> Result<BTreeMap<Uuid, Session>, AppError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_document(&self, doc: &BTreeMap<Uuid, Session>) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let bytes = serde_json::to_vec_pretty(doc)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for JsonFileSessionStore {
    async fn load_all(&self) -> Result<Vec<Session>, AppError> {
        Ok(self.read_document().await?.into_values().collect())
    }

    async fn save(&self, session: &Session) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.read_document().await?;
        doc.insert(session.id, session.clone());
        self.write_document(&doc).await
    }

    async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.read_document().await?;
        if doc.remove(&id).is_some() {
            self.write_document(&doc).await?;
        }
        Ok(())
    }
}

/// MemorySessionStore
///
/// Process-local store for tests and for running without a writable data directory.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<BTreeMap<Uuid, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load_all(&self) -> Result<Vec<Session>, AppError> {
        Ok(self.sessions.lock().await.values().cloned().collect())
    }

    async fn save(&self, session: &Session) -> Result<(), AppError> {
        self.sessions.lock().await.insert(session.id, session.clone());
        Ok(())
    }

    async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions.lock().await.remove(&id);
        Ok(())
    }
}

// --- Session Manager ---

/// SessionManager
///
/// Login, registration and logout against the user directory. Passwords are accepted
/// and ignored: any password works for an existing email. Sessions older than `ttl`
/// are dropped from memory and from the store.
pub struct SessionManager {
    directory: Arc<UserDirectory>,
    store: SessionStoreState,
    sessions: RwLock<HashMap<Uuid, Session>>,
    latency: Duration,
    ttl: Duration,
    in_flight: InFlight,
}

pub type SessionState = Arc<SessionManager>;

impl SessionManager {
    pub fn new(
        directory: Arc<UserDirectory>,
        store: SessionStoreState,
        latency: Duration,
        ttl: Duration,
    ) -> Self {
        Self {
            directory,
            store,
            sessions: RwLock::new(HashMap::new()),
            latency,
            ttl,
            in_flight: InFlight::new(),
        }
    }

    pub fn directory(&self) -> &Arc<UserDirectory> {
        &self.directory
    }

    /// restore
    ///
    /// Reloads the live sessions persisted by a previous run and deletes the expired
    /// ones from the store. Returns how many were restored.
    pub async fn restore(&self) -> Result<usize, AppError> {
        let now = Utc::now();
        let (expired, live): (Vec<Session>, Vec<Session>) = self
            .store
            .load_all()
            .await?
            .into_iter()
            .partition(|s| s.is_expired(self.ttl, now));

        for session in &expired {
            self.store.remove(session.id).await?;
        }

        let restored = live.len();
        let mut sessions = self.sessions.write().await;
        for session in live {
            sessions.insert(session.id, session);
        }
        tracing::info!(
            restored,
            discarded = expired.len(),
            "restored persisted sessions"
        );
        Ok(restored)
    }

    /// login
    ///
    /// Opens a session for the user with exactly this email. With `admin_only`, a
    /// non-admin account fails the same way an unknown email does. Nothing changes
    /// on failure.
    pub async fn login(
        &self,
        email: &str,
        _password: &str,
        admin_only: bool,
    ) -> Result<Session, AppError> {
        let _ticket = self.in_flight.begin(format!("login:{email}"))?;
        self.simulate_latency().await;

        let user = self
            .directory
            .find_by_email(email)
            .await
            .ok_or(AppError::InvalidCredentials)?;
        if admin_only && !user.is_admin() {
            tracing::info!(user_id = %user.id, "admin login refused for non-admin account");
            return Err(AppError::InvalidCredentials);
        }
        self.open(user).await
    }

    /// register
    ///
    /// Creates a `student` account and logs it in. An email already in the directory
    /// fails with `EmailTaken` and leaves the directory untouched.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        _password: &str,
    ) -> Result<Session, AppError> {
        let _ticket = self.in_flight.begin(format!("register:{email}"))?;
        self.simulate_latency().await;

        let user = self.directory.register_student(name, email).await?;
        tracing::info!(user_id = %user.id, "registered new student account");
        self.open(user).await
    }

    /// logout
    ///
    /// Drops the session and its persisted record. Logging out twice is not an error.
    pub async fn logout(&self, session_id: Uuid) -> Result<(), AppError> {
        self.sessions.write().await.remove(&session_id);
        self.store.remove(session_id).await
    }

    /// The open session with this id, unless it has outlived the ttl.
    pub async fn current(&self, session_id: Uuid) -> Option<Session> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .filter(|s| !s.is_expired(self.ttl, Utc::now()))
            .cloned()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    // The record is persisted before it becomes visible, so a store failure leaves no session behind.
    async fn open(&self, user: User) -> Result<Session, AppError> {
        // A failed prune does not block the login.
        if let Err(e) = self.prune_expired().await {
            tracing::warn!("could not prune expired sessions: {}", e);
        }
        let session = Session {
            id: Uuid::new_v4(),
            user,
            created_at: Utc::now(),
        };
        self.store.save(&session).await?;
        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        tracing::debug!(session_id = %session.id, user_id = %session.user.id, "session opened");
        Ok(session)
    }

    async fn prune_expired(&self) -> Result<(), AppError> {
        let now = Utc::now();
        let expired: Vec<Uuid> = {
            let mut sessions = self.sessions.write().await;
            let ids: Vec<Uuid> = sessions
                .values()
                .filter(|s| s.is_expired(self.ttl, now))
                .map(|s| s.id)
                .collect();
            for id in &ids {
                sessions.remove(id);
            }
            ids
        };
        for id in &expired {
            self.store.remove(*id).await?;
        }
        if !expired.is_empty() {
            tracing::debug!(count = expired.len(), "pruned expired sessions");
        }
        Ok(())
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}
