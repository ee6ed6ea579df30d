use campus_lost_found::{
    JsonFileSessionStore,
    models::{Role, User},
    session::{Session, SessionStore},
};
use chrono::Utc;
use tempfile::TempDir;
use uuid::Uuid;

fn session(user_id: &str) -> Session {
    Session {
        id: Uuid::new_v4(),
        user: User {
            id: user_id.into(),
            name: format!("User {user_id}"),
            email: format!("user{user_id}@u.edu"),
            role: Role::Student,
        },
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_missing_file_loads_empty() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileSessionStore::new(dir.path().join("sessions.json"));

    assert!(store.load_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_save_creates_parent_dirs_and_persists() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("sessions.json");
    let store = JsonFileSessionStore::new(&path);
    let s = session("2");

    store.save(&s).await.unwrap();

    assert!(path.exists());
    // A second store over the same file sees the record.
    let reopened = JsonFileSessionStore::new(&path);
    assert_eq!(reopened.load_all().await.unwrap(), vec![s]);
}

#[tokio::test]
async fn test_remove_only_drops_that_session() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileSessionStore::new(dir.path().join("sessions.json"));
    let a = session("2");
    let b = session("3");
    store.save(&a).await.unwrap();
    store.save(&b).await.unwrap();

    store.remove(a.id).await.unwrap();
    // Removing an unknown id is a no-op.
    store.remove(Uuid::new_v4()).await.unwrap();

    assert_eq!(store.load_all().await.unwrap(), vec![b]);
}

#[tokio::test]
async fn test_corrupt_file_is_a_persistence_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sessions.json");
    std::fs::write(&path, b"not json").unwrap();
    let store = JsonFileSessionStore::new(&path);

    let err = store.load_all().await.unwrap_err();
    assert!(matches!(err, campus_lost_found::AppError::Persistence(_)));
}
