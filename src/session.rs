//! Current-user session persisted between runs.
//!
//! The cached value is the serialized [`User`], never a password or a hash.

use crate::{
    api,
    models::user_app::{AccountRole, User},
    repo,
};
use anyhow::Context;
use log::warn;
use std::{fs, io::ErrorKind, path::PathBuf};

pub trait SessionStore: Send + Sync {
    fn load(&self) -> anyhow::Result<Option<String>>;

    fn save(&self, value: &str) -> anyhow::Result<()>;

    fn clear(&self) -> anyhow::Result<()>;
}

/// Keeps the session in a JSON file
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> anyhow::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", self.path.display())),
        }
    }

    fn save(&self, value: &str) -> anyhow::Result<()> {
        fs::write(&self.path, value).with_context(|| format!("writing {}", self.path.display()))
    }

    fn clear(&self) -> anyhow::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => {
                Err(e).with_context(|| format!("removing {}", self.path.display()))
            }
            _ => Ok(()),
        }
    }
}

pub struct AppSession {
    store: Box<dyn SessionStore>,
}

impl AppSession {
    pub fn new(store: Box<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Checks the credentials and remembers the user on success.
    ///
    /// A failed login leaves any previous session untouched.
    pub async fn login(
        &self,
        repo: &repo::ImplAppRepo,
        email: &str,
        password: &str,
    ) -> anyhow::Result<User> {
        let user = api::user::login(repo, email, password).await?;
        self.store.save(&serde_json::to_string(&user)?)?;
        Ok(user)
    }

    pub fn logout(&self) -> anyhow::Result<()> {
        self.store.clear()
    }

    /// Cached user, `None` when nobody is logged in.
    ///
    /// An unreadable cache is dropped so the next login starts clean.
    pub fn current_user(&self) -> Option<User> {
        let cached = match self.store.load() {
            Ok(cached) => cached?,
            Err(e) => {
                warn!("session couldn't be read: {e:#}");
                return None;
            }
        };

        match serde_json::from_str(&cached) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("dropping corrupt session: {e}");
                if let Err(e) = self.store.clear() {
                    warn!("session couldn't be cleared: {e:#}");
                }
                None
            }
        }
    }

    pub fn has_role(&self, roles: &[AccountRole]) -> bool {
        self.current_user().is_some_and(|user| user.has_role(roles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::AppError,
        repo::sqlite::SqlxSqliteRepo,
    };
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    #[derive(Default, Clone)]
    struct MemorySessionStore {
        value: Arc<Mutex<Option<String>>>,
    }

    impl SessionStore for MemorySessionStore {
        fn load(&self) -> anyhow::Result<Option<String>> {
            Ok(self.value.lock().unwrap().clone())
        }

        fn save(&self, value: &str) -> anyhow::Result<()> {
            *self.value.lock().unwrap() = Some(value.to_string());
            Ok(())
        }

        fn clear(&self) -> anyhow::Result<()> {
            *self.value.lock().unwrap() = None;
            Ok(())
        }
    }

    async fn seeded_repo() -> repo::ImplAppRepo {
        let repo: repo::ImplAppRepo =
            Box::new(SqlxSqliteRepo::open("sqlite::memory:").await.unwrap());
        api::demo_data::seed_demo_data(&repo).await.unwrap();
        repo
    }

    #[tokio::test]
    async fn test_login_logout_cycle() {
        let repo = seeded_repo().await;
        let session = AppSession::new(Box::new(MemorySessionStore::default()));
        assert!(session.current_user().is_none());

        let user = session
            .login(&repo, "moderator@example.com", "moderator123")
            .await
            .unwrap();

        assert_eq!(session.current_user(), Some(user));
        assert!(session.has_role(&[AccountRole::Admin, AccountRole::Moderator]));
        assert!(!session.has_role(&[AccountRole::Admin]));

        session.logout().unwrap();
        assert!(session.current_user().is_none());
        assert!(!session.has_role(&[AccountRole::Moderator]));
    }

    #[tokio::test]
    async fn test_failed_login_keeps_previous_session() {
        let repo = seeded_repo().await;
        let session = AppSession::new(Box::new(MemorySessionStore::default()));
        let user = session
            .login(&repo, "user@example.com", "user123")
            .await
            .unwrap();

        let err = session
            .login(&repo, "admin@example.com", "wrong")
            .await
            .unwrap_err();

        assert_eq!(AppError::of(&err), Some(&AppError::InvalidCredentials));
        assert_eq!(session.current_user(), Some(user));
    }

    #[test]
    fn test_corrupt_session_is_cleared() {
        let store = MemorySessionStore::default();
        store.save("{not json").unwrap();
        let session = AppSession::new(Box::new(store.clone()));

        assert!(session.current_user().is_none());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_file_store_roundtrip() {
        let path = std::env::temp_dir().join(format!("session-{}.json", Uuid::new_v4()));
        let store = FileSessionStore::new(&path);

        assert_eq!(store.load().unwrap(), None);
        store.save(r#"{"id":1}"#).unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some(r#"{"id":1}"#));

        store.clear().unwrap();
        store.clear().unwrap();
        assert!(!path.exists());
    }
}
