//! Store selection for the HTTP layer.
//!
//! The SQLite backend opens a fresh connection per request, so handlers
//! never share a connection across threads. The in-memory backend is one
//! repository behind a mutex.

use crate::config::{ServerConfig, StoreKind};
use log::info;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use wowscales_core::db::{open_db, DbResult};
use wowscales_core::{
    InMemoryVerificationRepository, RepoError, RepoResult, SqliteVerificationRepository,
    VerificationRepository,
};

/// Record store handed to request handlers.
#[derive(Debug)]
pub enum StoreBackend {
    Sqlite { path: PathBuf },
    Memory(Mutex<InMemoryVerificationRepository>),
}

impl StoreBackend {
    /// Opens the configured store. For SQLite this creates and migrates the
    /// database file once, up front, so startup fails fast on a bad path.
    pub fn from_config(config: &ServerConfig) -> DbResult<Self> {
        match config.store {
            StoreKind::Sqlite => Self::sqlite(&config.database_path),
            StoreKind::Memory => Ok(Self::in_memory()),
        }
    }

    pub fn sqlite(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = open_db(&path)?;
        drop(conn);
        info!(
            "event=store_ready module=store status=ok backend=sqlite path={}",
            path.display()
        );
        Ok(Self::Sqlite { path })
    }

    pub fn in_memory() -> Self {
        info!("event=store_ready module=store status=ok backend=memory");
        Self::Memory(Mutex::new(InMemoryVerificationRepository::new()))
    }

    pub fn kind(&self) -> StoreKind {
        match self {
            Self::Sqlite { .. } => StoreKind::Sqlite,
            Self::Memory(_) => StoreKind::Memory,
        }
    }

    /// Runs `op` against a repository for this store.
    ///
    /// Blocking: call from `spawn_blocking`, never directly on a runtime
    /// worker.
    pub fn with_repo<T>(
        &self,
        op: impl FnOnce(&mut dyn VerificationRepository) -> T,
    ) -> RepoResult<T> {
        match self {
            Self::Sqlite { path } => {
                let mut conn = open_db(path)?;
                let mut repo = SqliteVerificationRepository::try_new(&mut conn)?;
                Ok(op(&mut repo))
            }
            Self::Memory(repo) => {
                let mut guard = repo
                    .lock()
                    .map_err(|_| RepoError::Unavailable("in-memory store lock poisoned"))?;
                Ok(op(&mut *guard))
            }
        }
    }
}

/// Shared state for all routes.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<StoreBackend>,
}

impl AppState {
    pub fn new(store: StoreBackend) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wowscales_core::VerificationSubmission;

    #[test]
    fn memory_store_keeps_records_between_calls() {
        let store = StoreBackend::in_memory();
        let id = store
            .with_repo(|repo| {
                repo.create_verification(
                    &VerificationSubmission::default(),
                    "2024-05-01T08:00:00.000Z",
                )
            })
            .unwrap()
            .unwrap();

        let listed = store.with_repo(|repo| repo.list_verifications()).unwrap().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);
        assert_eq!(store.kind(), StoreKind::Memory);
    }

    #[test]
    fn sqlite_store_reopens_the_same_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("records.sqlite3");
        let store = StoreBackend::sqlite(&path).unwrap();
        assert!(path.exists());

        store
            .with_repo(|repo| {
                repo.create_verification(
                    &VerificationSubmission::default(),
                    "2024-05-01T08:00:00.000Z",
                )
            })
            .unwrap()
            .unwrap();

        let reopened = StoreBackend::sqlite(&path).unwrap();
        let listed = reopened
            .with_repo(|repo| repo.list_verifications())
            .unwrap()
            .unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[test]
    fn poisoned_memory_store_reports_unavailable() {
        let store = Arc::new(StoreBackend::in_memory());
        let poisoner = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            poisoner.with_repo(|_| panic!("poison the lock")).ok();
        })
        .join();

        let err = store.with_repo(|_| ()).unwrap_err();
        assert!(matches!(err, RepoError::Unavailable(_)));
    }
}
