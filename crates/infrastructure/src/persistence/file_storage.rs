//! JSON file storage for collections, environments and run history.
//!
//! Layout under the base path:
//! ```text
//! base/
//!   collections/
//!     users-api.json
//!   environments/
//!     staging.json
//!   history/
//!     20250114T093015.123456Z.json
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use relay_application::ports::{CollectionStorage, EnvironmentStorage};
use relay_application::{ApplicationError, ApplicationResult};
use relay_domain::{Collection, Environment};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs;
use tracing::debug;

use crate::serialization::{from_json_bytes, to_json_stable_bytes};

const COLLECTIONS_DIR: &str = "collections";
const ENVIRONMENTS_DIR: &str = "environments";
const HISTORY_DIR: &str = "history";

/// Stores each collection and environment as one JSON file named after it.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Creates a storage rooted at `base_path`. Directories are created on first write.
    #[must_use]
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Returns the root directory.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Returns the collections directory.
    #[must_use]
    pub fn collections_dir(&self) -> PathBuf {
        self.base_path.join(COLLECTIONS_DIR)
    }

    /// Returns the environments directory.
    #[must_use]
    pub fn environments_dir(&self) -> PathBuf {
        self.base_path.join(ENVIRONMENTS_DIR)
    }

    /// Returns the run history directory.
    #[must_use]
    pub fn history_dir(&self) -> PathBuf {
        self.base_path.join(HISTORY_DIR)
    }

    /// Creates the storage directories if missing.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Storage` if a directory cannot be created.
    pub async fn ensure_directories(&self) -> ApplicationResult<()> {
        for dir in [self.collections_dir(), self.environments_dir(), self.history_dir()] {
            fs::create_dir_all(&dir)
                .await
                .map_err(|e| storage_error(&dir, &e))?;
        }
        Ok(())
    }

    pub(super) async fn read_entry<T: DeserializeOwned>(dir: &Path, name: &str) -> ApplicationResult<T> {
        let path = entry_path(dir, name)?;
        let bytes = fs::read(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ApplicationError::NotFound(name.to_string())
            } else {
                storage_error(&path, &e)
            }
        })?;
        from_json_bytes(&bytes).map_err(|e| ApplicationError::Storage(format!("{}: {e}", path.display())))
    }

    async fn write_entry<T: Serialize + Sync>(dir: &Path, name: &str, value: &T) -> ApplicationResult<()> {
        let path = entry_path(dir, name)?;
        let bytes = to_json_stable_bytes(value).map_err(|e| ApplicationError::Storage(e.to_string()))?;
        fs::create_dir_all(dir).await.map_err(|e| storage_error(dir, &e))?;
        fs::write(&path, bytes).await.map_err(|e| storage_error(&path, &e))?;
        debug!(path = %path.display(), "saved");
        Ok(())
    }

    pub(super) async fn list_entries(dir: &Path) -> ApplicationResult<Vec<String>> {
        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(storage_error(dir, &e)),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| storage_error(dir, &e))? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json")
                && let Some(stem) = path.file_stem()
            {
                names.push(stem.to_string_lossy().into_owned());
            }
        }

        names.sort();
        Ok(names)
    }

    pub(super) async fn delete_entry(dir: &Path, name: &str) -> ApplicationResult<()> {
        let path = entry_path(dir, name)?;
        fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ApplicationError::NotFound(name.to_string())
            } else {
                storage_error(&path, &e)
            }
        })
    }
}

/// Maps a name to `<dir>/<name>.json`, rejecting names that would escape `dir`.
pub(super) fn entry_path(dir: &Path, name: &str) -> ApplicationResult<PathBuf> {
    if name.trim().is_empty() {
        return Err(ApplicationError::InvalidArgument("name is required".to_string()));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(ApplicationError::InvalidArgument(format!(
            "name {name:?} cannot be used as a file name"
        )));
    }
    Ok(dir.join(format!("{name}.json")))
}

pub(super) fn storage_error(path: &Path, error: &std::io::Error) -> ApplicationError {
    ApplicationError::Storage(format!("{}: {error}", path.display()))
}

#[async_trait]
impl CollectionStorage for FileStorage {
    async fn load(&self, name: &str) -> ApplicationResult<Collection> {
        Self::read_entry(&self.collections_dir(), name).await
    }

    async fn save(&self, collection: &Collection) -> ApplicationResult<()> {
        collection.validate()?;
        Self::write_entry(&self.collections_dir(), &collection.name, collection)
            .await
    }

    async fn list(&self) -> ApplicationResult<Vec<String>> {
        Self::list_entries(&self.collections_dir()).await
    }

    async fn delete(&self, name: &str) -> ApplicationResult<()> {
        Self::delete_entry(&self.collections_dir(), name).await
    }
}

#[async_trait]
impl EnvironmentStorage for FileStorage {
    async fn load(&self, name: &str) -> ApplicationResult<Environment> {
        Self::read_entry(&self.environments_dir(), name).await
    }

    async fn save(&self, environment: &Environment) -> ApplicationResult<()> {
        environment.validate()?;
        Self::write_entry(&self.environments_dir(), &environment.name, environment)
            .await
    }

    async fn list(&self) -> ApplicationResult<Vec<String>> {
        Self::list_entries(&self.environments_dir()).await
    }

    async fn delete(&self, name: &str) -> ApplicationResult<()> {
        Self::delete_entry(&self.environments_dir(), name).await
    }
}
