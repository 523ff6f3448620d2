use crate::errors::StoreError;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
}

/// A user record before it has been assigned an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
}

impl NewUser {
    fn with_id(self, id: u64) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            address: self.address,
            phone: self.phone,
        }
    }
}

/// JSON-array file of users, read and rewritten whole.
///
/// Every access goes through one mutex, so a create never interleaves with
/// another create or with a read.
pub struct UserStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl UserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn all(&self) -> Result<Vec<User>, StoreError> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    pub async fn find(&self, id: u64) -> Result<Option<User>, StoreError> {
        let users = self.all().await?;
        Ok(users.into_iter().find(|user| user.id == id))
    }

    /// Appends `user` with id `max(existing) + 1` and rewrites the file.
    pub async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let _guard = self.lock.lock().await;
        let mut users = self.load().await?;
        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let user = user.with_id(id);
        users.push(user.clone());
        self.save(&users).await?;
        info!(id, email = %user.email, "Stored new user");
        Ok(user)
    }

    async fn load(&self) -> Result<Vec<User>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "User file missing; treating as empty");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    async fn save(&self, users: &[User]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(users).map_err(StoreError::Encode)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })
    }
}
