use crate::config::USERS_FILE;
use crate::errors::RequestError;
use crate::store::UserStore;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use url::Url;
use userdesk_core::constants::USERS_ALL_URI;
use userdesk_core::types::{ReadResourceResult, ResourceContents, ResourceDescriptor};

pub const USER_PROFILE_TEMPLATE: &str = "users://{userId}/profile";
const JSON: &str = "application/json";

/// Resolves resource URIs against the user store and the data directory.
#[derive(Debug, Clone)]
pub struct ResourceSpace {
    root: PathBuf,
    canonical_root: Option<PathBuf>,
}

impl ResourceSpace {
    pub fn new(data_dir: &Path) -> Self {
        let root = normalize(&std::path::absolute(data_dir).unwrap_or_else(|_| data_dir.to_path_buf()));
        let canonical_root = std::fs::canonicalize(&root).ok();
        Self {
            root,
            canonical_root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn users_file_uri(&self) -> String {
        let path = self.root.join(USERS_FILE);
        Url::from_file_path(&path)
            .map(String::from)
            .unwrap_or_else(|()| format!("file://{}", path.display()))
    }

    pub fn descriptors(&self) -> Vec<ResourceDescriptor> {
        vec![
            ResourceDescriptor {
                uri: USERS_ALL_URI.to_string(),
                name: "Users".to_string(),
                description: Some("Get all users data from the database".to_string()),
                mime_type: Some(JSON.to_string()),
            },
            ResourceDescriptor {
                uri: USER_PROFILE_TEMPLATE.to_string(),
                name: "User Details".to_string(),
                description: Some("Get a user's details from the database".to_string()),
                mime_type: Some(JSON.to_string()),
            },
            ResourceDescriptor {
                uri: self.users_file_uri(),
                name: "Users JSON File".to_string(),
                description: Some(
                    "Direct access to the users.json file from the data directory root".to_string(),
                ),
                mime_type: Some(JSON.to_string()),
            },
        ]
    }

    pub async fn read(&self, store: &UserStore, uri: &str) -> Result<ReadResourceResult, RequestError> {
        debug!(%uri, "Reading resource");
        let (mime, text) = if uri == USERS_ALL_URI {
            let users = store.all().await?;
            (JSON, encode(&users)?)
        } else if let Some(id) = profile_id(uri) {
            let id: u64 = id
                .parse()
                .map_err(|_| RequestError::InvalidParams(format!("user id must be numeric: {id}")))?;
            let user = store
                .find(id)
                .await?
                .ok_or_else(|| RequestError::ResourceNotFound(format!("User not found: {id}")))?;
            (JSON, encode(&user)?)
        } else if uri.starts_with("file://") {
            self.read_file(uri).await?
        } else {
            return Err(RequestError::ResourceNotFound(format!("Unknown resource: {uri}")));
        };
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(uri, Some(mime), text)],
        })
    }

    async fn read_file(&self, uri: &str) -> Result<(&'static str, String), RequestError> {
        let path = normalize(&file_path(uri));
        if !self.contains(&path) {
            warn!(path = %path.display(), "Denied read outside the data directory");
            return Err(RequestError::AccessDenied(format!(
                "{} is outside the data directory",
                path.display()
            )));
        }

        let canonical = match tokio::fs::canonicalize(&path).await {
            Ok(canonical) => canonical,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(RequestError::ResourceNotFound(format!(
                    "File not found: {}",
                    path.display()
                )));
            }
            Err(err) => return Err(RequestError::Internal(format!("{}: {err}", path.display()))),
        };
        // Symlinks may still point outside.
        if !self.contains(&canonical) {
            warn!(path = %canonical.display(), "Denied read through a link leaving the data directory");
            return Err(RequestError::AccessDenied(format!(
                "{} is outside the data directory",
                path.display()
            )));
        }
        if canonical.is_dir() {
            return Err(RequestError::InvalidParams(format!(
                "Path is not a file: {}",
                path.display()
            )));
        }

        let text = tokio::fs::read_to_string(&canonical)
            .await
            .map_err(|err| RequestError::Internal(format!("{}: {err}", path.display())))?;
        let mime = match canonical.extension().and_then(|ext| ext.to_str()) {
            Some("json") => JSON,
            _ => "text/plain",
        };
        Ok((mime, text))
    }

    fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.root)
            || self
                .canonical_root
                .as_ref()
                .is_some_and(|root| path.starts_with(root))
    }
}

/// Local path named by a `file://` URI.
///
/// Forms the URL parser reads as a host (`file://../x`, `file://etc/x`) are
/// taken literally and resolved against the working directory, so they go
/// through the same containment checks as absolute paths.
fn file_path(uri: &str) -> PathBuf {
    if let Some(path) = Url::parse(uri).ok().and_then(|url| url.to_file_path().ok()) {
        return path;
    }
    let raw = uri.strip_prefix("file://").unwrap_or(uri);
    std::path::absolute(raw).unwrap_or_else(|_| PathBuf::from(raw))
}

fn profile_id(uri: &str) -> Option<&str> {
    uri.strip_prefix("users://")?.strip_suffix("/profile")
}

fn encode<T: serde::Serialize>(value: &T) -> Result<String, RequestError> {
    serde_json::to_string(value).map_err(|err| RequestError::Internal(err.to_string()))
}

/// Resolves `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
