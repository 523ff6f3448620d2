use super::server::expand;
use crate::constants::DEFAULT_ROOT_NAME;
use crate::domain::types::Root;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

/// Filesystem roots advertised to the backend via `roots/list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootsConfig {
    pub data_dir: PathBuf,
    pub name: String,
}

impl Default for RootsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            name: DEFAULT_ROOT_NAME.to_string(),
        }
    }
}

impl RootsConfig {
    /// The data directory as a `file://` root. Relative directories resolve
    /// against the current working directory.
    pub fn roots(&self) -> Vec<Root> {
        let absolute = absolute_path(&self.data_dir);
        let uri = Url::from_file_path(&absolute)
            .map(|url| url.to_string())
            .unwrap_or_else(|()| format!("file://{}", absolute.display()));
        vec![Root {
            uri,
            name: Some(self.name.clone()),
        }]
    }
}

fn absolute_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct RawRoots {
    pub(super) data_dir: Option<String>,
    pub(super) name: Option<String>,
}

impl From<RawRoots> for RootsConfig {
    fn from(raw: RawRoots) -> Self {
        let defaults = RootsConfig::default();
        Self {
            data_dir: raw
                .data_dir
                .map(|d| PathBuf::from(expand(&d)))
                .unwrap_or(defaults.data_dir),
            name: raw.name.unwrap_or(defaults.name),
        }
    }
}
