//! Durable tool catalog: a pretty-printed JSON array of tools.
//!
//! Every save rewrites the whole file through a temp file in the same directory followed by a
//! rename, so readers never observe a half-written catalog. Concurrent writers from separate
//! processes are not coordinated.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{RegistryError, Result};
use crate::tool::Tool;

/// Default catalog location, relative to the working directory.
pub const DEFAULT_CATALOG_PATH: &str = "tools_config.json";

/// Handle to the catalog file on disk.
#[derive(Debug, Clone)]
pub struct CatalogFile {
    path: PathBuf,
}

impl CatalogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the catalog. `Ok(None)` when the file does not exist; malformed content is an error.
    pub fn load(&self) -> Result<Option<Vec<Tool>>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Tool catalog not found");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let tools: Vec<Tool> =
            serde_json::from_slice(&bytes).map_err(|source| RegistryError::MalformedCatalog {
                path: self.path.display().to_string(),
                source,
            })?;
        info!(
            path = %self.path.display(),
            tool_count = tools.len(),
            "Loaded tool catalog"
        );
        Ok(Some(tools))
    }

    /// Atomically replaces the catalog with `tools`.
    pub fn save(&self, tools: &[Tool]) -> Result<()> {
        let persistence = |message: String| RegistryError::Persistence {
            path: self.path.display().to_string(),
            message,
        };

        let json = serde_json::to_vec_pretty(tools).map_err(|e| persistence(e.to_string()))?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| persistence(e.to_string()))?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| persistence(e.to_string()))?;
        tmp.write_all(&json).map_err(|e| persistence(e.to_string()))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| persistence(e.to_string()))?;
        tmp.persist(&self.path)
            .map_err(|e| persistence(e.error.to_string()))?;

        debug!(
            path = %self.path.display(),
            tool_count = tools.len(),
            "Saved tool catalog"
        );
        Ok(())
    }
}
