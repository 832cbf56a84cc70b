//! Usage window persistence
//!
//! The quota windows are written as a small JSON document so a restart
//! does not hand out a fresh minute or day of capacity.

use crate::core::quota::{PersistedUsage, QuotaTracker};
use crate::utils::error::{GatewayError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// JSON file holding both quota windows
#[derive(Debug)]
pub struct UsageStateFile {
    path: PathBuf,
    // Serializes writers so the newest export is the one left on disk
    write_lock: Mutex<()>,
}

impl UsageStateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load persisted windows; `None` when nothing has been saved yet
    pub async fn load(&self) -> Result<Option<PersistedUsage>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No usage state at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(GatewayError::storage(format!(
                    "Failed to read usage state: {}",
                    e
                )));
            }
        };

        let usage = serde_json::from_str(&content)
            .map_err(|e| GatewayError::storage(format!("Failed to parse usage state: {}", e)))?;
        Ok(Some(usage))
    }

    /// Restore `tracker` from disk if state exists
    pub async fn restore_into(&self, tracker: &QuotaTracker) -> Result<bool> {
        match self.load().await? {
            Some(usage) => {
                tracker.restore(usage);
                info!("Usage state restored from {}", self.path.display());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Write the tracker's current windows
    pub async fn save_from(&self, tracker: &QuotaTracker) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.write(&tracker.export_state()).await
    }

    /// Write `usage` atomically (temp file + rename)
    pub async fn save(&self, usage: &PersistedUsage) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.write(usage).await
    }

    async fn write(&self, usage: &PersistedUsage) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                GatewayError::storage(format!("Failed to create usage state directory: {}", e))
            })?;
        }

        let content = serde_json::to_vec(usage)?;
        let tmp = self.path.with_extension(format!("tmp-{}", Uuid::new_v4()));
        fs::write(&tmp, content)
            .await
            .map_err(|e| GatewayError::storage(format!("Failed to write usage state: {}", e)))?;

        if let Err(e) = fs::rename(&tmp, &self.path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(GatewayError::storage(format!(
                "Failed to move usage state into place: {}",
                e
            )));
        }

        debug!("Usage state saved to {}", self.path.display());
        Ok(())
    }
}
