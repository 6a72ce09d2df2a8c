//! Durable credential storage
//!
//! One process-wide slot for the bearer token and one for the identity
//! snapshot, stored as small files under the platform data directory.
//! Reads are tolerant: a missing or unreadable file is simply "no
//! credential", never an error surfaced to the controllers.

use crate::core::traits::{AuthSnapshot, CredentialStore};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const TOKEN_FILE: &str = "token";
const SNAPSHOT_FILE: &str = "auth-snapshot.json";

/// File-backed credential slot under a fixed directory
pub struct FileCredentialStore {
    dir: PathBuf,
}

impl FileCredentialStore {
    /// Create a store rooted at the platform data directory
    pub fn open_default() -> Result<Self> {
        let proj_dirs = directories::ProjectDirs::from("", "", "shopchat")
            .context("Could not determine platform data directory")?;
        Self::new(proj_dirs.data_dir())
    }

    /// Create a store rooted at an explicit directory (used by tests)
    pub fn new(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }

    fn snapshot_path(&self) -> PathBuf {
        self.dir.join(SNAPSHOT_FILE)
    }

    fn remove_if_present(path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn token(&self) -> Option<String> {
        let raw = std::fs::read_to_string(self.token_path()).ok()?;
        let token = raw.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    fn set_token(&self, token: &str) -> Result<()> {
        std::fs::write(self.token_path(), token)
            .with_context(|| format!("Failed to write {}", self.token_path().display()))
    }

    fn clear_token(&self) -> Result<()> {
        Self::remove_if_present(&self.token_path())
    }

    fn snapshot(&self) -> Option<AuthSnapshot> {
        let raw = std::fs::read_to_string(self.snapshot_path()).ok()?;
        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                tracing::warn!("Ignoring unreadable identity snapshot: {}", err);
                None
            }
        }
    }

    fn set_snapshot(&self, snapshot: &AuthSnapshot) -> Result<()> {
        let json = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(self.snapshot_path(), json)
            .with_context(|| format!("Failed to write {}", self.snapshot_path().display()))
    }

    fn clear_snapshot(&self) -> Result<()> {
        Self::remove_if_present(&self.snapshot_path())
    }
}

/// In-process credential slot for tests and ephemeral runs
#[derive(Default)]
pub struct MemoryCredentialStore {
    token: Mutex<Option<String>>,
    snapshot: Mutex<Option<AuthSnapshot>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    fn set_token(&self, token: &str) -> Result<()> {
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn clear_token(&self) -> Result<()> {
        *self.token.lock().unwrap() = None;
        Ok(())
    }

    fn snapshot(&self) -> Option<AuthSnapshot> {
        self.snapshot.lock().unwrap().clone()
    }

    fn set_snapshot(&self, snapshot: &AuthSnapshot) -> Result<()> {
        *self.snapshot.lock().unwrap() = Some(snapshot.clone());
        Ok(())
    }

    fn clear_snapshot(&self) -> Result<()> {
        *self.snapshot.lock().unwrap() = None;
        Ok(())
    }
}
