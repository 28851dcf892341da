//! Durable credential storage
//!
//! Exactly two things persist between runs: the access token and the profile
//! it belongs to. They live together in one JSON file and are written and
//! cleared together, so a half-signed-in state can never be loaded.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::api::types::UserProfile;

const FILE_NAME: &str = "credentials.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCredentials {
    token: String,
    profile: UserProfile,
}

/// File-backed store under the user's data directory
/// (`~/.local/share/afya/credentials.json` on Linux).
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn open_default() -> anyhow::Result<Self> {
        let base = dirs::data_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("share")))
            .context("Could not determine data directory")?;
        Ok(Self {
            path: base.join("afya").join(FILE_NAME),
        })
    }

    /// Store rooted at an explicit path. Used by tests.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Read both entries. A missing file is a normal signed-out start; an
    /// unreadable or undecodable file is treated the same way and removed
    /// so it cannot shadow the next login.
    pub fn load(&self) -> Option<(String, UserProfile)> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "could not read credentials");
                return None;
            }
        };

        match serde_json::from_str::<StoredCredentials>(&raw) {
            Ok(stored) => Some((stored.token, stored.profile)),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "stored credentials are corrupt, clearing them"
                );
                let _ = fs::remove_file(&self.path);
                None
            }
        }
    }

    /// Persist both entries in one atomic write (temp file + rename).
    pub fn save(&self, token: &str, profile: &UserProfile) -> anyhow::Result<()> {
        let stored = StoredCredentials {
            token: token.to_string(),
            profile: profile.clone(),
        };
        let json = serde_json::to_string_pretty(&stored).context("Failed to encode credentials")?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;

        // Token material: owner-only on unix.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", tmp.display()))?;
        }

        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to move credentials into {}", self.path.display()))?;
        Ok(())
    }

    /// Remove both entries. Idempotent.
    pub fn clear(&self) -> anyhow::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to remove {}", self.path.display()))
            }
        }
    }
}
