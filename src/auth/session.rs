use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::ApiError;

/// Session file name in the data directory
const SESSION_FILE: &str = "session.json";

/// Authenticated-identity record returned by the login endpoint.
///
/// Immutable once decoded; ownership passes to the [`SessionStore`] after
/// a successful login. Sessions never expire on their own, they are only
/// replaced by a later login or removed by an explicit logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub token: String,
}

impl Session {
    /// Decode a session from a raw login response body.
    ///
    /// Fails on malformed JSON or missing fields; there is no
    /// partial-session recovery.
    pub fn decode(bytes: &[u8]) -> Result<Self, ApiError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// On-disk store for the current session.
///
/// The backing directory is created lazily on first save. Overwrites are
/// last-write-wins; only the login flow and logout touch the file.
pub struct SessionStore {
    data_dir: PathBuf,
}

impl SessionStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Read the persisted session, if any
    pub fn read(&self) -> Result<Option<Session>> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .context("Failed to read session file")?;
        let session = serde_json::from_str(&contents)
            .context("Failed to parse session file")?;

        Ok(Some(session))
    }

    /// Persist a session, replacing any previous one
    pub fn save(&self, session: &Session) -> Result<()> {
        let path = self.session_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(session)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Remove the persisted session (logout)
    pub fn clear(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }
}
