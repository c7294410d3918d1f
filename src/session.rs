//! Session management for the Telegram client
//!
//! One Telegram session must never be used by two processes at once, so a
//! file lock guards it. The session itself is SQLite-backed and persists
//! across runs; `init-session` creates it once.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use fs2::FileExt;
use grammers_client::client::updates::UpdatesLike;
use grammers_client::Client;
use grammers_mtsender::{SenderPool, SenderPoolHandle};
use grammers_session::storages::SqliteSession;
use tokio::sync::mpsc;

use crate::config::{Config, LOCK_FILE, SESSION_NAME};
use crate::error::{Error, Result};

/// Session lock guard that ensures exclusive access to the Telegram session.
pub struct SessionLock {
    lock_file: Option<File>,
}

impl SessionLock {
    /// Acquire an exclusive lock on the session.
    pub fn acquire() -> Result<Self> {
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(LOCK_FILE)
            .map_err(|e| Error::LockError(format!("Failed to open lock file: {}", e)))?;

        match lock_file.try_lock_exclusive() {
            Ok(()) => Ok(Self {
                lock_file: Some(lock_file),
            }),
            Err(_) => {
                eprintln!(
                    r#"
The Telegram session is already in use by another process.

Telegram requires operations on one session to run sequentially; running
two clients on the same session file leads to conflicts and bans.

Wait for the other process to finish and try again.
"#
                );
                Err(Error::SessionLocked)
            }
        }
    }

    /// Release the lock manually
    pub fn release(&mut self) {
        if let Some(ref file) = self.lock_file {
            let _ = file.unlock();
        }
        self.lock_file = None;
        let _ = std::fs::remove_file(LOCK_FILE);
    }
}

impl Drop for SessionLock {
    fn drop(&mut self) {
        self.release();
    }
}

fn session_file() -> String {
    format!("{}.session", SESSION_NAME)
}

/// Check if the session file exists.
pub fn check_session_exists() -> Result<()> {
    let session_file = session_file();

    if !Path::new(&session_file).exists() {
        eprintln!(
            r#"
Session file '{}' not found.

To create it:
1. Run: cargo run --bin init_session
2. Enter the code Telegram sends you
"#,
            session_file
        );
        return Err(Error::SessionNotFound(session_file));
    }

    Ok(())
}

/// Open the SQLite-backed session storage, creating the file if needed.
pub fn open_session() -> Result<Arc<SqliteSession>> {
    let session_file = session_file();
    let session = SqliteSession::open(&session_file)
        .map_err(|e| Error::SessionNotFound(format!("Failed to open session: {}", e)))?;
    Ok(Arc::new(session))
}

/// Holder for SenderPool components and Client
pub struct TelegramClient {
    pub client: Client,
    pub handle: SenderPoolHandle,
    updates: Option<mpsc::UnboundedReceiver<UpdatesLike>>,
    _runner_handle: tokio::task::JoinHandle<()>,
}

impl TelegramClient {
    /// Create a new TelegramClient from session
    pub async fn connect(session: Arc<SqliteSession>) -> Result<Self> {
        let config = Config::new();
        let pool = SenderPool::new(session, config.api_id);

        // Create client from pool (need reference to whole pool)
        let client = Client::new(&pool);

        // Get handle and runner after client is created
        let SenderPool {
            runner,
            updates,
            handle,
        } = pool;

        // Spawn the runner in background
        let runner_handle = tokio::spawn(async move {
            runner.run().await;
        });

        Ok(Self {
            client,
            handle,
            updates: Some(updates),
            _runner_handle: runner_handle,
        })
    }

    /// Take ownership of the updates receiver to build an update stream.
    /// Returns None if updates were already taken.
    pub fn take_updates(&mut self) -> Option<mpsc::UnboundedReceiver<UpdatesLike>> {
        self.updates.take()
    }
}

// Implement Deref to allow using TelegramClient as &Client
impl std::ops::Deref for TelegramClient {
    type Target = Client;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

/// Create and connect a Telegram client with an existing session.
pub async fn get_client() -> Result<TelegramClient> {
    check_session_exists()?;
    let session = open_session()?;
    TelegramClient::connect(session).await
}

/// Create a Telegram client for initialization (no session check).
pub async fn get_client_for_init() -> Result<TelegramClient> {
    let session = open_session()?;
    TelegramClient::connect(session).await
}
