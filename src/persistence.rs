//! Persistence of the current session and tour history.
//!
//! Two keys in the backing store:
//!
//! - `currentSession`: the in-progress [`TourSession`], absent when no tour is active.
//! - `completedTours`: a JSON array of [`CompletedTour`] in completion order.
//!
//! Loading never fails. Missing, unreadable, or malformed data is logged and
//! treated as "nothing stored", so a damaged store can't keep the app from
//! starting. Saving reports errors to the caller, which decides whether they
//! matter.

use crate::model::{CompletedTour, TourSession};
use crate::storage::{KeyValueStore, StoreError};

pub const CURRENT_SESSION_KEY: &str = "currentSession";
pub const COMPLETED_TOURS_KEY: &str = "completedTours";

/// Errors that can occur while saving.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reads and writes session state through a [`KeyValueStore`].
#[derive(Debug)]
pub struct Persistence<S> {
    store: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the saved in-progress session, if any.
    pub fn load_session(&self) -> Option<TourSession> {
        let raw = self.read(CURRENT_SESSION_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!("ignoring malformed {CURRENT_SESSION_KEY}: {e}");
                None
            }
        }
    }

    /// Loads the saved history in completion order.
    ///
    /// Entries are decoded one at a time; a malformed entry is skipped
    /// without discarding the rest.
    pub fn load_history(&self) -> Vec<CompletedTour> {
        let Some(raw) = self.read(COMPLETED_TOURS_KEY) else {
            return Vec::new();
        };
        let entries: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("ignoring malformed {COMPLETED_TOURS_KEY}: {e}");
                return Vec::new();
            }
        };
        entries
            .into_iter()
            .enumerate()
            .filter_map(|(i, entry)| match serde_json::from_value(entry) {
                Ok(tour) => Some(tour),
                Err(e) => {
                    tracing::warn!("skipping malformed history entry {i}: {e}");
                    None
                }
            })
            .collect()
    }

    /// Saves the current session, or removes it when `None`.
    pub fn save_session(&self, session: Option<&TourSession>) -> Result<(), SaveError> {
        match session {
            Some(session) => {
                let json = serde_json::to_string(session)?;
                self.store.set(CURRENT_SESSION_KEY, &json)?;
            }
            None => self.store.remove(CURRENT_SESSION_KEY)?,
        }
        Ok(())
    }

    pub fn save_history(&self, history: &[CompletedTour]) -> Result<(), SaveError> {
        let json = serde_json::to_string(history)?;
        self.store.set(COMPLETED_TOURS_KEY, &json)?;
        Ok(())
    }

    /// Wipes everything in the backing store.
    pub fn clear(&self) -> Result<(), SaveError> {
        self.store.clear()?;
        Ok(())
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("failed to read {key}: {e}");
                None
            }
        }
    }
}
