//! `GET /registros` with held list state.
//!
//! Each fetch is numbered when it starts. A response is only applied if no
//! later-started fetch has already been applied, so a slow early request
//! cannot overwrite a fresher list.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use super::BusyFlag;
use crate::failure::Failure;
use crate::net::types::RegistroEntry;
use crate::session::AuthSession;

pub const LIST_FAILED: &str = "failed to load entries";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    pub registros: Vec<RegistroEntry>,
    pub error: Option<String>,
    applied: u64,
}

pub struct ListRegistros {
    session: Arc<AuthSession>,
    loading: BusyFlag,
    issued: AtomicU64,
    state: RwLock<ListState>,
}

impl ListRegistros {
    #[must_use]
    pub fn new(session: Arc<AuthSession>) -> Self {
        Self { session, loading: BusyFlag::default(), issued: AtomicU64::new(0), state: RwLock::new(ListState::default()) }
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.loading.get()
    }

    #[must_use]
    pub fn state(&self) -> ListState {
        self.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn registros(&self) -> Vec<RegistroEntry> {
        self.state().registros
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.state().error
    }

    /// Fetch the signed-in user's entries.
    ///
    /// On success the held list is replaced and `error` cleared; on failure
    /// `error` is set and the previous list kept.
    ///
    /// # Errors
    ///
    /// Returns a `Failure` when the API call fails.
    pub async fn fetch(&self) -> Result<Vec<RegistroEntry>, Failure> {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let _busy = self.loading.enter();

        let headers = self.session.auth_header();
        let result = self
            .session
            .api()
            .list_registros(&headers)
            .await
            .map_err(|e| Failure::from_api(e, LIST_FAILED));

        self.apply(seq, &result);
        result
    }

    fn apply(&self, seq: u64, result: &Result<Vec<RegistroEntry>, Failure>) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if seq < state.applied {
            tracing::debug!(seq, applied = state.applied, "dropping stale entry list");
            return;
        }
        state.applied = seq;
        match result {
            Ok(registros) => {
                state.registros.clone_from(registros);
                state.error = None;
            }
            Err(failure) => {
                tracing::warn!(error = %failure, "entry list fetch failed");
                state.error = Some(failure.error.clone());
            }
        }
    }

    /// Drop a deleted entry from the held list without refetching.
    pub fn forget(&self, id: i64) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.registros.retain(|entry| entry.id() != id);
    }
}

#[cfg(test)]
#[path = "list_test.rs"]
mod tests;
