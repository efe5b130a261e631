//! `DELETE /registros/{id}`.
//!
//! Unlike create and edit, the delete hook keeps the last error so the list
//! view can show it next to the entries without owning it.

use std::sync::{Arc, PoisonError, RwLock};

use super::BusyFlag;
use crate::failure::Failure;
use crate::session::AuthSession;

pub const DELETE_FAILED: &str = "failed to delete entry";

pub struct DeleteRegistro {
    session: Arc<AuthSession>,
    deleting: BusyFlag,
    error: RwLock<Option<String>>,
}

impl DeleteRegistro {
    #[must_use]
    pub fn new(session: Arc<AuthSession>) -> Self {
        Self { session, deleting: BusyFlag::default(), error: RwLock::new(None) }
    }

    #[must_use]
    pub fn deleting(&self) -> bool {
        self.deleting.get()
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.error.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn set_error(&self, error: Option<String>) {
        *self.error.write().unwrap_or_else(PoisonError::into_inner) = error;
    }

    /// Delete entry `id`. Any 2xx counts as success; the body is ignored.
    ///
    /// # Errors
    ///
    /// Returns a `Failure` and records its message in `error`.
    pub async fn delete(&self, id: i64) -> Result<(), Failure> {
        let _busy = self.deleting.enter();
        let headers = self.session.auth_header();
        match self.session.api().delete_registro(&headers, id).await {
            Ok(()) => {
                self.set_error(None);
                tracing::info!(id, "entry deleted");
                Ok(())
            }
            Err(e) => {
                let failure = Failure::from_api(e, DELETE_FAILED);
                tracing::warn!(id, error = %failure, "entry delete failed");
                self.set_error(Some(failure.error.clone()));
                Err(failure)
            }
        }
    }
}

#[cfg(test)]
#[path = "delete_test.rs"]
mod tests;
