//! `PATCH /registros/{id}`.

use std::sync::Arc;

use super::BusyFlag;
use crate::failure::Failure;
use crate::net::types::EntryPayload;
use crate::session::AuthSession;

pub const EDIT_FAILED: &str = "failed to edit entry";

pub struct EditRegistro {
    session: Arc<AuthSession>,
    editing: BusyFlag,
}

impl EditRegistro {
    #[must_use]
    pub fn new(session: Arc<AuthSession>) -> Self {
        Self { session, editing: BusyFlag::default() }
    }

    #[must_use]
    pub fn editing(&self) -> bool {
        self.editing.get()
    }

    /// Replace the content and week of entry `id`.
    ///
    /// # Errors
    ///
    /// Returns a `Failure` unless the API answers `{ok: true}`.
    pub async fn edit(&self, id: i64, payload: &EntryPayload) -> Result<(), Failure> {
        let _busy = self.editing.enter();
        let headers = self.session.auth_header();
        self.session
            .api()
            .edit_registro(&headers, id, payload)
            .await
            .map_err(|e| Failure::from_api_with_fields(e, EDIT_FAILED))?;
        tracing::info!(id, "entry edited");
        Ok(())
    }
}

#[cfg(test)]
#[path = "edit_test.rs"]
mod tests;
