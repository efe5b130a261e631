//! `POST /registros`.

use std::sync::Arc;

use super::BusyFlag;
use crate::failure::Failure;
use crate::net::types::EntryPayload;
use crate::session::AuthSession;

pub const CREATE_FAILED: &str = "failed to create entry";

pub struct CreateRegistro {
    session: Arc<AuthSession>,
    creating: BusyFlag,
}

impl CreateRegistro {
    #[must_use]
    pub fn new(session: Arc<AuthSession>) -> Self {
        Self { session, creating: BusyFlag::default() }
    }

    #[must_use]
    pub fn creating(&self) -> bool {
        self.creating.get()
    }

    /// Create an entry for the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns a `Failure`; rejections always carry a (possibly empty)
    /// field map so forms can clear stale inline errors.
    pub async fn create(&self, payload: &EntryPayload) -> Result<(), Failure> {
        let _busy = self.creating.enter();
        let headers = self.session.auth_header();
        self.session
            .api()
            .create_registro(&headers, payload)
            .await
            .map_err(|e| Failure::from_api_with_fields(e, CREATE_FAILED))?;
        tracing::info!(titulo = %payload.titulo, "entry created");
        Ok(())
    }
}

#[cfg(test)]
#[path = "create_test.rs"]
mod tests;
