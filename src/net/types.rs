//! Wire types shared by the API client, the session manager and the hooks.
//!
//! The remote API speaks Spanish field names (`titulo`, `inicio_semana`, ...);
//! these structs keep the wire names so serde needs no renames.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::Date;
use time::macros::format_description;

/// Field name → validation message, as reported by the API.
pub type FieldErrors = BTreeMap<String, String>;

pub const TITULO_MAX_CHARS: usize = 100;

// =============================================================================
// AUTH
// =============================================================================

/// Cached identity of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apellido: Option<String>,
}

impl UserProfile {
    /// Name shown in views: "nombre apellido" when known, else the email.
    #[must_use]
    pub fn display_name(&self) -> String {
        match (self.nombre.as_deref(), self.apellido.as_deref()) {
            (Some(n), Some(a)) => format!("{n} {a}"),
            (Some(n), None) => n.to_owned(),
            _ => self.email.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub nombre: &'a str,
    pub apellido: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Successful `/login` or `/register` body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthGrant {
    pub token: String,
    pub user_id: i64,
}

/// Error body returned by the API on rejected requests.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub fields: Option<FieldErrors>,
}

// =============================================================================
// ENTRIES
// =============================================================================

/// Scheduling half of an entry (`registro` table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registro {
    pub id_registro: i64,
    pub id_usuario: i64,
    pub id_logro: i64,
    pub inicio_semana: String,
    pub fin_semana: String,
}

/// Content half of an entry (`logro` table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logro {
    pub id_logro: i64,
    pub titulo: String,
    pub descripcion: String,
}

/// One row of `GET /registros`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistroEntry {
    pub registro: Registro,
    pub logro: Logro,
}

impl RegistroEntry {
    #[must_use]
    pub fn id(&self) -> i64 {
        self.registro.id_registro
    }

    /// Week start as `YYYY-MM-DD`, dropping any time component.
    #[must_use]
    pub fn week_start(&self) -> &str {
        date_part(&self.registro.inicio_semana)
    }

    #[must_use]
    pub fn week_end(&self) -> &str {
        date_part(&self.registro.fin_semana)
    }

    /// Payload that reproduces this entry, used to prefill edits.
    #[must_use]
    pub fn to_payload(&self) -> EntryPayload {
        EntryPayload {
            titulo: self.logro.titulo.clone(),
            descripcion: self.logro.descripcion.clone(),
            inicio_semana: self.week_start().to_owned(),
            fin_semana: self.week_end().to_owned(),
        }
    }
}

fn date_part(raw: &str) -> &str {
    raw.split_once('T').map_or(raw, |(date, _)| date)
}

/// `GET /registros` body. The API encodes an empty list as `null`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistroList {
    #[serde(default)]
    pub registros: Option<Vec<RegistroEntry>>,
}

/// Body of create and edit requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPayload {
    pub titulo: String,
    pub descripcion: String,
    pub inicio_semana: String,
    pub fin_semana: String,
}

impl EntryPayload {
    /// Check the payload against the API's form rules before sending it.
    ///
    /// Returns an empty map when the payload is acceptable. Hooks never call
    /// this; views decide whether to pre-validate.
    #[must_use]
    pub fn validate(&self) -> FieldErrors {
        let mut fields = FieldErrors::new();

        if self.titulo.trim().is_empty() {
            fields.insert("titulo".into(), "this field cannot be blank".into());
        } else if self.titulo.chars().count() > TITULO_MAX_CHARS {
            fields.insert(
                "titulo".into(),
                format!("this field cannot be longer than {TITULO_MAX_CHARS} characters"),
            );
        }
        if self.descripcion.trim().is_empty() {
            fields.insert("descripcion".into(), "this field cannot be blank".into());
        }

        let start = check_date(&mut fields, "inicio_semana", &self.inicio_semana);
        let end = check_date(&mut fields, "fin_semana", &self.fin_semana);
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                fields.insert("fin_semana".into(), "week end cannot be before week start".into());
            }
        }

        fields
    }
}

fn check_date(fields: &mut FieldErrors, name: &str, raw: &str) -> Option<Date> {
    if raw.trim().is_empty() {
        fields.insert(name.to_owned(), "date cannot be blank".into());
        return None;
    }
    match parse_date(raw) {
        Some(date) => Some(date),
        None => {
            fields.insert(name.to_owned(), "invalid date format (use YYYY-MM-DD)".into());
            None
        }
    }
}

/// Parse a `YYYY-MM-DD` date.
#[must_use]
pub fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]")).ok()
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
