//! Terminal rendering for the `logros` binary.
//!
//! Every function returns a `String` so output stays testable; the binary
//! decides whether it goes to stdout or stderr.

use std::fmt::Write as _;

use crate::failure::Failure;
use crate::guard::GuardDecision;
use crate::net::types::{FieldErrors, RegistroEntry, UserProfile};
use crate::session::Session;

pub const LOGIN_PROMPT: &str = "not signed in; run `logros login --email <email> --password <password>`";
pub const EMPTY_LIST: &str = "no entries yet";

/// One entry: `#id  start..end  titulo`.
#[must_use]
pub fn entry_line(entry: &RegistroEntry) -> String {
    format!("#{:<5} {}..{}  {}", entry.id(), entry.week_start(), entry.week_end(), entry.logro.titulo)
}

/// All entries, one per line, with the description indented below.
#[must_use]
pub fn entry_list(entries: &[RegistroEntry]) -> String {
    if entries.is_empty() {
        return EMPTY_LIST.to_owned();
    }
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(out, "{}", entry_line(entry));
        if !entry.logro.descripcion.is_empty() {
            let _ = writeln!(out, "       {}", entry.logro.descripcion);
        }
    }
    out.trim_end().to_owned()
}

/// Field messages as `  field: message`, in field order.
#[must_use]
pub fn field_errors(fields: &FieldErrors) -> String {
    fields
        .iter()
        .map(|(field, message)| format!("  {field}: {message}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Banner line plus any field messages.
#[must_use]
pub fn failure_report(failure: &Failure) -> String {
    let mut out = format!("error: {}", failure.error);
    if let Some(fields) = failure.fields.as_ref().filter(|f| !f.is_empty()) {
        out.push('\n');
        out.push_str(&field_errors(fields));
    }
    if failure.requires_login() {
        out.push('\n');
        out.push_str(LOGIN_PROMPT);
    }
    out
}

#[must_use]
pub fn welcome(user: &UserProfile) -> String {
    format!("signed in as {} (#{})", user.display_name(), user.id)
}

#[must_use]
pub fn whoami(session: &Session) -> String {
    match &session.user {
        Some(user) => format!("{} <{}> (#{})", user.display_name(), user.email, user.id),
        None => LOGIN_PROMPT.to_owned(),
    }
}

/// Result of evaluating the navigation guard for `path`.
#[must_use]
pub fn guard_report(path: &str, decision: &GuardDecision) -> String {
    match decision {
        GuardDecision::Allow => format!("{path}: allow"),
        GuardDecision::Redirect(to) => format!("{path}: redirect -> {to}"),
    }
}

#[cfg(test)]
#[path = "views_test.rs"]
mod tests;
