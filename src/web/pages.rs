//! Page shells.
//!
//! Forms are empty mount points. Nothing here posts credentials or sets the
//! auth cookie.

use axum::extract::Path;
use axum::response::Html;

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html lang=\"es\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title} · Logros</title>\n\
         <link rel=\"stylesheet\" href=\"/static/app.css\">\n</head>\n<body>\n{body}\n</body>\n</html>\n"
    ))
}

pub async fn landing() -> Html<String> {
    page("Inicio", r#"<main data-page="landing"><a href="/login">Iniciar sesión</a> <a href="/signin">Registrarse</a></main>"#)
}

pub async fn login() -> Html<String> {
    page("Iniciar sesión", r#"<main data-page="login"><form id="login"></form></main>"#)
}

pub async fn signin() -> Html<String> {
    page("Registrarse", r#"<main data-page="signin"><form id="register"></form></main>"#)
}

pub async fn home() -> Html<String> {
    page("Mis logros", r#"<main data-page="home"></main>"#)
}

pub async fn registros() -> Html<String> {
    page("Registros", r#"<main data-page="registros"></main>"#)
}

pub async fn crear() -> Html<String> {
    page("Nuevo registro", r#"<main data-page="crear"><form id="registro"></form></main>"#)
}

/// Edit page for one entry. Non-numeric ids are rejected by the extractor.
pub async fn registro(Path(id): Path<i64>) -> Html<String> {
    page("Editar registro", &format!(r#"<main data-page="registro" data-id="{id}"><form id="registro"></form></main>"#))
}
