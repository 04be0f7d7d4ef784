use actix_web::{HttpResponse, Responder};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use pushkind_common::routes::redirect;
use serde::de::DeserializeOwned;
use tera::Context;

use crate::domain::access::AuthenticatedUser;
use crate::domain::period::TimeFilter;
use crate::services::ServiceError;
use crate::services::main::parse_filter;

pub mod api;
pub mod auth;
pub mod contracts;
pub mod main;
pub mod team;

pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Redirects to the dashboard keeping the selected period.
///
/// The raw query value is re-parsed, so only a well-formed filter ever
/// reaches the `Location` header.
pub fn redirect_to_index(range: Option<&str>) -> HttpResponse {
    match parse_filter(range) {
        TimeFilter::All => redirect("/"),
        filter => redirect(&format!("/?range={filter}")),
    }
}

/// Context shared by every page: alerts, the signed-in user and the nav item.
/// Counterpart of `pushkind_common::routes::base_context` for the local
/// [`AuthenticatedUser`].
pub fn page_context(
    flash_messages: &IncomingFlashMessages,
    user: Option<&AuthenticatedUser>,
    current_page: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", &user);
    context.insert("current_page", current_page);
    context
}

/// Decodes an urlencoded body, keeping repeated keys as sequences.
pub fn parse_form<T: DeserializeOwned>(body: &[u8]) -> Result<T, ServiceError> {
    serde_html_form::from_bytes(body).map_err(|err| {
        log::warn!("Malformed form body: {err}");
        ServiceError::Form("Malformed form submission".to_string())
    })
}

/// Flashes the outcome of a failed mutation and sends the user to `location`.
pub fn flash_error(err: ServiceError, action: &str, location: HttpResponse) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => {
            FlashMessage::error("You are not allowed to do that.").send();
        }
        ServiceError::NotFound => {
            FlashMessage::error("That record no longer exists.").send();
        }
        ServiceError::Form(message) | ServiceError::TypeConstraint(message) => {
            FlashMessage::error(message).send();
        }
        err => {
            log::error!("Failed to {action}: {err}");
            FlashMessage::error(format!("Failed to {action}.")).send();
        }
    }
    location
}

pub async fn not_found() -> impl Responder {
    HttpResponse::NotFound().body("Not found")
}
