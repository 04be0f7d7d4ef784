use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::routes::render_template;
use tera::Tera;

use crate::domain::access::AuthenticatedUser;
use crate::dto::main::IndexQuery;
use crate::forms::contracts::AddContractForm;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{flash_error, page_context, parse_form, redirect_to_index};
use crate::services::main as main_service;

#[get("/")]
pub async fn show_index(
    query: web::Query<IndexQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match main_service::load_index_page(
        repo.get_ref(),
        &user,
        query.into_inner(),
        &server_config.filter_years,
    ) {
        Ok(data) => {
            let mut context = page_context(&flash_messages, Some(&user), "index");
            context.insert("page", &data);
            render_template(&tera, "main/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to load the dashboard: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/contracts/add")]
pub async fn add_contract(
    query: web::Query<IndexQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let back = redirect_to_index(query.range.as_deref());
    let result = parse_form::<AddContractForm>(&body)
        .and_then(|form| main_service::add_contract(repo.get_ref(), &user, form));

    match result {
        Ok(contract) => {
            FlashMessage::success(format!("Contract for {} saved.", contract.client_name)).send();
            back
        }
        Err(err) => flash_error(err, "save the contract", back),
    }
}
