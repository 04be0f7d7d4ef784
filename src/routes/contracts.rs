use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::FlashMessage;
use chrono::Local;

use crate::domain::access::AuthenticatedUser;
use crate::dto::main::IndexQuery;
use crate::forms::contracts::{DeleteContractForm, UpdateNotesForm, UpdateStatusForm};
use crate::repository::DieselRepository;
use crate::routes::{flash_error, parse_form, redirect_to_index};
use crate::services::main::parse_filter;
use crate::services::{ServiceError, contracts as contracts_service};

#[post("/contracts/{contract_id}/status")]
pub async fn update_status(
    contract_id: web::Path<i32>,
    query: web::Query<IndexQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let back = redirect_to_index(query.range.as_deref());
    let result = parse_form::<UpdateStatusForm>(&body).and_then(|form| {
        contracts_service::update_status(repo.get_ref(), &user, contract_id.into_inner(), form)
    });

    match result {
        Ok(contract) => {
            FlashMessage::success(format!(
                "Status of {} set to {}.",
                contract.client_name,
                contract.status.summary_label()
            ))
            .send();
            back
        }
        Err(err) => flash_error(err, "update the status", back),
    }
}

#[post("/contracts/{contract_id}/notes")]
pub async fn update_notes(
    contract_id: web::Path<i32>,
    query: web::Query<IndexQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let back = redirect_to_index(query.range.as_deref());
    let result = parse_form::<UpdateNotesForm>(&body).and_then(|form| {
        contracts_service::update_notes(repo.get_ref(), &user, contract_id.into_inner(), form)
    });

    match result {
        Ok(_) => {
            FlashMessage::success("Notes saved.").send();
            back
        }
        Err(err) => flash_error(err, "save the notes", back),
    }
}

#[post("/contracts/{contract_id}/delete")]
pub async fn delete_contract(
    contract_id: web::Path<i32>,
    query: web::Query<IndexQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let back = redirect_to_index(query.range.as_deref());
    let result = parse_form::<DeleteContractForm>(&body).and_then(|form| {
        contracts_service::delete_contract(repo.get_ref(), &user, contract_id.into_inner(), form)
    });

    match result {
        Ok(()) => {
            FlashMessage::success("Contract deleted.").send();
            back
        }
        Err(err) => flash_error(err, "delete the contract", back),
    }
}

#[get("/contracts/export")]
pub async fn export_contracts(
    query: web::Query<IndexQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let back = redirect_to_index(query.range.as_deref());
    let filter = parse_filter(query.range.as_deref());
    let today = Local::now().date_naive();

    match contracts_service::export_contracts(repo.get_ref(), &user, &filter, today) {
        Ok(export) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(export.filename)],
            })
            .body(export.body),
        Err(ServiceError::Form(message)) => {
            FlashMessage::warning(message).send();
            back
        }
        Err(err) => flash_error(err, "export contracts", back),
    }
}
