use actix_web::{HttpResponse, Responder, get, web};

use crate::domain::access::AuthenticatedUser;
use crate::dto::main::IndexQuery;
use crate::repository::DieselRepository;
use crate::services::api as api_service;

#[get("/v1/contracts")]
pub async fn api_v1_contracts(
    query: web::Query<IndexQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match api_service::list_contracts(repo.get_ref(), &user, query.into_inner()) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => {
            log::error!("Failed to list contracts: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/summary")]
pub async fn api_v1_summary(
    query: web::Query<IndexQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match api_service::summary(repo.get_ref(), &user, query.into_inner()) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => {
            log::error!("Failed to build the summary: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
