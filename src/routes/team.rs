use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::routes::{redirect, render_template};
use tera::Tera;

use crate::domain::access::AuthenticatedUser;
use crate::forms::team::{AddMemberForm, RemoveMemberForm};
use crate::repository::DieselRepository;
use crate::routes::{flash_error, page_context};
use crate::services::{ServiceError, team as team_service};

#[get("/team")]
pub async fn show_team(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match team_service::load_team_page(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context = page_context(&flash_messages, Some(&user), "team");
            context.insert("teams", &data.teams);
            render_template(&tera, "team/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Only managers can edit teams.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to load teams: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/team/add")]
pub async fn add_member(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddMemberForm>,
) -> impl Responder {
    let name = form.name.trim().to_string();
    match team_service::add_member(repo.get_ref(), &user, form) {
        Ok(()) => {
            FlashMessage::success(format!("{name} added.")).send();
            redirect("/team")
        }
        Err(err) => flash_error(err, "add the member", redirect("/team")),
    }
}

#[post("/team/remove")]
pub async fn remove_member(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<RemoveMemberForm>,
) -> impl Responder {
    match team_service::remove_member(repo.get_ref(), &user, form) {
        Ok(()) => {
            FlashMessage::success("Member removed.").send();
            redirect("/team")
        }
        Err(err) => flash_error(err, "remove the member", redirect("/team")),
    }
}
