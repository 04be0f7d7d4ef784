use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::routes::{redirect, render_template};
use tera::Tera;

use crate::auth::issue_token;
use crate::domain::access::AuthenticatedUser;
use crate::domain::team::Team;
use crate::forms::auth::{AgentLoginForm, ManagerLoginForm};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::page_context;
use crate::services::{ServiceError, ServiceResult, auth as auth_service};

/// Sign-in page; unauthenticated requests are redirected here.
pub const LOGIN_PATH: &str = "/auth/signin";

#[get("/auth/signin")]
pub async fn show_login(
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if user.is_some() {
        return redirect("/");
    }

    match auth_service::login_names(repo.get_ref()) {
        Ok(names) => {
            let mut context = page_context(&flash_messages, None, "login");
            context.insert("names", &names);
            context.insert("teams", &Team::ALL);
            render_template(&tera, "auth/login.html", &context)
        }
        Err(err) => {
            log::error!("Failed to load the login page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

fn sign_in(
    req: &HttpRequest,
    result: ServiceResult<AuthenticatedUser>,
    config: &ServerConfig,
) -> HttpResponse {
    let user = match result {
        Ok(user) => user,
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Incorrect password.").send();
            return redirect(LOGIN_PATH);
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            return redirect(LOGIN_PATH);
        }
        Err(err) => {
            log::error!("Failed to sign in: {err}");
            FlashMessage::error("Sign in failed, try again.").send();
            return redirect(LOGIN_PATH);
        }
    };

    let token = match issue_token(&user, &config.secret) {
        Ok(token) => token,
        Err(err) => {
            log::error!("Failed to issue a session token: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    if let Err(err) = Identity::login(&req.extensions(), token) {
        log::error!("Failed to store the session: {err}");
        return HttpResponse::InternalServerError().finish();
    }

    log::info!("{} signed in", user.name);
    redirect("/")
}

#[post("/auth/signin/manager")]
pub async fn login_manager(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<ManagerLoginForm>,
) -> impl Responder {
    let result = auth_service::login_manager(repo.get_ref(), form);
    sign_in(&req, result, &server_config)
}

#[post("/auth/signin/agent")]
pub async fn login_agent(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<AgentLoginForm>,
) -> impl Responder {
    let result = auth_service::login_agent(repo.get_ref(), form);
    sign_in(&req, result, &server_config)
}

#[post("/logout")]
pub async fn logout(user: Identity) -> impl Responder {
    user.logout();
    redirect(LOGIN_PATH)
}
