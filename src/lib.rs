//! Contract tracking dashboard for an energy sales office.
//!
//! The `data` feature exposes the domain, the Diesel models and the
//! repository; `server` adds the Actix-web application on top.

#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "data")]
pub mod schema;

#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
#[cfg(feature = "server")]
pub mod zmq;

#[cfg(feature = "server")]
pub use server::run;

#[cfg(feature = "server")]
mod server {
    use actix_cors::Cors;
    use actix_files::Files;
    use actix_identity::IdentityMiddleware;
    use actix_session::{SessionMiddleware, storage::CookieSessionStore};
    use actix_web::cookie::Key;
    use actix_web::{App, HttpServer, middleware, web};
    use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
    use pushkind_common::db::establish_connection_pool;
    use pushkind_common::middleware::RedirectUnauthorized;
    use tera::Tera;

    use crate::models::config::ServerConfig;
    use crate::repository::DieselRepository;
    use crate::routes::api::{api_v1_contracts, api_v1_summary};
    use crate::routes::auth::{login_agent, login_manager, logout, show_login};
    use crate::routes::contracts::{delete_contract, export_contracts, update_notes, update_status};
    use crate::routes::main::{add_contract, show_index};
    use crate::routes::not_found;
    use crate::routes::team::{add_member, remove_member, show_team};

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        // Establish Diesel connection pool for the SQLite database.
        let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
            std::io::Error::other(format!("Failed to establish database connection: {e}"))
        })?;

        let repo = DieselRepository::new(pool);

        // Keys and stores for identity, sessions, and flash messages.
        if server_config.secret.len() < 64 {
            return Err(std::io::Error::other(
                "The secret must be at least 64 bytes long",
            ));
        }
        let secret_key = Key::from(server_config.secret.as_bytes());

        let message_store = CookieMessageStore::builder(secret_key.clone()).build();
        let message_framework = FlashMessagesFramework::builder(message_store).build();

        let tera = Tera::new(&server_config.templates_dir)
            .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

        let bind_address = (server_config.address.clone(), server_config.port);

        log::info!("Listening on {}:{}", bind_address.0, bind_address.1);

        HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .wrap(message_framework.clone())
                .wrap(IdentityMiddleware::default())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                        .cookie_secure(false) // set to true in prod
                        .cookie_domain(Some(server_config.domain.clone()))
                        .build(),
                )
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .service(Files::new("/assets", "./assets"))
                .service(show_login)
                .service(login_manager)
                .service(login_agent)
                .service(
                    web::scope("/api")
                        .service(api_v1_contracts)
                        .service(api_v1_summary),
                )
                .service(
                    web::scope("")
                        .wrap(RedirectUnauthorized)
                        .service(show_index)
                        .service(add_contract)
                        .service(export_contracts)
                        .service(update_status)
                        .service(update_notes)
                        .service(delete_contract)
                        .service(show_team)
                        .service(add_member)
                        .service(remove_member)
                        .service(logout),
                )
                .default_service(web::to(not_found))
                .app_data(web::Data::new(tera.clone()))
                .app_data(web::Data::new(repo.clone()))
                .app_data(web::Data::new(server_config.clone()))
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
