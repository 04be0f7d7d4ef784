//! Weekly job: replaces both shared passwords and emails them to the office.

use std::env;

use config::Config;
use dotenvy::dotenv;

use pushkind_common::db::establish_connection_pool;
use pushkind_common::zmq::{ZmqSender, ZmqSenderOptions};

use contract_tracker::models::config::RotationConfig;
use contract_tracker::repository::DieselRepository;
use contract_tracker::services::credentials::rotate_credentials;

fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(config::Environment::with_prefix("APP"))
        .build();

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Error loading settings: {err}");
            std::process::exit(1);
        }
    };

    let rotation_config = match settings.try_deserialize::<RotationConfig>() {
        Ok(rotation_config) => rotation_config,
        Err(err) => {
            log::error!("Error loading rotation config: {err}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&rotation_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    // Start a background ZeroMQ publisher used for the outbound email.
    let sender = match ZmqSender::start(ZmqSenderOptions::pub_default(
        &rotation_config.zmq_emailer_pub,
    )) {
        Ok(sender) => sender,
        Err(e) => {
            log::error!("Failed to start ZMQ sender: {e}");
            std::process::exit(1);
        }
    };

    let mut rng = rand::rng();
    match rotate_credentials(&repo, &sender, &mut rng, &rotation_config) {
        Ok(_) => log::info!(
            "Rotated passwords and notified {} recipient(s)",
            rotation_config.rotation_recipients.len()
        ),
        Err(e) => {
            log::error!("Password rotation failed: {e}");
            std::process::exit(1);
        }
    }
}
