use std::{io, process, sync::Arc};

use actix_web::{middleware::Logger, web, App, HttpServer};
use log::{error, info};
use sqlx::PgPool;

use todo_api::{
    auth::Credentials,
    config::Config,
    cors::cors_policy,
    repository::{PgTaskRepository, PgUserRepository},
    routes,
    state::AppState,
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("Invalid configuration: {}", err);
            process::exit(1);
        }
    };

    let credentials = match Credentials::new(&config.auth) {
        Ok(credentials) => credentials,
        Err(err) => {
            error!("Failed to initialise credentials: {}", err);
            process::exit(1);
        }
    };

    let pool = PgPool::connect(&config.database_url)
        .await
        .map_err(|err| {
            error!("Failed to connect to database: {}", err);
            io::Error::new(io::ErrorKind::Other, err)
        })?;

    let state = AppState::new(
        Arc::new(PgUserRepository::new(pool.clone())),
        Arc::new(PgTaskRepository::new(pool)),
        credentials,
    );
    let allowed_origins = config.allowed_origins.clone();

    info!("Starting server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(routes::json_config())
            .app_data(routes::query_config())
            .app_data(routes::path_config())
            .wrap(cors_policy(&allowed_origins))
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
