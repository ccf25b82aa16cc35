use std::io;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, App, HttpServer};
use crudforge::{auth::JwtKeys, config::Config, db::Storage, logging, routes, Services};
use log::info;

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, err))
}

fn cors(origin: &str) -> Cors {
    let cors = if origin == "*" {
        Cors::default().allow_any_origin()
    } else {
        Cors::default().allowed_origin(origin)
    };
    cors.allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    let config = Config::from_env().map_err(|e| startup_error("invalid configuration", e))?;
    logging::init(&config.log);

    let keys = JwtKeys::from_config(&config.jwt).map_err(|e| startup_error("token keys", e))?;
    let storage = Storage::connect(&config.database)
        .await
        .map_err(|e| startup_error("storage", e))?;
    let services = Services::new(storage.repositories(), keys, config.bcrypt_cost);

    info!("Starting crudforge server at {}", config.server_url());
    let cors_origin = config.cors_origin.clone();
    let result = HttpServer::new(move || {
        App::new()
            .wrap(cors(&cors_origin))
            .wrap(Logger::default())
            .configure(routes::app(services.clone()))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await;

    // Reverse of startup: the server has drained, now release storage.
    info!("server stopped, shutting down");
    storage.close().await;
    result
}
