use actix_web::dev::Server;
use actix_web::{http, web, App, HttpServer};
use actix_cors::Cors;
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

pub mod config;
pub mod db;
pub mod game;
mod handlers;
pub mod models;
mod routes;
pub mod services;
pub mod telemetry;

use crate::routes::init_routes;
use crate::services::GameService;

pub fn run(listener: TcpListener, game_service: Arc<GameService>) -> Result<Server, std::io::Error> {
    // web::Data wraps the same Arc the scheduler holds
    let game_service = web::Data::from(game_service);

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://localhost:3001")
            .allowed_methods(vec!["GET", "POST", "PUT"])
            .allowed_headers(vec![http::header::ACCEPT, http::header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            .app_data(game_service.clone())
            .configure(init_routes)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
