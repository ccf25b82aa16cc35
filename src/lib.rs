#![doc = "The `crudforge` library crate."]
#![doc = ""]
#![doc = "Layered CRUD REST service: entities and DTOs (`models`), a generic repository"]
#![doc = "over Postgres or an in-process store (`repository`, `db`), services holding the"]
#![doc = "business rules (`services`), JWT authentication (`auth`) and the actix-web"]
#![doc = "controllers (`routes`). The binary (`main.rs`) wires them together."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;

pub use crate::error::AppError;
pub use crate::services::Services;
