//! Taller Mecánico - ingreso de vehículos por foto de patente
//!
//! Servidor web que recibe la foto de una patente, la reconoce con OCR y
//! busca o registra el vehículo en la base SQLite del taller.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_app;
pub use state::AppState;
