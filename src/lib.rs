// Library for the server binary and integration tests

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod stats;
