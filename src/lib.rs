pub mod config;
pub mod db;
pub mod error;
pub mod ids;
pub mod models;
pub mod response;
pub mod routes;
pub mod state;
pub mod uploads;
