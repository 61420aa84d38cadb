pub mod config;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod migration;
pub mod models;
pub mod params;
pub mod schema;
pub mod services;
pub mod sql_guard;
pub mod state;
pub mod telemetry;
pub mod validation;
