// Common library for shared code across the API and maintenance engine

pub mod config;
pub mod db;
pub mod errors;
pub mod frequency;
pub mod models;
pub mod telemetry;
