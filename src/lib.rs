pub mod api;
pub mod config;
pub mod data;
pub mod error;
pub mod middleware;
pub mod ml;
pub mod models;
pub mod services;
