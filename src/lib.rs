//! ToolHire Tool Rental Management System
//!
//! A Rust implementation of the ToolHire rental server, providing a REST
//! JSON API for managing the tool catalog, reservations, and availability.

use std::sync::Arc;

pub mod api;
pub mod availability;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
