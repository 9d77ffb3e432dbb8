//! Clinic Records Server
//!
//! REST JSON backend for a multi-location occupational-health operation:
//! clinic visit intake with daily visit tokens, hospital admissions,
//! isolation tracking, H&I case follow-up and employee metadata.

use std::sync::Arc;

pub mod api;
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
