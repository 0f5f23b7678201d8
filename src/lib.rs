pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod service;

pub use config::{AppConfig, EngineConfig};
pub use error::EngineError;
pub use service::{format_range, InvoiceRenderer};
