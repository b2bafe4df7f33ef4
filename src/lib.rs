pub mod api;
pub mod config;
pub mod error;
pub mod gallery;
pub mod router;
pub mod telemetry;
pub mod web_pages;

pub use config::AppConfig;
pub use router::build_router;
