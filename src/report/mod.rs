pub mod download;
pub mod handlers;
pub mod models;

pub use handlers::config;
