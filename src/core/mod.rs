pub mod config;

pub use config::ValidationConfig;
