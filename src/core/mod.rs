pub mod config;
pub mod error;
pub mod ring;
pub mod types;
