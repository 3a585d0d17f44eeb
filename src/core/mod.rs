// src/core/mod.rs
//! Core services shared by the CLI and the job pipeline

pub mod config_manager;
pub mod database;
pub mod fs_ops;
pub mod service_client;

pub use config_manager::ConfigManager;
pub use database::{Database, JobRepository};
pub use fs_ops::FsOps;
pub use service_client::TranslationClient;
