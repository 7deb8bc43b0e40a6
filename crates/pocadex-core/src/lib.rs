pub mod config;
pub mod error;
pub mod import;
pub mod models;
pub mod storage;
