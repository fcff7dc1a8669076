//! Samson Job Library
//!
//! Triggers a deploy on a Samson instance and waits for its terminal status.

pub mod app;
pub mod config;
pub mod deploy;
pub mod errors;
pub mod http;
pub mod logs;
pub mod models;
pub mod utils;
pub mod workers;
