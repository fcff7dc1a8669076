//! Samson HTTP API

pub mod client;
pub mod deploys;
