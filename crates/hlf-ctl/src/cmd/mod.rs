//! CLI command modules.

pub mod args;
pub mod block;
pub mod ca;
pub mod config;
pub mod config_update;
pub mod orderer;
pub mod seek;
