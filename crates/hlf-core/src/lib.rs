//! hlf-core — Fabric wire messages, header/payload builders, and config
//! extraction. All other hlf crates depend on this one.

pub mod builder;
pub mod config;
pub mod extract;
pub mod identity;
pub mod wire;

pub use builder::{build_seek_payload, ChannelHeaderSpec, SeekHeight};
pub use extract::{DecodeStage, ExtractError};
pub use identity::{IdentityContext, TxContext};
pub use wire::{HeaderType, SeekBehavior};
