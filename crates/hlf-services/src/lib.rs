//! hlf-services — channel administration over the core builders.
//!
//! Proposals are built here and handed to an external [`ProposalSender`]
//! for signing and transport.

pub mod ca;
pub mod cscc;
pub mod orderer;
pub mod proposal;

#[cfg(test)]
mod testing;

pub use ca::{ca_server_command, fabric_images, CaCommandError, CaSpec};
pub use cscc::{joined_channels, CsccProposal};
pub use orderer::{
    orderer_env, orderer_mounts, OrdererEnvError, OrdererEnvSpec, OrdererType, OrdererVolumes,
};
pub use proposal::{BuildProposalRequest, ProposalManager, ProposalSender};
