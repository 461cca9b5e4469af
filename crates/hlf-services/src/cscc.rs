//! Configuration system chaincode (CSCC) — join a channel, list channels.

use anyhow::{bail, Context, Result};
use bytes::Bytes;
use hlf_core::wire::{ChannelQueryResponse, ProposalResponse};
use hlf_core::IdentityContext;
use prost::Message;

use crate::proposal::{BuildProposalRequest, ProposalManager, ProposalSender};

/// Reserved name of the configuration system chaincode.
pub const CSCC: &str = "cscc";

/// CSCC function names.
pub mod functions {
    pub const JOIN_CHAIN: &str = "JoinChain";
    pub const GET_CHANNELS: &str = "GetChannels";
}

/// Status code of a successful chaincode response.
pub const STATUS_OK: i32 = 200;

/// Channel administration against a set of peers.
///
/// Both operations return the endorsers' responses untouched; callers
/// inspect each response's status.
pub struct CsccProposal<S> {
    manager: ProposalManager<S>,
}

impl<S: ProposalSender> CsccProposal<S> {
    pub fn new(
        identity: IdentityContext,
        channel_name: impl Into<String>,
        endorsers: Vec<String>,
        sender: S,
    ) -> Self {
        Self {
            manager: ProposalManager::new(identity, channel_name, CSCC, endorsers, sender),
        }
    }

    pub fn manager(&self) -> &ProposalManager<S> {
        &self.manager
    }

    /// Ask each peer to join the channel whose genesis (or latest config)
    /// block is `block`.
    pub async fn join_channel(&self, block: Bytes) -> Result<Vec<ProposalResponse>> {
        tracing::info!(
            block_bytes = block.len(),
            peers = self.manager.endorsers().len(),
            "joining channel"
        );
        self.manager
            .send(BuildProposalRequest::new(functions::JOIN_CHAIN, vec![block]))
            .await
    }

    /// Ask each peer which channels it has joined.
    pub async fn query_channels(&self) -> Result<Vec<ProposalResponse>> {
        self.manager
            .send(BuildProposalRequest::new(functions::GET_CHANNELS, Vec::new()))
            .await
    }
}

/// Channel ids listed in one `GetChannels` response.
pub fn joined_channels(response: &ProposalResponse) -> Result<Vec<String>> {
    let Some(inner) = response.response.as_ref() else {
        bail!("proposal response carries no chaincode response");
    };
    if inner.status != STATUS_OK {
        bail!(
            "GetChannels failed with status {}: {}",
            inner.status,
            inner.message
        );
    }
    let query = ChannelQueryResponse::decode(inner.payload.as_slice())
        .context("failed to decode ChannelQueryResponse")?;
    Ok(query.channels.into_iter().map(|c| c.channel_id).collect())
}
