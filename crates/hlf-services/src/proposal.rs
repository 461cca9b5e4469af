//! Chaincode proposals — build an unsigned proposal, hand it to endorsers.
//!
//! Signing and transport belong to the Fabric SDK. This crate reaches them
//! only through [`ProposalSender`], so everything up to the signature is
//! built here and everything after it is the sender's business.

use std::future::Future;

use anyhow::{Context, Result};
use bytes::Bytes;
use hlf_core::builder::{build_channel_header, build_header, ChannelHeaderSpec};
use hlf_core::wire::{
    ChaincodeId, ChaincodeInput, ChaincodeInvocationSpec, ChaincodeProposalPayload,
    ChaincodeSpec, ChaincodeType, HeaderType, Proposal, ProposalResponse,
};
use hlf_core::{IdentityContext, TxContext};
use prost::Message;

/// Channel header version for endorser proposals.
pub const PROPOSAL_HEADER_VERSION: i32 = 1;

/// Function name and arguments of a chaincode invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildProposalRequest {
    pub fcn: String,
    pub args: Vec<Bytes>,
}

impl BuildProposalRequest {
    pub fn new(fcn: impl Into<String>, args: Vec<Bytes>) -> Self {
        Self {
            fcn: fcn.into(),
            args,
        }
    }

    /// Chaincode input args: the function name followed by its arguments.
    fn input_args(&self) -> Vec<Vec<u8>> {
        std::iter::once(self.fcn.as_bytes().to_vec())
            .chain(self.args.iter().map(|a| a.to_vec()))
            .collect()
    }
}

/// Signs a proposal and delivers it to endorsing peers.
///
/// Implemented over the Fabric SDK's signer and gRPC endorser clients.
/// Failure handling (timeouts, partial failure) lives in the implementation.
pub trait ProposalSender: Send + Sync {
    /// Returns one response per endorser, in `endorsers` order.
    fn send_proposal(
        &self,
        proposal: Proposal,
        endorsers: &[String],
    ) -> impl Future<Output = Result<Vec<ProposalResponse>>> + Send;
}

/// Builds proposals for one chaincode on one channel and sends them.
pub struct ProposalManager<S> {
    identity: IdentityContext,
    channel_name: String,
    chaincode_id: String,
    endorsers: Vec<String>,
    sender: S,
}

impl<S: ProposalSender> ProposalManager<S> {
    pub fn new(
        identity: IdentityContext,
        channel_name: impl Into<String>,
        chaincode_id: impl Into<String>,
        endorsers: Vec<String>,
        sender: S,
    ) -> Self {
        Self {
            identity,
            channel_name: channel_name.into(),
            chaincode_id: chaincode_id.into(),
            endorsers,
            sender,
        }
    }

    pub fn channel_name(&self) -> &str {
        &self.channel_name
    }

    pub fn chaincode_id(&self) -> &str {
        &self.chaincode_id
    }

    pub fn endorsers(&self) -> &[String] {
        &self.endorsers
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// An unsigned ENDORSER_TRANSACTION proposal plus the context it was
    /// built with.
    pub fn build_proposal(&self, request: &BuildProposalRequest) -> (Proposal, TxContext) {
        let tx = self.identity.new_tx(self.channel_name.clone());
        (self.build_proposal_with(request, &tx), tx)
    }

    /// Same as [`build_proposal`](Self::build_proposal) with a caller-supplied
    /// transaction context.
    pub fn build_proposal_with(&self, request: &BuildProposalRequest, tx: &TxContext) -> Proposal {
        let channel_header = build_channel_header(
            ChannelHeaderSpec::new(
                HeaderType::EndorserTransaction,
                PROPOSAL_HEADER_VERSION,
                tx.channel_id.clone(),
                tx.tx_id.clone(),
            )
            .with_chaincode_id(self.chaincode_id.clone()),
        );
        let header = build_header(&tx.creator, &tx.nonce, &channel_header);

        let invocation = ChaincodeInvocationSpec {
            chaincode_spec: Some(ChaincodeSpec {
                r#type: ChaincodeType::Golang as i32,
                chaincode_id: Some(ChaincodeId {
                    name: self.chaincode_id.clone(),
                    ..Default::default()
                }),
                input: Some(ChaincodeInput {
                    args: request.input_args(),
                    ..Default::default()
                }),
                timeout: 0,
            }),
        };
        let payload = ChaincodeProposalPayload {
            input: invocation.encode_to_vec(),
            ..Default::default()
        };

        Proposal {
            header: header.encode_to_vec(),
            payload: payload.encode_to_vec(),
            extension: Vec::new(),
        }
    }

    /// Build and send; responses come back exactly as the sender returns them.
    pub async fn send(&self, request: BuildProposalRequest) -> Result<Vec<ProposalResponse>> {
        let (proposal, tx) = self.build_proposal(&request);

        tracing::debug!(
            tx_id = &tx.tx_id[..16.min(tx.tx_id.len())],
            channel = %self.channel_name,
            chaincode = %self.chaincode_id,
            fcn = %request.fcn,
            endorsers = self.endorsers.len(),
            "sending proposal"
        );

        let responses = self
            .sender
            .send_proposal(proposal, &self.endorsers)
            .await
            .with_context(|| {
                format!(
                    "proposal {}:{} on channel {:?} failed",
                    self.chaincode_id, request.fcn, self.channel_name
                )
            })?;

        tracing::info!(
            tx_id = &tx.tx_id[..16.min(tx.tx_id.len())],
            fcn = %request.fcn,
            responses = responses.len(),
            "proposal endorsed"
        );

        Ok(responses)
    }
}
