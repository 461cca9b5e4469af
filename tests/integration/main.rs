//! hlf integration test harness.
//!
//! Tests here drive the public APIs of hlf-core and hlf-services together.
//! Peers are simulated in-process by [`FakePeers`], which answers CSCC
//! proposals the way a real peer would: JoinChain validates the block and
//! records the channel, GetChannels lists what was joined.

mod config_blocks;
mod cscc;
mod seek;

use std::collections::BTreeMap;
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use hlf_core::builder::{build_channel_header, build_header, build_payload};
use hlf_core::extract::{assert_config_block, extract_channel_header};
use hlf_core::wire::{
    Block, BlockData, BlockHeader, BlockMetadata, BlockMetadataIndex, ChaincodeInvocationSpec,
    ChaincodeProposalPayload, ChannelInfo, ChannelQueryResponse, Config, ConfigEnvelope,
    ConfigGroup, Envelope, LastConfig, Metadata, Proposal, ProposalResponse, Response,
};
use hlf_core::{ChannelHeaderSpec, HeaderType, TxContext};
use hlf_services::ProposalSender;
use prost::Message;

// ── Harness ───────────────────────────────────────────────────────────────────

pub const CHANNEL: &str = "mychannel";
pub const MSP_ID: &str = "Org1MSP";
pub const CREATOR: &[u8] = b"org1-admin-serialized-identity";

/// Fixed nonce so tests can predict the signature header.
pub fn tx(channel: &str, tx_id: &str) -> TxContext {
    TxContext::from_parts(CREATOR.to_vec(), vec![0x42; 24], channel, tx_id)
}

/// Serialized envelope whose channel header has type `header_type` and
/// whose payload data is `data`.
pub fn envelope_bytes(header_type: HeaderType, channel: &str, data: Vec<u8>) -> Vec<u8> {
    let ctx = tx(channel, "cfg-tx");
    let channel_header = build_channel_header(ChannelHeaderSpec::new(
        header_type,
        1,
        ctx.channel_id.clone(),
        ctx.tx_id.clone(),
    ));
    let header = build_header(&ctx.creator, &ctx.nonce, &channel_header);
    Envelope {
        payload: build_payload(header, data).encode_to_vec(),
        signature: b"orderer-signature".to_vec(),
    }
    .encode_to_vec()
}

/// Channel config with one application org, sequence `sequence`.
pub fn channel_config(sequence: u64) -> Config {
    let mut orgs = BTreeMap::new();
    orgs.insert(MSP_ID.to_string(), ConfigGroup::default());
    let mut groups = BTreeMap::new();
    groups.insert(
        "Application".to_string(),
        ConfigGroup {
            groups: orgs,
            mod_policy: "Admins".into(),
            ..Default::default()
        },
    );
    Config {
        sequence,
        channel_group: Some(ConfigGroup {
            groups,
            mod_policy: "Admins".into(),
            ..Default::default()
        }),
    }
}

/// A block carrying `envelopes`, with LAST_CONFIG metadata pointing at
/// `last_config` when given.
pub fn block(number: u64, envelopes: Vec<Vec<u8>>, last_config: Option<u64>) -> Block {
    let mut metadata = vec![Vec::new(); 4];
    if let Some(index) = last_config {
        metadata[BlockMetadataIndex::LastConfig as usize] = Metadata {
            value: LastConfig { index }.encode_to_vec(),
            signatures: vec![],
        }
        .encode_to_vec();
    }
    Block {
        header: Some(BlockHeader {
            number,
            ..Default::default()
        }),
        data: Some(BlockData { data: envelopes }),
        metadata: Some(BlockMetadata { metadata }),
    }
}

/// A well-formed config block for `channel`.
pub fn config_block(channel: &str, number: u64) -> Block {
    let envelope = ConfigEnvelope {
        config: Some(channel_config(number)),
        last_update: None,
    };
    block(
        number,
        vec![envelope_bytes(
            HeaderType::Config,
            channel,
            envelope.encode_to_vec(),
        )],
        Some(number),
    )
}

/// In-process peers answering CSCC proposals.
#[derive(Default)]
pub struct FakePeers {
    joined: Mutex<BTreeMap<String, Vec<String>>>,
}

impl FakePeers {
    pub fn channels_of(&self, peer: &str) -> Vec<String> {
        self.joined
            .lock()
            .unwrap()
            .get(peer)
            .cloned()
            .unwrap_or_default()
    }

    fn invoke(&self, peer: &str, args: &[Vec<u8>]) -> Result<Vec<u8>> {
        match args {
            [fcn, block] if fcn.as_slice() == b"JoinChain" => {
                let block = Block::decode(block.as_slice()).context("malformed block")?;
                assert_config_block(&block)?;
                let data = block.data.unwrap_or_default().data;
                let channel = extract_channel_header(&data[0])?.channel_id;
                let mut joined = self.joined.lock().unwrap();
                let channels = joined.entry(peer.to_string()).or_default();
                if channels.contains(&channel) {
                    bail!("channel {channel} already exists");
                }
                channels.push(channel);
                Ok(Vec::new())
            }
            [fcn] if fcn.as_slice() == b"GetChannels" => Ok(ChannelQueryResponse {
                channels: self
                    .channels_of(peer)
                    .into_iter()
                    .map(|channel_id| ChannelInfo { channel_id })
                    .collect(),
            }
            .encode_to_vec()),
            _ => bail!("unsupported cscc invocation"),
        }
    }
}

/// The chaincode input args carried by `proposal`.
pub fn proposal_args(proposal: &Proposal) -> Result<Vec<Vec<u8>>> {
    let payload = ChaincodeProposalPayload::decode(proposal.payload.as_slice())?;
    let spec = ChaincodeInvocationSpec::decode(payload.input.as_slice())?
        .chaincode_spec
        .context("invocation has no chaincode spec")?;
    Ok(spec.input.context("chaincode spec has no input")?.args)
}

impl ProposalSender for &FakePeers {
    async fn send_proposal(
        &self,
        proposal: Proposal,
        endorsers: &[String],
    ) -> Result<Vec<ProposalResponse>> {
        let args = proposal_args(&proposal)?;
        Ok(endorsers
            .iter()
            .map(|peer| {
                let response = match self.invoke(peer, &args) {
                    Ok(payload) => Response {
                        status: 200,
                        message: String::new(),
                        payload,
                    },
                    Err(e) => Response {
                        status: 500,
                        message: e.to_string(),
                        payload: Vec::new(),
                    },
                };
                ProposalResponse {
                    version: 1,
                    response: Some(response),
                    ..Default::default()
                }
            })
            .collect())
    }
}
