//! Reading configuration back out of blocks and envelopes.
//!
//! Input bytes come from the orderer or a peer. Every decode step is tagged
//! with a [`DecodeStage`] so a failure says which layer was malformed.

use std::fmt;

use prost::Message;

use crate::wire::{
    Block, BlockMetadataIndex, ChannelHeader, ConfigEnvelope, ConfigUpdate, ConfigUpdateEnvelope,
    Envelope, HeaderType, LastConfig, Metadata, Payload,
};

/// The layer being decoded when a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStage {
    Metadata,
    LastConfig,
    Envelope,
    Payload,
    ChannelHeader,
    ConfigUpdateEnvelope,
    ConfigUpdate,
    ConfigEnvelope,
}

impl fmt::Display for DecodeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DecodeStage::Metadata => "Metadata",
            DecodeStage::LastConfig => "LastConfig",
            DecodeStage::Envelope => "Envelope",
            DecodeStage::Payload => "Payload",
            DecodeStage::ChannelHeader => "ChannelHeader",
            DecodeStage::ConfigUpdateEnvelope => "ConfigUpdateEnvelope",
            DecodeStage::ConfigUpdate => "ConfigUpdate",
            DecodeStage::ConfigEnvelope => "ConfigEnvelope",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("failed to decode {stage}: {source}")]
    Decode {
        stage: DecodeStage,
        #[source]
        source: prost::DecodeError,
    },

    #[error("block metadata has no entry at index {0}")]
    MissingMetadata(usize),

    #[error("payload has no header")]
    MissingPayloadHeader,

    #[error("config block must only contain one transaction, found {0}")]
    TransactionCount(usize),

    #[error("block must be of type \"CONFIG\", but got \"{0}\" instead")]
    NotConfigBlock(String),
}

impl ExtractError {
    /// The failing stage, for decode errors.
    pub fn stage(&self) -> Option<DecodeStage> {
        match self {
            ExtractError::Decode { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

fn decode<M: Message + Default>(stage: DecodeStage, bytes: &[u8]) -> Result<M, ExtractError> {
    M::decode(bytes).map_err(|source| ExtractError::Decode { stage, source })
}

fn decode_payload(envelope_bytes: &[u8]) -> Result<Payload, ExtractError> {
    let envelope: Envelope = decode(DecodeStage::Envelope, envelope_bytes)?;
    decode(DecodeStage::Payload, &envelope.payload)
}

/// The LAST_CONFIG metadata index of `block`.
pub fn extract_last_config_index(block: &Block) -> Result<u64, ExtractError> {
    let slot = BlockMetadataIndex::LastConfig as usize;
    let raw = block
        .metadata
        .as_ref()
        .and_then(|m| m.metadata.get(slot))
        .ok_or(ExtractError::MissingMetadata(slot))?;
    let metadata: Metadata = decode(DecodeStage::Metadata, raw)?;
    let last_config: LastConfig = decode(DecodeStage::LastConfig, &metadata.value)?;
    Ok(last_config.index)
}

/// Envelope → Payload → ConfigUpdateEnvelope → ConfigUpdate.
///
/// `envelope_bytes` is typically a channel transaction file produced by
/// configtxgen, or a config update assembled for signing.
pub fn extract_config_update(envelope_bytes: &[u8]) -> Result<ConfigUpdate, ExtractError> {
    let payload = decode_payload(envelope_bytes)?;
    let update_envelope: ConfigUpdateEnvelope =
        decode(DecodeStage::ConfigUpdateEnvelope, &payload.data)?;
    decode(DecodeStage::ConfigUpdate, &update_envelope.config_update)
}

/// Envelope → Payload → ConfigEnvelope, for one entry of a config block's data.
pub fn extract_config_envelope_from_block_data(
    block_data: &[u8],
) -> Result<ConfigEnvelope, ExtractError> {
    let payload = decode_payload(block_data)?;
    decode(DecodeStage::ConfigEnvelope, &payload.data)
}

/// Envelope → Payload → ChannelHeader.
pub fn extract_channel_header(envelope_bytes: &[u8]) -> Result<ChannelHeader, ExtractError> {
    let payload = decode_payload(envelope_bytes)?;
    let header = payload.header.ok_or(ExtractError::MissingPayloadHeader)?;
    decode(DecodeStage::ChannelHeader, &header.channel_header)
}

/// Fails unless `block` holds exactly one transaction of type CONFIG.
pub fn assert_config_block(block: &Block) -> Result<(), ExtractError> {
    let transactions = block.data.as_ref().map(|d| d.data.as_slice()).unwrap_or(&[]);
    let [only] = transactions else {
        return Err(ExtractError::TransactionCount(transactions.len()));
    };

    let channel_header = extract_channel_header(only)?;
    if channel_header.r#type != HeaderType::Config as i32 {
        return Err(ExtractError::NotConfigBlock(HeaderType::name_of(
            channel_header.r#type,
        )));
    }
    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────────────
