//! Header, payload and seek-request construction.
//!
//! Every builder returns a finished message and holds no state. Nested
//! messages that Fabric carries as bytes (channel header, signature header,
//! seek info, chaincode header extension) are encoded here, so callers only
//! ever sign the outermost payload.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use prost::Message;

use crate::identity::TxContext;
use crate::wire::{
    seek_position, ChaincodeHeaderExtension, ChaincodeId, ChannelHeader, Envelope, Header,
    HeaderType, Payload, SeekBehavior, SeekInfo, SeekNewest, SeekOldest, SeekPosition,
    SeekSpecified, SignatureHeader, Timestamp,
};

/// Behavior used by [`build_seek_payload`] when the caller passes `None`.
pub const DEFAULT_SEEK_BEHAVIOR: SeekBehavior = SeekBehavior::FailIfNotReady;

/// Channel header version used for deliver requests.
pub const SEEK_INFO_HEADER_VERSION: i32 = 1;

// ── Timestamp ────────────────────────────────────────────────────────────────

/// Current wall-clock time from a single clock read.
pub fn build_current_timestamp() -> Timestamp {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    Timestamp {
        seconds: now.as_secs() as i64,
        nanos: now.subsec_nanos() as i32,
    }
}

// ── Seek positions ───────────────────────────────────────────────────────────

/// Where a deliver request starts or stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekHeight {
    /// An explicit block number.
    Specified(u64),
    /// The newest block the orderer has.
    Newest,
    /// The genesis block.
    Oldest,
}

impl From<u64> for SeekHeight {
    fn from(number: u64) -> Self {
        SeekHeight::Specified(number)
    }
}

impl fmt::Display for SeekHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeekHeight::Specified(n) => write!(f, "{n}"),
            SeekHeight::Newest => f.write_str("newest"),
            SeekHeight::Oldest => f.write_str("oldest"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized seek height {0:?}: expected a block number, \"newest\" or \"oldest\"")]
pub struct ParseSeekHeightError(pub String);

impl FromStr for SeekHeight {
    type Err = ParseSeekHeightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.eq_ignore_ascii_case("newest") {
            return Ok(SeekHeight::Newest);
        }
        if token.eq_ignore_ascii_case("oldest") {
            return Ok(SeekHeight::Oldest);
        }
        token
            .parse::<u64>()
            .map(SeekHeight::Specified)
            .map_err(|_| ParseSeekHeightError(s.to_string()))
    }
}

pub fn build_seek_position(height: SeekHeight) -> SeekPosition {
    let variant = match height {
        SeekHeight::Specified(number) => seek_position::Type::Specified(SeekSpecified { number }),
        SeekHeight::Newest => seek_position::Type::Newest(SeekNewest {}),
        SeekHeight::Oldest => seek_position::Type::Oldest(SeekOldest {}),
    };
    SeekPosition {
        r#type: Some(variant),
    }
}

/// Reads back the height a position was built from. `None` when no
/// variant is set.
pub fn seek_height_of(position: &SeekPosition) -> Option<SeekHeight> {
    match position.r#type.as_ref()? {
        seek_position::Type::Specified(s) => Some(SeekHeight::Specified(s.number)),
        seek_position::Type::Newest(_) => Some(SeekHeight::Newest),
        seek_position::Type::Oldest(_) => Some(SeekHeight::Oldest),
    }
}

/// Without a behavior the field stays at its wire default and the orderer
/// applies its own default.
pub fn build_seek_info(
    start: SeekPosition,
    stop: SeekPosition,
    behavior: Option<SeekBehavior>,
) -> SeekInfo {
    let mut info = SeekInfo {
        start: Some(start),
        stop: Some(stop),
        ..Default::default()
    };
    if let Some(behavior) = behavior {
        info.set_behavior(behavior);
    }
    info
}

// ── Headers ──────────────────────────────────────────────────────────────────

/// Inputs for [`build_channel_header`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelHeaderSpec {
    /// Raw [`HeaderType`] value; not validated here.
    pub header_type: i32,
    pub version: i32,
    pub channel_id: String,
    pub tx_id: String,
    pub chaincode_id: Option<String>,
    pub tls_cert_hash: Option<Vec<u8>>,
    /// Defaults to the current time.
    pub timestamp: Option<Timestamp>,
}

impl ChannelHeaderSpec {
    pub fn new(
        header_type: HeaderType,
        version: i32,
        channel_id: impl Into<String>,
        tx_id: impl Into<String>,
    ) -> Self {
        Self {
            header_type: header_type as i32,
            version,
            channel_id: channel_id.into(),
            tx_id: tx_id.into(),
            ..Default::default()
        }
    }

    pub fn with_chaincode_id(mut self, name: impl Into<String>) -> Self {
        self.chaincode_id = Some(name.into());
        self
    }

    pub fn with_tls_cert_hash(mut self, hash: Vec<u8>) -> Self {
        self.tls_cert_hash = Some(hash);
        self
    }

    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// The chaincode header extension is always embedded, empty when no
/// chaincode is named.
pub fn build_channel_header(spec: ChannelHeaderSpec) -> ChannelHeader {
    let extension = ChaincodeHeaderExtension {
        chaincode_id: spec.chaincode_id.map(|name| ChaincodeId {
            name,
            ..Default::default()
        }),
    };

    ChannelHeader {
        r#type: spec.header_type,
        version: spec.version,
        timestamp: Some(spec.timestamp.unwrap_or_else(build_current_timestamp)),
        channel_id: spec.channel_id,
        tx_id: spec.tx_id,
        epoch: 0,
        extension: extension.encode_to_vec(),
        tls_cert_hash: spec.tls_cert_hash.unwrap_or_default(),
    }
}

pub fn build_signature_header(creator: &[u8], nonce: &[u8]) -> SignatureHeader {
    SignatureHeader {
        creator: creator.to_vec(),
        nonce: nonce.to_vec(),
    }
}

/// Encodes a fresh signature header and `channel_header` into a [`Header`].
pub fn build_header(creator: &[u8], nonce: &[u8], channel_header: &ChannelHeader) -> Header {
    let signature_header = build_signature_header(creator, nonce);
    Header {
        channel_header: channel_header.encode_to_vec(),
        signature_header: signature_header.encode_to_vec(),
    }
}

pub fn build_payload(header: Header, data: Vec<u8>) -> Payload {
    Payload {
        header: Some(header),
        data,
    }
}

/// Wraps an externally signed payload.
pub fn build_envelope(payload: &Payload, signature: Vec<u8>) -> Envelope {
    Envelope {
        payload: payload.encode_to_vec(),
        signature,
    }
}

// ── Seek payload ─────────────────────────────────────────────────────────────

/// The unsigned payload of a Deliver request for blocks `start..=stop`.
///
/// Sign `payload.encode_to_vec()` and wrap the result with
/// [`build_envelope`] before sending it to the orderer's Deliver API.
pub fn build_seek_payload(
    ctx: &TxContext,
    start: SeekHeight,
    stop: SeekHeight,
    behavior: Option<SeekBehavior>,
) -> Payload {
    let behavior = behavior.unwrap_or(DEFAULT_SEEK_BEHAVIOR);
    let seek_info = build_seek_info(
        build_seek_position(start),
        build_seek_position(stop),
        Some(behavior),
    );

    let channel_header = build_channel_header(ChannelHeaderSpec::new(
        HeaderType::DeliverSeekInfo,
        SEEK_INFO_HEADER_VERSION,
        ctx.channel_id.clone(),
        ctx.tx_id.clone(),
    ));
    let header = build_header(&ctx.creator, &ctx.nonce, &channel_header);

    build_payload(header, seek_info.encode_to_vec())
}

// ── Tests ────────────────────────────────────────────────────────────────────
