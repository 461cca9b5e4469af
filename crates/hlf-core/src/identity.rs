//! Identity material for transactions: creator bytes, nonces, tx ids.
//!
//! Signing keys never pass through here; the external signer owns them.
//! This module only produces the public pieces that go into headers.

use prost::Message;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::wire::SerializedIdentity;

/// Nonce length used by the Fabric SDKs.
pub const NONCE_LEN: usize = 24;

/// A fresh random nonce.
pub fn new_nonce() -> Vec<u8> {
    let mut nonce = vec![0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce);
    nonce
}

/// Fabric's transaction id: hex(SHA-256(nonce || creator)).
pub fn compute_tx_id(nonce: &[u8], creator: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(nonce);
    hasher.update(creator);
    hex::encode(hasher.finalize())
}

/// The submitting identity, already serialized for `SignatureHeader.creator`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityContext {
    pub msp_id: String,
    pub creator: Vec<u8>,
}

impl IdentityContext {
    /// Serialize `(msp_id, certificate_pem)` as a `msp.SerializedIdentity`.
    pub fn new(msp_id: impl Into<String>, certificate_pem: &[u8]) -> Self {
        let msp_id = msp_id.into();
        let creator = SerializedIdentity {
            mspid: msp_id.clone(),
            id_bytes: certificate_pem.to_vec(),
        }
        .encode_to_vec();
        Self { msp_id, creator }
    }

    /// A context around creator bytes produced elsewhere.
    pub fn from_creator(msp_id: impl Into<String>, creator: Vec<u8>) -> Self {
        Self {
            msp_id: msp_id.into(),
            creator,
        }
    }

    /// Start a new transaction on `channel_id` with a fresh nonce.
    pub fn new_tx(&self, channel_id: impl Into<String>) -> TxContext {
        TxContext::new(self.creator.clone(), channel_id)
    }
}

/// Per-transaction values shared by the channel and signature headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxContext {
    pub creator: Vec<u8>,
    pub nonce: Vec<u8>,
    pub channel_id: String,
    pub tx_id: String,
}

impl TxContext {
    /// Generates the nonce and derives the tx id from it.
    pub fn new(creator: Vec<u8>, channel_id: impl Into<String>) -> Self {
        let nonce = new_nonce();
        let tx_id = compute_tx_id(&nonce, &creator);
        Self {
            creator,
            nonce,
            channel_id: channel_id.into(),
            tx_id,
        }
    }

    /// Caller-supplied nonce and tx id, used as-is.
    pub fn from_parts(
        creator: Vec<u8>,
        nonce: Vec<u8>,
        channel_id: impl Into<String>,
        tx_id: impl Into<String>,
    ) -> Self {
        Self {
            creator,
            nonce,
            channel_id: channel_id.into(),
            tx_id: tx_id.into(),
        }
    }
}
