//! In-process [`ProposalSender`] for unit tests.

use std::sync::Mutex;

use anyhow::{anyhow, Result};
use hlf_core::wire::{Proposal, ProposalResponse, Response};

use crate::proposal::ProposalSender;

/// Records every call and answers each endorser with a 200 response
/// carrying `payload`, or fails with `error`.
pub struct RecordingSender {
    calls: Mutex<Vec<(Proposal, Vec<String>)>>,
    payload: Vec<u8>,
    error: Option<String>,
}

impl RecordingSender {
    pub fn ok() -> Self {
        Self::with_payload(Vec::new())
    }

    pub fn with_payload(payload: Vec<u8>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            payload,
            error: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            payload: Vec::new(),
            error: Some(message.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<(Proposal, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ProposalSender for RecordingSender {
    async fn send_proposal(
        &self,
        proposal: Proposal,
        endorsers: &[String],
    ) -> Result<Vec<ProposalResponse>> {
        self.calls
            .lock()
            .unwrap()
            .push((proposal, endorsers.to_vec()));

        if let Some(message) = &self.error {
            return Err(anyhow!("{message}"));
        }

        Ok(endorsers
            .iter()
            .map(|_| ProposalResponse {
                version: 1,
                response: Some(Response {
                    status: 200,
                    message: String::new(),
                    payload: self.payload.clone(),
                }),
                ..Default::default()
            })
            .collect())
    }
}
