use thiserror::Error;

use crate::protocol::protocolerror::ProtocolError;
use crate::transport::transporterror::TransportError;

#[derive(Error, Debug)]
pub enum IntegralError {
    /// Job message could not be encoded or decoded
    #[error("protocol violation: {0}")]
    Protocol(#[from] ProtocolError),

    /// Message-passing fabric failure
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Fewer steps than participants: some worker would never get a job and
    /// the collective reduction would stall
    #[error("{steps} steps cannot be split across {participants} participants (need steps >= participants)")]
    TopologyMismatch { steps: usize, participants: usize },

    /// Zero participants or zero steps
    #[error("nothing to integrate: {0}")]
    EmptyDomain(String),

    /// Settings that cannot produce a run
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Role or lifecycle misuse
    #[error("unexpected state: {0}")]
    UnexpectedState(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, IntegralError>;
