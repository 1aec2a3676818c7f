use thiserror::Error;

use super::communicator::{
    MessageTag,
    Rank
};

/// Errors raised by the message-passing fabric
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Rank outside `0..size`
    #[error("rank {rank} out of range for a world of size {size}")]
    UnknownRank { rank: Rank, size: usize },

    /// Sending to or receiving from oneself is not a transport operation
    #[error("rank {0} cannot message itself")]
    SelfMessage(Rank),

    /// Peer endpoint has been dropped
    #[error("peer {peer} disconnected")]
    Disconnected { peer: Rank },

    /// Reduction payload was not an 8-byte f64
    #[error("malformed {tag:?} payload from rank {source_rank}: {len} bytes")]
    MalformedReduction {
        source_rank: Rank,
        tag: MessageTag,
        len: usize,
    },

    /// Participant thread could not be started
    #[error("failed to spawn participant {rank}: {reason}")]
    Spawn { rank: Rank, reason: String },

    /// Participant thread panicked before returning
    #[error("participant {0} panicked")]
    ParticipantPanicked(Rank),
}
