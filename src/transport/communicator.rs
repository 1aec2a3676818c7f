// Point-to-point messaging plus a collective sum reduction.
//
// The topology is fixed for the lifetime of a run: `size()` participants,
// rank 0 is the coordinator. Every call blocks; there are no timeouts.

use serde::{
    Deserialize,
    Serialize
};

use super::transporterror::TransportError;

pub type Rank = usize;

pub const COORDINATOR_RANK: Rank = 0;

/// Channel selector for messages between the same pair of ranks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageTag {
    /// Encoded job messages, coordinator to worker
    Job,
    /// A participant's local partial sum, sent to the coordinator
    ReduceContribution,
    /// The reduced total, broadcast back by the coordinator
    ReduceResult,
}

pub trait Communicator {
    fn rank(&self) -> Rank;

    fn size(&self) -> usize;

    /// Blocks until the transport accepts the message.
    fn send(&self, destination: Rank, tag: MessageTag, payload: &[u8]) -> Result<(), TransportError>;

    /// Blocks until a message with `tag` from `source` arrives.
    fn receive(&mut self, source: Rank, tag: MessageTag) -> Result<Vec<u8>, TransportError>;

    fn is_coordinator(&self) -> bool {
        self.rank() == COORDINATOR_RANK
    }

    /// Collective sum across all participants; every rank must call it in the
    /// same round and every rank gets the same total back.
    ///
    /// Contributions are gathered at the coordinator and summed in rank order,
    /// so the total does not depend on arrival order.
    fn all_reduce_sum(&mut self, value: f64) -> Result<f64, TransportError> {
        if self.size() == 1 {
            return Ok(value);
        }

        if self.is_coordinator() {
            let mut total = value;
            for source in 1..self.size() {
                let payload = self.receive(source, MessageTag::ReduceContribution)?;
                total += decode_f64(&payload, source, MessageTag::ReduceContribution)?;
            }
            let encoded = total.to_le_bytes();
            for destination in 1..self.size() {
                self.send(destination, MessageTag::ReduceResult, &encoded)?;
            }
            Ok(total)
        } else {
            self.send(COORDINATOR_RANK, MessageTag::ReduceContribution, &value.to_le_bytes())?;
            let payload = self.receive(COORDINATOR_RANK, MessageTag::ReduceResult)?;
            decode_f64(&payload, COORDINATOR_RANK, MessageTag::ReduceResult)
        }
    }
}

fn decode_f64(payload: &[u8], source_rank: Rank, tag: MessageTag) -> Result<f64, TransportError> {
    let bytes: [u8; 8] = payload.try_into().map_err(|_| TransportError::MalformedReduction {
        source_rank,
        tag,
        len: payload.len(),
    })?;
    Ok(f64::from_le_bytes(bytes))
}
