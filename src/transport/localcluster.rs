// ── localcluster.rs ─────────────────────────────────────────────────────────

use std::collections::VecDeque;
use std::sync::mpsc::{
    self,
    Receiver,
    Sender
};
use std::thread;

use tracing::{
    debug,
    trace
};

use super::communicator::{
    Communicator,
    MessageTag,
    Rank
};
use super::transporterror::TransportError;

/// 同一行程內的固定拓撲：每個參與者一條 OS thread，兩兩之間各一條 channel。
///
/// # Full mesh
///
/// `receive` 必須指名來源。每一對 (source, destination) 各自一條 channel，
/// 來源端 endpoint 被 drop 時，對方的 `receive` 會拿到 `Disconnected`，
/// 而不是永遠卡住；同一來源的訊息維持 FIFO。
pub struct LocalCluster;

struct Envelope {
    tag: MessageTag,
    payload: Vec<u8>,
}

pub struct LocalEndpoint {
    rank: Rank,
    size: usize,
    outboxes: Vec<Option<Sender<Envelope>>>,
    inboxes: Vec<Option<Receiver<Envelope>>>,
    // 同一來源、tag 不符而先收下的訊息
    pending: Vec<VecDeque<Envelope>>,
}

impl LocalCluster {
    /// 建立 `size` 個彼此相連的 endpoint，index 即 rank。
    pub fn endpoints(size: usize) -> Vec<LocalEndpoint> {
        let mut outboxes: Vec<Vec<Option<Sender<Envelope>>>> =
            (0..size).map(|_| (0..size).map(|_| None).collect()).collect();
        let mut inboxes: Vec<Vec<Option<Receiver<Envelope>>>> =
            (0..size).map(|_| (0..size).map(|_| None).collect()).collect();

        for source in 0..size {
            for destination in 0..size {
                if source == destination {
                    continue;
                }
                let (tx, rx) = mpsc::channel();
                outboxes[source][destination] = Some(tx);
                inboxes[destination][source] = Some(rx);
            }
        }

        outboxes
            .into_iter()
            .zip(inboxes)
            .enumerate()
            .map(|(rank, (outboxes, inboxes))| LocalEndpoint {
                rank,
                size,
                outboxes,
                inboxes,
                pending: (0..size).map(|_| VecDeque::new()).collect(),
            })
            .collect()
    }

    /// SPMD：每個 rank 在自己的 thread 上跑同一個 `participant`，結果依 rank 排序。
    pub fn run<F, R>(size: usize, participant: F) -> Result<Vec<R>, TransportError>
    where
        F: Fn(LocalEndpoint) -> R + Sync,
        R: Send,
    {
        debug!(size, "starting local cluster");
        let participant = &participant;

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(size);
            for endpoint in LocalCluster::endpoints(size) {
                let rank = endpoint.rank;
                let handle = thread::Builder::new()
                    .name(format!("participant-{rank}"))
                    .spawn_scoped(scope, move || participant(endpoint))
                    .map_err(|error| TransportError::Spawn {
                        rank,
                        reason: error.to_string(),
                    })?;
                handles.push(handle);
            }

            handles
                .into_iter()
                .enumerate()
                .map(|(rank, handle)| {
                    handle.join().map_err(|_| TransportError::ParticipantPanicked(rank))
                })
                .collect()
        })
    }
}

impl LocalEndpoint {
    fn check_peer(&self, peer: Rank) -> Result<(), TransportError> {
        if peer >= self.size {
            Err(TransportError::UnknownRank { rank: peer, size: self.size })
        } else if peer == self.rank {
            Err(TransportError::SelfMessage(peer))
        } else {
            Ok(())
        }
    }
}

impl Communicator for LocalEndpoint {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn send(&self, destination: Rank, tag: MessageTag, payload: &[u8]) -> Result<(), TransportError> {
        self.check_peer(destination)?;
        let outbox = self.outboxes[destination]
            .as_ref()
            .ok_or(TransportError::Disconnected { peer: destination })?;

        trace!(from = self.rank, to = destination, ?tag, len = payload.len(), "send");
        outbox
            .send(Envelope { tag, payload: payload.to_vec() })
            .map_err(|_| TransportError::Disconnected { peer: destination })
    }

    fn receive(&mut self, source: Rank, tag: MessageTag) -> Result<Vec<u8>, TransportError> {
        self.check_peer(source)?;

        let pending = &mut self.pending[source];
        if let Some(index) = pending.iter().position(|envelope| envelope.tag == tag) {
            if let Some(envelope) = pending.remove(index) {
                return Ok(envelope.payload);
            }
        }

        let inbox = self.inboxes[source]
            .as_ref()
            .ok_or(TransportError::Disconnected { peer: source })?;
        loop {
            let envelope = inbox
                .recv()
                .map_err(|_| TransportError::Disconnected { peer: source })?;
            if envelope.tag == tag {
                trace!(at = self.rank, from = source, ?tag, "receive");
                return Ok(envelope.payload);
            }
            self.pending[source].push_back(envelope);
        }
    }
}
