use tracing::debug;

use crate::integralerror::Result;
use crate::math::partition::Partition;
use crate::transport::communicator::{
    Communicator,
    MessageTag,
    Rank,
    COORDINATOR_RANK
};

use super::jobmessage::JobMessage;

/// 送出一個 Job；目的地是 coordinator 自己時不做事（自己的份在本地算）。
pub fn send_job<C: Communicator>(comm: &C, partition: &Partition, destination: Rank) -> Result<()> {
    if destination == COORDINATOR_RANK {
        return Ok(());
    }

    let buffer = JobMessage::Job(*partition).encode()?;
    debug!(
        destination,
        start = partition.start(),
        end = partition.end(),
        steps = partition.step_count(),
        "dispatching job"
    );
    comm.send(destination, MessageTag::Job, buffer.as_bytes())?;
    Ok(())
}

pub fn send_terminate<C: Communicator>(comm: &C, destination: Rank) -> Result<()> {
    let buffer = JobMessage::Terminate.encode()?;
    debug!(destination, "sending terminate");
    comm.send(destination, MessageTag::Job, buffer.as_bytes())?;
    Ok(())
}

/// 阻塞直到 coordinator 送來下一個訊息；`JobMessage::Terminate` 即「沒有工作了」。
pub fn receive_job<C: Communicator>(comm: &mut C) -> Result<JobMessage> {
    let payload = comm.receive(COORDINATOR_RANK, MessageTag::Job)?;
    Ok(JobMessage::decode(&payload)?)
}

pub fn reduce<C: Communicator>(comm: &mut C, local_sum: f64) -> Result<f64> {
    Ok(comm.all_reduce_sum(local_sum)?)
}
