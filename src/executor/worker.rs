// ── worker.rs ───────────────────────────────────────────────────────────────

use tracing::{
    debug,
    info
};

use crate::integralerror::{
    IntegralError,
    Result
};
use crate::kernel::kernel::Kernel;
use crate::math::quadrature::trapezoid::left_point_sum;
use crate::protocol::jobmessage::JobMessage;
use crate::protocol::messaging::{
    receive_job,
    reduce
};
use crate::transport::communicator::Communicator;

/// Worker state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    AwaitJob,
    Computing,
    ReducingContribution,
    Terminated,
}

/// Receive loop: job → local partial sum → reduction, until Terminate.
///
/// The worker never applies endpoint weighting; that correction belongs to
/// the coordinator, once per round.
pub struct Worker<C: Communicator> {
    comm: C,
    kernel: Box<dyn Kernel>,
    state: WorkerState,
    rounds: usize,
}

impl<C: Communicator> Worker<C> {
    pub fn new(comm: C, kernel: Box<dyn Kernel>) -> Result<Self> {
        if comm.is_coordinator() {
            return Err(IntegralError::UnexpectedState(
                "the coordinator rank cannot run a worker loop".to_string(),
            ));
        }
        Ok(Self {
            comm,
            kernel,
            state: WorkerState::Idle,
            rounds: 0,
        })
    }

    pub fn rank(&self) -> usize {
        self.comm.rank()
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Rounds served so far
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Handles one message. Returns `false` once Terminate has been received.
    pub fn step(&mut self) -> Result<bool> {
        if self.state == WorkerState::Terminated {
            return Ok(false);
        }

        self.state = WorkerState::AwaitJob;
        let partition = match receive_job(&mut self.comm)? {
            JobMessage::Terminate => {
                self.state = WorkerState::Terminated;
                return Ok(false);
            }
            JobMessage::Job(partition) => partition,
        };

        self.state = WorkerState::Computing;
        let local = left_point_sum(self.kernel.as_ref(), &partition);
        debug!(
            rank = self.comm.rank(),
            steps = partition.step_count(),
            local,
            "partial sum computed"
        );

        self.state = WorkerState::ReducingContribution;
        let _total = reduce(&mut self.comm, local)?;

        self.rounds += 1;
        Ok(true)
    }

    /// Runs until Terminate; returns the number of rounds served.
    pub fn run(&mut self) -> Result<usize> {
        while self.step()? {}
        info!(rank = self.comm.rank(), rounds = self.rounds, "worker terminated");
        Ok(self.rounds)
    }
}
