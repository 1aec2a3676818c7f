// ── coordinator.rs ──────────────────────────────────────────────────────────
//
// rank 0：切分 domain、派送 Job、計算自己那份、reduction 後加端點修正。

use tracing::{
    debug,
    info,
    info_span
};

use crate::integralerror::{
    IntegralError,
    Result
};
use crate::kernel::kernel::Kernel;
use crate::math::partition::Partition;
use crate::math::quadrature::trapezoid::{
    endpoint_correction,
    left_point_sum
};
use crate::protocol::messaging::{
    reduce,
    send_job,
    send_terminate
};
use crate::transport::communicator::Communicator;

use super::domainsplit::DomainSplit;
use super::integrationresult::{
    IntegrationResult,
    RunTimer
};
use super::integrator::Integrator;

/// Coordinator state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    Idle,
    Splitting,
    Dispatching,
    ComputingOwnShare,
    Reducing,
    Done,
    /// Terminate sent to every worker; no further rounds
    ShutDown,
}

/// Splits the domain, dispatches worker slices, computes its own share and
/// reduces. Owns the coordinator's kernel (and therefore its coefficient caches).
pub struct Coordinator<C: Communicator> {
    comm: C,
    kernel: Box<dyn Kernel>,
    state: CoordinatorState,
    rounds: usize,
}

impl<C: Communicator> Coordinator<C> {
    /// Fails if `comm` is not the coordinator's endpoint.
    pub fn new(comm: C, kernel: Box<dyn Kernel>) -> Result<Self> {
        if !comm.is_coordinator() {
            return Err(IntegralError::UnexpectedState(format!(
                "rank {} cannot act as coordinator",
                comm.rank()
            )));
        }
        Ok(Self {
            comm,
            kernel,
            state: CoordinatorState::Idle,
            rounds: 0,
        })
    }

    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    /// Completed rounds
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    fn check_preconditions(&self, domain: &Partition) -> Result<()> {
        if self.state == CoordinatorState::ShutDown {
            return Err(IntegralError::UnexpectedState(
                "coordinator already shut down".to_string(),
            ));
        }
        if domain.is_empty() {
            return Err(IntegralError::EmptyDomain("domain has zero steps".to_string()));
        }
        let participants = self.comm.size();
        if domain.step_count() < participants {
            // An undispatched worker never reaches the reduction and every
            // other participant would block in it.
            return Err(IntegralError::TopologyMismatch {
                steps: domain.step_count(),
                participants,
            });
        }
        Ok(())
    }

    /// One round: split, dispatch, own share, reduce, endpoint correction.
    pub fn run_round(&mut self, domain: &Partition) -> Result<IntegrationResult> {
        self.check_preconditions(domain)?;

        let timer = RunTimer::start();
        let span = info_span!("round", run_id = %timer.run_id(), round = self.rounds);
        let _guard = span.enter();

        self.state = CoordinatorState::Splitting;
        let split = DomainSplit::new(domain, self.comm.size());

        self.state = CoordinatorState::Dispatching;
        for (rank, slice) in split.dispatched() {
            send_job(&self.comm, slice, rank)?;
        }

        self.state = CoordinatorState::ComputingOwnShare;
        let own = left_point_sum(self.kernel.as_ref(), split.own());
        debug!(steps = split.own().step_count(), own, "own share computed");

        self.state = CoordinatorState::Reducing;
        let reduced = reduce(&mut self.comm, own)?;

        // 端點修正：整個 domain 只做一次，且只在 coordinator
        let sum = reduced + endpoint_correction(self.kernel.as_ref(), domain);

        self.state = CoordinatorState::Done;
        self.rounds += 1;
        let result = timer.finish(sum);
        info!(sum, elapsed = ?result.elapsed(), "round complete");
        Ok(result)
    }

    /// Sends Terminate to every worker and gives the endpoint back.
    pub fn shutdown(mut self) -> Result<C> {
        for rank in 1..self.comm.size() {
            send_terminate(&self.comm, rank)?;
        }
        self.state = CoordinatorState::ShutDown;
        info!(rounds = self.rounds, "coordinator shut down");
        Ok(self.comm)
    }
}

impl<C: Communicator> Integrator for Coordinator<C> {
    fn integrate(&mut self, domain: &Partition) -> Result<IntegrationResult> {
        self.run_round(domain)
    }

    fn invalidate(&self) {
        self.kernel.invalidate();
    }
}
