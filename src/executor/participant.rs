// ── participant.rs ──────────────────────────────────────────────────────────
//
// SPMD 入口：每個 rank 以同一份 plan 呼叫 `run_participant`。

use serde::{
    Deserialize,
    Serialize
};
use tracing::{
    info,
    warn
};

use crate::benchmark::{
    benchmark,
    BenchmarkReport,
    BenchmarkSettings
};
use crate::integralerror::{
    IntegralError,
    Result
};
use crate::kernel::kernel::{
    KernelKind,
    SeriesSettings
};
use crate::math::partition::Partition;
use crate::transport::communicator::Communicator;
use crate::transport::localcluster::LocalCluster;

use super::coordinator::Coordinator;
use super::integrationresult::IntegrationResult;
use super::worker::Worker;

/// What every participant is asked to do. Identical on all ranks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntegrationPlan {
    pub domain: Partition,
    pub kernel: KernelKind,
    pub series: SeriesSettings,
    /// `None` 表示只跑一次
    pub benchmark: Option<BenchmarkSettings>
}

impl IntegrationPlan {
    pub fn single(domain: Partition, kernel: KernelKind, series: SeriesSettings) -> IntegrationPlan {
        IntegrationPlan { domain, kernel, series, benchmark: None }
    }

    pub fn with_benchmark(mut self, settings: BenchmarkSettings) -> IntegrationPlan {
        self.benchmark = Some(settings);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RunReport {
    Single(IntegrationResult),
    Benchmark(BenchmarkReport)
}

impl RunReport {
    /// Integral value of the (last) run
    pub fn sum(&self) -> f64 {
        match self {
            RunReport::Single(result) => result.sum(),
            RunReport::Benchmark(report) => report.last().sum()
        }
    }
}

#[derive(Debug, Clone)]
pub enum ParticipantOutcome {
    Coordinator(RunReport),
    Worker { rounds: usize }
}

/// 每個參與者都是單執行緒：`parallel_series` 在這裡一律關閉。
pub fn run_participant<C: Communicator>(comm: C, plan: &IntegrationPlan) -> Result<ParticipantOutcome> {
    let kernel = plan.kernel.build(&plan.series.sequential());

    if !comm.is_coordinator() {
        let mut worker = Worker::new(comm, kernel)?;
        let rounds = worker.run()?;
        return Ok(ParticipantOutcome::Worker { rounds });
    }

    let mut coordinator = Coordinator::new(comm, kernel)?;
    // 出錯時 coordinator 連同 endpoint 一起 drop，worker 收到 Disconnected 後結束
    let report = match &plan.benchmark {
        None => RunReport::Single(coordinator.run_round(&plan.domain)?),
        Some(settings) => RunReport::Benchmark(benchmark(settings, &mut coordinator, &plan.domain)?)
    };
    coordinator.shutdown()?;
    Ok(ParticipantOutcome::Coordinator(report))
}

/// Runs `plan` on an in-process cluster of `participants` ranks.
///
/// The coordinator's error wins over the follow-on disconnect errors of the
/// workers it abandoned.
pub fn integrate_distributed(participants: usize, plan: &IntegrationPlan) -> Result<RunReport> {
    if participants == 0 {
        return Err(IntegralError::EmptyDomain("zero participants".to_string()));
    }
    if plan.domain.step_count() < participants {
        return Err(IntegralError::TopologyMismatch {
            steps: plan.domain.step_count(),
            participants,
        });
    }

    if plan.series.parallel_series {
        warn!("parallel_series is ignored in distributed mode; participants sum series terms sequentially");
    }
    info!(participants, kernel = %plan.kernel, steps = plan.domain.step_count(), "distributed run");
    let mut outcomes = LocalCluster::run(participants, |endpoint| run_participant(endpoint, plan))?.into_iter();

    let report = match outcomes.next() {
        Some(Ok(ParticipantOutcome::Coordinator(report))) => report,
        Some(Ok(ParticipantOutcome::Worker { .. })) | None => {
            return Err(IntegralError::UnexpectedState("rank 0 did not act as coordinator".to_string()));
        }
        Some(Err(error)) => return Err(error),
    };

    let expected_rounds = plan
        .benchmark
        .map(|settings| settings.warmup_rounds + settings.measured_rounds)
        .unwrap_or(1);
    for (offset, outcome) in outcomes.enumerate() {
        match outcome? {
            ParticipantOutcome::Worker { rounds } if rounds == expected_rounds => {}
            ParticipantOutcome::Worker { rounds } => {
                warn!(rank = offset + 1, rounds, expected_rounds, "worker served an unexpected number of rounds");
            }
            ParticipantOutcome::Coordinator(_) => {
                return Err(IntegralError::UnexpectedState(format!("rank {} acted as coordinator", offset + 1)));
            }
        }
    }

    Ok(report)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::quadrature::trapezoid::trapezoid;

    fn plan(steps: usize) -> IntegrationPlan {
        IntegrationPlan::single(Partition::new(0.0, 1.0, steps), KernelKind::Exponential, SeriesSettings::default())
    }

    #[test]
    fn test_workers_report_rounds() {
        let plan = plan(100).with_benchmark(BenchmarkSettings { warmup_rounds: 1, measured_rounds: 2 });
        let outcomes = LocalCluster::run(3, |endpoint| run_participant(endpoint, &plan)).unwrap();

        assert!(matches!(outcomes[0], Ok(ParticipantOutcome::Coordinator(RunReport::Benchmark(_)))));
        for outcome in &outcomes[1..] {
            assert!(matches!(outcome, Ok(ParticipantOutcome::Worker { rounds: 3 })));
        }
    }

    #[test]
    fn test_distributed_single_run() {
        let plan = plan(1000);
        let report = integrate_distributed(4, &plan).unwrap();
        let expected = trapezoid(plan.kernel.build(&plan.series).as_ref(), &plan.domain);

        assert!(matches!(report, RunReport::Single(_)));
        assert!((report.sum() - expected).abs() <= 1e-12 * expected.abs());
    }

    #[test]
    fn test_parallel_series_ignored_by_participants() {
        let sequential = plan(500);
        let mut parallel = sequential;
        parallel.series.parallel_series = true;

        let lhs = integrate_distributed(3, &sequential).unwrap().sum();
        let rhs = integrate_distributed(3, &parallel).unwrap().sum();
        assert_eq!(lhs.to_bits(), rhs.to_bits());
    }

    #[test]
    fn test_rejected_before_spawning() {
        assert!(matches!(
            integrate_distributed(5, &plan(4)),
            Err(IntegralError::TopologyMismatch { steps: 4, participants: 5 })
        ));
        assert!(matches!(integrate_distributed(0, &plan(4)), Err(IntegralError::EmptyDomain(_))));
    }

    #[test]
    fn test_coordinator_error_reaches_caller() {
        // Bypass the up-front check so the coordinator itself rejects the round
        let plan = plan(2);
        let outcomes = LocalCluster::run(3, |endpoint| run_participant(endpoint, &plan)).unwrap();

        assert!(matches!(outcomes[0], Err(IntegralError::TopologyMismatch { .. })));
        assert!(outcomes[1..].iter().all(|outcome| outcome.is_err()));
    }
}
