use serde::{
    Deserialize,
    Serialize
};
use tracing::{
    debug,
    info
};

use crate::executor::integrationresult::IntegrationResult;
use crate::executor::integrator::Integrator;
use crate::integralerror::{
    IntegralError,
    Result
};
use crate::math::partition::Partition;

pub const DEFAULT_WARMUP_ROUNDS: usize = 10;
pub const DEFAULT_MEASURED_ROUNDS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkSettings {
    pub warmup_rounds: usize,
    pub measured_rounds: usize
}

impl Default for BenchmarkSettings {
    fn default() -> Self {
        BenchmarkSettings {
            warmup_rounds: DEFAULT_WARMUP_ROUNDS,
            measured_rounds: DEFAULT_MEASURED_ROUNDS
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    warmup_rounds: usize,
    measured_rounds: usize,
    average_seconds: f64,
    last: IntegrationResult
}

impl BenchmarkReport {
    pub fn warmup_rounds(&self) -> usize {
        self.warmup_rounds
    }

    pub fn measured_rounds(&self) -> usize {
        self.measured_rounds
    }

    pub fn average_seconds(&self) -> f64 {
        self.average_seconds
    }

    pub fn last(&self) -> &IntegrationResult {
        &self.last
    }
}

/// 暖身 `warmup_rounds` 次（結果丟棄），再量測 `measured_rounds` 次取平均。
///
/// 每次量測前先發出係數失效訊號，讓建表成本計入每一輪。
pub fn benchmark(
    settings: &BenchmarkSettings,
    integrator: &mut dyn Integrator,
    domain: &Partition,
) -> Result<BenchmarkReport> {
    if settings.measured_rounds == 0 {
        return Err(IntegralError::InvalidConfiguration("benchmark needs at least one measured round".to_string()));
    }

    for round in 0..settings.warmup_rounds {
        let result = integrator.integrate(domain)?;
        debug!(round, elapsed = ?result.elapsed(), "warm-up round discarded");
    }

    let mut average = 0.0;
    let mut last = None;
    for i in 0..settings.measured_rounds {
        integrator.invalidate();
        let result = integrator.integrate(domain)?;
        average = (average * i as f64 + result.elapsed_seconds()) / (i + 1) as f64;
        last = Some(result);
    }

    let last = last.ok_or_else(|| IntegralError::UnexpectedState("no measured round".to_string()))?;
    info!(
        warmup = settings.warmup_rounds,
        measured = settings.measured_rounds,
        average_seconds = average,
        "benchmark complete"
    );

    Ok(BenchmarkReport {
        warmup_rounds: settings.warmup_rounds,
        measured_rounds: settings.measured_rounds,
        average_seconds: average,
        last
    })
}


#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::time::Duration;

    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    struct CountingIntegrator {
        runs: usize,
        invalidations: Cell<usize>,
        // invalidation count observed at each run
        seen: Vec<usize>
    }

    impl Integrator for CountingIntegrator {
        fn integrate(&mut self, _domain: &Partition) -> Result<IntegrationResult> {
            self.runs += 1;
            self.seen.push(self.invalidations.get());
            let elapsed = Duration::from_millis(self.runs as u64);
            Ok(IntegrationResult::new(Uuid::new_v4(), Utc::now(), self.runs as f64, elapsed))
        }

        fn invalidate(&self) {
            self.invalidations.set(self.invalidations.get() + 1);
        }
    }

    #[test]
    fn test_warmup_discarded_and_invalidation_before_each_measured_round() {
        let mut integrator = CountingIntegrator { runs: 0, invalidations: Cell::new(0), seen: vec![] };
        let settings = BenchmarkSettings { warmup_rounds: 2, measured_rounds: 3 };

        let report = benchmark(&settings, &mut integrator, &Partition::new(0.0, 1.0, 4)).unwrap();

        assert_eq!(integrator.runs, 5);
        assert_eq!(integrator.seen, vec![0, 0, 1, 2, 3]);
        // measured rounds took 3, 4, 5 ms
        assert!((report.average_seconds() - 0.004).abs() < 1e-12);
        assert_eq!(report.last().sum(), 5.0);
    }

    #[test]
    fn test_zero_measured_rounds_rejected() {
        let mut integrator = CountingIntegrator { runs: 0, invalidations: Cell::new(0), seen: vec![] };
        let settings = BenchmarkSettings { warmup_rounds: 1, measured_rounds: 0 };

        assert!(benchmark(&settings, &mut integrator, &Partition::new(0.0, 1.0, 4)).is_err());
        assert_eq!(integrator.runs, 0);
    }
}
