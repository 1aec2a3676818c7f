// ── sharedmemory.rs ─────────────────────────────────────────────────────────
//
// 單一 context、多執行緒版本：沒有訊息傳遞，rayon pool 直接分段求和。
//
// 每一段擁有自己的 kernel（也就是自己的係數表），以 `par_iter_mut` 交給
// pool 中的一個 job 獨占使用；同一張表不會被兩條執行緒同時寫入。
// kernel 跨 run 保留，係數表只在第一次或 invalidate() 之後重建。

use rayon::prelude::*;
use tracing::{
    debug,
    info
};

use crate::executor::domainsplit::split_counts;
use crate::integralerror::{
    IntegralError,
    Result
};
use crate::kernel::kernel::{
    Kernel,
    KernelKind,
    SeriesSettings
};
use crate::math::partition::Partition;

use super::integrationresult::{
    IntegrationResult,
    RunTimer
};
use super::integrator::Integrator;

pub struct SharedMemoryIntegrator {
    kernels: Vec<Box<dyn Kernel>>,
}

impl SharedMemoryIntegrator {
    /// 一段一個 kernel；`chunks` 為 0 時取 rayon pool 的執行緒數。
    pub fn new(kind: KernelKind, settings: &SeriesSettings, chunks: usize) -> SharedMemoryIntegrator {
        let chunks = if chunks == 0 {
            rayon::current_num_threads()
        } else {
            chunks
        };
        let kernels = (0..chunks).map(|_| kind.build(settings)).collect();
        SharedMemoryIntegrator { kernels }
    }

    pub fn chunks(&self) -> usize {
        self.kernels.len()
    }

    /// `δ · [ Σ_{i=1}^{n-1} f(x_i) + (f(x_0) + f(x_n)) / 2 ]`
    fn interior_sum(&mut self, domain: &Partition) -> f64 {
        let interior_points = domain.step_count().saturating_sub(1);
        let counts = split_counts(interior_points, self.kernels.len());

        let mut first = 1;
        let ranges: Vec<(usize, usize)> = counts
            .into_iter()
            .map(|count| {
                let range = (first, first + count);
                first += count;
                range
            })
            .collect();

        // 依段的順序相加，結果與 pool 排程無關
        let partials: Vec<f64> = self
            .kernels
            .par_iter_mut()
            .zip(ranges.par_iter())
            .map(|(kernel, &(lo, hi))| {
                (lo..hi).map(|i| kernel.value(domain.abscissa(i))).sum::<f64>()
            })
            .collect();

        partials.into_iter().sum()
    }
}

/// 一次性的便利函數：建一個 integrator、跑一次。
pub fn integrate_shared(domain: &Partition, kind: KernelKind, settings: &SeriesSettings) -> Result<IntegrationResult> {
    SharedMemoryIntegrator::new(kind, settings, 0).integrate(domain)
}

impl Integrator for SharedMemoryIntegrator {
    fn integrate(&mut self, domain: &Partition) -> Result<IntegrationResult> {
        if domain.is_empty() {
            return Err(IntegralError::EmptyDomain("domain has zero steps".to_string()));
        }

        let timer = RunTimer::start();
        let interior = self.interior_sum(domain);

        let kernel = &self.kernels[0];
        let endpoints = (kernel.value(domain.start()) + kernel.value(domain.end())) / 2.0;
        let sum = (interior + endpoints) * domain.delta();

        let result = timer.finish(sum);
        debug!(chunks = self.kernels.len(), interior, "shared-memory sums combined");
        info!(run_id = %result.run_id(), sum, elapsed = ?result.elapsed(), "shared-memory run complete");
        Ok(result)
    }

    fn invalidate(&self) {
        for kernel in &self.kernels {
            kernel.invalidate();
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::quadrature::trapezoid::trapezoid;

    #[test]
    fn test_matches_sequential_trapezoid() {
        let settings = SeriesSettings::default();
        let domain = Partition::new(-1.0, 1.0, 999);
        let mut integrator = SharedMemoryIntegrator::new(KernelKind::Composite, &settings, 4);

        let result = integrator.integrate(&domain).unwrap();
        let expected = trapezoid(KernelKind::Composite.build(&settings).as_ref(), &domain);

        assert_eq!(integrator.chunks(), 4);
        assert!((result.sum() - expected).abs() <= 1e-12 * expected.abs());
    }

    #[test]
    fn test_more_chunks_than_points() {
        let settings = SeriesSettings::default();
        let domain = Partition::new(0.0, 1.0, 2);
        let mut integrator = SharedMemoryIntegrator::new(KernelKind::Exponential, &settings, 8);

        let result = integrator.integrate(&domain).unwrap();
        let expected = trapezoid(KernelKind::Exponential.build(&settings).as_ref(), &domain);

        assert!((result.sum() - expected).abs() <= 1e-14);
    }

    #[test]
    fn test_one_shot_matches_integrator() {
        let settings = SeriesSettings::default();
        let domain = Partition::new(0.0, 1.0, 300);

        let one_shot = integrate_shared(&domain, KernelKind::Exponential, &settings).unwrap();
        let expected = trapezoid(KernelKind::Exponential.build(&settings).as_ref(), &domain);

        assert!((one_shot.sum() - expected).abs() <= 1e-12 * expected.abs());
    }

    #[test]
    fn test_parallel_series_inside_chunks() {
        let sequential = SeriesSettings::default();
        let parallel = SeriesSettings { parallel_series: true, ..sequential };
        let domain = Partition::new(-1.0, 1.0, 400);

        let lhs = SharedMemoryIntegrator::new(KernelKind::Composite, &parallel, 4).integrate(&domain).unwrap();
        let rhs = SharedMemoryIntegrator::new(KernelKind::Composite, &sequential, 4).integrate(&domain).unwrap();

        assert!((lhs.sum() - rhs.sum()).abs() <= 1e-12);
    }

    #[test]
    fn test_invalidate_keeps_result() {
        let settings = SeriesSettings::default();
        let domain = Partition::new(0.0, 1.0, 100);
        let mut integrator = SharedMemoryIntegrator::new(KernelKind::Arcsine, &settings, 3);

        let before = integrator.integrate(&domain).unwrap().sum();
        integrator.invalidate();
        let after = integrator.integrate(&domain).unwrap().sum();

        assert_eq!(before, after);
    }
}
