// ── serieskernel.rs ─────────────────────────────────────────────────────────

use super::arcsine::ArcsineSeries;
use super::coefficientbackend::{
    CoefficientBackend,
    RecomputeBackend,
    RefCellBackend
};
use super::exponential::ExponentialSeries;
use super::heavisidestep::HeavisideStepSeries;
use super::kernel::Kernel;
use super::seriesexpansion::SeriesExpansion;

/// 核心 struct 只寫一次，S 決定級數，C 決定係數策略
pub struct SeriesKernel<S: SeriesExpansion, C: CoefficientBackend> {
    series: S,
    backend: C,
}

impl<S: SeriesExpansion, C: CoefficientBackend> SeriesKernel<S, C> {
    pub fn with_backend(series: S, backend: C) -> Self {
        Self { series, backend }
    }

    pub fn backend(&self) -> &C {
        &self.backend
    }
}

/// 兩個 convenience constructor，分別對應兩種策略
impl<S: SeriesExpansion> SeriesKernel<S, RefCellBackend> {
    pub fn cached(series: S) -> Self {
        Self::with_backend(series, RefCellBackend::new())
    }
}

impl<S: SeriesExpansion> SeriesKernel<S, RecomputeBackend> {
    pub fn uncached(series: S) -> Self {
        Self::with_backend(series, RecomputeBackend::new())
    }
}

impl<S: SeriesExpansion, C: CoefficientBackend> Kernel for SeriesKernel<S, C> {
    fn value(&self, x: f64) -> f64 {
        self.backend.evaluate(&self.series, x)
    }

    fn invalidate(&self) {
        self.backend.invalidate();
    }
}

// ── Type alias ──────────────────────────────────────────────────────────────

pub type CachedArcsine = SeriesKernel<ArcsineSeries, RefCellBackend>;
pub type CachedExponential = SeriesKernel<ExponentialSeries, RefCellBackend>;
pub type CachedHeavisideStep = SeriesKernel<HeavisideStepSeries, RefCellBackend>;

pub type Arcsine = SeriesKernel<ArcsineSeries, RecomputeBackend>;
pub type Exponential = SeriesKernel<ExponentialSeries, RecomputeBackend>;
pub type HeavisideStep = SeriesKernel<HeavisideStepSeries, RecomputeBackend>;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arcsine_close_to_std() {
        let kernel = CachedArcsine::cached(ArcsineSeries::default());
        for x in [-0.5, 0.0, 0.25, 0.5, 0.8] {
            assert!((kernel.value(x) - f64::asin(x)).abs() < 1e-10, "x = {x}");
        }
    }

    #[test]
    fn test_exponential_close_to_std() {
        let kernel = CachedExponential::cached(ExponentialSeries::default());
        for x in [-2.0, -0.5, 0.0, 1.0, 3.0] {
            let expected = f64::exp(x);
            assert!((kernel.value(x) - expected).abs() < 1e-12 * expected.max(1.0), "x = {x}");
        }
    }

    #[test]
    fn test_heaviside_step_away_from_discontinuity() {
        let kernel = CachedHeavisideStep::cached(HeavisideStepSeries::default());

        assert!((kernel.value(1.0) - 1.0).abs() < 1e-2);
        assert!(kernel.value(-1.0).abs() < 1e-2);
        assert!((kernel.value(0.0) - 0.5).abs() < 1e-15);
    }

    #[test]
    fn test_cached_matches_uncached() {
        let cached = CachedExponential::cached(ExponentialSeries::new(40));
        let uncached = Exponential::uncached(ExponentialSeries::new(40));

        assert_eq!(cached.value(0.7), uncached.value(0.7));
        cached.invalidate();
        assert!(!cached.backend().is_ready());
        assert_eq!(cached.value(0.7), uncached.value(0.7));
    }
}
