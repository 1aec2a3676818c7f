use std::f64::consts::PI;

use super::seriesexpansion::SeriesExpansion;

pub const DEFAULT_HEAVISIDE_STEP_TERMS: usize = 100;

/// Heaviside step（unit step）的 Fourier 級數，x <= 0 為 0，否則為 1：
///
///   H(x) ≈ 1/2 + Σ_{i=0}^{T-1} 2 / (nπ) · sin(nx)，n = 2i + 1
///
/// 只在 (-π, π) 內成立，不連續點附近有 Gibbs 振盪。
#[derive(Debug, Clone, Copy)]
pub struct HeavisideStepSeries {
    terms: usize
}

impl HeavisideStepSeries {
    pub fn new(terms: usize) -> HeavisideStepSeries {
        HeavisideStepSeries { terms }
    }
}

impl Default for HeavisideStepSeries {
    fn default() -> Self {
        HeavisideStepSeries::new(DEFAULT_HEAVISIDE_STEP_TERMS)
    }
}

impl SeriesExpansion for HeavisideStepSeries {
    fn terms(&self) -> usize {
        self.terms
    }

    fn coefficient(&self, i: usize) -> f64 {
        2.0 / ((2 * i + 1) as f64 * PI)
    }

    fn term(&self, x: f64, i: usize, coefficient: f64) -> f64 {
        let n = (2 * i + 1) as f64;
        coefficient * (n * x).sin()
    }

    fn base(&self) -> f64 {
        0.5
    }
}
