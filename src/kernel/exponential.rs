use crate::math::special::ln_factorial;

use super::seriesexpansion::SeriesExpansion;

pub const DEFAULT_EXPONENTIAL_TERMS: usize = 100;

/// e^x 的 Taylor 級數：Σ x^n / Γ(n+1)
#[derive(Debug, Clone, Copy)]
pub struct ExponentialSeries {
    terms: usize
}

impl ExponentialSeries {
    pub fn new(terms: usize) -> ExponentialSeries {
        ExponentialSeries { terms }
    }
}

impl Default for ExponentialSeries {
    fn default() -> Self {
        ExponentialSeries::new(DEFAULT_EXPONENTIAL_TERMS)
    }
}

impl SeriesExpansion for ExponentialSeries {
    fn terms(&self) -> usize {
        self.terms
    }

    fn coefficient(&self, n: usize) -> f64 {
        (-ln_factorial(n as u64)).exp()
    }

    fn term(&self, x: f64, n: usize, coefficient: f64) -> f64 {
        coefficient * x.powi(n as i32)
    }
}
