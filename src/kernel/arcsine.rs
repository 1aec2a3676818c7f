use crate::math::special::ln_factorial;

use super::seriesexpansion::SeriesExpansion;

pub const DEFAULT_ARCSINE_TERMS: usize = 80;

/// arcsin(x) 的 Maclaurin 級數：
///
///   arcsin(x) = Σ Γ(2n+1) / (4^n · Γ(n+1)² · (2n+1)) · x^(2n+1)
///
/// ∫_0^1 arcsin(x) dx = (π - 2) / 2 ≈ 0.570796
///
/// 係數在對數空間計算：(2n)! 在 n ≈ 85 之後就超出 f64。
#[derive(Debug, Clone, Copy)]
pub struct ArcsineSeries {
    terms: usize
}

impl ArcsineSeries {
    pub fn new(terms: usize) -> ArcsineSeries {
        ArcsineSeries { terms }
    }
}

impl Default for ArcsineSeries {
    fn default() -> Self {
        ArcsineSeries::new(DEFAULT_ARCSINE_TERMS)
    }
}

impl SeriesExpansion for ArcsineSeries {
    fn terms(&self) -> usize {
        self.terms
    }

    fn coefficient(&self, n: usize) -> f64 {
        let n = n as u64;
        let ln_coefficient = ln_factorial(2 * n)
            - (n as f64) * 4.0_f64.ln()
            - 2.0 * ln_factorial(n)
            - ((2 * n + 1) as f64).ln();
        ln_coefficient.exp()
    }

    fn term(&self, x: f64, n: usize, coefficient: f64) -> f64 {
        x.powi((2 * n + 1) as i32) * coefficient
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_coefficients() {
        let series = ArcsineSeries::default();

        // 1, 1/6, 3/40, 5/112
        assert!((series.coefficient(0) - 1.0).abs() < 1e-14);
        assert!((series.coefficient(1) - 1.0 / 6.0).abs() < 1e-14);
        assert!((series.coefficient(2) - 3.0 / 40.0).abs() < 1e-14);
        assert!((series.coefficient(3) - 5.0 / 112.0).abs() < 1e-14);
    }

    #[test]
    fn test_coefficients_finite_for_long_series() {
        let series = ArcsineSeries::new(400);
        assert!(series.coefficient(399).is_finite());
        assert!(series.coefficient(399) > 0.0);
    }
}
