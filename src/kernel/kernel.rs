use std::fmt;

use serde::{
    Deserialize,
    Serialize
};

use super::arcsine::{
    ArcsineSeries,
    DEFAULT_ARCSINE_TERMS
};
use super::coefficientbackend::{
    RecomputeBackend,
    RefCellBackend,
    SeriesSummation
};
use super::compositekernel::CompositeKernel;
use super::exponential::{
    ExponentialSeries,
    DEFAULT_EXPONENTIAL_TERMS
};
use super::heavisidestep::{
    HeavisideStepSeries,
    DEFAULT_HEAVISIDE_STEP_TERMS
};
use super::seriesexpansion::SeriesExpansion;
use super::serieskernel::SeriesKernel;

/// 在單一 abscissa 求值的純量函數。
///
/// `value` 取 `&self`：快取用 interior mutability，
/// 因此同一個 kernel 可以被 trapezoid 迴圈以共享借用反覆呼叫。
///
/// `Send` 但不要求 `Sync`：kernel 可以整個交給另一條 thread，
/// 但不能同時被兩條 thread 共用（係數表不做同步）。
pub trait Kernel: Send {
    fn value(&self, x: f64) -> f64;

    /// 轉交給係數快取的外部失效訊號；無快取時為 no-op。
    fn invalidate(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KernelKind {
    Arcsine,
    Exponential,
    HeavisideStep,
    Composite
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelKind::Arcsine => write!(f, "arcsine"),
            KernelKind::Exponential => write!(f, "exponential"),
            KernelKind::HeavisideStep => write!(f, "heaviside-step"),
            KernelKind::Composite => write!(f, "composite")
        }
    }
}

/// 級數項數、快取與求和方式；每個執行 context 依此自行建構 kernel。
///
/// `cache_coefficients` 是三個 kernel 共用的預設值，`*_cache` 有值時覆寫該 kernel。
/// `parallel_series` 讓每次求值的項次求和在 rayon pool 上進行。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesSettings {
    pub arcsine_terms: usize,
    pub exponential_terms: usize,
    pub heaviside_step_terms: usize,
    pub cache_coefficients: bool,
    pub arcsine_cache: Option<bool>,
    pub exponential_cache: Option<bool>,
    pub heaviside_step_cache: Option<bool>,
    pub parallel_series: bool
}

impl Default for SeriesSettings {
    fn default() -> Self {
        SeriesSettings {
            arcsine_terms: DEFAULT_ARCSINE_TERMS,
            exponential_terms: DEFAULT_EXPONENTIAL_TERMS,
            heaviside_step_terms: DEFAULT_HEAVISIDE_STEP_TERMS,
            cache_coefficients: true,
            arcsine_cache: None,
            exponential_cache: None,
            heaviside_step_cache: None,
            parallel_series: false
        }
    }
}

impl SeriesSettings {
    pub fn summation(&self) -> SeriesSummation {
        SeriesSummation::from_parallel(self.parallel_series)
    }

    /// 同一組設定，但級數求和固定為循序。
    pub fn sequential(self) -> SeriesSettings {
        SeriesSettings { parallel_series: false, ..self }
    }
}

fn series_kernel<S>(series: S, cache_coefficients: bool, summation: SeriesSummation) -> Box<dyn Kernel>
where
    S: SeriesExpansion + 'static {
    if cache_coefficients {
        Box::new(SeriesKernel::with_backend(series, RefCellBackend::with_summation(summation)))
    } else {
        Box::new(SeriesKernel::with_backend(series, RecomputeBackend::with_summation(summation)))
    }
}

impl KernelKind {
    /// 建構一份新的 kernel，係數快取為這份 kernel 私有。
    pub fn build(&self, settings: &SeriesSettings) -> Box<dyn Kernel> {
        let cache = |kernel_cache: Option<bool>| kernel_cache.unwrap_or(settings.cache_coefficients);
        let summation = settings.summation();
        match self {
            KernelKind::Arcsine => series_kernel(
                ArcsineSeries::new(settings.arcsine_terms),
                cache(settings.arcsine_cache),
                summation
            ),
            KernelKind::Exponential => series_kernel(
                ExponentialSeries::new(settings.exponential_terms),
                cache(settings.exponential_cache),
                summation
            ),
            KernelKind::HeavisideStep => series_kernel(
                HeavisideStepSeries::new(settings.heaviside_step_terms),
                cache(settings.heaviside_step_cache),
                summation
            ),
            KernelKind::Composite => Box::new(CompositeKernel::new(vec![
                KernelKind::Arcsine.build(settings),
                KernelKind::Exponential.build(settings),
                KernelKind::HeavisideStep.build(settings),
            ]))
        }
    }
}
