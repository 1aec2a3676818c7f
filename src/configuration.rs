use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{
    Deserialize,
    Serialize
};

use crate::benchmark::BenchmarkSettings;
use crate::executor::participant::IntegrationPlan;
use crate::integralerror::{
    IntegralError,
    Result
};
use crate::kernel::kernel::{
    KernelKind,
    SeriesSettings
};
use crate::math::partition::Partition;

pub const DEFAULT_STEPS: usize = 100_000;
pub const DEFAULT_PARTICIPANTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Distributed,
    SharedMemory
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Distributed => write!(f, "distributed"),
            Mode::SharedMemory => write!(f, "shared-memory")
        }
    }
}

/// 執行設定；JSON 中缺少的欄位一律取預設值。
///
/// `participants` 在 shared-memory 模式下代表分段數（0 = rayon 執行緒數）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub start: f64,
    pub end: f64,
    pub steps: usize,
    pub participants: usize,
    pub kernel: KernelKind,
    pub mode: Mode,
    pub series: SeriesSettings,
    pub benchmark: BenchmarkSettings
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            start: 0.0,
            end: 1.0,
            steps: DEFAULT_STEPS,
            participants: DEFAULT_PARTICIPANTS,
            kernel: KernelKind::Composite,
            mode: Mode::Distributed,
            series: SeriesSettings::default(),
            benchmark: BenchmarkSettings::default()
        }
    }
}

impl Configuration {
    pub fn from_reader<P: AsRef<Path>>(file_path: P) -> Result<Configuration> {
        let file = File::open(file_path)?;
        let reader = BufReader::new(file);
        let configuration: Configuration = serde_json::from_reader(reader)?;
        Ok(configuration)
    }

    pub fn domain(&self) -> Partition {
        Partition::new(self.start, self.end, self.steps)
    }

    /// Rejects settings no executor can run.
    pub fn validate(&self) -> Result<()> {
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(IntegralError::InvalidConfiguration(format!(
                "bounds must be finite (start = {}, end = {})",
                self.start, self.end
            )));
        }
        if self.steps == 0 {
            return Err(IntegralError::EmptyDomain("steps must be at least 1".to_string()));
        }
        if self.mode == Mode::Distributed && self.participants == 0 {
            return Err(IntegralError::EmptyDomain("distributed mode needs at least one participant".to_string()));
        }
        Ok(())
    }

    pub fn plan(&self, benchmark: bool) -> IntegrationPlan {
        let plan = IntegrationPlan::single(self.domain(), self.kernel, self.series);
        if benchmark {
            plan.with_benchmark(self.benchmark)
        } else {
            plan
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let configuration: Configuration = serde_json::from_str(
            r#"{ "steps": 2000, "kernel": "Exponential", "series": { "exponential_terms": 30 } }"#,
        )
        .unwrap();

        assert_eq!(configuration.steps, 2000);
        assert_eq!(configuration.kernel, KernelKind::Exponential);
        assert_eq!(configuration.series.exponential_terms, 30);
        assert_eq!(configuration.series.arcsine_terms, SeriesSettings::default().arcsine_terms);
        assert_eq!(configuration.participants, DEFAULT_PARTICIPANTS);
        assert_eq!(configuration.mode, Mode::Distributed);
        assert_eq!(configuration.benchmark, BenchmarkSettings::default());
    }

    #[test]
    fn test_shared_memory_mode_parses() {
        let configuration: Configuration =
            serde_json::from_str(r#"{ "mode": "SharedMemory", "participants": 0 }"#).unwrap();

        assert_eq!(configuration.mode, Mode::SharedMemory);
        assert!(configuration.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unrunnable_settings() {
        let mut configuration = Configuration::default();
        configuration.steps = 0;
        assert!(matches!(configuration.validate(), Err(IntegralError::EmptyDomain(_))));

        let mut configuration = Configuration::default();
        configuration.end = f64::NAN;
        assert!(matches!(configuration.validate(), Err(IntegralError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_plan_carries_benchmark_only_when_asked() {
        let configuration = Configuration::default();

        assert_eq!(configuration.plan(false).benchmark, None);
        assert_eq!(configuration.plan(true).benchmark, Some(BenchmarkSettings::default()));
        assert_eq!(configuration.plan(true).domain, configuration.domain());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            Configuration::from_reader("/nonexistent/compint.json"),
            Err(IntegralError::Io(_))
        ));
    }
}
