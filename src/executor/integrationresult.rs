use std::time::{
    Duration,
    Instant
};

use chrono::{
    DateTime,
    Utc
};
use serde::Serialize;
use uuid::Uuid;

/// 一次積分的結果：總和與牆鐘時間。
#[derive(Debug, Clone, Serialize)]
pub struct IntegrationResult {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    sum: f64,
    elapsed: Duration
}

impl IntegrationResult {
    pub fn new(run_id: Uuid, started_at: DateTime<Utc>, sum: f64, elapsed: Duration) -> IntegrationResult {
        IntegrationResult { run_id, started_at, sum, elapsed }
    }

    pub fn run_id(&self) -> &Uuid {
        &self.run_id
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// 計時器：`start()` 時決定 run id 與起始時間，`finish()` 產生結果。
pub struct RunTimer {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    clock: Instant
}

impl RunTimer {
    pub fn start() -> RunTimer {
        RunTimer {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            clock: Instant::now()
        }
    }

    pub fn run_id(&self) -> &Uuid {
        &self.run_id
    }

    pub fn finish(self, sum: f64) -> IntegrationResult {
        IntegrationResult::new(self.run_id, self.started_at, sum, self.clock.elapsed())
    }
}
