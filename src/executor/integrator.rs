use crate::integralerror::Result;
use crate::math::partition::Partition;

use super::integrationresult::IntegrationResult;

/// 一種積分執行方式（分散式 coordinator、共享記憶體），供 benchmark 驅動。
pub trait Integrator {
    fn integrate(&mut self, domain: &Partition) -> Result<IntegrationResult>;

    /// 對這個 context 擁有的所有 kernel 發出係數失效訊號。
    fn invalidate(&self);
}
