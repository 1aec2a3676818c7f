use serde::{
    Deserialize,
    Serialize
};

/// 積分區間的一段：`[start, end]` 切成 `step_count` 等分。
///
/// `abscissa(i) = start + i * delta`，`0 <= i <= step_count`，
/// 為等差數列，不另存序列。
///
/// `step_count == 0` 是合法的「空工作」，只是不能讀 `delta()`，
/// 也不會被派送給 worker。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    start: f64,
    end: f64,
    step_count: usize
}

impl Partition {
    pub fn new(start: f64, end: f64, step_count: usize) -> Partition {
        Partition { start, end, step_count }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn is_empty(&self) -> bool {
        self.step_count == 0
    }

    pub fn delta(&self) -> f64 {
        debug_assert!(self.step_count > 0, "delta of an empty partition");
        (self.end - self.start) / self.step_count as f64
    }

    pub fn abscissa(&self, i: usize) -> f64 {
        debug_assert!(i <= self.step_count);
        self.start + (i as f64) * self.delta()
    }

    /// 取同一格點上，從第 `offset` 個 abscissa 起、長 `steps` 步的子區間。
    ///
    /// 端點直接取自 `abscissa()`，相鄰子區間共用同一個浮點端點值，
    /// 因此拼接起來沒有縫隙也沒有重疊。
    pub fn slice(&self, offset: usize, steps: usize) -> Partition {
        debug_assert!(offset + steps <= self.step_count);
        Partition::new(self.abscissa(offset), self.abscissa(offset + steps), steps)
    }
}
