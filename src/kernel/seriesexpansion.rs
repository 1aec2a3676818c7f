
/// 截斷級數 `base + Σ_{n=0}^{T-1} term(x, n, coefficient(n))`。
///
/// `coefficient(n)` 只依賴項次 `n`，與求值點 `x` 無關，
/// 這是係數表可以快取的前提。
pub trait SeriesExpansion: Send + Sync {
    /// 項數 T，建構後固定。
    fn terms(&self) -> usize;

    fn coefficient(&self, n: usize) -> f64;

    fn term(&self, x: f64, n: usize, coefficient: f64) -> f64;

    fn base(&self) -> f64 {
        0.0
    }
}
