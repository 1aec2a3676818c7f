
/// `ln Γ(n + 1) = ln n!`，以 Σ ln k 累加。
///
/// 級數係數只會用到整數引數的 Γ，用對數累加可避免 (2n)! 在 n 約 85 之後溢位。
pub fn ln_factorial(n: u64) -> f64 {
    (2..=n).map(|k| (k as f64).ln()).sum()
}
