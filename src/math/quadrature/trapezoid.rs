use crate::kernel::kernel::Kernel;
use crate::math::partition::Partition;

// ─────────────────────────────────────────────────────────────────────────────
// Composite trapezoid
// ─────────────────────────────────────────────────────────────────────────────
//
//   T = δ · [ f(x_0)/2 + Σ_{i=1}^{n-1} f(x_i) + f(x_n)/2 ]
//     = δ · Σ_{i=0}^{n-1} f(x_i)  +  δ · (f(x_n) - f(x_0)) / 2
//
// 第二種寫法把工作拆成兩塊：
//   - left_point_sum()：半開區間 [x_0, x_n) 上的左端點和，可以任意切段相加，
//     相鄰子區間的共用端點只會被算一次；
//   - endpoint_correction()：整個 domain 只做一次。
//
// 分散式版本中，各參與者只算自己那段的 left_point_sum()，
// 端點修正由 coordinator 在 reduction 之後加上。

/// 單一 context 內的循序 composite trapezoid。
pub fn trapezoid(kernel: &dyn Kernel, partition: &Partition) -> f64 {
    let n = partition.step_count();
    if n == 0 {
        return 0.0;
    }

    let interior: f64 = (1..n)
        .map(|i| kernel.value(partition.abscissa(i)))
        .sum();
    let endpoints = (kernel.value(partition.abscissa(0)) + kernel.value(partition.abscissa(n))) / 2.0;

    (interior + endpoints) * partition.delta()
}

/// `δ · Σ_{i=0}^{k-1} f(x_i)`：一個 slice 對全域積分的貢獻（不含端點修正）。
pub fn left_point_sum(kernel: &dyn Kernel, partition: &Partition) -> f64 {
    let n = partition.step_count();
    if n == 0 {
        return 0.0;
    }

    let sum: f64 = (0..n)
        .map(|i| kernel.value(partition.abscissa(i)))
        .sum();

    sum * partition.delta()
}

/// `δ · (f(b) - f(a)) / 2`，整個 domain 只能加一次。
pub fn endpoint_correction(kernel: &dyn Kernel, domain: &Partition) -> f64 {
    if domain.is_empty() {
        return 0.0;
    }
    (kernel.value(domain.end()) - kernel.value(domain.start())) / 2.0 * domain.delta()
}


#[cfg(test)]
mod tests {
    use super::*;

    struct Linear;

    impl Kernel for Linear {
        fn value(&self, x: f64) -> f64 {
            2.0 * x + 1.0
        }

        fn invalidate(&self) {}
    }

    #[test]
    fn test_trapezoid_exact_for_linear() {
        // ∫_0^2 (2x + 1) dx = 6
        let p = Partition::new(0.0, 2.0, 7);
        assert!((trapezoid(&Linear, &p) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_split_form_matches_trapezoid() {
        let p = Partition::new(-1.0, 3.0, 40);
        let split = left_point_sum(&Linear, &p) + endpoint_correction(&Linear, &p);
        assert!((split - trapezoid(&Linear, &p)).abs() < 1e-12);
    }

    #[test]
    fn test_empty_partition_contributes_nothing() {
        let p = Partition::new(1.0, 1.0, 0);

        assert_eq!(trapezoid(&Linear, &p), 0.0);
        assert_eq!(left_point_sum(&Linear, &p), 0.0);
        assert_eq!(endpoint_correction(&Linear, &p), 0.0);
    }
}
