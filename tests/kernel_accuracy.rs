use std::f64::consts::PI;

use compint::kernel::kernel::{
    KernelKind,
    SeriesSettings
};
use compint::math::partition::Partition;
use compint::math::quadrature::trapezoid::trapezoid;

fn integrate(kind: KernelKind, domain: Partition) -> f64 {
    let kernel = kind.build(&SeriesSettings::default());
    trapezoid(kernel.as_ref(), &domain)
}

#[test]
fn exponential_over_unit_interval() {
    let value = integrate(KernelKind::Exponential, Partition::new(0.0, 1.0, 1000));
    assert!((value - (std::f64::consts::E - 1.0)).abs() < 1e-3, "got {value}");
}

#[test]
fn step_over_symmetric_interval() {
    let value = integrate(KernelKind::HeavisideStep, Partition::new(-1.0, 1.0, 2000));
    assert!((value - 1.0).abs() < 1e-2, "got {value}");
}

#[test]
fn arcsine_over_unit_interval() {
    // truncation of the series dominates near x = 1
    let value = integrate(KernelKind::Arcsine, Partition::new(0.0, 1.0, 4000));
    assert!((value - (PI - 2.0) / 2.0).abs() < 1e-3, "got {value}");
}

#[test]
fn composite_is_sum_of_integrals() {
    let domain = Partition::new(0.0, 1.0, 1000);
    let parts: f64 = [KernelKind::Arcsine, KernelKind::Exponential, KernelKind::HeavisideStep]
        .into_iter()
        .map(|kind| integrate(kind, domain))
        .sum();
    let composite = integrate(KernelKind::Composite, domain);

    assert!((composite - parts).abs() < 1e-12);
}

#[test]
fn reversed_bounds_flip_sign() {
    let forward = integrate(KernelKind::Exponential, Partition::new(0.0, 1.0, 500));
    let backward = integrate(KernelKind::Exponential, Partition::new(1.0, 0.0, 500));

    assert!((forward + backward).abs() < 1e-12);
}

#[test]
fn per_kernel_switches_keep_the_integral() {
    let settings: SeriesSettings = serde_json::from_str(
        r#"{ "cache_coefficients": false, "arcsine_cache": true, "parallel_series": true }"#,
    )
    .unwrap();
    let domain = Partition::new(0.0, 1.0, 1000);

    let switched = trapezoid(KernelKind::Composite.build(&settings).as_ref(), &domain);
    let reference = integrate(KernelKind::Composite, domain);

    assert!((switched - reference).abs() < 1e-12, "{switched} vs {reference}");
}
