/// Assert that `result` agrees with `expected` to the given relative error.
pub(crate) fn test_rel(result: f64, expected: f64, relative_error: f64) {
    let mut status: i32 = 0;
    // Check for nan or inf or number
    if result.is_nan() || expected.is_nan() {
        status = if result.is_nan() != expected.is_nan() {
            1
        } else {
            0
        };
    } else if result.is_infinite() || expected.is_infinite() {
        status = if result.is_infinite() != expected.is_infinite() {
            1
        } else {
            0
        };
    } else if (expected > 0.0 && expected < f64::MIN_POSITIVE)
        || (expected < 0.0 && expected > -(f64::MIN_POSITIVE))
    {
        status = -1;
    } else if expected != 0.0 {
        status = if (result - expected).abs() / expected.abs() > relative_error {
            1
        } else {
            0
        };
    } else if result.abs() > relative_error {
        status = 1;
    }

    assert!(status != -1, "[Test uses subnormal value]");
    assert!(
        status == 0,
        "observed: {:?}, expected: {:?}",
        result,
        expected
    );
}

/// Oscillating test integrand `cos(2^alpha sin(x))`
pub(crate) fn f3(x: f64, alpha: f64) -> f64 {
    (2f64.powf(alpha) * x.sin()).cos()
}

/// Peaked test integrand `x^(alpha-1) / (1 + 10x)^2`
pub(crate) fn f16(x: f64, alpha: f64) -> f64 {
    if x == 0.0 && alpha == 1.0 {
        1.0
    } else if x == 0.0 && alpha > 1.0 {
        0.0
    } else {
        x.powf(alpha - 1.0) * (1.0 + 10.0 * x).recip().powi(2)
    }
}
