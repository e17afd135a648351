//! Parametric statistical tests for abundance data.
//!
//! This module implements the two-sample t-tests (Student's and Welch's) that
//! drive the per-protein differential abundance comparison. Tests are computed
//! from running sums and sums of squares so the matrix driver can feed them
//! without materializing per-group copies of each row.

use crate::testing::{TTestType, TestResult};
use single_utilities::traits::FloatOps;
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

/// Perform a t-test comparing two samples.
///
/// Rows that cannot support the test keep the batch alive: fewer than two
/// observations in either sample, or a zero-variance denominator, yield an
/// undefined result (NaN statistic and p-value) rather than an error.
///
/// # Arguments
///
/// * `x` - First sample
/// * `y` - Second sample
/// * `test_type` - Type of t-test to perform
///
/// # Returns
///
/// `TestResult` containing the t-statistic and two-sided p-value.
pub fn t_test<T>(x: &[T], y: &[T], test_type: TTestType) -> TestResult
where
    T: FloatOps,
{
    let mut sum_x = T::zero();
    let mut sum_sq_x = T::zero();
    for &val in x {
        sum_x += val;
        sum_sq_x += val * val;
    }

    let mut sum_y = T::zero();
    let mut sum_sq_y = T::zero();
    for &val in y {
        sum_y += val;
        sum_sq_y += val * val;
    }

    t_test_from_sums(
        sum_x.to_f64().unwrap_or(f64::NAN),
        sum_sq_x.to_f64().unwrap_or(f64::NAN),
        x.len() as f64,
        sum_y.to_f64().unwrap_or(f64::NAN),
        sum_sq_y.to_f64().unwrap_or(f64::NAN),
        y.len() as f64,
        test_type,
    )
}

/// Perform a t-test using precomputed summary statistics.
///
/// Computes the test directly from sum and sum-of-squares, avoiding a second
/// pass over the data. Variances use the sample (n-1) denominator.
///
/// # Arguments
///
/// * `sum1`, `sum_sq1`, `n1` - Sum, sum of squares, and count for group 1
/// * `sum2`, `sum_sq2`, `n2` - Sum, sum of squares, and count for group 2
/// * `test_type` - Type of t-test to perform (Student's or Welch's)
pub fn t_test_from_sums(
    sum1: f64,
    sum_sq1: f64,
    n1: f64,
    sum2: f64,
    sum_sq2: f64,
    n2: f64,
    test_type: TTestType,
) -> TestResult {
    if n1 < 2.0 || n2 < 2.0 {
        return TestResult::undefined();
    }

    let mean1 = sum1 / n1;
    let mean2 = sum2 / n2;

    // Computational formula; clamp tiny negative values from cancellation.
    let var1 = ((sum_sq1 - sum1 * sum1 / n1) / (n1 - 1.0)).max(0.0);
    let var2 = ((sum_sq2 - sum2 * sum2 / n2) / (n2 - 1.0)).max(0.0);

    let mean_diff = mean1 - mean2;

    let (std_err, df) = match test_type {
        TTestType::Student => {
            let pooled_var = ((n1 - 1.0) * var1 + (n2 - 1.0) * var2) / (n1 + n2 - 2.0);
            let std_err = (pooled_var * (1.0 / n1 + 1.0 / n2)).sqrt();
            (std_err, n1 + n2 - 2.0)
        }
        TTestType::Welch => {
            let term1 = var1 / n1;
            let term2 = var2 / n2;
            let combined_var = term1 + term2;

            // Welch-Satterthwaite equation for degrees of freedom
            let df = combined_var * combined_var
                / (term1 * term1 / (n1 - 1.0) + term2 * term2 / (n2 - 1.0));
            (combined_var.sqrt(), df)
        }
    };

    if std_err == 0.0 || !std_err.is_finite() {
        // Zero-variance denominator: the test is undefined for this row.
        return TestResult::undefined();
    }

    let t_stat = mean_diff / std_err;
    TestResult::new(t_stat, two_sided_p_value(t_stat, df)).with_degrees_of_freedom(df)
}

/// Two-sided p-value of a t-statistic with the given degrees of freedom.
fn two_sided_p_value(t_stat: f64, df: f64) -> f64 {
    if !t_stat.is_finite() || !df.is_finite() || df <= 0.0 {
        return f64::NAN;
    }

    let abs_t = t_stat.abs();

    // Normal approximation is indistinguishable at high degrees of freedom
    // and avoids constructing the t-distribution.
    if df > 100.0 {
        return match Normal::new(0.0, 1.0) {
            Ok(normal) => (2.0 * (1.0 - normal.cdf(abs_t))).clamp(0.0, 1.0),
            Err(_) => f64::NAN,
        };
    }

    match StudentsT::new(0.0, 1.0, df) {
        Ok(t_dist) => (2.0 * (1.0 - t_dist.cdf(abs_t))).clamp(0.0, 1.0),
        Err(_) => f64::NAN,
    }
}
