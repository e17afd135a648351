use single_utilities::traits::FloatOps;

/// Log2 fold change between two groups of replicate values.
///
/// Uses the sum across each group's replicates, not the mean, matching the
/// upstream analysis. No pseudocount is applied: a zero sum on either side
/// propagates IEEE semantics (±infinity, or NaN when both sums are zero), a
/// known fragility downstream consumers must tolerate.
pub fn log2_fold_change<T>(treatment: &[T], control: &[T]) -> f64
where
    T: FloatOps,
{
    let mut treatment_sum = T::zero();
    for &val in treatment {
        treatment_sum += val;
    }
    let mut control_sum = T::zero();
    for &val in control {
        control_sum += val;
    }

    log2_fold_change_from_sums(
        treatment_sum.to_f64().unwrap_or(f64::NAN),
        control_sum.to_f64().unwrap_or(f64::NAN),
    )
}

/// Log2 fold change from precomputed group sums.
pub fn log2_fold_change_from_sums(treatment_sum: f64, control_sum: f64) -> f64 {
    (treatment_sum / control_sum).log2()
}

/// Cohen's d standardized effect size between two groups.
///
/// Difference of means divided by the pooled standard deviation
/// `sqrt((var(t) + var(c)) / 2)`, with sample (n-1) variances. The signed
/// value is the canonical statistic; take the absolute value for visual
/// emphasis such as point sizing.
///
/// Returns NaN when either group has fewer than 2 replicates or the pooled
/// denominator is zero.
pub fn cohens_d<T>(treatment: &[T], control: &[T]) -> f64
where
    T: FloatOps,
{
    if treatment.len() < 2 || control.len() < 2 {
        return f64::NAN;
    }

    let (mean_t, var_t) = mean_and_sample_variance(treatment);
    let (mean_c, var_c) = mean_and_sample_variance(control);

    let pooled_sd = ((var_t + var_c) / 2.0).sqrt();
    if pooled_sd == 0.0 {
        return f64::NAN;
    }

    (mean_t - mean_c) / pooled_sd
}

fn mean_and_sample_variance<T>(values: &[T]) -> (f64, f64)
where
    T: FloatOps,
{
    let n = values.len() as f64;
    let mut sum = 0.0;
    for &val in values {
        sum += val.to_f64().unwrap_or(f64::NAN);
    }
    let mean = sum / n;

    let mut sq_dev = 0.0;
    for &val in values {
        let dev = val.to_f64().unwrap_or(f64::NAN) - mean;
        sq_dev += dev * dev;
    }

    (mean, sq_dev / (n - 1.0))
}
