use anyhow::{Result, anyhow};
use std::cmp::Ordering;

/// Multiple testing correction methods to control for false positives when
/// testing many proteins simultaneously.
///
/// NaN p-values mark rows where the underlying test was undefined
/// (insufficient replicates, zero variance). They are excluded from the
/// ranking, so the effective test count is the number of finite p-values,
/// and they map to NaN adjusted values. One degenerate row never perturbs
/// the correction of the others.

/// Apply the Benjamini-Hochberg procedure for controlling false discovery rate.
///
/// P-values are ranked ascending, each is scaled by (test count / rank), and a
/// running minimum is applied from the largest rank down to enforce
/// monotonicity, capped at 1. The result is mapped back to the input order.
///
/// # Arguments
/// * `p_values` - A slice of p-values to adjust
///
/// # Returns
/// * `Result<Vec<f64>>` - Vector of adjusted p-values, in input order
///
/// # Example
/// ```
/// use abundance_stats::testing::correction::benjamini_hochberg_correction;
///
/// let adjusted = benjamini_hochberg_correction(&[0.01, 0.04, 0.20]).unwrap();
/// assert!((adjusted[0] - 0.03).abs() < 1e-12);
/// assert!((adjusted[1] - 0.06).abs() < 1e-12);
/// assert!((adjusted[2] - 0.20).abs() < 1e-12);
/// ```
pub fn benjamini_hochberg_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    let n = p_values.len();
    if n == 0 {
        return Err(anyhow!("Empty p-value array"));
    }
    validate_p_values(p_values)?;

    // Rank only the finite p-values; NaN rows stay NaN in the output.
    let mut indexed_p_values: Vec<(usize, f64)> = p_values
        .iter()
        .enumerate()
        .filter(|(_, p)| !p.is_nan())
        .map(|(i, &p)| (i, p))
        .collect();
    let m = indexed_p_values.len();

    let mut adjusted_p_values = vec![f64::NAN; n];
    if m == 0 {
        return Ok(adjusted_p_values);
    }

    indexed_p_values.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

    // Process from largest to smallest p-value, carrying the running minimum.
    let mut current_min = 1.0;
    for i in (0..m).rev() {
        let (orig_idx, p_val) = indexed_p_values[i];
        let rank = i + 1;

        let adjustment = (p_val * m as f64 / rank as f64).min(1.0);
        current_min = adjustment.min(current_min);
        adjusted_p_values[orig_idx] = current_min;
    }

    Ok(adjusted_p_values)
}

/// Apply Bonferroni correction to p-values.
///
/// A simple but conservative method that multiplies each p-value by the
/// number of (defined) tests, capping at 1.
///
/// # Arguments
/// * `p_values` - A slice of p-values to adjust
///
/// # Returns
/// * `Result<Vec<f64>>` - Vector of adjusted p-values, in input order
///
/// # Example
/// ```
/// use abundance_stats::testing::correction::bonferroni_correction;
///
/// let adjusted = bonferroni_correction(&[0.125, 0.25, 0.5]).unwrap();
/// assert_eq!(adjusted, vec![0.375, 0.75, 1.0]);
/// ```
pub fn bonferroni_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    let n = p_values.len();
    if n == 0 {
        return Err(anyhow!("Empty p-value array"));
    }
    validate_p_values(p_values)?;

    let m = p_values.iter().filter(|p| !p.is_nan()).count();

    Ok(p_values
        .iter()
        .map(|&p| if p.is_nan() { f64::NAN } else { (p * m as f64).min(1.0) })
        .collect())
}

/// Rejection flags of the FDR-BH procedure at significance level `alpha`.
///
/// Equivalent to the step-up decision on raw p-values; NaN adjusted values
/// are never rejected.
pub fn bh_rejections(adjusted_p_values: &[f64], alpha: f64) -> Vec<bool> {
    adjusted_p_values.iter().map(|&p| p <= alpha).collect()
}

fn validate_p_values(p_values: &[f64]) -> Result<()> {
    for (i, &p) in p_values.iter().enumerate() {
        if !p.is_nan() && !(0.0..=1.0).contains(&p) {
            return Err(anyhow!("Invalid p-value at index {}: {}", i, p));
        }
    }
    Ok(())
}
