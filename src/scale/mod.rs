//! Per-protein rescaling of abundance matrices.

use crate::matrix::AbundanceMatrix;
use anyhow::Result;
use ndarray::Axis;

/// Standardize each protein row to zero mean and unit variance.
///
/// This is the per-gene z-score scaling applied before PCA and heatmap
/// preparation. The population (n) variance is used. A constant row has no
/// scale to divide by and centers to zeros instead.
pub fn zscore_rows(matrix: &AbundanceMatrix) -> Result<AbundanceMatrix> {
    let mut values = matrix.values().to_owned();

    for mut row in values.axis_iter_mut(Axis(0)) {
        let n = row.len() as f64;
        let mean = row.sum() / n;
        let variance = row.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
        let std = variance.sqrt();

        if std == 0.0 {
            row.mapv_inplace(|v| v - mean);
        } else {
            row.mapv_inplace(|v| (v - mean) / std);
        }
    }

    AbundanceMatrix::new(
        matrix.proteins().to_vec(),
        matrix.samples().to_vec(),
        values,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn rows_are_standardized() {
        let matrix = AbundanceMatrix::new(
            vec!["A".into(), "B".into()],
            vec!["s1".into(), "s2".into(), "s3".into(), "s4".into()],
            array![[1.0, 2.0, 3.0, 4.0], [10.0, 20.0, 30.0, 40.0]],
        )
        .unwrap();

        let scaled = zscore_rows(&matrix).unwrap();
        for row in scaled.values().rows() {
            let n = row.len() as f64;
            let mean = row.sum() / n;
            let var = row.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
            assert_abs_diff_eq!(mean, 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(var, 1.0, epsilon = 1e-12);
        }

        // Both rows describe the same shape, so they standardize identically.
        let a = scaled.row("A").unwrap();
        let b = scaled.row("B").unwrap();
        for (x, y) in a.iter().zip(b.iter()) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-12);
        }
    }

    #[test]
    fn constant_row_centers_to_zeros() {
        let matrix = AbundanceMatrix::new(
            vec!["A".into()],
            vec!["s1".into(), "s2".into(), "s3".into()],
            array![[7.0, 7.0, 7.0]],
        )
        .unwrap();

        let scaled = zscore_rows(&matrix).unwrap();
        for v in scaled.row("A").unwrap() {
            assert_abs_diff_eq!(*v, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn identifiers_are_preserved() {
        let matrix = AbundanceMatrix::new(
            vec!["A".into()],
            vec!["s1".into(), "s2".into()],
            array![[1.0, 3.0]],
        )
        .unwrap();
        let scaled = zscore_rows(&matrix).unwrap();
        assert_eq!(scaled.proteins(), matrix.proteins());
        assert_eq!(scaled.samples(), matrix.samples());
    }
}
