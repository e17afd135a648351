use anyhow::{Result, anyhow};
use std::cmp::Ordering;

pub mod correction;
pub mod effect;
pub mod inference;

/// Flavor of the two-sample t-test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TTestType {
    /// Equal variance (the default of the upstream analysis)
    Student,
    /// Unequal variance
    Welch,
}

/// Configuration of a differential abundance run.
#[derive(Debug, Clone, Copy)]
pub struct DiffAbundanceConfig {
    /// t-test flavor applied to each protein row
    pub test_type: TTestType,
    /// Significance level of the FDR-BH procedure. Only drives the rejection
    /// flags; every protein is always returned.
    pub alpha: f64,
}

impl Default for DiffAbundanceConfig {
    fn default() -> Self {
        DiffAbundanceConfig {
            test_type: TTestType::Student,
            alpha: 0.1,
        }
    }
}

/// Outcome of a single two-sample test.
#[derive(Debug, Clone, Copy)]
pub struct TestResult {
    /// The t-statistic; NaN when the test is undefined for the row
    pub statistic: f64,
    /// Two-sided p-value; NaN when the test is undefined for the row
    pub p_value: f64,
    /// Degrees of freedom (Welch-Satterthwaite for the unequal-variance test)
    pub degrees_of_freedom: Option<f64>,
}

impl TestResult {
    pub fn new(statistic: f64, p_value: f64) -> Self {
        TestResult {
            statistic,
            p_value,
            degrees_of_freedom: None,
        }
    }

    pub fn with_degrees_of_freedom(mut self, df: f64) -> Self {
        self.degrees_of_freedom = Some(df);
        self
    }

    /// A row where the test could not be computed (insufficient replicates
    /// or zero variance).
    pub fn undefined() -> Self {
        TestResult::new(f64::NAN, f64::NAN)
    }
}

/// Per-protein view into a [`DifferentialResults`] set.
#[derive(Debug, Clone, Copy)]
pub struct DifferentialRecord<'a> {
    pub protein: &'a str,
    pub log2_fold_change: f64,
    pub p_value: f64,
    pub adjusted_p_value: f64,
    pub cohens_d: f64,
    pub rejected: bool,
}

/// Results of a differential abundance run over a full matrix.
///
/// The protein domain and order equal the input matrix rows exactly: no
/// additions, no drops, degenerate rows included with NaN statistics.
#[derive(Debug, Clone)]
pub struct DifferentialResults {
    proteins: Vec<String>,
    log2_fold_changes: Vec<f64>,
    p_values: Vec<f64>,
    adjusted_p_values: Vec<f64>,
    cohens_d: Vec<f64>,
    rejected: Vec<bool>,
    alpha: f64,
}

impl DifferentialResults {
    pub fn new(
        proteins: Vec<String>,
        log2_fold_changes: Vec<f64>,
        p_values: Vec<f64>,
        adjusted_p_values: Vec<f64>,
        cohens_d: Vec<f64>,
        rejected: Vec<bool>,
        alpha: f64,
    ) -> Result<Self> {
        let n = proteins.len();
        if [
            log2_fold_changes.len(),
            p_values.len(),
            adjusted_p_values.len(),
            cohens_d.len(),
            rejected.len(),
        ]
        .iter()
        .any(|&len| len != n)
        {
            return Err(anyhow!(
                "All statistic vectors must match the protein count ({})",
                n
            ));
        }

        Ok(DifferentialResults {
            proteins,
            log2_fold_changes,
            p_values,
            adjusted_p_values,
            cohens_d,
            rejected,
            alpha,
        })
    }

    pub fn len(&self) -> usize {
        self.proteins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proteins.is_empty()
    }

    pub fn proteins(&self) -> &[String] {
        &self.proteins
    }

    pub fn log2_fold_changes(&self) -> &[f64] {
        &self.log2_fold_changes
    }

    pub fn p_values(&self) -> &[f64] {
        &self.p_values
    }

    pub fn adjusted_p_values(&self) -> &[f64] {
        &self.adjusted_p_values
    }

    pub fn cohens_d(&self) -> &[f64] {
        &self.cohens_d
    }

    pub fn rejected(&self) -> &[bool] {
        &self.rejected
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// `-log10(p)` per protein, the significance axis of a volcano plot.
    pub fn neg_log10_p_values(&self) -> Vec<f64> {
        self.p_values.iter().map(|&p| -p.log10()).collect()
    }

    pub fn record_at(&self, index: usize) -> DifferentialRecord<'_> {
        DifferentialRecord {
            protein: &self.proteins[index],
            log2_fold_change: self.log2_fold_changes[index],
            p_value: self.p_values[index],
            adjusted_p_value: self.adjusted_p_values[index],
            cohens_d: self.cohens_d[index],
            rejected: self.rejected[index],
        }
    }

    pub fn get(&self, protein: &str) -> Option<DifferentialRecord<'_>> {
        self.proteins
            .iter()
            .position(|p| p == protein)
            .map(|i| self.record_at(i))
    }

    /// Indices of proteins with adjusted p-value at or below the threshold,
    /// the same boundary convention as the BH rejection flags. NaN statistics
    /// never qualify.
    pub fn significant_indices(&self, alpha: f64) -> Vec<usize> {
        self.adjusted_p_values
            .iter()
            .enumerate()
            .filter_map(|(i, &p)| if p <= alpha { Some(i) } else { None })
            .collect()
    }

    /// Top n protein indices by ascending adjusted p-value, NaN last.
    pub fn top_proteins(&self, n: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.len()).collect();
        indices.sort_by(|&a, &b| {
            self.adjusted_p_values[a]
                .partial_cmp(&self.adjusted_p_values[b])
                .unwrap_or_else(|| {
                    // NaN sorts after any comparable value
                    if self.adjusted_p_values[a].is_nan() {
                        Ordering::Greater
                    } else {
                        Ordering::Less
                    }
                })
        });
        indices.truncate(n);
        indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results() -> DifferentialResults {
        DifferentialResults::new(
            vec!["A".into(), "B".into(), "C".into()],
            vec![1.0, -2.0, 0.5],
            vec![0.01, 0.20, f64::NAN],
            vec![0.03, 0.20, f64::NAN],
            vec![2.0, -1.0, f64::NAN],
            vec![true, false, false],
            0.1,
        )
        .unwrap()
    }

    #[test]
    fn rejects_length_mismatch() {
        let result = DifferentialResults::new(
            vec!["A".into()],
            vec![1.0, 2.0],
            vec![0.1],
            vec![0.1],
            vec![0.0],
            vec![false],
            0.1,
        );
        assert!(result.is_err());
    }

    #[test]
    fn significance_ignores_nan() {
        let r = results();
        assert_eq!(r.significant_indices(0.1), vec![0]);
        assert_eq!(r.significant_indices(0.5), vec![0, 1]);
    }

    #[test]
    fn significance_boundary_matches_rejection_flags() {
        let r = results();
        // An adjusted p-value exactly at alpha is significant, the same
        // inclusive boundary as correction::bh_rejections.
        assert_eq!(r.significant_indices(0.03), vec![0]);
        assert_eq!(r.significant_indices(0.20), vec![0, 1]);
        assert_eq!(
            crate::testing::correction::bh_rejections(r.adjusted_p_values(), 0.20),
            vec![true, true, false]
        );
    }

    #[test]
    fn top_proteins_sorts_nan_last() {
        let r = results();
        assert_eq!(r.top_proteins(3), vec![0, 1, 2]);
        assert_eq!(r.top_proteins(1), vec![0]);
    }

    #[test]
    fn lookup_by_protein() {
        let r = results();
        let rec = r.get("B").unwrap();
        assert_eq!(rec.log2_fold_change, -2.0);
        assert!(!rec.rejected);
        assert!(r.get("Z").is_none());
    }

    #[test]
    fn neg_log10_transform() {
        let r = results();
        let neg = r.neg_log10_p_values();
        assert!((neg[0] - 2.0).abs() < 1e-12);
        assert!(neg[2].is_nan());
    }
}
