use crate::matrix::{AbundanceMatrix, GroupAssignment};
use crate::testing::{
    DiffAbundanceConfig, DifferentialResults, TTestType, TestResult, correction, effect,
};
use anyhow::{Result, anyhow};
use log::debug;
use rayon::prelude::*;

pub mod parametric;

/// Statistical tests over a full abundance matrix.
pub trait AbundanceStatTests {
    /// Row-wise two-sample t-tests between the assigned groups, one result
    /// per protein in matrix row order.
    fn t_test(&self, groups: &GroupAssignment, test_type: TTestType) -> Result<Vec<TestResult>>;

    /// The full differential abundance pipeline: per-protein log2 fold
    /// change, t-test p-value, jointly BH-adjusted p-value, and Cohen's d.
    ///
    /// Every protein of the matrix appears in the result, in matrix row
    /// order. Per-row degeneracies (insufficient replicates, zero variance,
    /// zero group sums) yield NaN or infinite statistics for that row only.
    fn differential_abundance(
        &self,
        groups: &GroupAssignment,
        config: DiffAbundanceConfig,
    ) -> Result<DifferentialResults>;
}

impl AbundanceStatTests for AbundanceMatrix {
    fn t_test(&self, groups: &GroupAssignment, test_type: TTestType) -> Result<Vec<TestResult>> {
        let resolved = groups.resolve(self)?;
        let values = self.values();

        Ok((0..self.n_proteins())
            .into_par_iter()
            .map(|row_idx| {
                let row = values.row(row_idx);
                let treatment: Vec<f64> = resolved.treatment.iter().map(|&c| row[c]).collect();
                let control: Vec<f64> = resolved.control.iter().map(|&c| row[c]).collect();
                parametric::t_test(&treatment, &control, test_type)
            })
            .collect())
    }

    fn differential_abundance(
        &self,
        groups: &GroupAssignment,
        config: DiffAbundanceConfig,
    ) -> Result<DifferentialResults> {
        if self.n_proteins() == 0 {
            return Err(anyhow!("Abundance matrix has no protein rows"));
        }
        if !(0.0..=1.0).contains(&config.alpha) {
            return Err(anyhow!("Alpha must be within [0, 1], got {}", config.alpha));
        }

        let resolved = groups.resolve(self)?;
        debug!(
            "Differential abundance over {} proteins ({} treatment vs {} control replicates)",
            self.n_proteins(),
            resolved.treatment.len(),
            resolved.control.len()
        );

        let values = self.values();
        let per_row: Vec<(f64, f64, f64)> = (0..self.n_proteins())
            .into_par_iter()
            .map(|row_idx| {
                let row = values.row(row_idx);
                let treatment: Vec<f64> = resolved.treatment.iter().map(|&c| row[c]).collect();
                let control: Vec<f64> = resolved.control.iter().map(|&c| row[c]).collect();

                let fold_change = effect::log2_fold_change(&treatment, &control);
                let test = parametric::t_test(&treatment, &control, config.test_type);
                let d = effect::cohens_d(&treatment, &control);
                (fold_change, test.p_value, d)
            })
            .collect();

        let log2_fold_changes: Vec<f64> = per_row.iter().map(|r| r.0).collect();
        let p_values: Vec<f64> = per_row.iter().map(|r| r.1).collect();
        let cohens_d: Vec<f64> = per_row.iter().map(|r| r.2).collect();

        // Correction is a single joint call across all rows.
        let adjusted_p_values = correction::benjamini_hochberg_correction(&p_values)?;
        let rejected = correction::bh_rejections(&adjusted_p_values, config.alpha);

        DifferentialResults::new(
            self.proteins().to_vec(),
            log2_fold_changes,
            p_values,
            adjusted_p_values,
            cohens_d,
            rejected,
            config.alpha,
        )
    }
}
