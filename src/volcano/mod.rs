//! Volcano-plot data preparation.
//!
//! A volcano plot scatters effect size (log2 fold change) against
//! significance (-log10 p-value), with point sizes scaled by |Cohen's d|.
//! Rendering is out of scope; this module derives the plotted columns, the
//! up/down triage of proteins, and the label placement lookup a renderer
//! consumes.

use crate::testing::DifferentialResults;
use std::collections::HashMap;

/// Derived per-protein columns of a volcano plot, in result order.
#[derive(Debug, Clone)]
pub struct VolcanoTable {
    proteins: Vec<String>,
    log2_fold_changes: Vec<f64>,
    neg_log10_p_values: Vec<f64>,
    point_sizes: Vec<f64>,
}

impl VolcanoTable {
    /// Build the table from differential results.
    ///
    /// `size_scale` multiplies |Cohen's d| into a point size (the upstream
    /// figures use 10). Non-finite statistics pass through untouched; a NaN
    /// size simply marks an unplottable point.
    pub fn from_results(results: &DifferentialResults, size_scale: f64) -> VolcanoTable {
        VolcanoTable {
            proteins: results.proteins().to_vec(),
            log2_fold_changes: results.log2_fold_changes().to_vec(),
            neg_log10_p_values: results.neg_log10_p_values(),
            point_sizes: results
                .cohens_d()
                .iter()
                .map(|d| d.abs() * size_scale)
                .collect(),
        }
    }

    pub fn proteins(&self) -> &[String] {
        &self.proteins
    }

    pub fn log2_fold_changes(&self) -> &[f64] {
        &self.log2_fold_changes
    }

    pub fn neg_log10_p_values(&self) -> &[f64] {
        &self.neg_log10_p_values
    }

    pub fn point_sizes(&self) -> &[f64] {
        &self.point_sizes
    }
}

/// Triage class of a protein against the volcano thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regulation {
    Up,
    Down,
    Unchanged,
}

/// Significance and effect thresholds of the volcano triage.
#[derive(Debug, Clone, Copy)]
pub struct VolcanoThresholds {
    /// Raw p-value cutoff (the upstream figures draw the line at 0.05)
    pub p_value: f64,
    /// Absolute log2 fold change cutoff
    pub log2_fold_change: f64,
}

impl Default for VolcanoThresholds {
    fn default() -> Self {
        VolcanoThresholds {
            p_value: 0.05,
            log2_fold_change: 1.0,
        }
    }
}

impl VolcanoThresholds {
    /// Classify every protein of a result set. NaN statistics never pass a
    /// threshold and classify as unchanged.
    pub fn classify(&self, results: &DifferentialResults) -> Vec<Regulation> {
        results
            .log2_fold_changes()
            .iter()
            .zip(results.p_values())
            .map(|(&fc, &p)| {
                if p < self.p_value && fc > self.log2_fold_change {
                    Regulation::Up
                } else if p < self.p_value && fc < -self.log2_fold_change {
                    Regulation::Down
                } else {
                    Regulation::Unchanged
                }
            })
            .collect()
    }

    /// Indices of proteins increased past both thresholds.
    pub fn up_regulated(&self, results: &DifferentialResults) -> Vec<usize> {
        self.indices_of(results, Regulation::Up)
    }

    /// Indices of proteins decreased past both thresholds.
    pub fn down_regulated(&self, results: &DifferentialResults) -> Vec<usize> {
        self.indices_of(results, Regulation::Down)
    }

    fn indices_of(&self, results: &DifferentialResults, class: Regulation) -> Vec<usize> {
        self.classify(results)
            .into_iter()
            .enumerate()
            .filter_map(|(i, c)| if c == class { Some(i) } else { None })
            .collect()
    }
}

/// Text annotation offsets per protein label, with a shared fallback.
///
/// Replaces hard-coded per-label branching: a renderer asks for the offset of
/// any identifier and gets either its registered placement or the default.
#[derive(Debug, Clone)]
pub struct LabelOffsets {
    offsets: HashMap<String, (f64, f64)>,
    default: (f64, f64),
}

impl LabelOffsets {
    pub fn new(default: (f64, f64)) -> Self {
        LabelOffsets {
            offsets: HashMap::new(),
            default,
        }
    }

    pub fn with_offset(mut self, protein: &str, offset: (f64, f64)) -> Self {
        self.offsets.insert(protein.to_string(), offset);
        self
    }

    pub fn offset_for(&self, protein: &str) -> (f64, f64) {
        self.offsets.get(protein).copied().unwrap_or(self.default)
    }
}

impl Default for LabelOffsets {
    fn default() -> Self {
        // Placement used by the upstream figures for unexceptional labels.
        LabelOffsets::new((0.07, 0.1))
    }
}
