//! # abundance-stats
//!
//! A specialized Rust library for differential abundance analysis of quantitative
//! proteomics data.
//!
//! This crate provides the statistical core of a two-group proteomics comparison:
//! per-protein log2 fold changes, two-sample t-tests, Benjamini-Hochberg multiple
//! testing correction, and Cohen's d effect sizes, computed over a dense
//! protein-by-sample abundance matrix. Around that core it carries the data
//! preparation steps such an analysis needs: tab-separated matrix I/O, per-protein
//! z-score rescaling, PCA projection of samples, and volcano-table preparation.
//!
//! ## Core Features
//!
//! - **Differential Abundance Analysis**: Student's and Welch's t-tests per protein
//! - **Multiple Testing Correction**: Benjamini-Hochberg FDR and Bonferroni
//! - **Effect Size Calculations**: Cohen's d and sum-based log2 fold change
//! - **Dense Matrix Support**: built on `Array2<f64>` from ndarray
//!
//! ## Quick Start
//!
//! Load an abundance table with [`io::read_abundance_tsv`], describe the two
//! sample groups with a [`matrix::GroupAssignment`], and run
//! [`testing::inference::AbundanceStatTests::differential_abundance`]. Every
//! protein of the input appears in the result, in input order; degenerate rows
//! (fewer than two replicates, zero variance) yield NaN statistics instead of
//! aborting the batch.
//!
//! ## Module Organization
//!
//! - **[`matrix`]**: Abundance matrix and validated group assignment
//! - **[`io`]**: Tab-separated input and results output
//! - **[`scale`]**: Per-protein z-score standardization
//! - **[`pca`]**: Principal component projection of samples
//! - **[`testing`]**: Statistical tests, correction, and effect sizes
//! - **[`volcano`]**: Volcano-plot data preparation

pub mod io;
pub mod matrix;
pub mod pca;
pub mod scale;
pub mod testing;
pub mod volcano;
