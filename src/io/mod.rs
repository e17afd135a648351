//! Tab-separated input and output for abundance tables.

use crate::matrix::AbundanceMatrix;
use crate::testing::DifferentialResults;
use anyhow::{Context, Result, anyhow};
use csv::{ReaderBuilder, WriterBuilder};
use log::{info, warn};
use ndarray::Array2;
use std::path::Path;

/// Read an abundance matrix from a tab-separated file.
///
/// The first column holds the row identifier key; every remaining column is a
/// sample replicate of f64 abundances. Rows are proteins in the canonical
/// orientation; a samples-as-rows table can be read and then
/// [`AbundanceMatrix::transposed`] by the caller.
///
/// Negative values are accepted with a warning: the data model expects
/// non-negative abundances but the file is external input.
pub fn read_abundance_tsv<P: AsRef<Path>>(path: P) -> Result<AbundanceMatrix> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Cannot open abundance table {}", path.display()))?;

    let headers = reader.headers()?.clone();
    if headers.len() < 2 {
        return Err(anyhow!(
            "Abundance table {} needs an identifier column and at least one sample column",
            path.display()
        ));
    }
    let samples: Vec<String> = headers.iter().skip(1).map(String::from).collect();

    let mut proteins = Vec::new();
    let mut cells = Vec::new();
    let mut negative_cells = 0usize;

    for (row_idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| {
            format!("Malformed record at data row {} of {}", row_idx + 1, path.display())
        })?;

        let protein = record
            .get(0)
            .ok_or_else(|| anyhow!("Empty record at data row {}", row_idx + 1))?
            .to_string();

        for field in record.iter().skip(1) {
            let value: f64 = field.trim().parse().map_err(|_| {
                anyhow!(
                    "Unparseable abundance value '{}' for protein '{}' in {}",
                    field,
                    protein,
                    path.display()
                )
            })?;
            if value < 0.0 {
                negative_cells += 1;
            }
            cells.push(value);
        }
        proteins.push(protein);
    }

    if negative_cells > 0 {
        warn!(
            "{} negative abundance cell(s) in {}; expected non-negative values",
            negative_cells,
            path.display()
        );
    }

    let n_proteins = proteins.len();
    let values = Array2::from_shape_vec((n_proteins, samples.len()), cells)
        .with_context(|| format!("Inconsistent row widths in {}", path.display()))?;

    let matrix = AbundanceMatrix::new(proteins, samples, values)?;
    info!(
        "Loaded {} proteins x {} samples from {}",
        matrix.n_proteins(),
        matrix.n_samples(),
        path.display()
    );
    Ok(matrix)
}

/// Write the original matrix plus the computed statistic columns to a
/// tab-separated file, one row per protein in input order.
///
/// Non-finite statistics are written with Rust float formatting (`NaN`,
/// `inf`, `-inf`); downstream consumers must tolerate them.
pub fn write_results_tsv<P: AsRef<Path>>(
    path: P,
    matrix: &AbundanceMatrix,
    results: &DifferentialResults,
) -> Result<()> {
    let path = path.as_ref();
    if results.proteins() != matrix.proteins() {
        return Err(anyhow!(
            "Result protein domain does not match the matrix rows"
        ));
    }

    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .with_context(|| format!("Cannot create results table {}", path.display()))?;

    let mut header = vec!["protein".to_string()];
    header.extend(matrix.samples().iter().cloned());
    header.extend(
        [
            "log2_fold_change",
            "p_value",
            "adjusted_p_value",
            "neg_log10_p_value",
            "cohens_d",
        ]
        .map(String::from),
    );
    writer.write_record(&header)?;

    let neg_log10 = results.neg_log10_p_values();
    for (row_idx, protein) in matrix.proteins().iter().enumerate() {
        let record = results.record_at(row_idx);
        let mut fields = vec![protein.clone()];
        fields.extend(matrix.values().row(row_idx).iter().map(|v| v.to_string()));
        fields.push(record.log2_fold_change.to_string());
        fields.push(record.p_value.to_string());
        fields.push(record.adjusted_p_value.to_string());
        fields.push(neg_log10[row_idx].to_string());
        fields.push(record.cohens_d.to_string());
        writer.write_record(&fields)?;
    }

    writer.flush()?;
    info!(
        "Wrote {} result rows to {}",
        results.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::fs;

    #[test]
    fn read_round_trip_preserves_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abundance.tsv");
        fs::write(
            &path,
            "protein\tt1\tt2\tc1\nPEX13\t1.5\t2.5\t3.5\nMSP1\t4\t5\t6\n",
        )
        .unwrap();

        let matrix = read_abundance_tsv(&path).unwrap();
        assert_eq!(matrix.proteins(), &["PEX13".to_string(), "MSP1".to_string()]);
        assert_eq!(
            matrix.samples(),
            &["t1".to_string(), "t2".to_string(), "c1".to_string()]
        );
        assert_abs_diff_eq!(matrix.row("PEX13").unwrap()[1], 2.5);
        assert_abs_diff_eq!(matrix.row("MSP1").unwrap()[2], 6.0);
    }

    #[test]
    fn unparseable_cell_names_the_protein() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.tsv");
        fs::write(&path, "protein\tt1\nPEX13\tnot-a-number\n").unwrap();

        let err = read_abundance_tsv(&path).unwrap_err();
        assert!(err.to_string().contains("PEX13"));
    }

    #[test]
    fn duplicate_protein_ids_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dup.tsv");
        fs::write(&path, "protein\tt1\nPEX13\t1\nPEX13\t2\n").unwrap();
        assert!(read_abundance_tsv(&path).is_err());
    }

    #[test]
    fn missing_file_is_contextualized() {
        let err = read_abundance_tsv("/nonexistent/abundance.tsv").unwrap_err();
        assert!(err.to_string().contains("abundance.tsv"));
    }

    #[test]
    fn results_table_carries_matrix_and_statistics() {
        let matrix = AbundanceMatrix::new(
            vec!["A".into(), "B".into()],
            vec!["t1".into(), "c1".into()],
            ndarray::array![[2.0, 1.0], [3.0, 3.0]],
        )
        .unwrap();
        let results = DifferentialResults::new(
            vec!["A".into(), "B".into()],
            vec![1.0, 0.0],
            vec![0.01, f64::NAN],
            vec![0.02, f64::NAN],
            vec![0.5, f64::NAN],
            vec![true, false],
            0.1,
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.tsv");
        write_results_tsv(&path, &matrix, &results).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next().unwrap(),
            "protein\tt1\tc1\tlog2_fold_change\tp_value\tadjusted_p_value\tneg_log10_p_value\tcohens_d"
        );
        assert_eq!(lines.next().unwrap(), "A\t2\t1\t1\t0.01\t0.02\t2\t0.5");
        // NaN statistics are written as-is, not dropped.
        assert_eq!(lines.next().unwrap(), "B\t3\t3\t0\tNaN\tNaN\tNaN\tNaN");
    }

    #[test]
    fn mismatched_result_domain_is_an_error() {
        let matrix = AbundanceMatrix::new(
            vec!["A".into()],
            vec!["t1".into()],
            ndarray::array![[2.0]],
        )
        .unwrap();
        let results = DifferentialResults::new(
            vec!["Z".into()],
            vec![1.0],
            vec![0.01],
            vec![0.02],
            vec![0.5],
            vec![true],
            0.1,
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        assert!(write_results_tsv(dir.path().join("r.tsv"), &matrix, &results).is_err());
    }
}
