use anyhow::{Result, anyhow};
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use std::collections::HashMap;

/// Dense protein-by-sample abundance matrix.
///
/// Rows are proteins, columns are sample replicates, cells are abundance
/// values. Identifiers on both axes are unique; the matrix is immutable after
/// construction. Lookups by identifier that miss are hard errors, matching
/// the one-shot batch semantics of the analysis: a label list referencing a
/// protein absent from the table aborts the run.
#[derive(Debug, Clone)]
pub struct AbundanceMatrix {
    proteins: Vec<String>,
    samples: Vec<String>,
    values: Array2<f64>,
    protein_lookup: HashMap<String, usize>,
    sample_lookup: HashMap<String, usize>,
}

impl AbundanceMatrix {
    /// Build a matrix from row identifiers, column identifiers and values.
    ///
    /// Fails on dimension mismatches and on duplicate identifiers on either
    /// axis.
    pub fn new(
        proteins: Vec<String>,
        samples: Vec<String>,
        values: Array2<f64>,
    ) -> Result<Self> {
        if proteins.len() != values.nrows() {
            return Err(anyhow!(
                "Row count mismatch: {} protein ids vs {} matrix rows",
                proteins.len(),
                values.nrows()
            ));
        }
        if samples.len() != values.ncols() {
            return Err(anyhow!(
                "Column count mismatch: {} sample ids vs {} matrix columns",
                samples.len(),
                values.ncols()
            ));
        }

        let protein_lookup = build_lookup(&proteins, "protein")?;
        let sample_lookup = build_lookup(&samples, "sample")?;

        Ok(AbundanceMatrix {
            proteins,
            samples,
            values,
            protein_lookup,
            sample_lookup,
        })
    }

    pub fn n_proteins(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_samples(&self) -> usize {
        self.values.ncols()
    }

    pub fn proteins(&self) -> &[String] {
        &self.proteins
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// Resolve a protein identifier to its row index.
    pub fn protein_index(&self, protein: &str) -> Result<usize> {
        self.protein_lookup
            .get(protein)
            .copied()
            .ok_or_else(|| anyhow!("Protein '{}' not present in the matrix", protein))
    }

    /// Resolve a sample identifier to its column index.
    pub fn sample_index(&self, sample: &str) -> Result<usize> {
        self.sample_lookup
            .get(sample)
            .copied()
            .ok_or_else(|| anyhow!("Sample column '{}' not present in the matrix", sample))
    }

    /// Abundance values for one protein across all samples.
    pub fn row(&self, protein: &str) -> Result<ArrayView1<'_, f64>> {
        let idx = self.protein_index(protein)?;
        Ok(self.values.row(idx))
    }

    /// Subset the matrix to the given proteins, in the given order.
    ///
    /// Any identifier absent from the matrix is an error; this is the lookup
    /// step that feeds heatmap-style selections of curated protein lists.
    pub fn select_proteins<S: AsRef<str>>(&self, ids: &[S]) -> Result<AbundanceMatrix> {
        let mut rows = Vec::with_capacity(ids.len());
        for id in ids {
            rows.push(self.protein_index(id.as_ref())?);
        }

        let values = self.values.select(Axis(0), &rows);
        AbundanceMatrix::new(
            ids.iter().map(|id| id.as_ref().to_string()).collect(),
            self.samples.clone(),
            values,
        )
    }

    /// Swap the axes, turning a samples-by-proteins table into the canonical
    /// proteins-by-samples orientation.
    pub fn transposed(&self) -> AbundanceMatrix {
        AbundanceMatrix {
            proteins: self.samples.clone(),
            samples: self.proteins.clone(),
            values: self.values.t().to_owned(),
            protein_lookup: self.sample_lookup.clone(),
            sample_lookup: self.protein_lookup.clone(),
        }
    }
}

fn build_lookup(ids: &[String], axis: &str) -> Result<HashMap<String, usize>> {
    let mut lookup = HashMap::with_capacity(ids.len());
    for (i, id) in ids.iter().enumerate() {
        if lookup.insert(id.clone(), i).is_some() {
            return Err(anyhow!("Duplicate {} identifier '{}'", axis, id));
        }
    }
    Ok(lookup)
}

/// Partition of a matrix's sample columns into the two compared groups.
///
/// This is the explicit schema for the comparison: each logical role
/// (treatment replicate 1..n, control replicate 1..m) maps to a named sample
/// column. Validation against a matrix happens before any statistics run and
/// fails fast with the name of the first missing column.
#[derive(Debug, Clone)]
pub struct GroupAssignment {
    treatment: Vec<String>,
    control: Vec<String>,
}

impl GroupAssignment {
    /// Create an assignment from treatment and control replicate columns.
    ///
    /// Both groups must be non-empty and disjoint, with no repeated column
    /// within a group.
    pub fn new<S: AsRef<str>>(treatment: &[S], control: &[S]) -> Result<Self> {
        if treatment.is_empty() || control.is_empty() {
            return Err(anyhow!("Both sample groups must be non-empty"));
        }

        let treatment: Vec<String> = treatment.iter().map(|s| s.as_ref().to_string()).collect();
        let control: Vec<String> = control.iter().map(|s| s.as_ref().to_string()).collect();

        build_lookup(&treatment, "treatment sample")?;
        build_lookup(&control, "control sample")?;

        for id in &treatment {
            if control.contains(id) {
                return Err(anyhow!(
                    "Sample '{}' assigned to both treatment and control",
                    id
                ));
            }
        }

        Ok(GroupAssignment { treatment, control })
    }

    pub fn treatment(&self) -> &[String] {
        &self.treatment
    }

    pub fn control(&self) -> &[String] {
        &self.control
    }

    /// The same assignment with the two groups exchanged.
    pub fn swapped(&self) -> GroupAssignment {
        GroupAssignment {
            treatment: self.control.clone(),
            control: self.treatment.clone(),
        }
    }

    /// Resolve the named columns against a matrix.
    pub fn resolve(&self, matrix: &AbundanceMatrix) -> Result<ResolvedGroups> {
        let treatment = self
            .treatment
            .iter()
            .map(|s| matrix.sample_index(s))
            .collect::<Result<Vec<_>>>()?;
        let control = self
            .control
            .iter()
            .map(|s| matrix.sample_index(s))
            .collect::<Result<Vec<_>>>()?;

        Ok(ResolvedGroups { treatment, control })
    }
}

/// Column indices of the two groups within a specific matrix.
#[derive(Debug, Clone)]
pub struct ResolvedGroups {
    pub treatment: Vec<usize>,
    pub control: Vec<usize>,
}
