use ndarray::Array2;

use crate::{
    correlation::{pearson_correlation, rank_columns},
    error::Result,
};

/// Pairwise gene-similarity measure used for distance vectors and
/// clustering. Injected explicitly wherever the measure matters, so
/// alternate measures are testable without global state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GeneSimilarity {
    /// Pearson correlation of standardized expression columns.
    #[default]
    Pearson,
    /// Pearson correlation of the per-column midranks.
    Spearman,
}

impl GeneSimilarity {
    pub fn matrix(&self, x: &Array2<f64>, y: &Array2<f64>) -> Result<Array2<f64>> {
        match self {
            GeneSimilarity::Pearson => pearson_correlation(x, y),
            GeneSimilarity::Spearman => {
                pearson_correlation(&rank_columns(x), &rank_columns(y))
            }
        }
    }
}

/// Per-TF weighting used by the psi and phi aggregates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WeightScheme {
    /// Weight each TF by the number of target genes it regulates.
    #[default]
    NbGenes,
    /// Weight every TF equally.
    Ones,
}

impl WeightScheme {
    /// Weight for a TF with `nb_targets` measured target genes.
    pub fn tf_weight(&self, nb_targets: usize) -> f64 {
        match self {
            WeightScheme::NbGenes => nb_targets as f64,
            WeightScheme::Ones => 1.0,
        }
    }

    /// Weight for a TF whose TG-TG list holds `nb_pairs` condensed entries.
    ///
    /// A TF with `g` targets contributes `g(g-1)/2` pairs; the weight is the
    /// positive root of `w^2 + w - 2*nb_pairs = 0`, which grows with the
    /// TF's gene count rather than its pair count.
    pub fn pair_weight(&self, nb_pairs: usize) -> f64 {
        match self {
            WeightScheme::NbGenes => ((1.0 + 8.0 * nb_pairs as f64).sqrt() - 1.0) / 2.0,
            WeightScheme::Ones => 1.0,
        }
    }
}

/// Parameters of the TF-activity rank-sum procedure.
#[derive(Debug, Clone, Copy)]
pub struct ActivityConfig {
    /// Significance level for the Benjamini-Hochberg corrected per-sample
    /// tests.
    pub alpha: f64,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self { alpha: 0.05 }
    }
}
