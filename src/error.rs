use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExprSimError>;

/// Failures surfaced by the scoring engine and its primitives.
///
/// Degenerate numeric inputs (zero-variance gene columns, all-zero cosine
/// inputs) are not errors: they propagate NaN through the affected
/// coefficients, matching numerical-computing convention. Each operation
/// documents where that can happen.
#[derive(Debug, Error)]
pub enum ExprSimError {
    /// Correlation inputs with incompatible sample counts.
    #[error("sample counts differ between correlation inputs ({left} vs {right})")]
    DimensionMismatch { left: usize, right: usize },

    /// A gene-symbol list that does not match the matrix it describes.
    #[error("{symbols} gene symbols given for an expression matrix with {columns} columns")]
    SymbolMismatch { symbols: usize, columns: usize },

    /// No transcription factor passed the eligibility filter, leaving a
    /// weighted aggregate with zero total weight.
    #[error("no eligible transcription factor: nothing to aggregate")]
    EmptyEligibleSet,

    /// The two datasets produced different per-TF weight vectors, which can
    /// only happen when their gene symbols disagree. Not recoverable.
    #[error("chip-rate weight vectors differ between datasets; gene symbols are inconsistent")]
    InconsistentWeights,
}
