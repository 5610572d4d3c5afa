//! exprsim: similarity scoring between gene-expression datasets
//!
//! This library scores how similar two gene-expression datasets are —
//! typically a real dataset and a synthetically generated one — by comparing
//! the correlation structure among genes and the known regulatory
//! relationships between transcription factors (TFs) and their target genes
//! (TGs). It is used to validate synthetic expression-data generators
//! against ground truth.
//!
//! The main components of this library are:
//! - `ExprSim`: the scoring engine producing the six-coefficient
//!   `ScoreVector`
//! - `gamma_coefficients` / `psi_coefficient` / `phi_coefficient` /
//!   `omega_coefficient`: the individual comparison coefficients
//! - `hierarchical_clustering` and friends: complete-linkage dendrograms,
//!   cophenetic distances and silhouette scores
//! - `find_chip_rates`: TF-activity detection by rank-sum testing with
//!   Benjamini-Hochberg correction
//!
//! The engine performs no I/O: expression matrices, gene symbols and the
//! TF-TG map come in as already-resolved in-memory structures, and results
//! go out as plain numeric values.

mod activity;
mod clustering;
mod coefficients;
mod config;
mod correlation;
mod error;
mod exprsim;
mod math;
mod regulatory;
mod results;
mod utils;

pub use activity::find_chip_rates;
pub use clustering::{
    compare_cophenetic, complete_linkage, compute_silhouette, cophenetic_correlation,
    dendrogram_distance, dendrogram_distance_condensed, hierarchical_clustering, ClusterNode,
    Dendrogram, Linkage, LinkageRecord,
};
pub use coefficients::{
    gamma_coefficients, omega_coefficient, phi_coefficient, psi_coefficient, GammaCoefficients,
};
pub use config::{ActivityConfig, GeneSimilarity, WeightScheme};
pub use correlation::{
    correlations_list, cosine_similarity, pearson_correlation, pearson_scalar, upper_diag_list,
};
pub use error::{ExprSimError, Result};
pub use exprsim::ExprSim;
pub use math::{average_ranks, mann_whitney_u, weighted_mean, weighted_pearson};
pub use regulatory::{compute_tf_tg_corrs, flatten_corrs, RegulatoryMap, TfCorrelations};
pub use results::{ChipRates, ScoreVector};
