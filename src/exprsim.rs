use bon::Builder;
use ndarray::Array2;
use tracing::debug;

use crate::{
    coefficients::{gamma_coefficients, omega_coefficient, phi_coefficient, psi_coefficient},
    config::{ActivityConfig, GeneSimilarity, WeightScheme},
    error::{ExprSimError, Result},
    regulatory::{compute_tf_tg_corrs, RegulatoryMap},
    results::ScoreVector,
};

/// Similarity scorer between two expression datasets over a shared gene set.
///
/// `expr_x` is conventionally the real dataset and `expr_z` the synthetic
/// one; both are `(nb_samples, nb_genes)` with the gene dimension ordered by
/// `gene_symbols`. Sample counts may differ. Inputs are borrowed and never
/// mutated.
#[derive(Builder)]
pub struct ExprSim<'a> {
    expr_x: &'a Array2<f64>,
    expr_z: &'a Array2<f64>,
    gene_symbols: &'a [String],
    tf_tg: &'a RegulatoryMap,
    #[builder(default)]
    similarity: GeneSimilarity,
    #[builder(default)]
    weights: WeightScheme,
    #[builder(default)]
    activity: ActivityConfig,
}

impl ExprSim<'_> {
    /// Computes the six-coefficient score vector:
    /// `[Gamma(D^X,D^Z), Gamma(T^X,T^Z), (Gamma(D^X,T^X) - Gamma(D^Z,T^Z))^2,
    /// psi, phi, omega]`.
    ///
    /// The coefficient families are mutually independent given the inputs
    /// and run concurrently.
    pub fn run(&self) -> Result<ScoreVector> {
        self.validate()?;

        let (gamma, (regulatory, omega)) = rayon::join(
            || gamma_coefficients(self.expr_x, self.expr_z, self.similarity),
            || {
                rayon::join(
                    || self.regulatory_coefficients(),
                    || {
                        omega_coefficient(
                            self.expr_x,
                            self.expr_z,
                            self.gene_symbols,
                            self.tf_tg,
                            self.activity,
                        )
                    },
                )
            },
        );
        let gamma = gamma?;
        let (psi, phi) = regulatory?;
        let omega = omega?;
        debug!("similarity coefficients computed");

        Ok(ScoreVector {
            s_dist: gamma.dist,
            s_dend: gamma.dend,
            s_sdcc: (gamma.coph_x - gamma.coph_z).powi(2),
            s_tftg: psi,
            s_tgtg: phi,
            s_tfac: omega,
        })
    }

    fn regulatory_coefficients(&self) -> Result<(f64, f64)> {
        let corrs_x = compute_tf_tg_corrs(self.expr_x, self.gene_symbols, self.tf_tg)?;
        let corrs_z = compute_tf_tg_corrs(self.expr_z, self.gene_symbols, self.tf_tg)?;
        let psi = psi_coefficient(&corrs_x, &corrs_z, self.weights)?;
        let phi = phi_coefficient(&corrs_x, &corrs_z, self.weights)?;
        Ok((psi, phi))
    }

    fn validate(&self) -> Result<()> {
        for expr in [self.expr_x, self.expr_z] {
            if expr.ncols() != self.gene_symbols.len() {
                return Err(ExprSimError::SymbolMismatch {
                    symbols: self.gene_symbols.len(),
                    columns: expr.ncols(),
                });
            }
        }
        Ok(())
    }
}
