use adjustp::{adjust, Procedure};
use ndarray::Array2;
use rayon::prelude::*;
use tracing::debug;

use crate::{
    config::ActivityConfig,
    correlation::standardize,
    error::{ExprSimError, Result},
    math::mann_whitney_u,
    regulatory::{eligible_tfs, RegulatoryMap},
    results::ChipRates,
    utils::complement_indices,
};

/// Detects TF activity by rank-sum testing.
///
/// Expression is standardized per gene. For each eligible TF, every sample
/// is tested independently: a two-sided rank-sum test of the TF's target
/// genes against all other genes in that sample. The per-sample p-values are
/// Benjamini-Hochberg corrected, and the TF's chip rate is the fraction of
/// samples whose corrected test rejects at `config.alpha`.
///
/// Rates come back aligned with per-TF weights (measured-target counts) in
/// the regulatory map's iteration order.
pub fn find_chip_rates(
    expr: &Array2<f64>,
    gene_symbols: &[String],
    tf_tg: &RegulatoryMap,
    config: ActivityConfig,
) -> Result<ChipRates> {
    if expr.ncols() != gene_symbols.len() {
        return Err(ExprSimError::SymbolMismatch {
            symbols: gene_symbols.len(),
            columns: expr.ncols(),
        });
    }

    let nb_samples = expr.nrows();
    let expr_norm = standardize(expr);
    let eligible = eligible_tfs(gene_symbols, tf_tg);
    debug!(nb_tfs = eligible.len(), "testing TF activity");

    let per_tf: Vec<(String, f64, f64)> = eligible
        .par_iter()
        .map(|tf| {
            let non_tg_idxs = complement_indices(expr.ncols(), &tf.tg_idxs);
            let pvalues: Vec<f64> = (0..nb_samples)
                .map(|sample| {
                    let row = expr_norm.row(sample);
                    let tgs: Vec<f64> = tf.tg_idxs.iter().map(|&j| row[j]).collect();
                    let non_tgs: Vec<f64> = non_tg_idxs.iter().map(|&j| row[j]).collect();
                    mann_whitney_u(&tgs, &non_tgs)
                })
                .collect();
            let corrected = adjust(&pvalues, Procedure::BenjaminiHochberg);
            let rejections = corrected.iter().filter(|&&p| p <= config.alpha).count();
            let chip_rate = rejections as f64 / nb_samples as f64;
            (tf.tf.to_string(), chip_rate, tf.tg_idxs.len() as f64)
        })
        .collect();

    let mut rates = ChipRates::default();
    for (tf, rate, weight) in per_tf {
        rates.tfs.push(tf);
        rates.rates.push(rate);
        rates.weights.push(weight);
    }
    Ok(rates)
}
