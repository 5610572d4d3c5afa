use std::collections::{BTreeMap, BTreeSet};

use derive_new::new;
use ndarray::Array2;
use tracing::debug;

use crate::{
    config::GeneSimilarity,
    correlation::{correlations_list, pearson_correlation},
    error::{ExprSimError, Result},
    utils::{select_columns, symbol_index},
};

/// Known regulatory interactions: TF symbol to the set of its target-gene
/// symbols.
///
/// Ordered maps are load-bearing here: the psi, phi and omega aggregates
/// align per-TF values between two datasets positionally, so TF iteration
/// order must be deterministic and identical across calls.
pub type RegulatoryMap = BTreeMap<String, BTreeSet<String>>;

/// A TF that passed the eligibility filter, with its column indices resolved
/// against the gene symbols.
pub(crate) struct EligibleTf<'a> {
    pub tf: &'a str,
    pub tf_idx: usize,
    pub tg_idxs: Vec<usize>,
}

/// Resolves the eligible TFs: present in the gene symbols with at least one
/// present target. Everything else is skipped, never zero-filled.
pub(crate) fn eligible_tfs<'a>(
    gene_symbols: &[String],
    tf_tg: &'a RegulatoryMap,
) -> Vec<EligibleTf<'a>> {
    let index = symbol_index(gene_symbols);
    let mut eligible = Vec::new();
    for (tf, tgs) in tf_tg {
        let tg_idxs: Vec<usize> = tgs
            .iter()
            .filter_map(|tg| index.get(tg.as_str()).copied())
            .collect();
        match index.get(tf.as_str()) {
            Some(&tf_idx) if !tg_idxs.is_empty() => eligible.push(EligibleTf {
                tf,
                tf_idx,
                tg_idxs,
            }),
            Some(_) => debug!(tf, "skipping TF with no measured targets"),
            None => debug!(tf, "skipping TF absent from gene symbols"),
        }
    }
    eligible
}

/// Correlation bundles for one eligible TF.
#[derive(Debug, Clone, new)]
pub struct TfCorrelations {
    /// TF gene symbol.
    pub tf: String,
    /// Correlation of the TF's expression against each of its targets, one
    /// entry per measured target.
    pub tf_tg: Vec<f64>,
    /// Condensed correlations among the targets, `g(g-1)/2` entries; empty
    /// when the TF has a single measured target.
    pub tg_tg: Vec<f64>,
}

/// Computes the per-TF TF-TG and TG-TG correlation lists over `expr`.
///
/// Output order follows the regulatory map's (deterministic) iteration
/// order, so two calls over different datasets with the same symbols and map
/// produce positionally aligned results.
pub fn compute_tf_tg_corrs(
    expr: &Array2<f64>,
    gene_symbols: &[String],
    tf_tg: &RegulatoryMap,
) -> Result<Vec<TfCorrelations>> {
    if expr.ncols() != gene_symbols.len() {
        return Err(ExprSimError::SymbolMismatch {
            symbols: gene_symbols.len(),
            columns: expr.ncols(),
        });
    }

    let mut corrs = Vec::new();
    for eligible in eligible_tfs(gene_symbols, tf_tg) {
        let expr_tgs = select_columns(expr, &eligible.tg_idxs);
        let tg_tg = correlations_list(&expr_tgs, &expr_tgs, GeneSimilarity::Pearson)?;

        let expr_tf = select_columns(expr, &[eligible.tf_idx]);
        let tf_tg_row = pearson_correlation(&expr_tf, &expr_tgs)?;
        corrs.push(TfCorrelations::new(
            eligible.tf.to_string(),
            tf_tg_row.row(0).to_vec(),
            tg_tg,
        ));
    }
    Ok(corrs)
}

/// Concatenates the per-TF lists into two global lists, losing the grouping.
pub fn flatten_corrs(corrs: &[TfCorrelations]) -> (Vec<f64>, Vec<f64>) {
    let tf_tg = corrs.iter().flat_map(|c| c.tf_tg.iter().copied()).collect();
    let tg_tg = corrs.iter().flat_map(|c| c.tg_tg.iter().copied()).collect();
    (tf_tg, tg_tg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn symbols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn map(entries: &[(&str, &[&str])]) -> RegulatoryMap {
        entries
            .iter()
            .map(|(tf, tgs)| {
                (
                    tf.to_string(),
                    tgs.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
                )
            })
            .collect()
    }

    fn expression() -> Array2<f64> {
        array![
            [1.0, 2.0, 0.5, 3.0],
            [2.0, 1.5, 1.0, 2.0],
            [3.0, 4.0, 0.2, 1.0],
            [4.0, 3.5, 2.0, 4.5],
            [5.0, 6.0, 1.5, 0.5],
        ]
    }

    #[test]
    fn test_ineligible_tfs_are_skipped_entirely() {
        let expr = expression();
        let genes = symbols(&["crp", "g2", "g3", "g4"]);
        // fnr is not a measured gene; g4 regulates only unmeasured targets
        let tf_tg = map(&[
            ("crp", &["g2", "g3"]),
            ("fnr", &["g2"]),
            ("g4", &["g9999"]),
        ]);
        let corrs = compute_tf_tg_corrs(&expr, &genes, &tf_tg).unwrap();
        assert_eq!(corrs.len(), 1);
        assert_eq!(corrs[0].tf, "crp");
    }

    #[test]
    fn test_correlation_list_lengths() {
        let expr = expression();
        let genes = symbols(&["crp", "g2", "g3", "g4"]);
        let tf_tg = map(&[("crp", &["g2", "g3", "g4"])]);
        let corrs = compute_tf_tg_corrs(&expr, &genes, &tf_tg).unwrap();
        assert_eq!(corrs[0].tf_tg.len(), 3);
        assert_eq!(corrs[0].tg_tg.len(), 3);
    }

    #[test]
    fn test_single_target_yields_empty_tg_tg() {
        let expr = expression();
        let genes = symbols(&["crp", "g2", "g3", "g4"]);
        let tf_tg = map(&[("crp", &["g2"])]);
        let corrs = compute_tf_tg_corrs(&expr, &genes, &tf_tg).unwrap();
        assert_eq!(corrs[0].tf_tg.len(), 1);
        assert!(corrs[0].tg_tg.is_empty());
    }

    #[test]
    fn test_flatten_concatenates_in_tf_order() {
        let corrs = vec![
            TfCorrelations::new("a".into(), vec![0.1, 0.2], vec![0.9]),
            TfCorrelations::new("b".into(), vec![0.3], vec![]),
        ];
        let (tf_tg, tg_tg) = flatten_corrs(&corrs);
        assert_eq!(tf_tg, vec![0.1, 0.2, 0.3]);
        assert_eq!(tg_tg, vec![0.9]);
    }

    #[test]
    fn test_symbol_count_must_match_columns() {
        let expr = expression();
        let genes = symbols(&["crp", "g2"]);
        let tf_tg = map(&[("crp", &["g2"])]);
        let err = compute_tf_tg_corrs(&expr, &genes, &tf_tg).unwrap_err();
        assert!(matches!(
            err,
            ExprSimError::SymbolMismatch {
                symbols: 2,
                columns: 4
            }
        ));
    }
}
