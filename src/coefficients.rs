use ndarray::Array2;

use crate::{
    activity::find_chip_rates,
    clustering::{compare_cophenetic, cophenetic_correlation, hierarchical_clustering},
    config::{ActivityConfig, GeneSimilarity, WeightScheme},
    correlation::{correlations_list, cosine_similarity, pearson_scalar},
    error::{ExprSimError, Result},
    math::weighted_pearson,
    regulatory::{RegulatoryMap, TfCorrelations},
    results::ChipRates,
};

/// The four structural-agreement scores between two expression datasets over
/// the same gene set.
#[derive(Debug, Clone, Copy)]
pub struct GammaCoefficients {
    /// Gamma(D^X, D^Z): agreement between the raw gene-distance vectors.
    pub dist: f64,
    /// Gamma(D^X, T^X): cophenetic correlation within the first dataset.
    pub coph_x: f64,
    /// Gamma(D^Z, T^Z): cophenetic correlation within the second dataset.
    pub coph_z: f64,
    /// Gamma(T^X, T^Z): agreement between the two dendrograms.
    pub dend: f64,
}

/// Computes the gamma coefficients: `1 - similarity` distance vectors for
/// both datasets, a complete-linkage dendrogram per dataset, and the four
/// pairwise agreements between them. Sample counts may differ; the gene set
/// and its ordering must not.
pub fn gamma_coefficients(
    expr_x: &Array2<f64>,
    expr_z: &Array2<f64>,
    similarity: GeneSimilarity,
) -> Result<GammaCoefficients> {
    let dists_x: Vec<f64> = correlations_list(expr_x, expr_x, similarity)?
        .iter()
        .map(|c| 1.0 - c)
        .collect();
    let dists_z: Vec<f64> = correlations_list(expr_z, expr_z, similarity)?
        .iter()
        .map(|c| 1.0 - c)
        .collect();

    let linkage_x = hierarchical_clustering(expr_x, similarity)?;
    let linkage_z = hierarchical_clustering(expr_z, similarity)?;

    Ok(GammaCoefficients {
        dist: pearson_scalar(&dists_x, &dists_z),
        coph_x: cophenetic_correlation(&linkage_x, &dists_x),
        coph_z: cophenetic_correlation(&linkage_z, &dists_z),
        dend: compare_cophenetic(&linkage_x, &linkage_z),
    })
}

/// Psi: weighted mean over TFs of the cosine similarity between their TF-TG
/// correlation vectors in the two datasets.
///
/// Inputs must come from [`crate::compute_tf_tg_corrs`] over the same
/// symbols and regulatory map, so TFs align positionally.
pub fn psi_coefficient(
    corrs_x: &[TfCorrelations],
    corrs_z: &[TfCorrelations],
    weights: WeightScheme,
) -> Result<f64> {
    let mut weight_sum = 0.0;
    let mut total = 0.0;
    for (cx, cz) in corrs_x.iter().zip(corrs_z) {
        let weight = weights.tf_weight(cx.tf_tg.len());
        weight_sum += weight;
        total += weight * cosine_similarity(&cx.tf_tg, &cz.tf_tg);
    }
    if weight_sum == 0.0 {
        return Err(ExprSimError::EmptyEligibleSet);
    }
    Ok(total / weight_sum)
}

/// Phi: weighted mean over TFs of the cosine similarity between their
/// condensed TG-TG correlation vectors in the two datasets.
///
/// TFs with a single measured target have an empty TG-TG list and are
/// excluded from both the weight sum and the value sum.
pub fn phi_coefficient(
    corrs_x: &[TfCorrelations],
    corrs_z: &[TfCorrelations],
    weights: WeightScheme,
) -> Result<f64> {
    let mut weight_sum = 0.0;
    let mut total = 0.0;
    for (cx, cz) in corrs_x.iter().zip(corrs_z) {
        if cx.tg_tg.is_empty() {
            continue;
        }
        let weight = weights.pair_weight(cx.tg_tg.len());
        weight_sum += weight;
        total += weight * cosine_similarity(&cx.tg_tg, &cz.tg_tg);
    }
    if weight_sum == 0.0 {
        return Err(ExprSimError::EmptyEligibleSet);
    }
    Ok(total / weight_sum)
}

/// Omega: weighted correlation between the two datasets' TF chip rates,
/// weighted by target-gene count.
pub fn omega_coefficient(
    expr_x: &Array2<f64>,
    expr_z: &Array2<f64>,
    gene_symbols: &[String],
    tf_tg: &RegulatoryMap,
    config: ActivityConfig,
) -> Result<f64> {
    let rates_x = find_chip_rates(expr_x, gene_symbols, tf_tg, config)?;
    let rates_z = find_chip_rates(expr_z, gene_symbols, tf_tg, config)?;
    weighted_rate_correlation(&rates_x, &rates_z)
}

/// Correlates two chip-rate vectors under their shared weights. Both
/// datasets must have produced identical weight vectors; anything else means
/// the gene symbols disagree between them.
pub(crate) fn weighted_rate_correlation(x: &ChipRates, z: &ChipRates) -> Result<f64> {
    if x.weights != z.weights {
        return Err(ExprSimError::InconsistentWeights);
    }
    if x.is_empty() {
        return Err(ExprSimError::EmptyEligibleSet);
    }
    Ok(weighted_pearson(&x.rates, &z.rates, &x.weights))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array2;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn tf(name: &str, tf_tg: Vec<f64>, tg_tg: Vec<f64>) -> TfCorrelations {
        TfCorrelations::new(name.into(), tf_tg, tg_tg)
    }

    #[test]
    fn test_gamma_self_comparison() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let expr = Array2::from_shape_fn((15, 6), |_| rng.gen_range(-1.0..1.0));
        let gamma = gamma_coefficients(&expr, &expr, GeneSimilarity::Pearson).unwrap();
        assert_relative_eq!(gamma.dist, 1.0, epsilon = 1e-9);
        assert_relative_eq!(gamma.dend, 1.0, epsilon = 1e-9);
        assert_relative_eq!(gamma.coph_x, gamma.coph_z, epsilon = 1e-12);
        // cophenetic agreement within a dataset is high but not perfect
        assert!(gamma.coph_x > 0.0 && gamma.coph_x <= 1.0 + 1e-12);
    }

    #[test]
    fn test_psi_weighting() {
        // identical first TF (cosine 1), opposed second TF (cosine -1)
        let x = vec![
            tf("a", vec![0.5, 0.5, 0.5], vec![]),
            tf("b", vec![0.4], vec![]),
        ];
        let z = vec![
            tf("a", vec![0.5, 0.5, 0.5], vec![]),
            tf("b", vec![-0.4], vec![]),
        ];
        let by_genes = psi_coefficient(&x, &z, WeightScheme::NbGenes).unwrap();
        assert_relative_eq!(by_genes, (3.0 - 1.0) / 4.0, epsilon = 1e-12);
        let by_ones = psi_coefficient(&x, &z, WeightScheme::Ones).unwrap();
        assert_relative_eq!(by_ones, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_phi_excludes_single_target_tfs() {
        // TF "b" has one target, hence an empty TG-TG list; phi must reduce
        // to TF "a" alone with weight 2 (3 pairs -> 3 genes)
        let x = vec![
            tf("a", vec![0.1, 0.2, 0.3], vec![0.9, 0.8, 0.7]),
            tf("b", vec![0.5], vec![]),
        ];
        let z = vec![
            tf("a", vec![0.1, 0.2, 0.3], vec![0.9, 0.8, 0.7]),
            tf("b", vec![0.5], vec![]),
        ];
        assert_relative_eq!(
            phi_coefficient(&x, &z, WeightScheme::NbGenes).unwrap(),
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_phi_with_only_single_target_tfs_is_an_error() {
        let x = vec![tf("b", vec![0.5], vec![])];
        let err = phi_coefficient(&x, &x, WeightScheme::NbGenes).unwrap_err();
        assert!(matches!(err, ExprSimError::EmptyEligibleSet));
    }

    #[test]
    fn test_inconsistent_weights_are_fatal() {
        let x = ChipRates {
            tfs: vec!["a".into()],
            rates: vec![0.5],
            weights: vec![3.0],
        };
        let z = ChipRates {
            tfs: vec!["a".into()],
            rates: vec![0.5],
            weights: vec![4.0],
        };
        let err = weighted_rate_correlation(&x, &z).unwrap_err();
        assert!(matches!(err, ExprSimError::InconsistentWeights));
    }

    #[test]
    fn test_empty_rates_are_an_error() {
        let empty = ChipRates::default();
        let err = weighted_rate_correlation(&empty, &empty).unwrap_err();
        assert!(matches!(err, ExprSimError::EmptyEligibleSet));
    }
}
