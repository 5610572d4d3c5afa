use itertools::Itertools;
use ndarray::{Array2, Axis};

use crate::{
    config::GeneSimilarity,
    error::{ExprSimError, Result},
    math::average_ranks,
};

/// Centers each column to zero mean and scales it to unit (population)
/// standard deviation. A zero-variance column standardizes to NaN.
pub(crate) fn standardize(a: &Array2<f64>) -> Array2<f64> {
    let nb_samples = a.nrows() as f64;
    let mean = a.sum_axis(Axis(0)) / nb_samples;
    let centered = a - &mean;
    let std = (centered.mapv(|v| v * v).sum_axis(Axis(0)) / nb_samples).mapv(f64::sqrt);
    centered / &std
}

/// Pairwise Pearson correlation between each gene column of `x` and each
/// gene column of `y`.
///
/// Both matrices are shaped `(nb_samples, nb_genes)` and must share their
/// sample count. The result has shape `(nb_genes_x, nb_genes_y)`; when
/// `x` and `y` are the same gene set it is symmetric with unit diagonal.
/// Zero-variance columns yield NaN entries.
pub fn pearson_correlation(x: &Array2<f64>, y: &Array2<f64>) -> Result<Array2<f64>> {
    if x.nrows() != y.nrows() {
        return Err(ExprSimError::DimensionMismatch {
            left: x.nrows(),
            right: y.nrows(),
        });
    }
    let x_std = standardize(x);
    let y_std = standardize(y);
    Ok(x_std.t().dot(&y_std) / x.nrows() as f64)
}

/// Cosine similarity between two equal-length vectors: `dot(x, y) / (|x||y|)`.
/// NaN when either vector is all-zero.
pub fn cosine_similarity(x: &[f64], y: &[f64]) -> f64 {
    assert_eq!(x.len(), y.len());
    let dot: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
    let norm_x: f64 = x.iter().map(|a| a * a).sum::<f64>().sqrt();
    let norm_y: f64 = y.iter().map(|b| b * b).sum::<f64>().sqrt();
    dot / (norm_x * norm_y)
}

/// Condensed form of a square matrix: the strict upper-triangular entries in
/// row-major scan order, `n(n-1)/2` values for an `n x n` input.
///
/// Two condensed vectors are only comparable index-for-index when they were
/// extracted over the same gene ordering.
pub fn upper_diag_list(m: &Array2<f64>) -> Vec<f64> {
    assert!(m.is_square(), "condensed form requires a square matrix");
    (0..m.nrows())
        .tuple_combinations()
        .map(|(i, j)| m[[i, j]])
        .collect()
}

/// Similarity matrix of `x` against `y`, condensed.
///
/// Only meaningful when `x` and `y` cover the same gene set, so that the
/// matrix is square and symmetric; for two different gene sets use the full
/// matrix from [`pearson_correlation`] instead.
pub fn correlations_list(
    x: &Array2<f64>,
    y: &Array2<f64>,
    similarity: GeneSimilarity,
) -> Result<Vec<f64>> {
    let corr = similarity.matrix(x, y)?;
    Ok(upper_diag_list(&corr))
}

/// Pearson correlation of two equal-length vectors, used to compare condensed
/// distance vectors index-for-index. NaN when either vector is constant.
pub fn pearson_scalar(x: &[f64], y: &[f64]) -> f64 {
    assert_eq!(x.len(), y.len());
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;
    let std_x = (x.iter().map(|v| (v - mean_x).powi(2)).sum::<f64>() / n).sqrt();
    let std_y = (y.iter().map(|v| (v - mean_y).powi(2)).sum::<f64>() / n).sqrt();
    let covar = x
        .iter()
        .zip(y)
        .map(|(a, b)| (a - mean_x) * (b - mean_y))
        .sum::<f64>()
        / n;
    covar / (std_x * std_y)
}

/// Replaces each column with its midranks, the rank transform behind the
/// Spearman similarity.
pub(crate) fn rank_columns(a: &Array2<f64>) -> Array2<f64> {
    let mut ranked = Array2::zeros(a.dim());
    for (j, col) in a.columns().into_iter().enumerate() {
        let values = col.to_vec();
        let (ranks, _) = average_ranks(&values);
        for (i, rank) in ranks.into_iter().enumerate() {
            ranked[[i, j]] = rank;
        }
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn expression() -> Array2<f64> {
        array![
            [1.0, 4.0, 2.5],
            [2.0, 3.0, 1.0],
            [3.0, 2.5, 4.0],
            [4.0, 1.0, 3.5],
            [5.0, 0.5, 5.0],
        ]
    }

    #[test]
    fn test_pearson_self_is_symmetric_with_unit_diagonal() {
        let expr = expression();
        let corr = pearson_correlation(&expr, &expr).unwrap();
        for i in 0..3 {
            assert_relative_eq!(corr[[i, i]], 1.0, epsilon = 1e-12);
            for j in 0..3 {
                assert_relative_eq!(corr[[i, j]], corr[[j, i]], epsilon = 1e-12);
                assert!(corr[[i, j]].abs() <= 1.0 + 1e-12);
            }
        }
    }

    #[test]
    fn test_pearson_rejects_mismatched_sample_counts() {
        let x = expression();
        let y = array![[1.0, 2.0], [2.0, 1.0]];
        let err = pearson_correlation(&x, &y).unwrap_err();
        assert!(matches!(
            err,
            ExprSimError::DimensionMismatch { left: 5, right: 2 }
        ));
    }

    #[test]
    fn test_pearson_zero_variance_column_propagates_nan() {
        let x = array![[1.0, 7.0], [2.0, 7.0], [3.0, 7.0]];
        let corr = pearson_correlation(&x, &x).unwrap();
        assert_relative_eq!(corr[[0, 0]], 1.0, epsilon = 1e-12);
        assert!(corr[[0, 1]].is_nan());
        assert!(corr[[1, 1]].is_nan());
    }

    #[test]
    fn test_cosine_similarity() {
        assert_relative_eq!(cosine_similarity(&[1.0, 2.0], &[2.0, 4.0]), 1.0);
        assert_relative_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).is_nan());
    }

    #[test]
    fn test_upper_diag_scan_order() {
        let m = array![[0.0, 1.0, 2.0], [9.0, 0.0, 3.0], [9.0, 9.0, 0.0]];
        assert_eq!(upper_diag_list(&m), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_upper_diag_length() {
        let n = 5;
        let m = Array2::<f64>::zeros((n, n));
        assert_eq!(upper_diag_list(&m).len(), n * (n - 1) / 2);
    }

    #[test]
    fn test_correlations_list_length() {
        let expr = expression();
        let corrs = correlations_list(&expr, &expr, GeneSimilarity::Pearson).unwrap();
        assert_eq!(corrs.len(), 3);
    }

    #[test]
    fn test_pearson_scalar_linear() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let up = [2.0, 4.0, 6.0, 8.0];
        let down = [8.0, 6.0, 4.0, 2.0];
        assert_relative_eq!(pearson_scalar(&x, &up), 1.0, epsilon = 1e-12);
        assert_relative_eq!(pearson_scalar(&x, &down), -1.0, epsilon = 1e-12);
    }
}
