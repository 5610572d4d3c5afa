use std::collections::HashMap;

use ndarray::{Array2, Axis};

/// Maps each gene symbol to its column index in the expression matrix.
pub fn symbol_index(gene_symbols: &[String]) -> HashMap<&str, usize> {
    gene_symbols
        .iter()
        .enumerate()
        .map(|(i, symbol)| (symbol.as_str(), i))
        .collect()
}

/// Selects the given gene columns, preserving their order.
pub fn select_columns(expr: &Array2<f64>, indices: &[usize]) -> Array2<f64> {
    expr.select(Axis(1), indices)
}

/// Indices in `0..nb_genes` not contained in `indices`.
pub fn complement_indices(nb_genes: usize, indices: &[usize]) -> Vec<usize> {
    let mut member = vec![false; nb_genes];
    for &i in indices {
        member[i] = true;
    }
    (0..nb_genes).filter(|&i| !member[i]).collect()
}
