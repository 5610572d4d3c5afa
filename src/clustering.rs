use derive_new::new;
use itertools::Itertools;
use ndarray::{Array2, Axis};

use crate::{
    config::GeneSimilarity,
    correlation::{correlations_list, pearson_correlation, pearson_scalar, upper_diag_list},
    error::Result,
};

/// One agglomeration step. `left` and `right` reference either original
/// leaves (`0..n`) or the node created by an earlier step (`n + step`), so
/// ids strictly increase in creation order.
#[derive(Debug, Clone, Copy, PartialEq, new)]
pub struct LinkageRecord {
    pub left: usize,
    pub right: usize,
    pub distance: f64,
    pub size: usize,
}

/// Complete-linkage merge sequence over `nb_leaves` genes: exactly
/// `nb_leaves - 1` records.
#[derive(Debug, Clone)]
pub struct Linkage {
    records: Vec<LinkageRecord>,
    nb_leaves: usize,
}

impl Linkage {
    pub fn records(&self) -> &[LinkageRecord] {
        &self.records
    }

    pub fn nb_leaves(&self) -> usize {
        self.nb_leaves
    }
}

/// A merge-tree node: leaves carry a single gene index, internal nodes own
/// the concatenated indices of their left then right child. Immutable once
/// built.
#[derive(Debug, Clone)]
pub struct ClusterNode {
    left: Option<usize>,
    right: Option<usize>,
    indices: Vec<usize>,
}

impl ClusterNode {
    /// Member gene indices, left subtree before right.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn children(&self) -> Option<(usize, usize)> {
        self.left.zip(self.right)
    }
}

/// Arena of cluster nodes indexed by merge id: `0..n` are the leaves,
/// `n + i` is the node created by merge step `i`.
#[derive(Debug, Clone)]
pub struct Dendrogram {
    nodes: Vec<ClusterNode>,
}

impl Dendrogram {
    pub fn from_linkage(linkage: &Linkage) -> Self {
        let nb_leaves = linkage.nb_leaves();
        let mut nodes: Vec<ClusterNode> = (0..nb_leaves)
            .map(|i| ClusterNode {
                left: None,
                right: None,
                indices: vec![i],
            })
            .collect();
        for record in linkage.records() {
            let mut indices = Vec::with_capacity(record.size);
            indices.extend_from_slice(nodes[record.left].indices());
            indices.extend_from_slice(nodes[record.right].indices());
            nodes.push(ClusterNode {
                left: Some(record.left),
                right: Some(record.right),
                indices,
            });
        }
        Self { nodes }
    }

    pub fn node(&self, id: usize) -> &ClusterNode {
        &self.nodes[id]
    }
}

/// Clusters genes by complete-linkage agglomeration over `1 - similarity`
/// distances.
pub fn hierarchical_clustering(
    data: &Array2<f64>,
    similarity: GeneSimilarity,
) -> Result<Linkage> {
    let corrs = correlations_list(data, data, similarity)?;
    let dists: Vec<f64> = corrs.iter().map(|c| 1.0 - c).collect();
    Ok(complete_linkage(&dists, data.ncols()))
}

/// Complete-linkage agglomeration over a condensed distance vector: at each
/// step the pair of clusters with minimum distance is merged, and the
/// distance from the merged cluster to any other is the maximum of its
/// children's distances.
pub fn complete_linkage(condensed: &[f64], nb_leaves: usize) -> Linkage {
    assert_eq!(condensed.len(), nb_leaves * (nb_leaves - 1) / 2);

    let total = 2 * nb_leaves - 1;
    let mut dist = vec![vec![f64::INFINITY; total]; total];
    for ((i, j), &d) in (0..nb_leaves).tuple_combinations().zip(condensed) {
        dist[i][j] = d;
        dist[j][i] = d;
    }

    let mut active: Vec<usize> = (0..nb_leaves).collect();
    let mut size = vec![1usize; total];
    let mut records = Vec::with_capacity(nb_leaves - 1);
    for step in 0..nb_leaves - 1 {
        let (mut best_left, mut best_right, mut best_dist) = (active[0], active[1], f64::INFINITY);
        for (&a, &b) in active.iter().tuple_combinations() {
            if dist[a][b] < best_dist {
                best_left = a;
                best_right = b;
                best_dist = dist[a][b];
            }
        }

        let merged = nb_leaves + step;
        size[merged] = size[best_left] + size[best_right];
        records.push(LinkageRecord::new(best_left, best_right, best_dist, size[merged]));

        for &k in &active {
            if k == best_left || k == best_right {
                continue;
            }
            let d = dist[best_left][k].max(dist[best_right][k]);
            dist[merged][k] = d;
            dist[k][merged] = d;
        }
        active.retain(|&k| k != best_left && k != best_right);
        active.push(merged);
    }

    Linkage { records, nb_leaves }
}

/// Cophenetic distance matrix: for each pair of genes, the merge distance of
/// the step that first placed them in the same cluster.
pub fn dendrogram_distance(linkage: &Linkage) -> Array2<f64> {
    let dendrogram = Dendrogram::from_linkage(linkage);
    let mut m = Array2::zeros((linkage.nb_leaves(), linkage.nb_leaves()));
    for record in linkage.records() {
        for &i in dendrogram.node(record.left).indices() {
            for &j in dendrogram.node(record.right).indices() {
                m[[i, j]] = record.distance;
                m[[j, i]] = record.distance;
            }
        }
    }
    m
}

/// Condensed form of [`dendrogram_distance`], aligned with the condensed
/// form of the raw distance matrix over the same gene ordering.
pub fn dendrogram_distance_condensed(linkage: &Linkage) -> Vec<f64> {
    upper_diag_list(&dendrogram_distance(linkage))
}

/// Cophenetic correlation: agreement between a raw condensed distance vector
/// and the dendrogram distances it produced.
pub fn cophenetic_correlation(linkage: &Linkage, dists: &[f64]) -> f64 {
    pearson_scalar(&dendrogram_distance_condensed(linkage), dists)
}

/// Structural agreement between two dendrograms built over the same gene
/// ordering: the correlation of their cophenetic distance vectors.
pub fn compare_cophenetic(linkage_1: &Linkage, linkage_2: &Linkage) -> f64 {
    pearson_scalar(
        &dendrogram_distance_condensed(linkage_1),
        &dendrogram_distance_condensed(linkage_2),
    )
}

/// Silhouette score of each merge step's two-way split, in merge order.
///
/// Each internal node partitions its member genes into its two children;
/// the silhouette is evaluated under a `1 - Pearson` distance restricted to
/// those members. A node with exactly 2 members scores 0, silhouette being
/// undefined for singleton clusters.
pub fn compute_silhouette(data: &Array2<f64>, linkage: &Linkage) -> Result<Vec<f64>> {
    let dendrogram = Dendrogram::from_linkage(linkage);
    let mut scores = Vec::with_capacity(linkage.records().len());
    for (step, record) in linkage.records().iter().enumerate() {
        let node = dendrogram.node(linkage.nb_leaves() + step);
        if node.indices().len() == 2 {
            scores.push(0.0);
            continue;
        }
        let expr = data.select(Axis(1), node.indices());
        let corr = pearson_correlation(&expr, &expr)?;
        let dist = corr.mapv(|c| 1.0 - c);
        let nb_left = dendrogram.node(record.left).indices().len();
        scores.push(silhouette_two_way(&dist, nb_left));
    }
    Ok(scores)
}

/// Mean silhouette of a binary partition under a precomputed distance
/// matrix; rows `0..nb_left` form one cluster, the rest the other. Points in
/// a singleton cluster contribute 0.
fn silhouette_two_way(dist: &Array2<f64>, nb_left: usize) -> f64 {
    let n = dist.nrows();
    let mut total = 0.0;
    for i in 0..n {
        let (own, other) = if i < nb_left {
            (0..nb_left, nb_left..n)
        } else {
            (nb_left..n, 0..nb_left)
        };
        if own.len() == 1 {
            continue;
        }
        let within: f64 = own.clone().filter(|&j| j != i).map(|j| dist[[i, j]]).sum();
        let a = within / (own.len() - 1) as f64;
        let b = other.clone().map(|j| dist[[i, j]]).sum::<f64>() / other.len() as f64;
        total += (b - a) / a.max(b);
    }
    total / n as f64
}
