use itertools::izip;
use statrs::distribution::{ContinuousCDF, Normal};

/// One-based midranks of `values`, together with the tie-correction term
/// `sum(t^3 - t)` over the tied groups.
pub fn average_ranks(values: &[f64]) -> (Vec<f64>, f64) {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_unstable_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap());

    let mut ranks = vec![0.0; n];
    let mut tie_term = 0.0;
    let mut start = 0;
    while start < n {
        let mut end = start;
        while end + 1 < n && values[order[end + 1]] == values[order[start]] {
            end += 1;
        }
        let midrank = (start + end + 2) as f64 / 2.0;
        for k in start..=end {
            ranks[order[k]] = midrank;
        }
        let ties = (end - start + 1) as f64;
        tie_term += ties * ties * ties - ties;
        start = end + 1;
    }
    (ranks, tie_term)
}

/// Two-sided Mann-Whitney rank-sum p-value for the hypothesis that `x` and
/// `y` are drawn from the same distribution.
///
/// Asymptotic normal approximation with tie and continuity corrections.
/// Returns 1.0 when every observation is tied (zero rank variance).
pub fn mann_whitney_u(x: &[f64], y: &[f64]) -> f64 {
    let n1 = x.len() as f64;
    let n2 = y.len() as f64;
    let n = n1 + n2;

    let combined: Vec<f64> = x.iter().chain(y).copied().collect();
    let (ranks, tie_term) = average_ranks(&combined);
    let rank_sum_x: f64 = ranks[..x.len()].iter().sum();

    let u1 = rank_sum_x - n1 * (n1 + 1.0) / 2.0;
    let u2 = n1 * n2 - u1;
    let u = u1.max(u2);

    let mean = n1 * n2 / 2.0;
    let variance = n1 * n2 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));
    if variance <= 0.0 {
        return 1.0;
    }

    let z = (u - mean - 0.5) / variance.sqrt();
    let normal = Normal::new(0.0, 1.0).unwrap();
    (2.0 * (1.0 - normal.cdf(z))).min(1.0)
}

pub fn weighted_mean(x: &[f64], weights: &[f64]) -> f64 {
    let total: f64 = x.iter().zip(weights).map(|(v, w)| v * w).sum();
    total / weights.iter().sum::<f64>()
}

/// Pearson correlation of `x` and `y` under observation weights: weighted
/// covariance over the product of weighted standard deviations. NaN when
/// either weighted variance is zero.
pub fn weighted_pearson(x: &[f64], y: &[f64], weights: &[f64]) -> f64 {
    let weight_sum: f64 = weights.iter().sum();
    let mean_x = weighted_mean(x, weights);
    let mean_y = weighted_mean(y, weights);

    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut covar = 0.0;
    for (&a, &b, &w) in izip!(x, y, weights) {
        var_x += w * (a - mean_x).powi(2);
        var_y += w * (b - mean_y).powi(2);
        covar += w * (a - mean_x) * (b - mean_y);
    }
    var_x /= weight_sum;
    var_y /= weight_sum;
    covar /= weight_sum;

    covar / (var_x * var_y).sqrt()
}
