use std::fmt;

/// Per-TF activation rates, aligned with per-TF weights (measured-target
/// counts) and TF symbols, in the regulatory map's iteration order.
#[derive(Debug, Clone, Default)]
pub struct ChipRates {
    pub tfs: Vec<String>,
    pub rates: Vec<f64>,
    pub weights: Vec<f64>,
}

impl ChipRates {
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// The six comparison coefficients between two expression datasets, in the
/// order `(S_dist, S_dend, S_sdcc, S_tftg, S_tgtg, S_tfac)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreVector {
    /// Agreement between the raw gene-distance vectors of the two datasets.
    pub s_dist: f64,
    /// Agreement between the two dendrograms' cophenetic distances.
    pub s_dend: f64,
    /// Squared difference of the two within-dataset cophenetic correlations:
    /// how differently well the two dendrograms summarize their own data.
    pub s_sdcc: f64,
    /// Weighted mean cosine similarity of per-TF TF-TG correlation vectors.
    pub s_tftg: f64,
    /// Weighted mean cosine similarity of per-TF TG-TG correlation vectors.
    pub s_tgtg: f64,
    /// Weighted correlation of the two datasets' TF chip rates.
    pub s_tfac: f64,
}

impl ScoreVector {
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.s_dist,
            self.s_dend,
            self.s_sdcc,
            self.s_tftg,
            self.s_tgtg,
            self.s_tfac,
        ]
    }
}

impl fmt::Display for ScoreVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "S_dist\tS_dend\tS_sdcc\tS_tftg\tS_tgtg\tS_tfac")?;
        write!(
            f,
            "{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}",
            self.s_dist, self.s_dend, self.s_sdcc, self.s_tftg, self.s_tgtg, self.s_tfac
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_vector_ordering() {
        let scores = ScoreVector {
            s_dist: 1.0,
            s_dend: 2.0,
            s_sdcc: 3.0,
            s_tftg: 4.0,
            s_tgtg: 5.0,
            s_tfac: 6.0,
        };
        assert_eq!(scores.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }
}
