use crate::error::ClusterError;

/// Squared Euclidean distance between two feature vectors of equal length.
#[inline]
pub fn distance_sq(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Per-centroid running sums and member counts for one assignment pass.
///
/// Sums are kept in f64 so that means over large images stay exact for 8-bit
/// input (255 * 2^44 pixels before precision is lost).
#[derive(Debug, Clone)]
pub struct Accumulator {
    sums: Vec<f64>,
    counts: Vec<u64>,
    dim: usize,
}

impl Accumulator {
    pub fn new(k: usize, dim: usize) -> Result<Self, ClusterError> {
        let mut sums = Vec::new();
        sums.try_reserve_exact(k * dim)
            .map_err(ClusterError::alloc("centroid accumulators"))?;
        sums.resize(k * dim, 0.0);

        let mut counts = Vec::new();
        counts
            .try_reserve_exact(k)
            .map_err(ClusterError::alloc("centroid accumulators"))?;
        counts.resize(k, 0);

        Ok(Self { sums, counts, dim })
    }

    /// Add `point` to the running total of `cluster`.
    #[inline]
    pub fn add(&mut self, cluster: usize, point: &[f64]) {
        let start = cluster * self.dim;
        for (s, &v) in self.sums[start..start + self.dim].iter_mut().zip(point) {
            *s += v;
        }
        self.counts[cluster] += 1;
    }

    #[cfg(test)]
    fn count(&self, cluster: usize) -> u64 {
        self.counts[cluster]
    }

    /// Write the mean of `cluster` into `out`. Returns false (leaving `out`
    /// untouched) when no point was assigned to it.
    pub fn mean_into(&self, cluster: usize, out: &mut [f64]) -> bool {
        let n = self.counts[cluster];
        if n == 0 {
            return false;
        }
        let n = n as f64;
        let start = cluster * self.dim;
        for (o, &s) in out.iter_mut().zip(&self.sums[start..start + self.dim]) {
            *o = s / n;
        }
        true
    }

    /// Number of clusters with no members.
    pub fn empty_clusters(&self) -> usize {
        self.counts.iter().filter(|&&c| c == 0).count()
    }

    pub fn reset(&mut self) {
        self.sums.fill(0.0);
        self.counts.fill(0);
    }
}
