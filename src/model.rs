use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::dataset::Dataset;
use crate::error::ClusterError;

/// How the initial centroids are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitMethod {
    /// Every channel of every centroid drawn uniformly from `[0, max_value]`.
    /// A draw can land nearest to several color groups at once and leave
    /// other clusters empty for the whole run.
    Uniform,
    /// Centroids sampled without replacement from the dataset's points.
    /// Falls back to uniform draws for the remainder when the dataset holds
    /// fewer than `k` points.
    #[default]
    SampleData,
}

/// A fixed set of `k` centroids of dimensionality `dim`, every value within
/// `[0, max_value]`.
///
/// Centroid indices are stable for the lifetime of the model; training moves
/// centroids but never adds or removes them.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterModel {
    centroids: Vec<f64>,
    k: usize,
    dim: usize,
    max_value: f64,
}

impl ClusterModel {
    /// Create a model with uniformly random centroids, seeded from system entropy.
    pub fn create(k: usize, dim: usize, max_value: f64) -> Result<Self, ClusterError> {
        Self::create_with_rng(k, dim, max_value, &mut StdRng::from_entropy())
    }

    /// Create a model with uniformly random centroids from a fixed seed.
    /// The same seed always produces the same centroids.
    pub fn create_seeded(
        k: usize,
        dim: usize,
        max_value: f64,
        seed: u64,
    ) -> Result<Self, ClusterError> {
        Self::create_with_rng(k, dim, max_value, &mut ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn create_with_rng<R: Rng + ?Sized>(
        k: usize,
        dim: usize,
        max_value: f64,
        rng: &mut R,
    ) -> Result<Self, ClusterError> {
        let mut model = Self::allocate(k, dim, max_value)?;
        let range = Uniform::new_inclusive(0.0, max_value);
        model
            .centroids
            .extend((0..k * dim).map(|_| range.sample(rng)));
        Ok(model)
    }

    /// Create a model whose centroids are distinct points of `dataset`.
    pub fn from_dataset_seeded(
        k: usize,
        dataset: &Dataset,
        max_value: f64,
        seed: u64,
    ) -> Result<Self, ClusterError> {
        Self::from_dataset_with_rng(k, dataset, max_value, &mut ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_dataset_with_rng<R: Rng + ?Sized>(
        k: usize,
        dataset: &Dataset,
        max_value: f64,
        rng: &mut R,
    ) -> Result<Self, ClusterError> {
        let dim = dataset.dim();
        let mut model = Self::allocate(k, dim, max_value)?;
        check_bounds(dataset.as_flat(), max_value)?;

        let picked = k.min(dataset.len());
        for index in rand::seq::index::sample(rng, dataset.len(), picked) {
            model.centroids.extend_from_slice(dataset.point(index)?);
        }

        let range = Uniform::new_inclusive(0.0, max_value);
        model
            .centroids
            .extend((0..(k - picked) * dim).map(|_| range.sample(rng)));
        Ok(model)
    }

    /// Build a model from explicit centroid vectors.
    pub fn from_centroids<R: AsRef<[f64]>>(
        rows: &[R],
        max_value: f64,
    ) -> Result<Self, ClusterError> {
        let dim = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut model = Self::allocate(rows.len(), dim, max_value)?;
        for row in rows {
            let row = row.as_ref();
            if row.len() != dim {
                return Err(ClusterError::DimensionMismatch {
                    expected: dim,
                    actual: row.len(),
                });
            }
            check_bounds(row, max_value)?;
            model.centroids.extend_from_slice(row);
        }
        Ok(model)
    }

    fn allocate(k: usize, dim: usize, max_value: f64) -> Result<Self, ClusterError> {
        if k == 0 {
            return Err(ClusterError::InvalidConfiguration(
                "number of clusters must be at least 1".into(),
            ));
        }
        if dim == 0 {
            return Err(ClusterError::InvalidConfiguration(
                "dimensionality must be at least 1".into(),
            ));
        }
        if !(max_value.is_finite() && max_value >= 0.0) {
            return Err(ClusterError::InvalidConfiguration(format!(
                "maximum value must be finite and non-negative, got {max_value}"
            )));
        }
        let total = k.checked_mul(dim).ok_or_else(|| {
            ClusterError::InvalidConfiguration(format!(
                "{k} centroids of dimension {dim} overflow the address space"
            ))
        })?;

        let mut centroids = Vec::new();
        centroids
            .try_reserve_exact(total)
            .map_err(ClusterError::alloc("centroids"))?;

        Ok(Self {
            centroids,
            k,
            dim,
            max_value,
        })
    }

    /// Number of clusters.
    pub fn k(&self) -> usize {
        self.k
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    /// The centroid at `index`.
    pub fn centroid(&self, index: usize) -> Result<&[f64], ClusterError> {
        if index >= self.k {
            return Err(ClusterError::IndexOutOfRange { index, len: self.k });
        }
        let start = index * self.dim;
        Ok(&self.centroids[start..start + self.dim])
    }

    /// Iterate over centroids in index order.
    pub fn centroids(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.centroids.chunks_exact(self.dim)
    }

    pub(crate) fn centroid_mut(&mut self, index: usize) -> &mut [f64] {
        let start = index * self.dim;
        &mut self.centroids[start..start + self.dim]
    }
}

pub(crate) fn check_bounds(values: &[f64], max: f64) -> Result<(), ClusterError> {
    match values.iter().find(|v| !(0.0..=max).contains(*v)) {
        Some(&value) => Err(ClusterError::ValueOutOfRange { value, max }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_clusters_rejected() {
        assert!(matches!(
            ClusterModel::create(0, 3, 255.0),
            Err(ClusterError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn zero_dimension_rejected() {
        assert!(matches!(
            ClusterModel::create(4, 0, 255.0),
            Err(ClusterError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn bad_max_value_rejected() {
        for max in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                ClusterModel::create(2, 3, max),
                Err(ClusterError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn uniform_init_respects_bounds() {
        let model = ClusterModel::create_seeded(64, 4, 255.0, 7).unwrap();
        assert_eq!(model.k(), 64);
        assert_eq!(model.dim(), 4);
        assert_eq!(model.centroids().len(), 64);
        for c in model.centroids() {
            assert_eq!(c.len(), 4);
            assert!(c.iter().all(|v| (0.0..=255.0).contains(v)));
        }
    }

    #[test]
    fn zero_max_value_gives_zero_centroids() {
        let model = ClusterModel::create_seeded(3, 2, 0.0, 1).unwrap();
        assert!(model.centroids().all(|c| c == [0.0, 0.0]));
    }

    #[test]
    fn same_seed_same_centroids() {
        let a = ClusterModel::create_seeded(8, 3, 255.0, 42).unwrap();
        let b = ClusterModel::create_seeded(8, 3, 255.0, 42).unwrap();
        let c = ClusterModel::create_seeded(8, 3, 255.0, 43).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn centroid_index_out_of_range() {
        let model = ClusterModel::create_seeded(2, 3, 255.0, 0).unwrap();
        assert!(model.centroid(1).is_ok());
        assert!(matches!(
            model.centroid(2),
            Err(ClusterError::IndexOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn sample_data_picks_distinct_points() {
        let ds = Dataset::from_rows(&[[0.0], [10.0], [20.0], [30.0]]).unwrap();
        let model = ClusterModel::from_dataset_seeded(4, &ds, 255.0, 3).unwrap();
        let mut picked: Vec<f64> = model.centroids().map(|c| c[0]).collect();
        picked.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(picked, vec![0.0, 10.0, 20.0, 30.0]);
    }

    #[test]
    fn sample_data_fills_remaining_uniformly() {
        let ds = Dataset::from_rows(&[[5.0, 5.0]]).unwrap();
        let model = ClusterModel::from_dataset_seeded(3, &ds, 10.0, 9).unwrap();
        assert_eq!(model.k(), 3);
        assert_eq!(model.centroid(0).unwrap(), &[5.0, 5.0]);
        for c in model.centroids() {
            assert!(c.iter().all(|v| (0.0..=10.0).contains(v)));
        }
    }

    #[test]
    fn sample_data_rejects_out_of_bound_points() {
        let ds = Dataset::from_rows(&[[5.0], [300.0]]).unwrap();
        assert!(matches!(
            ClusterModel::from_dataset_seeded(1, &ds, 255.0, 0),
            Err(ClusterError::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn from_centroids_validates_rows() {
        let model = ClusterModel::from_centroids(&[[1.0, 2.0], [3.0, 4.0]], 255.0).unwrap();
        assert_eq!(model.centroid(1).unwrap(), &[3.0, 4.0]);

        let ragged = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(matches!(
            ClusterModel::from_centroids(&ragged, 255.0),
            Err(ClusterError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            ClusterModel::from_centroids(&[[-1.0]], 255.0),
            Err(ClusterError::ValueOutOfRange { .. })
        ));
        let empty: [[f64; 1]; 0] = [];
        assert!(matches!(
            ClusterModel::from_centroids(&empty, 255.0),
            Err(ClusterError::InvalidConfiguration(_))
        ));
    }
}
