use crate::dataset::Dataset;
use crate::error::ClusterError;
use crate::model::ClusterModel;
use crate::vector::distance_sq;

/// Find the index of the centroid nearest to `point` (squared Euclidean).
///
/// Exact ties go to the lowest index, so the result is deterministic for a
/// given model and point.
pub fn predict(model: &ClusterModel, point: &[f64]) -> Result<usize, ClusterError> {
    if point.len() != model.dim() {
        return Err(ClusterError::DimensionMismatch {
            expected: model.dim(),
            actual: point.len(),
        });
    }
    Ok(nearest(model, point).0)
}

/// Nearest centroid index and its squared distance. `point` must already
/// have the model's dimensionality.
pub(crate) fn nearest(model: &ClusterModel, point: &[f64]) -> (usize, f64) {
    let mut best_idx = 0;
    let mut best_dist = f64::INFINITY;

    for (i, centroid) in model.centroids().enumerate() {
        let d = distance_sq(point, centroid);
        if d < best_dist {
            best_dist = d;
            best_idx = i;
        }
    }

    (best_idx, best_dist)
}

/// Label every point of `dataset` with its nearest centroid.
pub fn predict_all(model: &ClusterModel, dataset: &Dataset) -> Result<Vec<usize>, ClusterError> {
    if dataset.dim() != model.dim() {
        return Err(ClusterError::DimensionMismatch {
            expected: model.dim(),
            actual: dataset.dim(),
        });
    }
    let mut labels = Vec::new();
    labels
        .try_reserve_exact(dataset.len())
        .map_err(ClusterError::alloc("labels"))?;
    labels.extend(dataset.iter().map(|p| nearest(model, p).0));
    Ok(labels)
}

impl ClusterModel {
    /// See [`predict`].
    pub fn predict(&self, point: &[f64]) -> Result<usize, ClusterError> {
        predict(self, point)
    }
}
