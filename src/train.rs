use log::{debug, trace};

use crate::classify::nearest;
use crate::dataset::Dataset;
use crate::error::ClusterError;
use crate::model::{ClusterModel, check_bounds};
use crate::vector::Accumulator;

/// Summary of a training run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FitReport {
    /// Rounds performed. Always equal to the requested iteration count.
    pub rounds: usize,
    /// Sum of squared distances from each point to its assigned centroid,
    /// measured during the last assignment pass (before its update step).
    pub inertia: f64,
    /// Clusters that received no points in the last round.
    pub empty_clusters: usize,
}

/// Refine `model` against `dataset` with exactly `iterations` rounds of
/// Lloyd's algorithm.
///
/// Each round assigns every point to its nearest centroid, then moves each
/// centroid to the mean of its members. A centroid with no members keeps its
/// previous value. There is no convergence test: the iteration count alone
/// decides how much work is done.
///
/// Fails without touching the model when the dataset's dimensionality differs
/// from the model's or any value lies outside `[0, model.max_value()]`.
pub fn fit(
    model: &mut ClusterModel,
    dataset: &Dataset,
    iterations: usize,
) -> Result<FitReport, ClusterError> {
    if dataset.dim() != model.dim() {
        return Err(ClusterError::DimensionMismatch {
            expected: model.dim(),
            actual: dataset.dim(),
        });
    }
    check_bounds(dataset.as_flat(), model.max_value())?;

    let mut report = FitReport::default();
    if iterations == 0 {
        return Ok(report);
    }

    let k = model.k();
    let max = model.max_value();
    let mut acc = Accumulator::new(k, model.dim())?;

    for round in 0..iterations {
        acc.reset();

        // Assignment: centroids are read-only for the whole pass.
        let mut inertia = 0.0;
        for point in dataset.iter() {
            let (cluster, dist) = nearest(model, point);
            acc.add(cluster, point);
            inertia += dist;
        }

        // Update
        for cluster in 0..k {
            let centroid = model.centroid_mut(cluster);
            if acc.mean_into(cluster, centroid) {
                // A mean of in-range values is in range; clamp absorbs rounding.
                for v in centroid.iter_mut() {
                    *v = (*v).clamp(0.0, max);
                }
            }
        }

        report.rounds = round + 1;
        report.inertia = inertia;
        report.empty_clusters = acc.empty_clusters();
        trace!(
            "round {}/{}: inertia {:.3}, {} empty clusters",
            round + 1,
            iterations,
            inertia,
            report.empty_clusters
        );
    }

    debug!(
        "fit {} points into {} clusters over {} rounds, final inertia {:.3}",
        dataset.len(),
        k,
        report.rounds,
        report.inertia
    );

    Ok(report)
}

impl ClusterModel {
    /// See [`fit`].
    pub fn fit(&mut self, dataset: &Dataset, iterations: usize) -> Result<FitReport, ClusterError> {
        fit(self, dataset, iterations)
    }
}
