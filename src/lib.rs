#![forbid(unsafe_code)]

//! Lossy image compression by palette reduction.
//!
//! Every pixel is treated as a feature vector of channel values. A k-means
//! model (Lloyd's algorithm, fixed number of rounds) finds `k` representative
//! colors, and every pixel is replaced by its nearest one.
//!
//! [`compress`] takes any interleaved 8-bit buffer, [`compress_rgb`] takes
//! typed `rgb::RGB<u8>` pixels, and [`compress_image`] works on files.

pub mod classify;
pub mod dataset;
pub mod error;
pub mod image_io;
pub mod model;
pub mod pixels;
pub mod train;
pub mod vector;

pub use classify::{predict, predict_all};
pub use dataset::Dataset;
pub use error::ClusterError;
pub use image_io::{LoadedImage, load_image, save_image};
pub use model::{ClusterModel, InitMethod};
pub use pixels::{from_vectors, rgb_to_vectors, to_vectors};
pub use train::{FitReport, fit};

use std::path::Path;

use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Configuration for palette compression.
#[derive(Debug, Clone)]
pub struct CompressConfig {
    /// Number of representative colors (k). Must be at least 1.
    pub clusters: usize,
    /// Training rounds. Zero leaves the initial centroids in place.
    pub iterations: usize,
    /// How initial centroids are chosen.
    pub init: InitMethod,
    /// Seed for centroid initialization. If None, seeded from system entropy.
    pub seed: Option<u64>,
    /// Upper bound of every channel value.
    pub max_value: f64,
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self {
            clusters: 16,
            iterations: 10,
            init: InitMethod::SampleData,
            seed: None,
            max_value: 255.0,
        }
    }
}

impl CompressConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clusters(mut self, k: usize) -> Self {
        self.clusters = k;
        self
    }

    pub fn iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    pub fn init(mut self, init: InitMethod) -> Self {
        self.init = init;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn max_value(mut self, max: f64) -> Self {
        self.max_value = max;
        self
    }

    fn build_model(&self, dataset: &Dataset) -> Result<ClusterModel, ClusterError> {
        let dim = dataset.dim();
        match (self.init, self.seed) {
            (InitMethod::Uniform, Some(seed)) => {
                ClusterModel::create_seeded(self.clusters, dim, self.max_value, seed)
            }
            (InitMethod::Uniform, None) => ClusterModel::create(self.clusters, dim, self.max_value),
            (InitMethod::SampleData, Some(seed)) => {
                ClusterModel::from_dataset_seeded(self.clusters, dataset, self.max_value, seed)
            }
            (InitMethod::SampleData, None) => ClusterModel::from_dataset_with_rng(
                self.clusters,
                dataset,
                self.max_value,
                &mut StdRng::from_entropy(),
            ),
        }
    }
}

/// Compression result.
#[derive(Debug)]
pub struct CompressResult {
    pixels: Vec<u8>,
    labels: Vec<usize>,
    model: ClusterModel,
    report: FitReport,
}

impl CompressResult {
    /// Recolored, interleaved pixel buffer with the input's layout.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Centroid index assigned to each pixel.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// The trained model. Its centroids are the palette, possibly fractional.
    pub fn model(&self) -> &ClusterModel {
        &self.model
    }

    pub fn report(&self) -> FitReport {
        self.report
    }
}

/// Replace every point of `dataset` by its nearest centroid of `model` and
/// pack the result as 8-bit pixels. Also returns the per-pixel labels.
pub fn recolor(
    model: &ClusterModel,
    dataset: &Dataset,
    width: usize,
    height: usize,
) -> Result<(Vec<u8>, Vec<usize>), ClusterError> {
    let labels = predict_all(model, dataset)?;
    let palette: Vec<&[f64]> = model.centroids().collect();
    let pixels = from_vectors(
        labels.iter().map(|&i| palette[i]),
        width,
        height,
        model.dim(),
    )?;
    Ok((pixels, labels))
}

/// Compress an interleaved 8-bit pixel buffer in memory.
pub fn compress(
    buffer: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    config: &CompressConfig,
) -> Result<CompressResult, ClusterError> {
    let dataset = to_vectors(buffer, width, height, channels)?;
    compress_dataset(&dataset, width, height, config)
}

/// Compress typed RGB pixels in memory. The result's pixel buffer is
/// interleaved RGB.
pub fn compress_rgb(
    pixels: &[rgb::RGB<u8>],
    width: usize,
    height: usize,
    config: &CompressConfig,
) -> Result<CompressResult, ClusterError> {
    let dataset = rgb_to_vectors(pixels, width, height)?;
    compress_dataset(&dataset, width, height, config)
}

fn compress_dataset(
    dataset: &Dataset,
    width: usize,
    height: usize,
    config: &CompressConfig,
) -> Result<CompressResult, ClusterError> {
    // 1. Initial centroids
    let mut model = config.build_model(dataset)?;

    // 2. Lloyd refinement
    let report = fit(&mut model, dataset, config.iterations)?;

    // 3. Final assignment and recoloring
    let (pixels, labels) = recolor(&model, dataset, width, height)?;

    Ok(CompressResult {
        pixels,
        labels,
        model,
        report,
    })
}

/// Load `input`, compress it, and write the result to `output`.
pub fn compress_image(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &CompressConfig,
) -> Result<CompressResult, ClusterError> {
    let input = input.as_ref();
    let output = output.as_ref();

    let image = load_image(input)?;
    info!(
        "compressing {} ({}x{}) to {} colors over {} iterations",
        input.display(),
        image.width,
        image.height,
        config.clusters,
        config.iterations
    );

    let result = compress(
        &image.pixels,
        image.width,
        image.height,
        image.channels,
        config,
    )?;
    save_image(
        output,
        result.pixels(),
        image.width,
        image.height,
        image.channels,
    )?;

    info!(
        "wrote {} (final inertia {:.1}, {} empty clusters)",
        output.display(),
        result.report.inertia,
        result.report.empty_clusters
    );
    Ok(result)
}
