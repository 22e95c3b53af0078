use crate::error::ClusterError;

/// An ordered collection of feature vectors sharing one dimensionality.
///
/// All points live in a single contiguous buffer, so dropping the dataset
/// releases every row at once whatever path the caller leaves through.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    values: Vec<f64>,
    dim: usize,
}

impl Dataset {
    /// Create an empty dataset of dimensionality `dim`.
    pub fn new(dim: usize) -> Result<Self, ClusterError> {
        if dim == 0 {
            return Err(ClusterError::InvalidConfiguration(
                "dimensionality must be at least 1".into(),
            ));
        }
        Ok(Self {
            values: Vec::new(),
            dim,
        })
    }

    /// Create an empty dataset with room for `len` points, failing with
    /// `AllocationFailure` instead of aborting if the storage is unavailable.
    pub fn with_capacity(dim: usize, len: usize) -> Result<Self, ClusterError> {
        let mut dataset = Self::new(dim)?;
        let total = len.checked_mul(dim).ok_or_else(|| {
            ClusterError::InvalidConfiguration(format!(
                "{len} points of dimension {dim} overflow the address space"
            ))
        })?;
        dataset
            .values
            .try_reserve_exact(total)
            .map_err(ClusterError::alloc("feature vectors"))?;
        Ok(dataset)
    }

    /// Build a dataset from explicit rows. All rows must have the same length.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, ClusterError> {
        let dim = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut dataset = Self::with_capacity(dim, rows.len())?;
        for row in rows {
            dataset.push(row.as_ref())?;
        }
        Ok(dataset)
    }

    /// Append one point.
    pub fn push(&mut self, point: &[f64]) -> Result<(), ClusterError> {
        if point.len() != self.dim {
            return Err(ClusterError::DimensionMismatch {
                expected: self.dim,
                actual: point.len(),
            });
        }
        self.values
            .try_reserve(self.dim)
            .map_err(ClusterError::alloc("feature vectors"))?;
        self.values.extend_from_slice(point);
        Ok(())
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.values.len() / self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The point at `index`.
    pub fn point(&self, index: usize) -> Result<&[f64], ClusterError> {
        let len = self.len();
        if index >= len {
            return Err(ClusterError::IndexOutOfRange { index, len });
        }
        let start = index * self.dim;
        Ok(&self.values[start..start + self.dim])
    }

    /// Iterate over points in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.values.chunks_exact(self.dim)
    }

    /// All values, point after point.
    pub fn as_flat(&self) -> &[f64] {
        &self.values
    }

    pub(crate) fn extend_from_bytes(&mut self, bytes: &[u8]) {
        debug_assert_eq!(bytes.len() % self.dim, 0);
        self.values.extend(bytes.iter().map(|&b| b as f64));
    }
}
