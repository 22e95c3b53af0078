//! Conversion between interleaved 8-bit pixel buffers and feature vectors.

use rgb::ComponentBytes;

use crate::dataset::Dataset;
use crate::error::ClusterError;

fn expected_len(width: usize, height: usize, channels: usize) -> Result<usize, ClusterError> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or_else(|| {
            ClusterError::InvalidConfiguration(format!(
                "{width}x{height}x{channels} image overflows the address space"
            ))
        })
}

/// Split an interleaved buffer into one feature vector per pixel, each
/// channel value cast to `f64`.
pub fn to_vectors(
    buffer: &[u8],
    width: usize,
    height: usize,
    channels: usize,
) -> Result<Dataset, ClusterError> {
    let expected = expected_len(width, height, channels)?;
    if buffer.len() != expected {
        return Err(ClusterError::BufferLength {
            len: buffer.len(),
            expected,
        });
    }

    let mut dataset = Dataset::with_capacity(channels, width * height)?;
    dataset.extend_from_bytes(buffer);
    Ok(dataset)
}

/// [`to_vectors`] for typed RGB pixels.
pub fn rgb_to_vectors(
    pixels: &[rgb::RGB<u8>],
    width: usize,
    height: usize,
) -> Result<Dataset, ClusterError> {
    to_vectors(pixels.as_bytes(), width, height, 3)
}

/// Pack feature vectors back into an interleaved 8-bit buffer.
///
/// Values are truncated towards zero, not rounded: 127.9 becomes 127.
pub fn from_vectors<'a, I>(
    vectors: I,
    width: usize,
    height: usize,
    channels: usize,
) -> Result<Vec<u8>, ClusterError>
where
    I: IntoIterator<Item = &'a [f64]>,
{
    let expected = expected_len(width, height, channels)?;
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(expected)
        .map_err(ClusterError::alloc("image buffer"))?;

    for vector in vectors {
        if vector.len() != channels {
            return Err(ClusterError::DimensionMismatch {
                expected: channels,
                actual: vector.len(),
            });
        }
        buffer.extend(vector.iter().map(|&v| v.clamp(0.0, 255.0) as u8));
    }

    if buffer.len() != expected {
        return Err(ClusterError::BufferLength {
            len: buffer.len(),
            expected,
        });
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_is_identity() {
        let buffer: Vec<u8> = (0..=255u8).chain((0..=255u8).rev()).collect();
        // 512 bytes = 8x16 pixels of 4 channels
        let ds = to_vectors(&buffer, 8, 16, 4).unwrap();
        assert_eq!(ds.len(), 128);
        assert_eq!(ds.dim(), 4);
        let back = from_vectors(ds.iter(), 8, 16, 4).unwrap();
        assert_eq!(back, buffer);
    }

    #[test]
    fn values_are_cast_per_channel() {
        let ds = to_vectors(&[1, 2, 3, 4, 5, 6], 2, 1, 3).unwrap();
        assert_eq!(ds.point(0).unwrap(), &[1.0, 2.0, 3.0]);
        assert_eq!(ds.point(1).unwrap(), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn fractional_values_truncate() {
        let rows = [[127.5, 0.99, 254.999]];
        let out = from_vectors(rows.iter().map(|r| &r[..]), 1, 1, 3).unwrap();
        assert_eq!(out, vec![127, 0, 254]);
    }

    #[test]
    fn wrong_buffer_length() {
        assert!(matches!(
            to_vectors(&[0; 11], 2, 2, 3),
            Err(ClusterError::BufferLength {
                len: 11,
                expected: 12
            })
        ));
    }

    #[test]
    fn zero_channels_rejected() {
        assert!(matches!(
            to_vectors(&[], 2, 2, 0),
            Err(ClusterError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn from_vectors_checks_shape() {
        let rows = [[1.0, 2.0]];
        assert!(matches!(
            from_vectors(rows.iter().map(|r| &r[..]), 1, 1, 3),
            Err(ClusterError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
        let rows = [[1.0, 2.0, 3.0]];
        assert!(matches!(
            from_vectors(rows.iter().map(|r| &r[..]), 2, 1, 3),
            Err(ClusterError::BufferLength {
                len: 3,
                expected: 6
            })
        ));
    }

    #[test]
    fn rgb_pixels_convert() {
        let pixels = vec![
            rgb::RGB { r: 10, g: 20, b: 30 },
            rgb::RGB {
                r: 255,
                g: 0,
                b: 128,
            },
        ];
        let ds = rgb_to_vectors(&pixels, 2, 1).unwrap();
        assert_eq!(ds.point(1).unwrap(), &[255.0, 0.0, 128.0]);
    }
}
