//! # Flat bitmaps
//!
//! The only exchange format of the core. Encoding to and decoding from image files is left to the
//! caller, who hands over or receives a [`Bitmap`].

use crate::layer::{Extent, Layer, BYTES_PER_PIXEL};

/// Tightly packed, row-major 8-bit image data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    pub extent: Extent,
    /// Interleaved channels per pixel. Only RGBA (4) is accepted on import.
    pub channels: u8,
    pub data: Vec<u8>,
}
impl Bitmap {
    /// Copy a layer's pixels out as RGBA.
    #[must_use]
    pub fn from_layer(layer: &Layer) -> Self {
        Self {
            extent: layer.extent(),
            channels: BYTES_PER_PIXEL as u8,
            data: layer.pixels().to_vec(),
        }
    }
    /// Check that this bitmap can be loaded verbatim into a buffer of size `extent`.
    ///
    /// # Errors
    /// If the dimensions, channel count, or data length differ. No conversion is attempted.
    pub fn validate_for(&self, extent: Extent) -> Result<(), ImportError> {
        if self.extent != extent {
            return Err(ImportError::Dimensions {
                expected: extent,
                found: self.extent,
            });
        }
        if usize::from(self.channels) != BYTES_PER_PIXEL {
            return Err(ImportError::Channels(self.channels));
        }
        if self.data.len() != extent.byte_count() {
            return Err(ImportError::Length {
                expected: extent.byte_count(),
                found: self.data.len(),
            });
        }
        Ok(())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error(
        "bitmap is {}x{}, canvas is {}x{}",
        .found.width, .found.height, .expected.width, .expected.height
    )]
    Dimensions { expected: Extent, found: Extent },
    #[error("expected 4 channels (RGBA), found {0}")]
    Channels(u8),
    #[error("expected {expected} bytes of pixel data, found {found}")]
    Length { expected: usize, found: usize },
}

#[cfg(test)]
mod test {
    use super::{Bitmap, ImportError};
    use crate::layer::{Extent, Layer};
    #[test]
    fn validate() {
        let extent = Extent::new(3, 2);
        let good = Bitmap::from_layer(&Layer::new("l", extent));
        assert_eq!(good.validate_for(extent), Ok(()));

        assert!(matches!(
            good.validate_for(Extent::new(2, 3)),
            Err(ImportError::Dimensions { .. })
        ));

        let rgb = Bitmap {
            channels: 3,
            data: vec![0; 3 * 2 * 3],
            ..good.clone()
        };
        assert_eq!(rgb.validate_for(extent), Err(ImportError::Channels(3)));

        let short = Bitmap {
            data: vec![0; 5],
            ..good
        };
        assert!(matches!(
            short.validate_for(extent),
            Err(ImportError::Length { found: 5, .. })
        ));
    }
}
