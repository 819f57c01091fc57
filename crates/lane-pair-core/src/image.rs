#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageViewError {
    #[error("grayscale buffer has {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}

/// Source of 0..=255 luminance values addressed by integer pixel position.
///
/// Coordinates use the geometry frame convention: `row` is `x`, `col` is `y`.
pub trait LuminanceSource {
    /// Intensity at (`row`, `col`), or `None` when outside the image.
    fn luminance(&self, row: i64, col: i64) -> Option<u8>;

    /// `(width, height)` when the source knows its extent.
    fn dimensions(&self) -> Option<(usize, usize)> {
        None
    }
}

impl<T: LuminanceSource + ?Sized> LuminanceSource for &T {
    fn luminance(&self, row: i64, col: i64) -> Option<u8> {
        (**self).luminance(row, col)
    }

    fn dimensions(&self) -> Option<(usize, usize)> {
        (**self).dimensions()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

impl<'a> GrayImageView<'a> {
    pub fn new(width: usize, height: usize, data: &'a [u8]) -> Result<Self, ImageViewError> {
        let expected = width * height;
        if data.len() != expected {
            return Err(ImageViewError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Mean intensity over the whole view; `None` for an empty view.
    pub fn mean(&self) -> Option<f64> {
        if self.data.is_empty() {
            return None;
        }
        let sum: u64 = self.data.iter().map(|&v| v as u64).sum();
        Some(sum as f64 / self.data.len() as f64)
    }
}

impl LuminanceSource for GrayImageView<'_> {
    #[inline]
    fn luminance(&self, row: i64, col: i64) -> Option<u8> {
        if row < 0 || col < 0 || row >= self.height as i64 || col >= self.width as i64 {
            return None;
        }
        self.data.get(row as usize * self.width + col as usize).copied()
    }

    fn dimensions(&self) -> Option<(usize, usize)> {
        Some((self.width, self.height))
    }
}

#[derive(Clone, Debug)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl GrayImage {
    /// Image filled with a single intensity.
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    pub fn view(&self) -> GrayImageView<'_> {
        GrayImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    /// Mutable pixel access in (`row`, `col`) order.
    pub fn pixel_mut(&mut self, row: usize, col: usize) -> Option<&mut u8> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.data.get_mut(row * self.width + col)
    }
}

impl LuminanceSource for GrayImage {
    fn luminance(&self, row: i64, col: i64) -> Option<u8> {
        self.view().luminance(row, col)
    }

    fn dimensions(&self) -> Option<(usize, usize)> {
        Some((self.width, self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_rejects_short_buffer() {
        let data = [0u8; 5];
        let err = GrayImageView::new(3, 2, &data).unwrap_err();
        assert_eq!(
            err,
            ImageViewError::BufferSize {
                expected: 6,
                actual: 5
            }
        );
    }

    #[test]
    fn luminance_is_row_major_and_bounded() {
        let data = [0u8, 1, 2, 3, 4, 5];
        let view = GrayImageView::new(3, 2, &data).unwrap();
        assert_eq!(view.luminance(0, 2), Some(2));
        assert_eq!(view.luminance(1, 0), Some(3));
        assert_eq!(view.luminance(2, 0), None);
        assert_eq!(view.luminance(0, 3), None);
        assert_eq!(view.luminance(-1, 0), None);
        assert_eq!(view.mean(), Some(2.5));
    }

    #[test]
    fn owned_image_writes_through_pixel_mut() {
        let mut img = GrayImage::filled(4, 3, 10);
        *img.pixel_mut(2, 3).unwrap() = 200;
        assert!(img.pixel_mut(3, 0).is_none());
        assert_eq!(img.luminance(2, 3), Some(200));
        assert_eq!(img.dimensions(), Some((4, 3)));
    }
}
