#![forbid(unsafe_code)]

//! Provides the heap-allocated pixel grid that decoding produces.

use alloc::vec::Vec;

use pixel_formats::r8g8b8a8_Srgb;

/// Converts an `(x,y)` position within a given `width` 2D space into a linear
/// index.
#[inline]
#[must_use]
pub const fn xy_width_to_index(x: u32, y: u32, width: u32) -> usize {
  (y as usize) * (width as usize) + (x as usize)
}

/// A `width` by `height` grid of pixels, stored row by row, top row first.
///
/// The dimensions can't change after creation, only the pixel values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PixelGrid<P = r8g8b8a8_Srgb> {
  width: u32,
  height: u32,
  pixels: Vec<P>,
}
impl<P: Clone + Default> PixelGrid<P> {
  /// A grid where every pixel is `P::default()`.
  #[inline]
  #[must_use]
  pub fn new(width: u32, height: u32) -> Self {
    let pixels = alloc::vec![P::default(); xy_width_to_index(0, height, width)];
    Self { width, height, pixels }
  }
}
impl<P> PixelGrid<P> {
  /// Wraps existing pixels, or gives `None` if the count doesn't match the
  /// dimensions.
  #[inline]
  #[must_use]
  pub fn from_pixels(width: u32, height: u32, pixels: Vec<P>) -> Option<Self> {
    if pixels.len() == xy_width_to_index(0, height, width) {
      Some(Self { width, height, pixels })
    } else {
      None
    }
  }

  #[inline]
  #[must_use]
  pub const fn width(&self) -> u32 {
    self.width
  }

  #[inline]
  #[must_use]
  pub const fn height(&self) -> u32 {
    self.height
  }

  /// All the pixels, row by row.
  #[inline]
  #[must_use]
  pub fn pixels(&self) -> &[P] {
    &self.pixels
  }

  /// Gets the pixel at the position, or `None` if the position is out of
  /// bounds.
  #[inline]
  #[must_use]
  pub fn get(&self, x: u32, y: u32) -> Option<&P> {
    if x < self.width && y < self.height {
      self.pixels.get(xy_width_to_index(x, y, self.width))
    } else {
      None
    }
  }

  /// Gets the pixel at the position, or `None` if the position is out of
  /// bounds.
  #[inline]
  #[must_use]
  pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut P> {
    if x < self.width && y < self.height {
      self.pixels.get_mut(xy_width_to_index(x, y, self.width))
    } else {
      None
    }
  }

  /// Sets the pixel at the position. Returns the old value, or gives the new
  /// value back as an error if the position is out of bounds.
  #[inline]
  pub fn set(&mut self, x: u32, y: u32, pixel: P) -> Result<P, P> {
    match self.get_mut(x, y) {
      Some(p) => Ok(core::mem::replace(p, pixel)),
      None => Err(pixel),
    }
  }

  /// Iterates the rows, top to bottom.
  #[inline]
  pub fn rows(&self) -> impl Iterator<Item = &[P]> + '_ {
    // chunks_exact panics on 0, and a 0 width grid has no rows anyway.
    self.pixels.chunks_exact((self.width as usize).max(1))
  }
}

#[test]
fn test_pixel_grid_get_set() {
  let mut grid: PixelGrid<u8> = PixelGrid::new(3, 2);
  assert_eq!(grid.pixels().len(), 6);
  assert_eq!(grid.set(2, 1, 9), Ok(0));
  assert_eq!(grid.get(2, 1), Some(&9));
  assert_eq!(grid.pixels()[5], 9);
  assert_eq!(grid.set(3, 0, 1), Err(1));
  assert_eq!(grid.get(0, 2), None);
  assert_eq!(grid.rows().count(), 2);
  assert!(PixelGrid::from_pixels(2, 2, alloc::vec![0_u8; 3]).is_none());
}
