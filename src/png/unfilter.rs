use super::*;

/// The per-row byte filters of PNG filter method 0.
///
/// Each filter predicts a byte from its neighbors and stores the difference
/// (mod 256). The neighbors are:
/// * `a`: the byte one pixel to the left (0 off the left edge).
/// * `b`: the byte directly above (0 on the first row).
/// * `c`: the byte above and one pixel left (0 off either edge).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum FilterType {
  #[default]
  None = 0,
  Sub = 1,
  Up = 2,
  Average = 3,
  Paeth = 4,
}
impl TryFrom<u8> for FilterType {
  /// The invalid filter byte.
  type Error = u8;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => Self::None,
      1 => Self::Sub,
      2 => Self::Up,
      3 => Self::Average,
      4 => Self::Paeth,
      other => return Err(other),
    })
  }
}
impl FilterType {
  /// All filter types, in numeric order.
  pub const ALL: [Self; 5] = [Self::None, Self::Sub, Self::Up, Self::Average, Self::Paeth];
}

#[inline]
#[must_use]
pub const fn paeth_predict(a: u8, b: u8, c: u8) -> u8 {
  let a_ = a as i32;
  let b_ = b as i32;
  let c_ = c as i32;
  let p: i32 = a_ + b_ - c_;
  let pa = (p - a_).abs();
  let pb = (p - b_).abs();
  let pc = (p - c_).abs();
  // Note: ties must go to `a`, then `b`, then `c`. Don't reorder these tests.
  if pa <= pb && pa <= pc {
    a
  } else if pb <= pc {
    b
  } else {
    c
  }
}

#[inline]
#[must_use]
fn average_predict(a: u8, b: u8) -> u8 {
  ((u16::from(a) + u16::from(b)) / 2) as u8
}

/// Reverses a filter on one row, in place.
///
/// * `bpp` is the bytes per complete pixel (at least 1).
/// * `prev` is the previous *already unfiltered* row, or all zeros for the
///   first row. It must be the same length as `row`.
pub fn unfilter_row(filter: FilterType, bpp: usize, prev: &[u8], row: &mut [u8]) {
  debug_assert_eq!(prev.len(), row.len());
  match filter {
    FilterType::None => (),
    FilterType::Sub => {
      for i in bpp..row.len() {
        row[i] = row[i].wrapping_add(row[i - bpp]);
      }
    }
    FilterType::Up => {
      row.iter_mut().zip(prev.iter().copied()).for_each(|(x, b)| *x = x.wrapping_add(b));
    }
    FilterType::Average => {
      for i in 0..row.len() {
        let a = if i >= bpp { row[i - bpp] } else { 0 };
        row[i] = row[i].wrapping_add(average_predict(a, prev[i]));
      }
    }
    FilterType::Paeth => {
      for i in 0..row.len() {
        let (a, c) = if i >= bpp { (row[i - bpp], prev[i - bpp]) } else { (0, 0) };
        row[i] = row[i].wrapping_add(paeth_predict(a, prev[i], c));
      }
    }
  }
}

/// Applies a filter to one row, writing the filtered bytes to `out`.
///
/// `prev` is the previous *unfiltered* row (zeros for the first row). This is
/// the exact inverse of [`unfilter_row`].
pub fn filter_row(filter: FilterType, bpp: usize, prev: &[u8], row: &[u8], out: &mut [u8]) {
  debug_assert_eq!(prev.len(), row.len());
  debug_assert_eq!(out.len(), row.len());
  for i in 0..row.len() {
    let a = if i >= bpp { row[i - bpp] } else { 0 };
    let b = prev[i];
    let c = if i >= bpp { prev[i - bpp] } else { 0 };
    let predicted = match filter {
      FilterType::None => 0,
      FilterType::Sub => a,
      FilterType::Up => b,
      FilterType::Average => average_predict(a, b),
      FilterType::Paeth => paeth_predict(a, b, c),
    };
    out[i] = row[i].wrapping_sub(predicted);
  }
}

/// Unfilters all the decompressed image data in place.
///
/// Each filter byte is reset to 0 ("no filter") as its row is processed, so
/// the buffer is still a valid (unfiltered) PNG datastream afterwards.
///
/// ## Failure
/// * The buffer is allowed to be longer than the header requires, extra bytes
///   are ignored. If it's too short you get an error before any work is done.
/// * An unknown filter byte stops the process with an error.
pub fn unfilter_decompressed_data(ihdr: &IHDR, decompressed: &mut [u8]) -> PngResult<()> {
  let expected = ihdr.decompressed_len();
  if decompressed.len() < expected {
    return Err(PngError::NotEnoughImageData { expected, actual: decompressed.len() });
  }
  let bpp = ihdr.bytes_per_pixel();
  let zeroes: Vec<u8> = vec![0; ihdr.bytes_per_scanline()];
  let mut prev: &[u8] = &zeroes;
  // Rows depend on the previous *reconstructed* row, so this is sequential.
  for (y, line) in decompressed[..expected].chunks_exact_mut(ihdr.bytes_per_filterline()).enumerate()
  {
    let (f, pixels) = line.split_at_mut(1);
    let filter = FilterType::try_from(f[0])
      .map_err(|filter| PngError::IllegalFilterType { row: y as u32, filter })?;
    unfilter_row(filter, bpp, prev, pixels);
    f[0] = FilterType::None as u8;
    prev = pixels;
  }
  Ok(())
}

/// Filters unfiltered rows (no filter bytes) into PNG filterlines.
///
/// Every row gets the same `filter`. The output is ready for compression.
#[must_use]
pub fn filter_scanlines(ihdr: &IHDR, rows: &[u8], filter: FilterType) -> Vec<u8> {
  let bpp = ihdr.bytes_per_pixel();
  let scanline = ihdr.bytes_per_scanline();
  let mut out: Vec<u8> = vec![0; ihdr.decompressed_len()];
  let zeroes: Vec<u8> = vec![0; scanline];
  let mut prev: &[u8] = &zeroes;
  for (row, line) in rows.chunks_exact(scanline).zip(out.chunks_exact_mut(scanline + 1)) {
    let (f, filtered) = line.split_at_mut(1);
    f[0] = filter as u8;
    filter_row(filter, bpp, prev, row, filtered);
    prev = row;
  }
  out
}
