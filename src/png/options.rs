use super::*;

/// What to do when a chunk's declared CRC is wrong.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CrcMode {
  /// Reject the whole PNG with [`PngError::ChecksumMismatch`].
  #[default]
  Strict,
  /// Log a warning and keep going.
  Lenient,
}

/// Settings for reading and writing PNG data.
///
/// ```
/// use pngkit::png::*;
/// let opts = PngOptions::default().with_crc_mode(CrcMode::Lenient).with_idat_chunk_len(1024);
/// assert_eq!(opts.idat_chunk_len, 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PngOptions {
  /// How CRC mismatches are handled during a read.
  pub crc_mode: CrcMode,
  /// The most data bytes any single `IDAT` chunk will get when encoding.
  pub idat_chunk_len: usize,
  /// The zlib compression level, `0..=10`.
  pub compression_level: u8,
  /// The filter used on every row when encoding.
  pub encode_filter: FilterType,
  /// Widest image that will be decoded.
  pub max_width: u32,
  /// Tallest image that will be decoded.
  pub max_height: u32,
}
impl Default for PngOptions {
  #[inline]
  fn default() -> Self {
    Self {
      crc_mode: CrcMode::Strict,
      idat_chunk_len: 8 * 1024,
      compression_level: 6,
      encode_filter: FilterType::None,
      max_width: 1 << 14,
      max_height: 1 << 14,
    }
  }
}
impl PngOptions {
  #[inline]
  #[must_use]
  pub const fn with_crc_mode(mut self, crc_mode: CrcMode) -> Self {
    self.crc_mode = crc_mode;
    self
  }

  /// Values of 0 are bumped up to 1.
  #[inline]
  #[must_use]
  pub const fn with_idat_chunk_len(mut self, len: usize) -> Self {
    self.idat_chunk_len = if len == 0 { 1 } else { len };
    self
  }

  /// Values above 10 are clamped to 10.
  #[inline]
  #[must_use]
  pub const fn with_compression_level(mut self, level: u8) -> Self {
    self.compression_level = if level > 10 { 10 } else { level };
    self
  }

  #[inline]
  #[must_use]
  pub const fn with_encode_filter(mut self, filter: FilterType) -> Self {
    self.encode_filter = filter;
    self
  }

  #[inline]
  #[must_use]
  pub const fn with_max_width(mut self, max_width: u32) -> Self {
    self.max_width = max_width;
    self
  }

  #[inline]
  #[must_use]
  pub const fn with_max_height(mut self, max_height: u32) -> Self {
    self.max_height = max_height;
    self
  }

  /// Errors if the header is bigger than the size limits.
  #[inline]
  pub fn check_dimensions(&self, ihdr: &IHDR) -> PngResult<()> {
    if ihdr.width > self.max_width || ihdr.height > self.max_height {
      return Err(PngError::DimensionsTooLarge { width: ihdr.width, height: ihdr.height });
    }
    Ok(())
  }
}
