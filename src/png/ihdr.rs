use super::*;

/// The types of color that PNG supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PngColorType {
  /// Greyscale
  Y = 0,
  /// Red, Green, Blue
  RGB = 2,
  /// Index into a palette.
  ///
  /// The palette will have RGB8 data.
  Index = 3,
  /// Greyscale + Alpha
  YA = 4,
  /// Red, Green, Blue, Alpha
  RGBA = 6,
}
impl PngColorType {
  /// The number of channels in this type of color.
  #[inline]
  #[must_use]
  pub const fn channel_count(self) -> usize {
    match self {
      Self::Y => 1,
      Self::RGB => 3,
      Self::Index => 1,
      Self::YA => 2,
      Self::RGBA => 4,
    }
  }

  #[inline]
  #[must_use]
  pub const fn has_alpha(self) -> bool {
    matches!(self, Self::YA | Self::RGBA)
  }

  /// If `bit_depth` is one the PNG format allows for this color type.
  #[inline]
  #[must_use]
  pub const fn allows_bit_depth(self, bit_depth: u8) -> bool {
    match self {
      Self::Y => matches!(bit_depth, 1 | 2 | 4 | 8 | 16),
      Self::Index => matches!(bit_depth, 1 | 2 | 4 | 8),
      Self::RGB | Self::YA | Self::RGBA => matches!(bit_depth, 8 | 16),
    }
  }
}
impl TryFrom<u8> for PngColorType {
  type Error = PngError;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => PngColorType::Y,
      2 => PngColorType::RGB,
      3 => PngColorType::Index,
      4 => PngColorType::YA,
      6 => PngColorType::RGBA,
      _ => return Err(PngError::UnknownColorType(value)),
    })
  }
}

/// Image Header
///
/// Compression method and filter method are always 0 (the only values PNG
/// defines), and interlaced images are rejected while parsing, so none of those
/// are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IHDR {
  /// width in pixels
  pub width: u32,
  /// height in pixels
  pub height: u32,
  /// bits per channel
  pub bit_depth: u8,
  /// pixel color type
  pub color_type: PngColorType,
}
impl IHDR {
  /// Finds the header, which must be the first chunk, and parses it.
  pub fn from_chunks(chunks: &[PngChunk]) -> PngResult<Self> {
    let first = chunks.first().ok_or(PngError::MissingHeader)?;
    if first.chunk_type != PngChunkType::IHDR {
      return Err(PngError::HeaderNotFirst { found: first.chunk_type });
    }
    let ihdr = Self::try_from(first.data.as_slice())?;
    debug!("{ihdr:?}");
    Ok(ihdr)
  }

  /// The 13 data bytes of an `IHDR` chunk for this header.
  #[inline]
  #[must_use]
  pub fn to_chunk_data(&self) -> [u8; 13] {
    let [w0, w1, w2, w3] = self.width.to_be_bytes();
    let [h0, h1, h2, h3] = self.height.to_be_bytes();
    [w0, w1, w2, w3, h0, h1, h2, h3, self.bit_depth, self.color_type as u8, 0, 0, 0]
  }

  #[inline]
  #[must_use]
  pub const fn has_alpha(&self) -> bool {
    self.color_type.has_alpha()
  }

  #[inline]
  #[must_use]
  pub const fn channel_count(&self) -> usize {
    self.color_type.channel_count()
  }

  #[inline]
  #[must_use]
  pub const fn bits_per_pixel(&self) -> usize {
    (self.bit_depth as usize) * self.color_type.channel_count()
  }

  /// Bytes per complete pixel, rounded up to 1.
  ///
  /// This is the distance that the Sub, Average, and Paeth filters look back
  /// for their "left" byte.
  #[inline]
  #[must_use]
  pub const fn bytes_per_pixel(&self) -> usize {
    let bytes = self.bits_per_pixel() / 8;
    if bytes == 0 {
      1
    } else {
      bytes
    }
  }

  /// Bytes of pixel data in one row, without the filter byte.
  ///
  /// When pixels are less than 8 bits it's possible to end up with a partial
  /// byte on the end, so we round up.
  #[inline]
  #[must_use]
  pub const fn bytes_per_scanline(&self) -> usize {
    (self.bits_per_pixel().saturating_mul(self.width as usize)).saturating_add(7) / 8
  }

  /// Bytes in one row including the leading filter byte.
  #[inline]
  #[must_use]
  pub const fn bytes_per_filterline(&self) -> usize {
    self.bytes_per_scanline().saturating_add(1)
  }

  /// Bytes that the `IDAT` data must decompress to.
  #[inline]
  #[must_use]
  pub const fn decompressed_len(&self) -> usize {
    self.bytes_per_filterline().saturating_mul(self.height as usize)
  }

  /// Errors if pixel data in this format can't be decoded or encoded.
  #[inline]
  pub fn check_supported(&self) -> PngResult<()> {
    if self.bit_depth != 8 {
      return Err(PngError::UnsupportedBitDepth(self.bit_depth));
    }
    Ok(())
  }
}
impl TryFrom<&[u8]> for IHDR {
  type Error = PngError;
  fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
    match value {
      [w0, w1, w2, w3, h0, h1, h2, h3, bit_depth, color_type, compression_method, filter_method, interlace_method] =>
      {
        let width = u32::from_be_bytes([*w0, *w1, *w2, *w3]);
        let height = u32::from_be_bytes([*h0, *h1, *h2, *h3]);
        if width == 0 || height == 0 {
          return Err(PngError::ZeroDimensions);
        }
        let color_type = PngColorType::try_from(*color_type)?;
        if !color_type.allows_bit_depth(*bit_depth) {
          return Err(PngError::BadBitDepth { bit_depth: *bit_depth, color_type });
        }
        if *compression_method != 0 {
          return Err(PngError::BadCompressionMethod(*compression_method));
        }
        if *filter_method != 0 {
          return Err(PngError::BadFilterMethod(*filter_method));
        }
        match interlace_method {
          0 => (),
          1 => return Err(PngError::Interlaced),
          other => return Err(PngError::BadInterlaceMethod(*other)),
        }
        Ok(Self { width, height, bit_depth: *bit_depth, color_type })
      }
      _ => Err(PngError::BadHeaderLength { len: value.len() }),
    }
  }
}
