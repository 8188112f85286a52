use super::*;

/// A whole PNG: its chunks in file order, plus the decoded header, palette,
/// and pixels.
///
/// The chunks are kept so that saving writes everything back the way it was.
/// Only the `IDAT` chunks are regenerated from the current pixels; every other
/// chunk (including ones this crate doesn't understand) goes back out byte for
/// byte.
#[derive(Debug, Clone)]
pub struct ImageDocument {
  chunks: Vec<PngChunk>,
  header: IHDR,
  palette: Option<PLTE>,
  pixels: PixelGrid,
  options: PngOptions,
}
impl ImageDocument {
  /// Decodes PNG bytes with the default options.
  #[inline]
  pub fn from_png_bytes(bytes: &[u8]) -> PngResult<Self> {
    Self::from_png_bytes_with_options(bytes, PngOptions::default())
  }

  /// Decodes PNG bytes.
  ///
  /// The steps are: read (and CRC check) all the chunks, parse the header,
  /// parse the palette, then decompress and reconstruct the pixels. The first
  /// error stops everything.
  pub fn from_png_bytes_with_options(bytes: &[u8], options: PngOptions) -> PngResult<Self> {
    let chunks = read_all(bytes, &options)?;
    let header = IHDR::from_chunks(&chunks)?;
    let palette = PLTE::from_chunks(&chunks, &header)?;
    let mut idat = chunks
      .iter()
      .filter(|chunk| chunk.chunk_type == PngChunkType::IDAT)
      .map(|chunk| chunk.data.as_slice())
      .peekable();
    if idat.peek().is_none() {
      return Err(PngError::MissingImageData);
    }
    let pixels = reconstruct(&header, palette.as_ref(), idat, &options)?;
    Ok(Self { chunks, header, palette, pixels, options })
  }

  /// Encodes the document back into PNG bytes.
  ///
  /// The new `IDAT` chunks go where the first old `IDAT` chunk was, and the
  /// other old `IDAT` chunks are dropped. No other chunk is added, removed,
  /// or changed.
  pub fn to_png_bytes(&self) -> PngResult<Vec<u8>> {
    let mut new_idat =
      Some(encode_idat(&self.header, self.palette.as_ref(), &self.pixels, &self.options)?);
    let mut out: Vec<PngChunk> = Vec::with_capacity(self.chunks.len());
    for chunk in &self.chunks {
      if chunk.chunk_type == PngChunkType::IDAT {
        if let Some(idat) = new_idat.take() {
          out.extend(idat);
        }
      } else {
        out.push(chunk.clone());
      }
    }
    Ok(write_all(&out))
  }

  /// Reads and decodes a PNG file with the default options.
  #[cfg(feature = "std")]
  #[cfg_attr(docs_rs, doc(cfg(feature = "std")))]
  #[inline]
  pub fn load<P: AsRef<std::path::Path>>(path: P) -> PngResult<Self> {
    Self::load_with_options(path, PngOptions::default())
  }

  /// Reads and decodes a PNG file.
  #[cfg(feature = "std")]
  #[cfg_attr(docs_rs, doc(cfg(feature = "std")))]
  pub fn load_with_options<P: AsRef<std::path::Path>>(
    path: P, options: PngOptions,
  ) -> PngResult<Self> {
    let bytes = std::fs::read(path.as_ref())?;
    debug!("read {} bytes from {}", bytes.len(), path.as_ref().display());
    Self::from_png_bytes_with_options(&bytes, options)
  }

  /// Encodes the document and writes it to a file.
  #[cfg(feature = "std")]
  #[cfg_attr(docs_rs, doc(cfg(feature = "std")))]
  pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> PngResult<()> {
    let bytes = self.to_png_bytes()?;
    std::fs::write(path.as_ref(), &bytes)?;
    debug!("wrote {} bytes to {}", bytes.len(), path.as_ref().display());
    Ok(())
  }

  #[inline]
  #[must_use]
  pub const fn header(&self) -> &IHDR {
    &self.header
  }

  #[inline]
  #[must_use]
  pub fn palette(&self) -> Option<&PLTE> {
    self.palette.as_ref()
  }

  #[inline]
  #[must_use]
  pub const fn pixels(&self) -> &PixelGrid {
    &self.pixels
  }

  /// Lets you edit pixel values. The dimensions are fixed by the header.
  #[inline]
  #[must_use]
  pub fn pixels_mut(&mut self) -> &mut PixelGrid {
    &mut self.pixels
  }

  /// All chunks as they were read. `IDAT` chunks here are the *original*
  /// compressed data, not re-encoded pixel edits.
  #[inline]
  #[must_use]
  pub fn chunks(&self) -> &[PngChunk] {
    &self.chunks
  }

  #[inline]
  #[must_use]
  pub const fn options(&self) -> &PngOptions {
    &self.options
  }

  /// Changes the options used for future saves.
  #[inline]
  pub fn set_options(&mut self, options: PngOptions) {
    self.options = options;
  }
}
