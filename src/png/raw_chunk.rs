use super::*;

/// The first eight bytes of a PNG datastream should match these bytes.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Checks if the PNG's initial 8 bytes are correct.
#[inline]
#[must_use]
pub const fn is_png_header_correct(bytes: &[u8]) -> bool {
  matches!(bytes, [137, 80, 78, 71, 13, 10, 26, 10, ..])
}

/// The 4 byte type tag of a chunk.
///
/// Tags are ASCII letters, and the case of each letter is a flag. This crate
/// only cares about the first one: uppercase means the chunk is critical.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PngChunkType(pub [u8; 4]);
#[allow(nonstandard_style)]
impl PngChunkType {
  pub const IHDR: Self = Self(*b"IHDR");
  pub const PLTE: Self = Self(*b"PLTE");
  pub const IDAT: Self = Self(*b"IDAT");
  pub const IEND: Self = Self(*b"IEND");

  /// If a decoder must understand this chunk to show the image correctly.
  #[inline]
  #[must_use]
  pub const fn is_critical(self) -> bool {
    (self.0[0] & (1 << 5)) == 0
  }
}
impl Debug for PngChunkType {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_char('\"')?;
    Display::fmt(self, f)?;
    f.write_char('\"')
  }
}
impl Display for PngChunkType {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    for ch in self.0.iter().copied().map(|u| u as char) {
      f.write_char(ch)?;
    }
    Ok(())
  }
}

/// An unparsed chunk, borrowing from the PNG bytes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PngRawChunk<'b> {
  pub chunk_type: PngChunkType,
  pub data: &'b [u8],
  pub declared_crc: u32,
}
impl Debug for PngRawChunk<'_> {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("PngRawChunk")
      .field("chunk_type", &self.chunk_type)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .field("declared_crc", &self.declared_crc)
      .finish()
  }
}
impl PngRawChunk<'_> {
  /// The CRC that the chunk *should* have, based on its type and data.
  #[inline]
  #[must_use]
  pub fn actual_crc(&self) -> u32 {
    chunk_crc(self.chunk_type.0, self.data)
  }

  /// Copies the chunk into an owned value.
  #[inline]
  #[must_use]
  pub fn to_owned_chunk(&self) -> PngChunk {
    PngChunk { chunk_type: self.chunk_type, data: self.data.to_vec(), crc: self.declared_crc }
  }
}

/// An iterator that produces successive raw chunks from PNG bytes.
///
/// * Construction fails if the PNG signature isn't present.
/// * Each chunk is either a chunk or a [`PngError::TruncatedChunk`]. After an
///   error the iterator is fused.
/// * Iteration ends after the `IEND` chunk, or when the data runs out exactly
///   on a chunk boundary.
///
/// CRC values are *not* checked here, see [`read_all`].
#[derive(Debug, Clone)]
pub struct PngRawChunkIter<'b> {
  spare: &'b [u8],
  offset: usize,
  index: usize,
  finished: bool,
}
impl<'b> PngRawChunkIter<'b> {
  /// Pass the full PNG bytes, the signature is checked and then skipped.
  #[inline]
  pub fn new(bytes: &'b [u8]) -> PngResult<Self> {
    if !is_png_header_correct(bytes) {
      return Err(PngError::BadSignature);
    }
    let spare = &bytes[PNG_SIGNATURE.len()..];
    Ok(Self { spare, offset: PNG_SIGNATURE.len(), index: 0, finished: false })
  }

  /// Number of chunks produced so far.
  #[inline]
  #[must_use]
  pub const fn chunks_read(&self) -> usize {
    self.index
  }

  fn truncated(&mut self) -> PngError {
    self.finished = true;
    self.spare = &[];
    PngError::TruncatedChunk { index: self.index, offset: self.offset }
  }
}
impl<'b> Iterator for PngRawChunkIter<'b> {
  type Item = PngResult<PngRawChunk<'b>>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.finished || self.spare.is_empty() {
      return None;
    }
    let (len, rest) = match try_split_off_byte_array::<4>(self.spare) {
      Some((len_bytes, rest)) => (u32::from_be_bytes(len_bytes) as usize, rest),
      None => return Some(Err(self.truncated())),
    };
    let (chunk_type, rest) = match try_split_off_byte_array::<4>(rest) {
      Some((ty_bytes, rest)) => (PngChunkType(ty_bytes), rest),
      None => return Some(Err(self.truncated())),
    };
    let (data, rest) = if rest.len() >= len {
      rest.split_at(len)
    } else {
      return Some(Err(self.truncated()));
    };
    let (declared_crc, rest) = match try_split_off_byte_array::<4>(rest) {
      Some((crc_bytes, rest)) => (u32::from_be_bytes(crc_bytes), rest),
      None => return Some(Err(self.truncated())),
    };
    trace!("chunk {} {} at offset {}, {} bytes", self.index, chunk_type, self.offset, len);
    self.spare = rest;
    self.offset += 12 + len;
    self.index += 1;
    if chunk_type == PngChunkType::IEND {
      self.finished = true;
      if !rest.is_empty() {
        warn!("ignoring {} trailing bytes after IEND", rest.len());
      }
    }
    Some(Ok(PngRawChunk { chunk_type, data, declared_crc }))
  }
}

/// An owned chunk record.
///
/// `crc` is the value as it was read (or computed on creation). It's never
/// trusted when writing, see [`write_all`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PngChunk {
  pub chunk_type: PngChunkType,
  pub data: Vec<u8>,
  pub crc: u32,
}
impl Debug for PngChunk {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("PngChunk")
      .field("chunk_type", &self.chunk_type)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .field("crc", &self.crc)
      .finish()
  }
}
impl PngChunk {
  /// Makes a new chunk with a correct CRC.
  #[inline]
  #[must_use]
  pub fn new(chunk_type: PngChunkType, data: Vec<u8>) -> Self {
    let crc = chunk_crc(chunk_type.0, &data);
    Self { chunk_type, data, crc }
  }

  /// The declared length of the chunk data.
  #[inline]
  #[must_use]
  pub fn length(&self) -> u32 {
    self.data.len() as u32
  }

  /// If the stored CRC matches the type and data.
  #[inline]
  #[must_use]
  pub fn is_crc_correct(&self) -> bool {
    self.crc == chunk_crc(self.chunk_type.0, &self.data)
  }
}

/// Reads every chunk of a PNG, verifying each CRC.
///
/// The signature is checked but isn't part of the output, every valid PNG has
/// the same one. What happens on a CRC mismatch depends on the
/// [`CrcMode`] of the options.
pub fn read_all(bytes: &[u8], options: &PngOptions) -> PngResult<Vec<PngChunk>> {
  let mut out = Vec::new();
  for (index, raw) in PngRawChunkIter::new(bytes)?.enumerate() {
    let raw = raw?;
    let actual = raw.actual_crc();
    if actual != raw.declared_crc {
      match options.crc_mode {
        CrcMode::Strict => {
          return Err(PngError::ChecksumMismatch {
            index,
            chunk_type: raw.chunk_type,
            declared: raw.declared_crc,
            actual,
          });
        }
        CrcMode::Lenient => warn!(
          "chunk {} ({}) has CRC {:#010X} but declares {:#010X}, continuing",
          index, raw.chunk_type, actual, raw.declared_crc
        ),
      }
    }
    out.push(raw.to_owned_chunk());
  }
  Ok(out)
}

/// Writes the signature and then all the chunks, in order.
///
/// Each chunk's CRC is computed fresh from its type and data, so chunks that
/// were edited get a correct CRC.
#[must_use]
pub fn write_all(chunks: &[PngChunk]) -> Vec<u8> {
  let total: usize = PNG_SIGNATURE.len() + chunks.iter().map(|c| 12 + c.data.len()).sum::<usize>();
  let mut out = Vec::with_capacity(total);
  out.extend_from_slice(&PNG_SIGNATURE);
  for chunk in chunks {
    trace!("writing {} with {} bytes", chunk.chunk_type, chunk.data.len());
    out.extend_from_slice(&chunk.length().to_be_bytes());
    out.extend_from_slice(&chunk.chunk_type.0);
    out.extend_from_slice(&chunk.data);
    out.extend_from_slice(&chunk_crc(chunk.chunk_type.0, &chunk.data).to_be_bytes());
  }
  out
}
