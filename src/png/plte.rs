use super::*;

/// Palette data
///
/// Palette entries are always RGB, at most 256 of them.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PLTE(Vec<[u8; 3]>);
impl Debug for PLTE {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    // currently prints no more than 4 palette entries
    f.debug_tuple("PLTE").field(&&self.0[..self.0.len().min(4)]).field(&self.0.len()).finish()
  }
}
impl PLTE {
  /// Parses the data of a `PLTE` chunk. The `index` is only for error context.
  pub fn parse(data: &[u8], index: usize) -> PngResult<Self> {
    let entries: &[[u8; 3]] = bytemuck::try_cast_slice(data)
      .map_err(|_| PngError::BadPaletteLength { index, len: data.len() })?;
    if entries.is_empty() {
      return Err(PngError::BadPaletteLength { index, len: 0 });
    }
    if entries.len() > 256 {
      return Err(PngError::PaletteTooLarge { index, entries: entries.len() });
    }
    Ok(Self(entries.to_vec()))
  }

  /// Finds and parses the palette, checking the rules for if one must exist.
  ///
  /// * Indexed images must have a palette.
  /// * Greyscale images must not have one.
  /// * Truecolor images can have one as a suggestion, but it doesn't affect
  ///   the pixels.
  pub fn from_chunks(chunks: &[PngChunk], ihdr: &IHDR) -> PngResult<Option<Self>> {
    let found =
      chunks.iter().enumerate().find(|(_, chunk)| chunk.chunk_type == PngChunkType::PLTE);
    match (found, ihdr.color_type) {
      (None, PngColorType::Index) => Err(PngError::MissingPalette),
      (None, _) => Ok(None),
      (Some((index, _)), color_type @ (PngColorType::Y | PngColorType::YA)) => {
        Err(PngError::UnexpectedPalette { index, color_type })
      }
      (Some((index, chunk)), _) => {
        let plte = Self::parse(&chunk.data, index)?;
        debug!("{plte:?}");
        Ok(Some(plte))
      }
    }
  }

  /// Gets the entries as a slice.
  #[inline]
  #[must_use]
  pub fn entries(&self) -> &[[u8; 3]] {
    &self.0
  }

  #[inline]
  #[must_use]
  pub fn get(&self, index: u8) -> Option<[u8; 3]> {
    self.0.get(usize::from(index)).copied()
  }

  /// The first index holding this color, if any.
  #[inline]
  #[must_use]
  pub fn index_of(&self, rgb: [u8; 3]) -> Option<u8> {
    self.0.iter().position(|entry| *entry == rgb).map(|i| i as u8)
  }
}
impl From<Vec<[u8; 3]>> for PLTE {
  /// Entries past 256 are dropped.
  #[inline]
  fn from(mut entries: Vec<[u8; 3]>) -> Self {
    entries.truncate(256);
    Self(entries)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn header(color_type: PngColorType) -> IHDR {
    IHDR { width: 1, height: 1, bit_depth: 8, color_type }
  }

  fn plte_chunk(data: &[u8]) -> PngChunk {
    PngChunk::new(PngChunkType::PLTE, data.to_vec())
  }

  #[test]
  fn test_parse_entries() {
    let plte = PLTE::parse(&[10, 20, 30, 40, 50, 60], 1).unwrap();
    assert_eq!(plte.entries(), &[[10, 20, 30], [40, 50, 60]]);
    assert_eq!(plte.get(1), Some([40, 50, 60]));
    assert_eq!(plte.get(2), None);
    assert_eq!(plte.index_of([40, 50, 60]), Some(1));
    assert_eq!(plte.index_of([0, 0, 0]), None);
  }

  #[test]
  fn test_parse_errors() {
    assert!(matches!(PLTE::parse(&[1, 2, 3, 4], 2), Err(PngError::BadPaletteLength { index: 2, len: 4 })));
    let too_big = [7_u8; 257 * 3];
    assert!(matches!(PLTE::parse(&too_big, 1), Err(PngError::PaletteTooLarge { entries: 257, .. })));
    assert!(PLTE::parse(&too_big[..256 * 3], 1).is_ok());
    assert!(matches!(PLTE::parse(&[], 3), Err(PngError::BadPaletteLength { index: 3, len: 0 })));
    assert!(PLTE::parse(&too_big[..3], 1).is_ok());
  }

  #[test]
  fn test_palette_rules() {
    let with_plte = [PngChunk::new(PngChunkType::IHDR, Vec::new()), plte_chunk(&[1, 2, 3])];
    let without = &with_plte[..1];

    assert!(matches!(PLTE::from_chunks(without, &header(PngColorType::Index)), Err(PngError::MissingPalette)));
    assert!(PLTE::from_chunks(&with_plte, &header(PngColorType::Index)).unwrap().is_some());

    assert!(matches!(
      PLTE::from_chunks(&with_plte, &header(PngColorType::Y)),
      Err(PngError::UnexpectedPalette { index: 1, .. })
    ));
    assert!(matches!(
      PLTE::from_chunks(&with_plte, &header(PngColorType::YA)),
      Err(PngError::UnexpectedPalette { .. })
    ));
    assert!(PLTE::from_chunks(without, &header(PngColorType::Y)).unwrap().is_none());

    // a suggested palette is fine for truecolor
    assert!(PLTE::from_chunks(&with_plte, &header(PngColorType::RGB)).unwrap().is_some());
    assert!(PLTE::from_chunks(without, &header(PngColorType::RGBA)).unwrap().is_none());
  }
}
