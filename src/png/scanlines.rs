use super::*;

/// Turns the compressed `IDAT` payloads into a grid of pixels.
///
/// The payloads must be given in file order, they're one zlib stream split
/// across however many chunks. The pieces are joined and decompressed into a
/// buffer sized exactly from the header, then unfiltered in place, and then
/// each pixel is converted to RGBA:
///
/// * Greyscale: `y` goes to each of RGB, alpha 255.
/// * Greyscale Alpha: same, but with the alpha.
/// * Truecolor: alpha 255.
/// * Indexed: looked up in the palette, alpha 255.
///
/// Headers bigger than the `max_width` or `max_height` of the options are
/// rejected before anything is allocated.
pub fn reconstruct<'b>(
  ihdr: &IHDR, plte: Option<&PLTE>, idat: impl Iterator<Item = &'b [u8]> + Clone,
  options: &PngOptions,
) -> PngResult<PixelGrid> {
  ihdr.check_supported()?;
  options.check_dimensions(ihdr)?;
  let palette: &[[u8; 3]] = match (ihdr.color_type, plte) {
    (PngColorType::Index, None) => return Err(PngError::MissingPalette),
    (PngColorType::Index, Some(plte)) => plte.entries(),
    _ => &[],
  };

  // a symbol can straddle two IDAT chunks, so inflate gets one joined slice
  let compressed_len: usize = idat.clone().map(<[u8]>::len).sum();
  let mut compressed: Vec<u8> = Vec::new();
  compressed
    .try_reserve_exact(compressed_len)
    .map_err(|_| PngError::ImageTooLarge { bytes: compressed_len })?;
  idat.for_each(|data| compressed.extend_from_slice(data));

  let zlib_len = ihdr.decompressed_len();
  let mut zlib_buffer: Vec<u8> = Vec::new();
  zlib_buffer.try_reserve_exact(zlib_len).map_err(|_| PngError::ImageTooLarge { bytes: zlib_len })?;
  zlib_buffer.resize(zlib_len, 0);
  let decompressed = miniz_oxide::inflate::decompress_slice_iter_to_slice(
    &mut zlib_buffer,
    core::iter::once(compressed.as_slice()),
    true,
    true,
  )
  .map_err(|status| {
    debug!("inflate failed: {status:?}");
    PngError::Decompression
  })?;
  debug!("decompressed {compressed_len} bytes to {decompressed} of {zlib_len} expected bytes");
  if decompressed < zlib_len {
    return Err(PngError::NotEnoughImageData { expected: zlib_len, actual: decompressed });
  }

  unfilter_decompressed_data(ihdr, &mut zlib_buffer)?;

  let channels = ihdr.channel_count();
  let mut pixels: Vec<r8g8b8a8_Srgb> = Vec::with_capacity(xy_width_to_index(0, ihdr.height, ihdr.width));
  for (y, line) in zlib_buffer.chunks_exact(ihdr.bytes_per_filterline()).enumerate() {
    let y = y as u32;
    // chunks_exact always gives `channels` bytes
    for (x, data) in line[1..].chunks_exact(channels).enumerate() {
      let p = match ihdr.color_type {
        PngColorType::Y => r8g8b8a8_Srgb { r: data[0], g: data[0], b: data[0], a: 0xFF },
        PngColorType::YA => r8g8b8a8_Srgb { r: data[0], g: data[0], b: data[0], a: data[1] },
        PngColorType::RGB => r8g8b8a8_Srgb { r: data[0], g: data[1], b: data[2], a: 0xFF },
        PngColorType::RGBA => r8g8b8a8_Srgb { r: data[0], g: data[1], b: data[2], a: data[3] },
        PngColorType::Index => {
          let index = data[0];
          let [r, g, b] =
            palette.get(usize::from(index)).copied().ok_or(PngError::PaletteIndexOutOfRange {
              x: x as u32,
              y,
              index,
              palette_len: palette.len(),
            })?;
          r8g8b8a8_Srgb { r, g, b, a: 0xFF }
        }
      };
      pixels.push(p);
    }
  }
  let rows_made = (pixels.len() / (ihdr.width as usize).max(1)) as u32;
  PixelGrid::from_pixels(ihdr.width, ihdr.height, pixels).ok_or(PngError::PixelGridMismatch {
    expected: (ihdr.width, ihdr.height),
    actual: (ihdr.width, rows_made),
  })
}

/// Turns a grid of pixels back into one or more `IDAT` chunks.
///
/// This is the reverse of [`reconstruct`]: greyscale formats take the red
/// channel as the grey level, formats without alpha drop the alpha, and
/// indexed images map each color to the first palette entry with that color.
/// Every row is filtered with the `encode_filter` of the options, compressed,
/// and then split into chunks of at most `idat_chunk_len` bytes.
pub fn encode_idat(
  ihdr: &IHDR, plte: Option<&PLTE>, grid: &PixelGrid, options: &PngOptions,
) -> PngResult<Vec<PngChunk>> {
  ihdr.check_supported()?;
  if (grid.width(), grid.height()) != (ihdr.width, ihdr.height) {
    return Err(PngError::PixelGridMismatch {
      expected: (ihdr.width, ihdr.height),
      actual: (grid.width(), grid.height()),
    });
  }
  let plte = match (ihdr.color_type, plte) {
    (PngColorType::Index, None) => return Err(PngError::MissingPalette),
    (_, plte) => plte,
  };

  let mut rows: Vec<u8> = Vec::with_capacity(ihdr.bytes_per_scanline() * ihdr.height as usize);
  for (y, row) in grid.rows().enumerate() {
    for (x, p) in row.iter().enumerate() {
      match ihdr.color_type {
        PngColorType::Y => rows.push(p.r),
        PngColorType::YA => rows.extend_from_slice(&[p.r, p.a]),
        PngColorType::RGB => rows.extend_from_slice(&[p.r, p.g, p.b]),
        PngColorType::RGBA => rows.extend_from_slice(&[p.r, p.g, p.b, p.a]),
        PngColorType::Index => {
          let index = plte
            .and_then(|plte| plte.index_of([p.r, p.g, p.b]))
            .ok_or(PngError::ColorNotInPalette { x: x as u32, y: y as u32 })?;
          rows.push(index);
        }
      }
    }
  }

  let filtered = filter_scanlines(ihdr, &rows, options.encode_filter);
  let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&filtered, options.compression_level);
  debug!("compressed {} filtered bytes to {}", filtered.len(), compressed.len());
  Ok(
    compressed
      .chunks(options.idat_chunk_len.max(1))
      .map(|data| PngChunk::new(PngChunkType::IDAT, data.to_vec()))
      .collect(),
  )
}
