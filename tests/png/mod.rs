use std::path::PathBuf;

use pngkit::{png::*, r8g8b8a8_Srgb, PngError, PngErrorKind};

use super::{rand_bytes, rand_usize};

const ALL_COLORS: [(::png::ColorType, PngColorType); 5] = [
  (::png::ColorType::Grayscale, PngColorType::Y),
  (::png::ColorType::Rgb, PngColorType::RGB),
  (::png::ColorType::Indexed, PngColorType::Index),
  (::png::ColorType::GrayscaleAlpha, PngColorType::YA),
  (::png::ColorType::Rgba, PngColorType::RGBA),
];

const ALL_FILTERS: [::png::FilterType; 5] = [
  ::png::FilterType::NoFilter,
  ::png::FilterType::Sub,
  ::png::FilterType::Up,
  ::png::FilterType::Avg,
  ::png::FilterType::Paeth,
];

/// Uses the reference encoder to make a PNG, so that the decoder gets checked
/// against filtering it didn't do itself.
fn reference_png(
  width: u32, height: u32, color: ::png::ColorType, filter: ::png::FilterType, palette: &[u8],
  data: &[u8],
) -> Vec<u8> {
  let mut out = Vec::new();
  {
    let mut encoder = ::png::Encoder::new(&mut out, width, height);
    encoder.set_color(color);
    encoder.set_depth(::png::BitDepth::Eight);
    encoder.set_filter(filter);
    if color == ::png::ColorType::Indexed {
      encoder.set_palette(palette.to_vec());
    }
    let mut writer = encoder.write_header().unwrap();
    writer.write_image_data(data).unwrap();
    writer.finish().unwrap();
  }
  out
}

/// Decodes with the reference decoder, giving the raw samples.
fn reference_decode(bytes: &[u8]) -> Vec<u8> {
  let decoder = ::png::Decoder::new(bytes);
  let mut reader = decoder.read_info().unwrap();
  let mut buf = vec![0; reader.output_buffer_size()];
  let info = reader.next_frame(&mut buf).unwrap();
  buf.truncate(info.buffer_size());
  buf
}

/// What our RGBA pixel should be for one set of raw samples.
fn expected_rgba(color_type: PngColorType, samples: &[u8], palette: &[u8]) -> [u8; 4] {
  match (color_type, samples) {
    (PngColorType::Y, [y]) => [*y, *y, *y, 255],
    (PngColorType::YA, [y, a]) => [*y, *y, *y, *a],
    (PngColorType::RGB, [r, g, b]) => [*r, *g, *b, 255],
    (PngColorType::RGBA, [r, g, b, a]) => [*r, *g, *b, *a],
    (PngColorType::Index, [i]) => {
      let i = usize::from(*i) * 3;
      [palette[i], palette[i + 1], palette[i + 2], 255]
    }
    other => panic!("bad sample layout {other:?}"),
  }
}

fn rgba(p: &r8g8b8a8_Srgb) -> [u8; 4] {
  [p.r, p.g, p.b, p.a]
}

fn random_image(color_type: PngColorType, width: u32, height: u32, palette_len: usize) -> Vec<u8> {
  let count = (width * height) as usize * color_type.channel_count();
  let mut data = rand_bytes(count);
  if color_type == PngColorType::Index {
    data.iter_mut().for_each(|i| *i = (usize::from(*i) % palette_len) as u8);
  }
  data
}

fn temp_path(name: &str) -> PathBuf {
  std::env::temp_dir().join(format!("pngkit_{}_{}.png", name, std::process::id()))
}

#[test]
fn test_RawPngChunkIter_no_panics() {
  // even totally random data should never panic the reader!
  for _ in 0..50 {
    let v = rand_bytes(1024);
    let _ = read_all(&v, &PngOptions::default());
    let _ = ImageDocument::from_png_bytes(&v);
    // and again with a good signature in front
    let mut signed = PNG_SIGNATURE.to_vec();
    signed.extend_from_slice(&v);
    if let Ok(it) = PngRawChunkIter::new(&signed) {
      for _ in it {
        //
      }
    }
    let _ = ImageDocument::from_png_bytes_with_options(
      &signed,
      PngOptions::default().with_crc_mode(CrcMode::Lenient),
    );
  }
}

#[test]
fn test_crc_matches_reference() {
  for len in [0, 1, 2, 3, 7, 64, 1000, 4096] {
    let data = rand_bytes(len);
    assert_eq!(png_crc(data.iter().copied()), crc32fast::hash(&data), "len {len}");
  }
}

#[test]
fn test_crc_combine_property() {
  for _ in 0..100 {
    let a = rand_bytes(rand_usize(300));
    let b = rand_bytes(rand_usize(300));
    let mut joined = a.clone();
    joined.extend_from_slice(&b);
    let combined = crc32_combine(crc32fast::hash(&a), crc32fast::hash(&b), b.len());
    assert_eq!(combined, crc32fast::hash(&joined), "a: {} b: {}", a.len(), b.len());
  }
}

#[test]
fn test_unfilter_is_inverse_of_filter() {
  for _ in 0..100 {
    let bpp = 1 + rand_usize(8);
    let len = rand_usize(200);
    let prev = rand_bytes(len);
    let row = rand_bytes(len);
    for filter in FilterType::ALL {
      let mut filtered = vec![0; len];
      filter_row(filter, bpp, &prev, &row, &mut filtered);
      unfilter_row(filter, bpp, &prev, &mut filtered);
      assert_eq!(filtered, row, "{filter:?} bpp {bpp}");
    }
  }
}

#[test]
fn test_decode_reference_encoder_output() {
  let palette = rand_bytes(3 * 13);
  for (png_color, color_type) in ALL_COLORS {
    for filter in ALL_FILTERS {
      let (width, height) = (1 + rand_usize(17) as u32, 1 + rand_usize(17) as u32);
      let data = random_image(color_type, width, height, 13);
      let bytes = reference_png(width, height, png_color, filter, &palette, &data);

      let doc = ImageDocument::from_png_bytes(&bytes).unwrap();
      assert_eq!(doc.header().width, width);
      assert_eq!(doc.header().height, height);
      assert_eq!(doc.header().color_type, color_type);

      let got: Vec<[u8; 4]> = doc.pixels().pixels().iter().map(rgba).collect();
      let expected: Vec<[u8; 4]> = data
        .chunks_exact(color_type.channel_count())
        .map(|samples| expected_rgba(color_type, samples, &palette))
        .collect();
      assert_eq!(got, expected, "{color_type:?} {filter:?}");
    }
  }
}

/// Joins all `IDAT` data and splits it again into pieces of `piece_len`.
fn resplit_idat(bytes: &[u8], piece_len: usize) -> Vec<u8> {
  let chunks = read_all(bytes, &PngOptions::default()).unwrap();
  let stream: Vec<u8> = chunks
    .iter()
    .filter(|c| c.chunk_type == PngChunkType::IDAT)
    .flat_map(|c| c.data.iter().copied())
    .collect();
  let mut out = Vec::new();
  for chunk in &chunks {
    if chunk.chunk_type == PngChunkType::IDAT {
      if out.iter().any(|c: &PngChunk| c.chunk_type == PngChunkType::IDAT) {
        continue;
      }
      out.extend(stream.chunks(piece_len).map(|d| PngChunk::new(PngChunkType::IDAT, d.to_vec())));
    } else {
      out.push(chunk.clone());
    }
  }
  write_all(&out)
}

#[test]
fn test_decode_reference_output_split_into_many_idat() {
  let palette = rand_bytes(3 * 11);
  for (png_color, color_type) in ALL_COLORS {
    for filter in ALL_FILTERS {
      let data = random_image(color_type, 7, 6, 11);
      let bytes = reference_png(7, 6, png_color, filter, &palette, &data);
      let whole = ImageDocument::from_png_bytes(&bytes).unwrap();
      for piece_len in [1, 2, 3, 5, 7, 13] {
        let split = resplit_idat(&bytes, piece_len);
        let doc = ImageDocument::from_png_bytes(&split).unwrap();
        assert!(doc.chunks().iter().filter(|c| c.chunk_type == PngChunkType::IDAT).count() > 1);
        assert_eq!(doc.pixels(), whole.pixels(), "{color_type:?} {filter:?} {piece_len}");
      }
    }
  }
}

#[test]
fn test_reference_decoder_reads_our_output() {
  let palette = rand_bytes(3 * 7);
  for (png_color, color_type) in ALL_COLORS {
    for filter in FilterType::ALL {
      let data = random_image(color_type, 9, 5, 7);
      let bytes = reference_png(9, 5, png_color, ::png::FilterType::NoFilter, &palette, &data);
      let mut doc = ImageDocument::from_png_bytes(&bytes).unwrap();
      doc.set_options(PngOptions::default().with_encode_filter(filter).with_idat_chunk_len(16));
      let ours = doc.to_png_bytes().unwrap();
      assert_eq!(reference_decode(&ours), data, "{color_type:?} {filter:?}");
    }
  }
}

#[test]
fn test_load_save_load_round_trip() {
  let palette = rand_bytes(3 * 200);
  for (png_color, color_type) in ALL_COLORS {
    let data = random_image(color_type, 31, 17, 200);
    let bytes = reference_png(31, 17, png_color, ::png::FilterType::Paeth, &palette, &data);
    let first = ImageDocument::from_png_bytes(&bytes).unwrap();

    let path = temp_path(&format!("round_trip_{}", color_type as u8));
    first.save(&path).unwrap();
    let second = ImageDocument::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(first.header(), second.header());
    assert_eq!(first.palette(), second.palette());
    assert_eq!(first.pixels(), second.pixels());
  }
}

#[test]
fn test_pixel_edit_survives_save() {
  let data = random_image(PngColorType::RGB, 4, 4, 0);
  let bytes = reference_png(4, 4, ::png::ColorType::Rgb, ::png::FilterType::Sub, &[], &data);
  let mut doc = ImageDocument::from_png_bytes(&bytes).unwrap();
  let old = doc.pixels_mut().set(2, 3, r8g8b8a8_Srgb { r: 1, g: 2, b: 3, a: 255 }).unwrap();
  assert_eq!(rgba(&old), expected_rgba(PngColorType::RGB, &data[(3 * 4 + 2) * 3..][..3], &[]));

  let again = ImageDocument::from_png_bytes(&doc.to_png_bytes().unwrap()).unwrap();
  assert_eq!(rgba(again.pixels().get(2, 3).unwrap()), [1, 2, 3, 255]);
  assert_eq!(again.pixels(), doc.pixels());
}

#[test]
fn test_huge_header_rejected_before_decoding() {
  let header = IHDR { width: 30_000, height: 30_000, bit_depth: 8, color_type: PngColorType::RGBA };
  let bytes = write_all(&[
    PngChunk::new(PngChunkType::IHDR, header.to_chunk_data().to_vec()),
    PngChunk::new(PngChunkType::IDAT, vec![0x78, 0x9C, 0x03, 0x00, 0x00]),
    PngChunk::new(PngChunkType::IEND, Vec::new()),
  ]);
  let err = ImageDocument::from_png_bytes(&bytes).unwrap_err();
  assert!(matches!(err, PngError::DimensionsTooLarge { width: 30_000, height: 30_000 }));
  assert_eq!(err.kind(), PngErrorKind::Unsupported);
}

#[test]
fn test_file_errors() {
  let data = random_image(PngColorType::RGB, 2, 2, 0);
  let bytes = reference_png(2, 2, ::png::ColorType::Rgb, ::png::FilterType::NoFilter, &[], &data);

  // no signature
  let path = temp_path("no_signature");
  std::fs::write(&path, &bytes[8..]).unwrap();
  let err = ImageDocument::load(&path).unwrap_err();
  std::fs::remove_file(&path).unwrap();
  assert!(matches!(err, PngError::BadSignature));
  assert_eq!(err.kind(), PngErrorKind::Format);

  // one flipped bit inside the IDAT data
  let chunks = read_all(&bytes, &PngOptions::default()).unwrap();
  let idat_offset = 8 + chunks
    .iter()
    .take_while(|c| c.chunk_type != PngChunkType::IDAT)
    .map(|c| 12 + c.data.len())
    .sum::<usize>();
  let mut flipped = bytes.clone();
  flipped[idat_offset + 8] ^= 0b1000_0000;
  let path = temp_path("flipped_idat");
  std::fs::write(&path, &flipped).unwrap();
  let err = ImageDocument::load(&path).unwrap_err();
  std::fs::remove_file(&path).unwrap();
  assert_eq!(err.kind(), PngErrorKind::Checksum);
  assert!(matches!(err, PngError::ChecksumMismatch { chunk_type: PngChunkType::IDAT, .. }));

  // io errors come through untouched
  let err = ImageDocument::load(temp_path("does_not_exist")).unwrap_err();
  match err {
    PngError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
    other => panic!("expected io error, got {other:?}"),
  }
}
