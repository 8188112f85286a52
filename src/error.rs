use core::fmt::{Debug, Display};

use crate::png::{PngChunkType, PngColorType};

/// Shorthand for results with a [`PngError`].
pub type PngResult<T> = Result<T, PngError>;

/// The broad category of a [`PngError`].
///
/// Useful when you want to tell the user *why* a file was rejected without
/// matching every single error variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PngErrorKind {
  /// The bytes don't follow the PNG rules.
  Format,
  /// A chunk's declared CRC didn't match the CRC of its content.
  Checksum,
  /// The bytes are legal PNG, but use something this crate doesn't do.
  Unsupported,
  /// The file system failed us.
  #[cfg(feature = "std")]
  #[cfg_attr(docs_rs, doc(cfg(feature = "std")))]
  Io,
}

/// An error from the `pngkit` crate.
///
/// Every error is fatal to the load or save in progress. Where it makes sense
/// the variant carries the chunk index (counting from 0 for the first chunk
/// after the signature) or the byte offset within the PNG data.
#[non_exhaustive]
pub enum PngError {
  /// The first 8 bytes aren't the PNG signature, or there aren't 8 bytes.
  BadSignature,
  /// A chunk declared more bytes than the data stream holds.
  TruncatedChunk { index: usize, offset: usize },
  /// The declared CRC of a chunk doesn't match its type and data.
  ChecksumMismatch { index: usize, chunk_type: PngChunkType, declared: u32, actual: u32 },
  /// There were no chunks at all after the signature.
  MissingHeader,
  /// The first chunk after the signature must be `IHDR`.
  HeaderNotFirst { found: PngChunkType },
  /// The `IHDR` payload must be exactly 13 bytes.
  BadHeaderLength { len: usize },
  /// Width and height must both be non-zero.
  ZeroDimensions,
  /// The bit depth isn't legal for the color type.
  BadBitDepth { bit_depth: u8, color_type: PngColorType },
  /// Only compression method 0 exists.
  BadCompressionMethod(u8),
  /// Only filter method 0 exists.
  BadFilterMethod(u8),
  /// Interlace method must be 0 or 1.
  BadInterlaceMethod(u8),
  /// The color type code isn't one of 0, 2, 3, 4, or 6.
  UnknownColorType(u8),
  /// Adam7 interlaced images can't be decoded or encoded.
  Interlaced,
  /// Only 8 bits per channel can be decoded or encoded.
  UnsupportedBitDepth(u8),
  /// The `PLTE` payload isn't a whole, non-zero number of RGB triples.
  BadPaletteLength { index: usize, len: usize },
  /// A palette can hold at most 256 entries.
  PaletteTooLarge { index: usize, entries: usize },
  /// Indexed color images must have a `PLTE` chunk.
  MissingPalette,
  /// Greyscale images must not have a `PLTE` chunk.
  UnexpectedPalette { index: usize, color_type: PngColorType },
  /// The header's width or height is over the limit set in the options.
  DimensionsTooLarge { width: u32, height: u32 },
  /// The header's dimensions need more memory than could be allocated.
  ImageTooLarge { bytes: usize },
  /// There were no `IDAT` chunks.
  MissingImageData,
  /// The zlib stream inside the `IDAT` chunks couldn't be decompressed.
  Decompression,
  /// The image data decompressed to fewer bytes than the header requires.
  NotEnoughImageData { expected: usize, actual: usize },
  /// A scanline started with a filter byte outside of `0..=4`.
  IllegalFilterType { row: u32, filter: u8 },
  /// An indexed pixel referred past the end of the palette.
  PaletteIndexOutOfRange { x: u32, y: u32, index: u8, palette_len: usize },
  /// While encoding an indexed image, a pixel's color wasn't in the palette.
  ColorNotInPalette { x: u32, y: u32 },
  /// The pixel grid doesn't match the header's dimensions.
  PixelGridMismatch { expected: (u32, u32), actual: (u32, u32) },
  /// An error from the file system, passed along untouched.
  #[cfg(feature = "std")]
  #[cfg_attr(docs_rs, doc(cfg(feature = "std")))]
  Io(std::io::Error),
}

impl PngError {
  /// Which broad category this error falls into.
  #[inline]
  #[must_use]
  pub fn kind(&self) -> PngErrorKind {
    match self {
      Self::ChecksumMismatch { .. } => PngErrorKind::Checksum,
      Self::UnknownColorType(_)
      | Self::Interlaced
      | Self::UnsupportedBitDepth(_)
      | Self::DimensionsTooLarge { .. }
      | Self::ImageTooLarge { .. } => PngErrorKind::Unsupported,
      #[cfg(feature = "std")]
      Self::Io(_) => PngErrorKind::Io,
      _ => PngErrorKind::Format,
    }
  }
}

impl Display for PngError {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match self {
      Self::BadSignature => write!(f, "bad PNG signature, not a png"),
      Self::TruncatedChunk { index, offset } => {
        write!(f, "chunk {index} at byte offset {offset} is truncated")
      }
      Self::ChecksumMismatch { index, chunk_type, declared, actual } => write!(
        f,
        "chunk {index} ({chunk_type}) has CRC {actual:#010X} but declares {declared:#010X}"
      ),
      Self::MissingHeader => write!(f, "no chunks follow the PNG signature"),
      Self::HeaderNotFirst { found } => write!(f, "expected IHDR as the first chunk, found {found}"),
      Self::BadHeaderLength { len } => write!(f, "IHDR must be 13 bytes, found {len}"),
      Self::ZeroDimensions => write!(f, "width or height is zero"),
      Self::BadBitDepth { bit_depth, color_type } => {
        write!(f, "bit depth {bit_depth} is illegal for {color_type:?}")
      }
      Self::BadCompressionMethod(m) => write!(f, "unknown compression method {m}"),
      Self::BadFilterMethod(m) => write!(f, "unknown filter method {m}"),
      Self::BadInterlaceMethod(m) => write!(f, "unknown interlace method {m}"),
      Self::UnknownColorType(c) => write!(f, "unsupported color type {c}"),
      Self::Interlaced => write!(f, "Adam7 interlaced images are not supported"),
      Self::UnsupportedBitDepth(d) => {
        write!(f, "bit depth {d} is not supported, only 8 bits per channel")
      }
      Self::BadPaletteLength { index, len } => {
        write!(f, "PLTE (chunk {index}) length {len} is not a non-zero multiple of 3")
      }
      Self::PaletteTooLarge { index, entries } => {
        write!(f, "PLTE (chunk {index}) has {entries} entries, max is 256")
      }
      Self::MissingPalette => write!(f, "indexed color image has no PLTE chunk"),
      Self::UnexpectedPalette { index, color_type } => {
        write!(f, "PLTE (chunk {index}) is not allowed for {color_type:?}")
      }
      Self::DimensionsTooLarge { width, height } => {
        write!(f, "{width}x{height} is over the size limit")
      }
      Self::ImageTooLarge { bytes } => write!(f, "image data needs {bytes} bytes, too large"),
      Self::MissingImageData => write!(f, "no IDAT chunks"),
      Self::Decompression => write!(f, "IDAT zlib stream is corrupt"),
      Self::NotEnoughImageData { expected, actual } => {
        write!(f, "image data decompressed to {actual} bytes, needed {expected}")
      }
      Self::IllegalFilterType { row, filter } => {
        write!(f, "row {row} has illegal filter type {filter}")
      }
      Self::PaletteIndexOutOfRange { x, y, index, palette_len } => write!(
        f,
        "pixel ({x},{y}) uses palette index {index} but the palette has {palette_len} entries"
      ),
      Self::ColorNotInPalette { x, y } => write!(f, "pixel ({x},{y}) has a color not in PLTE"),
      Self::PixelGridMismatch { expected, actual } => write!(
        f,
        "pixel grid is {}x{} but the header says {}x{}",
        actual.0, actual.1, expected.0, expected.1
      ),
      #[cfg(feature = "std")]
      Self::Io(e) => Display::fmt(e, f),
    }
  }
}

impl Debug for PngError {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match self {
      // io errors have a useful Debug of their own.
      #[cfg(feature = "std")]
      Self::Io(e) => f.debug_tuple("Io").field(e).finish(),
      _ => write!(f, "PngError({:?}: {self})", self.kind()),
    }
  }
}

#[cfg(feature = "std")]
impl std::error::Error for PngError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Io(e) => Some(e),
      _ => None,
    }
  }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for PngError {
  #[inline]
  fn from(e: std::io::Error) -> Self {
    Self::Io(e)
  }
}

#[test]
fn test_error_kinds() {
  assert_eq!(PngError::BadSignature.kind(), PngErrorKind::Format);
  assert_eq!(PngError::Interlaced.kind(), PngErrorKind::Unsupported);
  assert_eq!(PngError::UnknownColorType(5).kind(), PngErrorKind::Unsupported);
  assert_eq!(PngError::DimensionsTooLarge { width: 1, height: 1 }.kind(), PngErrorKind::Unsupported);
  let e = PngError::ChecksumMismatch {
    index: 1,
    chunk_type: PngChunkType::IDAT,
    declared: 0,
    actual: 1,
  };
  assert_eq!(e.kind(), PngErrorKind::Checksum);
}
