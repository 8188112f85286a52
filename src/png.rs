#![forbid(unsafe_code)]

//! Module for working with PNG data.
//!
//! * [Portable Network Graphics Specification (Second Edition)][png-spec]
//!
//! [png-spec]: https://www.w3.org/TR/2003/REC-PNG-20031110/
//!
//! ## Library Design Assumptions
//!
//! * The entire PNG encoded source data stream is a single byte slice. There's
//!   no "stream" decoding, the format is small enough to fully buffer.
//! * Only 8 bits per channel, non-interlaced images have their pixels decoded.
//!   Everything else is rejected with an "unsupported" error.
//! * Chunks other than `IHDR`, `PLTE`, `IDAT`, and `IEND` are never
//!   interpreted, but they're kept around and written back out unchanged.
//!
//! ## Easy Mode
//!
//! Use [`ImageDocument::load`] to get the pixels, edit them with
//! [`ImageDocument::pixels_mut`], then [`ImageDocument::save`].
//!
//! ## Manual Decoding
//!
//! Each stage is exposed on its own:
//!
//! 1) [`read_all`] checks the signature and gives the chunks in order, with
//!    each CRC checked (see [`CrcMode`]). If you want to avoid the copying you
//!    can use [`PngRawChunkIter`] directly.
//! 2) [`IHDR::from_chunks`] parses the header, which must be the first chunk.
//! 3) [`PLTE::from_chunks`] parses the palette, if there is one.
//! 4) [`reconstruct`] takes all the `IDAT` payloads, in order, and gives back
//!    a [`PixelGrid`]. Internally this decompresses the zlib stream and then
//!    calls [`unfilter_decompressed_data`].
//!
//! Encoding goes the other way with [`encode_idat`] and [`write_all`].
//!
//! ## Parsing Errors
//!
//! Unlike a viewer, which should show *something* for a damaged file, this
//! crate is strict. The first problem found stops the decode, and the
//! [`PngError`] says where it was. CRC mismatches can be downgraded to a
//! logged warning with [`CrcMode::Lenient`].

use core::fmt::{Debug, Display, Write};

use alloc::{vec, vec::Vec};

use log::{debug, trace, warn};
use pixel_formats::r8g8b8a8_Srgb;

use crate::{error::*, parser_helpers::*, pixel_grid::*};

mod crc32;
pub use crc32::*;

mod raw_chunk;
pub use raw_chunk::*;

mod ihdr;
pub use ihdr::*;

mod plte;
pub use plte::*;

mod unfilter;
pub use unfilter::*;

mod scanlines;
pub use scanlines::*;

mod options;
pub use options::*;

mod document;
pub use document::*;
