#![no_std]
#![cfg_attr(docs_rs, feature(doc_cfg))]
#![forbid(unsafe_code)]

//! A crate for reading, checking, editing, and rewriting PNG files.
//!
//! The [`png`] module has the chunk reader and writer, the CRC-32 engine, and
//! the header, palette, and scanline decoding. Decoded pixels go into a
//! [`PixelGrid`] that you can edit and then save back out.

#[cfg(not(feature = "alloc"))]
compile_error!("this crate requires the `alloc` feature");

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

mod error;
pub use error::*;

mod parser_helpers;

pub mod pixel_grid;
pub use pixel_grid::*;

pub mod png;

pub use pixel_formats::r8g8b8a8_Srgb;
