//! The CRC-32 used by PNG chunks (the same one as zlib and ISO-HDLC).

/// The reflected form of the CRC-32 polynomial.
const CRC32_POLYNOMIAL: u32 = 0xEDB8_8320;

/// Byte-at-a-time lookup table, built at compile time.
pub(crate) const CRC_TABLE: [u32; 256] = make_crc_table();

const fn make_crc_table() -> [u32; 256] {
  let mut out = [0; 256];
  let mut n = 0;
  while n < 256 {
    let mut c = n as u32;
    let mut k = 0;
    while k < 8 {
      if (c & 1) != 0 {
        c = CRC32_POLYNOMIAL ^ (c >> 1);
      } else {
        c >>= 1;
      }
      //
      k += 1;
    }
    out[n] = c;
    //
    n += 1;
  }
  out
}

fn update_crc(mut crc: u32, iter: impl Iterator<Item = u8>) -> u32 {
  for byte in iter {
    let i = (crc ^ u32::from(byte)) as u8 as usize;
    crc = CRC_TABLE[i] ^ (crc >> 8);
  }
  crc
}

/// Computes the CRC-32 of some bytes.
#[inline]
#[must_use]
pub fn png_crc(iter: impl Iterator<Item = u8>) -> u32 {
  update_crc(u32::MAX, iter) ^ u32::MAX
}

/// Multiplies a 32x32 GF(2) matrix (stored as 32 column words) by a vector.
#[inline]
#[must_use]
const fn gf2_matrix_times(mat: &[u32; 32], mut vec: u32) -> u32 {
  let mut sum = 0;
  let mut i = 0;
  while vec != 0 {
    if (vec & 1) != 0 {
      sum ^= mat[i];
    }
    vec >>= 1;
    i += 1;
  }
  sum
}

#[inline]
fn gf2_matrix_square(square: &mut [u32; 32], mat: &[u32; 32]) {
  for (sq, m) in square.iter_mut().zip(mat.iter().copied()) {
    *sq = gf2_matrix_times(mat, m);
  }
}

/// Combines two CRCs into the CRC of the concatenated data.
///
/// Given `crc_a = png_crc(a)` and `crc_b = png_crc(b)`, this returns
/// `png_crc(a ++ b)` without looking at `a` again. Only the *length* of `b`
/// is needed.
///
/// Appending a zero byte to the data is a linear operation on the CRC state
/// over GF(2), so we build the matrix for "append one zero bit", square it up
/// to "append one zero byte", and then use exponentiation by squaring on the
/// bits of `len_b` to shift `crc_a` past all of `b`. Because the CRC's
/// pre- and post-conditioning cancel out in the XOR, the final step is just
/// `shifted_a ^ crc_b`.
#[must_use]
pub fn crc32_combine(mut crc_a: u32, crc_b: u32, mut len_b: usize) -> u32 {
  if len_b == 0 {
    return crc_a;
  }

  // odd: the operator for one zero bit.
  let mut odd = [0_u32; 32];
  odd[0] = CRC32_POLYNOMIAL;
  let mut row = 1_u32;
  for o in odd.iter_mut().skip(1) {
    *o = row;
    row <<= 1;
  }
  let mut even = [0_u32; 32];
  // two zero bits, then four zero bits
  gf2_matrix_square(&mut even, &odd);
  gf2_matrix_square(&mut odd, &even);

  // The first square in the loop gives the operator for one zero byte, and
  // each square after that doubles the byte count, alternating which of the
  // two buffers holds the current power.
  loop {
    gf2_matrix_square(&mut even, &odd);
    if (len_b & 1) != 0 {
      crc_a = gf2_matrix_times(&even, crc_a);
    }
    len_b >>= 1;
    if len_b == 0 {
      break;
    }
    gf2_matrix_square(&mut odd, &even);
    if (len_b & 1) != 0 {
      crc_a = gf2_matrix_times(&odd, crc_a);
    }
    len_b >>= 1;
    if len_b == 0 {
      break;
    }
  }

  crc_a ^ crc_b
}

/// The CRC of a chunk: covers the type tag and the data, but not the length.
///
/// The tag and data CRCs are computed separately and then combined, so the
/// two never have to be copied into one buffer.
#[inline]
#[must_use]
pub fn chunk_crc(chunk_type: [u8; 4], data: &[u8]) -> u32 {
  let type_crc = png_crc(chunk_type.iter().copied());
  let data_crc = png_crc(data.iter().copied());
  crc32_combine(type_crc, data_crc, data.len())
}
