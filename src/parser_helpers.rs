#![forbid(unsafe_code)]

//! Just has shorthands for various parsing things you'd want to do.

/// Splits `N` bytes off the front, or `None` if there aren't that many.
#[inline]
pub fn try_split_off_byte_array<const N: usize>(bytes: &[u8]) -> Option<([u8; N], &[u8])> {
  if bytes.len() >= N {
    let (head, tail) = bytes.split_at(N);
    let a: [u8; N] = head.try_into().ok()?;
    Some((a, tail))
  } else {
    None
  }
}

#[test]
fn test_try_split_off_byte_array() {
  let bytes = [1_u8, 2, 3, 4, 5];
  assert_eq!(try_split_off_byte_array::<4>(&bytes), Some(([1, 2, 3, 4], &[5_u8][..])));
  assert_eq!(try_split_off_byte_array::<4>(&bytes[..3]), None);
}
