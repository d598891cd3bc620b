//! Placement search over the implicit block list.
//!
//! Both searches walk forward only and stop at `top`; neither wraps around
//! to blocks before its starting point.

use crate::block::read_tag;

/// A free block large enough for the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fit {
  pub offset: usize,
  pub size: usize,
}

/// First free block of at least `total` bytes, scanning `[start, top)`.
///
/// Returns `None` when the walk reaches `top` without a fit.
pub fn scan(
  bytes: &[u8],
  start: usize,
  top: usize,
  total: usize,
) -> Option<Fit> {
  let mut p = start;
  while p < top {
    let tag = read_tag(bytes, p)?;
    if !tag.allocated && tag.size >= total {
      return Some(Fit {
        offset: p,
        size: tag.size,
      });
    }
    if tag.size == 0 {
      return None;
    }
    p += tag.size;
  }
  None
}

/// Searches from the base of the heap.
pub fn first_fit(
  bytes: &[u8],
  base: usize,
  top: usize,
  total: usize,
) -> Option<Fit> {
  scan(bytes, base, top, total)
}

/// Searches from the cursor left by the last release.
pub fn next_fit(
  bytes: &[u8],
  cursor: usize,
  top: usize,
  total: usize,
) -> Option<Fit> {
  scan(bytes, cursor, top, total)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::block::{Tag, mark_block};

  // [0: used 32][32: free 32][64: used 32][96: free 64] top = 160
  fn layout() -> Vec<u8> {
    let mut bytes = vec![0u8; 160];
    mark_block(&mut bytes, 0, Tag::used(32));
    mark_block(&mut bytes, 32, Tag::free(32));
    mark_block(&mut bytes, 64, Tag::used(32));
    mark_block(&mut bytes, 96, Tag::free(64));
    bytes
  }

  fn at(
    offset: usize,
    size: usize,
  ) -> Option<Fit> {
    Some(Fit { offset, size })
  }

  #[test]
  fn test_first_fit_takes_earliest() {
    let bytes = layout();
    assert_eq!(first_fit(&bytes, 0, 160, 32), at(32, 32));
    assert_eq!(first_fit(&bytes, 0, 160, 40), at(96, 64));
    assert_eq!(first_fit(&bytes, 0, 160, 72), None);
  }

  #[test]
  fn test_next_fit_does_not_wrap() {
    let bytes = layout();
    assert_eq!(next_fit(&bytes, 64, 160, 32), at(96, 64));
    assert_eq!(next_fit(&bytes, 96, 160, 64), at(96, 64));
    assert_eq!(next_fit(&bytes, 160, 160, 32), None);
  }

  #[test]
  fn test_zero_size_stops_walk() {
    let bytes = vec![0u8; 64];
    assert_eq!(scan(&bytes, 0, 64, 32), None);
  }
}
