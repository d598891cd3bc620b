//! Growable byte storage the heap carves into blocks.

use crate::error::ArenaExhausted;

/// Backing storage that only ever grows at its end, in the manner of `sbrk`.
pub trait Arena {
  /// Extends the region by `n_bytes` and returns the previous end offset.
  ///
  /// The new bytes must be addressable immediately and contiguous with the
  /// existing region. On failure the region is left unchanged.
  fn extend(
    &mut self,
    n_bytes: usize,
  ) -> Result<usize, ArenaExhausted>;

  /// Every addressable byte, indexed by offset.
  fn bytes(&self) -> &[u8];

  fn bytes_mut(&mut self) -> &mut [u8];

  /// Current end offset (the "program break").
  fn end(&self) -> usize {
    self.bytes().len()
  }
}

/// An [`Arena`] over an owned `Vec<u8>`.
///
/// `origin` bytes at the front are never handed out, which lets callers
/// start the region off an alignment boundary. `limit` caps the total size.
#[derive(Debug, Clone, Default)]
pub struct VecArena {
  data: Vec<u8>,
  limit: Option<usize>,
}

impl VecArena {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_limit(limit: usize) -> Self {
    Self {
      data: Vec::new(),
      limit: Some(limit),
    }
  }

  /// Starts the region at `origin` instead of zero.
  pub fn with_origin(
    mut self,
    origin: usize,
  ) -> Self {
    self.data.resize(origin, 0);
    self
  }

  pub fn limit(&self) -> Option<usize> {
    self.limit
  }
}

impl Arena for VecArena {
  fn extend(
    &mut self,
    n_bytes: usize,
  ) -> Result<usize, ArenaExhausted> {
    let previous = self.data.len();
    let exhausted = ArenaExhausted {
      requested: n_bytes,
      end: previous,
    };

    let new_end = previous.checked_add(n_bytes).ok_or(exhausted)?;
    if self.limit.is_some_and(|limit| new_end > limit) {
      return Err(exhausted);
    }

    self.data.try_reserve(n_bytes).map_err(|_| exhausted)?;
    self.data.resize(new_end, 0);

    Ok(previous)
  }

  fn bytes(&self) -> &[u8] {
    &self.data
  }

  fn bytes_mut(&mut self) -> &mut [u8] {
    &mut self.data
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_extend_returns_previous_end() {
    let mut arena = VecArena::new();

    assert_eq!(arena.extend(64), Ok(0));
    assert_eq!(arena.extend(32), Ok(64));
    assert_eq!(arena.end(), 96);
    assert!(arena.bytes().iter().all(|&b| b == 0));
  }

  #[test]
  fn test_origin_offsets_the_region() {
    let mut arena = VecArena::new().with_origin(3);

    assert_eq!(arena.end(), 3);
    assert_eq!(arena.extend(10), Ok(3));
    assert_eq!(arena.end(), 13);
  }

  #[test]
  fn test_limit_refuses_growth() {
    let mut arena = VecArena::with_limit(100);

    assert_eq!(arena.extend(100), Ok(0));
    assert_eq!(
      arena.extend(1),
      Err(ArenaExhausted {
        requested: 1,
        end: 100
      })
    );
    assert_eq!(arena.end(), 100);
  }

  #[test]
  fn test_overflowing_request() {
    let mut arena = VecArena::new().with_origin(8);

    assert!(arena.extend(usize::MAX).is_err());
    assert_eq!(arena.end(), 8);
  }
}
