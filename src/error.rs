//! Allocator error types.

use thiserror::Error;

/// The arena declined to grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("arena cannot grow by {requested} bytes past offset {end}")]
pub struct ArenaExhausted {
  /// Bytes asked for.
  pub requested: usize,
  /// End of the region when the request was refused.
  pub end: usize,
}

/// Why `allocate` returned no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AllocError {
  /// Zero-length allocations are never handed out.
  #[error("zero-size allocation request")]
  ZeroSize,
  /// No fit was found and the arena could not be extended.
  #[error("arena exhausted while allocating {requested} bytes")]
  ArenaExhausted { requested: usize },
}

/// An offset that cannot be the payload of any block in the heap.
///
/// Only out-of-range or misaligned offsets are caught. Releasing a payload
/// twice is not detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PayloadError {
  #[error("offset {offset} is outside the heap")]
  OutOfBounds { offset: usize },
  #[error("offset {offset} is not aligned")]
  Misaligned { offset: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
  #[error("chunk size {0} must be aligned and at least one minimum block")]
  ChunkSize(usize),
  #[error("growth slack {0} must be aligned")]
  GrowthSlack(usize),
}

/// Failures while setting up a heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
  #[error("initial arena growth failed: {0}")]
  Init(#[from] ArenaExhausted),
  #[error("invalid heap configuration: {0}")]
  Config(#[from] ConfigError),
}

/// A structural problem found by the heap checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Violation {
  #[error("block at {offset}: header tag {header:#x} differs from footer tag {footer:#x}")]
  TagMismatch {
    offset: usize,
    header: u64,
    footer: u64,
  },
  /// The walk ended somewhere other than exactly at `top`.
  #[error("block walk ended at {reached}, heap top is {top}")]
  MissedTop { reached: usize, top: usize },
  /// A block's size carries it past the end of the arena buffer.
  #[error("block at {offset} of size {size} runs past the arena")]
  Overrun { offset: usize, size: usize },
  /// A block too small to hold a header and footer.
  #[error("block at {offset} has size {size}, too small for its tags")]
  Undersized { offset: usize, size: usize },
}
