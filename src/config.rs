//! Heap configuration.

use crate::align::is_aligned;
use crate::block::MIN_BLOCK_SIZE;
use crate::error::ConfigError;

/// Where a placement search starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
  /// Scan from the base of the heap.
  FirstFit,
  /// Scan from the cursor left by the last release, forward only.
  #[default]
  NextFit,
}

/// Tunables for a [`Heap`](crate::Heap). Checked once, when the heap is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapConfig {
  /// Size of the free block the heap starts with.
  ///
  /// Default: 4096. Must be aligned and at least one minimum block.
  pub chunk_size: usize,

  /// Requests whose total block size is below this grow the arena by
  /// `total + growth_slack` instead of exactly `total`.
  pub small_request_threshold: usize,

  /// Extra bytes added when growing for a small request. Must be aligned.
  pub growth_slack: usize,

  pub search: SearchMode,
}

impl HeapConfig {
  pub const DEFAULT_CHUNK_SIZE: usize = 1 << 12;

  pub const DEFAULT_SMALL_REQUEST_THRESHOLD: usize = 256;

  pub const DEFAULT_GROWTH_SLACK: usize = 256;

  pub fn new(chunk_size: usize) -> Self {
    Self {
      chunk_size,
      small_request_threshold: Self::DEFAULT_SMALL_REQUEST_THRESHOLD,
      growth_slack: Self::DEFAULT_GROWTH_SLACK,
      search: SearchMode::default(),
    }
  }

  pub fn with_search(
    mut self,
    search: SearchMode,
  ) -> Self {
    self.search = search;
    self
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if !is_aligned(self.chunk_size) || self.chunk_size < MIN_BLOCK_SIZE {
      return Err(ConfigError::ChunkSize(self.chunk_size));
    }
    if !is_aligned(self.growth_slack) {
      return Err(ConfigError::GrowthSlack(self.growth_slack));
    }
    Ok(())
  }
}

impl Default for HeapConfig {
  fn default() -> Self {
    Self::new(Self::DEFAULT_CHUNK_SIZE)
  }
}
