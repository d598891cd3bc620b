//! Boundary tags and block addressing.
//!
//! ```text
//!   ┌──────────┬───────────────────────────────┬──────────┐
//!   │  header  │            payload            │  footer  │
//!   │ size | a │      size - 2 * WORD_SIZE     │ size | a │
//!   └──────────┴───────────────────────────────┴──────────┘
//!   ▲          ▲                                ▲
//!   block      payload_offset(block)            footer_offset(block, size)
//! ```
//!
//! Offsets are byte indices into the arena buffer.

use crate::align::ALIGNMENT;

/// Width of a header or footer word.
pub const WORD_SIZE: usize = 8;

/// Smallest payload a block may carry.
pub const MIN_PAYLOAD: usize = 16;

/// Smallest legal block: header, footer and minimum payload.
pub const MIN_BLOCK_SIZE: usize = 2 * WORD_SIZE + MIN_PAYLOAD;

const ALLOCATED_MASK: u64 = 1;
const SIZE_MASK: u64 = !ALLOCATED_MASK;

/// The `(size, allocated)` pair written at both ends of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
  pub size: usize,
  pub allocated: bool,
}

impl Tag {
  pub fn new(
    size: usize,
    allocated: bool,
  ) -> Self {
    debug_assert_eq!(size % ALIGNMENT, 0, "block size {size} is not aligned");
    Self { size, allocated }
  }

  pub fn free(size: usize) -> Self {
    Self::new(size, false)
  }

  pub fn used(size: usize) -> Self {
    Self::new(size, true)
  }

  /// Packs the tag into one word; the allocated bit lives in the low bit.
  pub fn encode(self) -> u64 {
    self.size as u64 | self.allocated as u64
  }

  pub fn decode(word: u64) -> Self {
    Self {
      size: (word & SIZE_MASK) as usize,
      allocated: word & ALLOCATED_MASK != 0,
    }
  }
}

/// Block start for a payload offset.
pub fn block_offset(payload: usize) -> usize {
  payload - WORD_SIZE
}

/// Payload start for a block offset.
pub fn payload_offset(block: usize) -> usize {
  block + WORD_SIZE
}

pub fn footer_offset(
  block: usize,
  size: usize,
) -> usize {
  block + size - WORD_SIZE
}

/// Offset of the footer belonging to the block that ends at `block`.
pub fn prev_footer_offset(block: usize) -> usize {
  block - WORD_SIZE
}

pub fn payload_size(block_size: usize) -> usize {
  block_size - 2 * WORD_SIZE
}

/// Total block size for a payload request: header, footer and the rounded
/// payload (never below [`MIN_PAYLOAD`]). `None` if the request overflows.
pub fn adjusted_size(request: usize) -> Option<usize> {
  let payload = if request < MIN_PAYLOAD {
    MIN_PAYLOAD
  } else {
    crate::align::checked_align(request)?
  };
  payload.checked_add(2 * WORD_SIZE)
}

/// Reads the tag word at `offset`; `None` if it lies outside `bytes`.
pub fn read_tag(
  bytes: &[u8],
  offset: usize,
) -> Option<Tag> {
  read_word(bytes, offset).map(Tag::decode)
}

pub fn read_word(
  bytes: &[u8],
  offset: usize,
) -> Option<u64> {
  let word = bytes.get(offset..offset.checked_add(WORD_SIZE)?)?;
  let mut raw = [0u8; WORD_SIZE];
  raw.copy_from_slice(word);
  Some(u64::from_le_bytes(raw))
}

fn write_word(
  bytes: &mut [u8],
  offset: usize,
  word: u64,
) {
  bytes[offset..offset + WORD_SIZE].copy_from_slice(&word.to_le_bytes());
}

/// Writes matching header and footer tags for the block at `block`.
///
/// # Panics
///
/// Panics if the block does not fit inside `bytes`.
pub fn mark_block(
  bytes: &mut [u8],
  block: usize,
  tag: Tag,
) {
  let word = tag.encode();
  write_word(bytes, block, word);
  write_word(bytes, footer_offset(block, tag.size), word);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_tag_codec() {
    let tag = Tag::used(48);
    assert_eq!(tag.encode(), 49);
    assert_eq!(Tag::decode(49), tag);

    let tag = Tag::free(4096);
    assert_eq!(tag.encode(), 4096);
    assert_eq!(Tag::decode(4096), tag);
  }

  #[test]
  fn test_adjusted_size() {
    assert_eq!(adjusted_size(1), Some(32));
    assert_eq!(adjusted_size(8), Some(32));
    assert_eq!(adjusted_size(16), Some(32));
    assert_eq!(adjusted_size(17), Some(40));
    assert_eq!(adjusted_size(4000), Some(4016));
    assert_eq!(adjusted_size(usize::MAX), None);
    assert_eq!(adjusted_size(usize::MAX - 15), None);
  }

  #[test]
  fn test_offsets() {
    assert_eq!(payload_offset(64), 72);
    assert_eq!(block_offset(72), 64);
    assert_eq!(footer_offset(64, 32), 88);
    assert_eq!(prev_footer_offset(64), 56);
    assert_eq!(payload_size(32), MIN_PAYLOAD);
  }

  #[test]
  fn test_mark_block_writes_both_tags() {
    let mut bytes = vec![0u8; 128];
    mark_block(&mut bytes, 32, Tag::used(64));

    assert_eq!(read_tag(&bytes, 32), Some(Tag::used(64)));
    assert_eq!(read_tag(&bytes, 88), Some(Tag::used(64)));
    assert_eq!(read_word(&bytes, 0), Some(0));
  }

  #[test]
  fn test_read_out_of_bounds() {
    let bytes = vec![0u8; 16];
    assert_eq!(read_word(&bytes, 8), Some(0));
    assert_eq!(read_word(&bytes, 9), None);
    assert_eq!(read_word(&bytes, usize::MAX), None);
  }
}
