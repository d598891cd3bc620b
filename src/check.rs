//! Read-only consistency checks over the block list.

use crate::block::{Tag, WORD_SIZE, read_tag, read_word};
use crate::error::Violation;

/// Walks `[base, top)` block by block.
///
/// Reports every block whose header and footer tags differ, and a
/// [`Violation::MissedTop`] if the walk does not land exactly on `top`. A block
/// too short to hold its own tags, or one that runs off the buffer, ends the
/// walk early.
pub fn check_heap(
  bytes: &[u8],
  base: usize,
  top: usize,
) -> Result<(), Vec<Violation>> {
  let mut violations = Vec::new();

  let mut p = base;
  let mut stalled = false;
  while p < top {
    let Some(header) = read_word(bytes, p) else {
      violations.push(Violation::Overrun {
        offset: p,
        size: WORD_SIZE,
      });
      stalled = true;
      break;
    };

    let size = Tag::decode(header).size;
    if size < 2 * WORD_SIZE {
      violations.push(Violation::Undersized { offset: p, size });
      stalled = true;
      break;
    }

    let footer = p
      .checked_add(size)
      .and_then(|end| read_word(bytes, end - WORD_SIZE));
    let Some(footer) = footer else {
      violations.push(Violation::Overrun { offset: p, size });
      stalled = true;
      break;
    };

    if header != footer {
      violations.push(Violation::TagMismatch {
        offset: p,
        header,
        footer,
      });
    }

    p += size;
  }

  if !stalled && p != top {
    violations.push(Violation::MissedTop { reached: p, top });
  }

  if violations.is_empty() {
    Ok(())
  } else {
    Err(violations)
  }
}

/// Offsets of adjacent free pairs `(left, right)` that were never merged.
///
/// Release merges with at most one neighbour, so these runs are expected;
/// this is a diagnostic, not a violation.
pub fn adjacent_free_runs(
  bytes: &[u8],
  base: usize,
  top: usize,
) -> Vec<(usize, usize)> {
  let mut runs = Vec::new();
  let mut previous_free: Option<usize> = None;

  let mut p = base;
  while p < top {
    let Some(tag) = read_tag(bytes, p) else { break };
    if tag.size == 0 {
      break;
    }

    if !tag.allocated {
      if let Some(left) = previous_free {
        runs.push((left, p));
      }
      previous_free = Some(p);
    } else {
      previous_free = None;
    }

    p += tag.size;
  }

  runs
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::block::{Tag, mark_block};

  #[test]
  fn test_clean_heap() {
    let mut bytes = vec![0u8; 128];
    mark_block(&mut bytes, 0, Tag::used(32));
    mark_block(&mut bytes, 32, Tag::free(96));

    assert_eq!(check_heap(&bytes, 0, 128), Ok(()));
  }

  #[test]
  fn test_tag_mismatch() {
    let mut bytes = vec![0u8; 128];
    mark_block(&mut bytes, 0, Tag::used(32));
    mark_block(&mut bytes, 32, Tag::free(96));
    // Flip the allocated bit in the first footer only.
    bytes[24] = 32;

    assert_eq!(
      check_heap(&bytes, 0, 128),
      Err(vec![Violation::TagMismatch {
        offset: 0,
        header: 33,
        footer: 32,
      }])
    );
  }

  #[test]
  fn test_block_overshoots_top() {
    let mut bytes = vec![0u8; 160];
    mark_block(&mut bytes, 0, Tag::used(32));
    mark_block(&mut bytes, 32, Tag::free(128));

    assert_eq!(
      check_heap(&bytes, 0, 128),
      Err(vec![Violation::MissedTop {
        reached: 160,
        top: 128
      }])
    );
  }

  #[test]
  fn test_block_runs_off_buffer() {
    let mut bytes = vec![0u8; 64];
    mark_block(&mut bytes, 0, Tag::used(32));
    bytes[32] = 0x80;

    assert_eq!(
      check_heap(&bytes, 0, 64),
      Err(vec![Violation::Overrun {
        offset: 32,
        size: 128
      }])
    );
  }

  #[test]
  fn test_block_undershoots_top() {
    let mut bytes = vec![0u8; 128];
    mark_block(&mut bytes, 0, Tag::used(32));
    mark_block(&mut bytes, 32, Tag::free(64));

    // The walk stops on the zeroed word where the next block should start.
    assert_eq!(
      check_heap(&bytes, 0, 128),
      Err(vec![Violation::Undersized { offset: 96, size: 0 }])
    );
  }

  #[test]
  fn test_undersized_block_stops_walk() {
    let bytes = vec![0u8; 64];

    assert_eq!(
      check_heap(&bytes, 0, 64),
      Err(vec![Violation::Undersized { offset: 0, size: 0 }])
    );
  }

  #[test]
  fn test_adjacent_free_runs() {
    let mut bytes = vec![0u8; 160];
    mark_block(&mut bytes, 0, Tag::free(32));
    mark_block(&mut bytes, 32, Tag::free(64));
    mark_block(&mut bytes, 96, Tag::used(32));
    mark_block(&mut bytes, 128, Tag::free(32));

    assert_eq!(adjacent_free_runs(&bytes, 0, 160), vec![(0, 32)]);
    assert_eq!(check_heap(&bytes, 0, 160), Ok(()));
  }
}
