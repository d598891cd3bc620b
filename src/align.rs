/// Alignment unit of every block size and payload offset, in bytes.
pub const ALIGNMENT: usize = 8;

/// Rounds a size up to the allocator's alignment unit.
///
/// # Examples
///
/// ```rust
/// use tagalloc::align;
///
/// assert_eq!(align!(13), 16);
/// assert_eq!(align!(16), 16);
/// assert_eq!(align!(1), 8);
/// ```
#[macro_export]
macro_rules! align {
  ($value:expr) => {
    ($value + $crate::align::ALIGNMENT - 1) & !($crate::align::ALIGNMENT - 1)
  };
}

/// Checked form of [`align!`]: `None` when rounding would overflow.
pub fn checked_align(value: usize) -> Option<usize> {
  Some(value.checked_add(ALIGNMENT - 1)? & !(ALIGNMENT - 1))
}

/// Whether `value` sits on an alignment boundary.
pub fn is_aligned(value: usize) -> bool {
  value & (ALIGNMENT - 1) == 0
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_align() {
    let mut alignments = Vec::new();

    for i in 0..10 {
      let sizes = (ALIGNMENT * i + 1)..=(ALIGNMENT * (i + 1));

      let expected_alignment = ALIGNMENT * (i + 1);

      alignments.push((sizes, expected_alignment));
    }

    for (sizes, expected) in alignments {
      for size in sizes {
        assert_eq!(expected, align!(size));
        assert_eq!(Some(expected), checked_align(size));
      }
    }
  }

  #[test]
  fn test_align_zero() {
    assert_eq!(0, align!(0usize));
    assert!(is_aligned(0));
  }

  #[test]
  fn test_checked_align_overflow() {
    assert_eq!(None, checked_align(usize::MAX));
    assert_eq!(None, checked_align(usize::MAX - 3));
  }

  #[test]
  fn test_is_aligned() {
    assert!(is_aligned(4096));
    assert!(!is_aligned(4097));
    assert!(!is_aligned(12));
  }
}
