use log::{debug, trace, warn};

use crate::{
  align,
  align::{ALIGNMENT, is_aligned},
  arena::{Arena, VecArena},
  block::{
    MIN_BLOCK_SIZE, Tag, WORD_SIZE, adjusted_size, block_offset, mark_block, payload_offset,
    payload_size, prev_footer_offset, read_tag,
  },
  check,
  config::{HeapConfig, SearchMode},
  error::{AllocError, ArenaExhausted, HeapError, PayloadError, Violation},
  search::{self, Fit},
};

/// One block as seen by [`Heap::blocks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
  pub offset: usize,
  pub size: usize,
  pub allocated: bool,
}

impl BlockInfo {
  pub fn payload(&self) -> usize {
    payload_offset(self.offset)
  }
}

/// Block and byte totals over the whole heap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapStats {
  pub blocks: usize,
  pub free_blocks: usize,
  pub allocated_blocks: usize,
  pub free_bytes: usize,
  pub allocated_bytes: usize,
  /// `top - base`.
  pub heap_bytes: usize,
}

/// A boundary-tag allocator over a single growable arena.
///
/// Blocks tile `[base, top)` exactly. Placement resumes from a cursor that
/// only `release` moves, and never wraps back to `base`.
#[derive(Debug)]
pub struct Heap<A: Arena = VecArena> {
  arena: A,
  base: usize,
  top: usize,
  cursor: usize,
  config: HeapConfig,
}

impl Heap<VecArena> {
  /// A heap over an unbounded [`VecArena`] with the default configuration.
  pub fn new() -> Result<Self, HeapError> {
    Self::with_config(VecArena::new(), HeapConfig::default())
  }
}

impl<A: Arena> Heap<A> {
  /// Grows `arena` by one chunk plus alignment slack and lays a single free
  /// block over the aligned chunk.
  pub fn with_config(
    mut arena: A,
    config: HeapConfig,
  ) -> Result<Self, HeapError> {
    config.validate()?;

    let request = config
      .chunk_size
      .checked_add(ALIGNMENT)
      .ok_or(ArenaExhausted {
        requested: config.chunk_size,
        end: arena.end(),
      })?;
    let start = arena.extend(request)?;

    let base = align!(start);
    let top = base + config.chunk_size;
    mark_block(arena.bytes_mut(), base, Tag::free(config.chunk_size));

    debug!(
      "heap initialized: base = {}, top = {}, search = {:?}",
      base, top, config.search
    );

    Ok(Self {
      arena,
      base,
      top,
      cursor: base,
      config,
    })
  }

  /// Allocates a block with at least `size` payload bytes and returns the
  /// payload offset.
  ///
  /// On failure no block tag has been touched and `top` is unchanged.
  pub fn allocate(
    &mut self,
    size: usize,
  ) -> Result<usize, AllocError> {
    if size == 0 {
      return Err(AllocError::ZeroSize);
    }

    let exhausted = AllocError::ArenaExhausted { requested: size };
    let total = adjusted_size(size).ok_or(exhausted)?;

    let bytes = self.arena.bytes();
    let found = match self.config.search {
      SearchMode::FirstFit => search::first_fit(bytes, self.base, self.top, total),
      SearchMode::NextFit => search::next_fit(bytes, self.cursor, self.top, total),
    };
    let fit = match found {
      Some(fit) => {
        trace!("allocate({}): fit at {} of size {}", size, fit.offset, fit.size);
        fit
      }
      None => self.grow(total).ok_or(exhausted)?,
    };

    let excess = fit.size - total;
    let bytes = self.arena.bytes_mut();

    if excess <= MIN_BLOCK_SIZE {
      mark_block(bytes, fit.offset, Tag::used(fit.size));
    } else {
      mark_block(bytes, fit.offset, Tag::used(total));
      mark_block(bytes, fit.offset + total, Tag::free(excess));
      trace!(
        "allocate({}): split {} into {} + {}",
        size, fit.offset, total, excess
      );
    }

    Ok(payload_offset(fit.offset))
  }

  /// Extends the arena for a block of `total` bytes and returns the new
  /// region, placed at the old `top`. Small requests take extra slack.
  fn grow(
    &mut self,
    total: usize,
  ) -> Option<Fit> {
    let amount = if total < self.config.small_request_threshold {
      total.checked_add(self.config.growth_slack)?
    } else {
      total
    };

    match self.arena.extend(amount) {
      Ok(previous_end) => {
        debug!(
          "arena grew by {} bytes (previous end {}), top {} -> {}",
          amount,
          previous_end,
          self.top,
          self.top + amount
        );
      }
      Err(err) => {
        warn!("allocation of {} bytes failed: {}", total, err);
        return None;
      }
    }

    let offset = self.top;
    self.top += amount;

    Some(Fit {
      offset,
      size: amount,
    })
  }

  /// Frees the block whose payload starts at `payload`, merging it with at
  /// most one free neighbour: the successor if it is free, otherwise the
  /// predecessor. The cursor moves to the start of the freed block.
  ///
  /// Releasing a payload that is not currently allocated is not detected and
  /// may corrupt the heap; [`Heap::check_heap`] can reveal some of that later.
  pub fn release(
    &mut self,
    payload: usize,
  ) -> Result<(), PayloadError> {
    let tag = self.block_at(payload)?;

    let mut block = block_offset(payload);
    let mut size = tag.size;

    let bytes = self.arena.bytes();
    let next = block + size;
    // Neighbour tags that cannot describe a block inside the heap are ignored.
    let successor = (next < self.top)
      .then(|| read_tag(bytes, next))
      .flatten()
      .filter(|succ| {
        succ.size >= MIN_BLOCK_SIZE
          && next
            .checked_add(succ.size)
            .is_some_and(|end| end <= self.top)
      });
    let predecessor = (block > self.base)
      .then(|| read_tag(bytes, prev_footer_offset(block)))
      .flatten()
      .filter(|pred| pred.size >= MIN_BLOCK_SIZE && pred.size <= block - self.base);

    match (predecessor, successor) {
      (_, Some(succ)) if !succ.allocated => {
        trace!("release({}): merging successor at {}", payload, next);
        size += succ.size;
      }
      (Some(pred), _) if !pred.allocated => {
        trace!(
          "release({}): merging predecessor at {}",
          payload,
          block - pred.size
        );
        size += pred.size;
        block -= pred.size;
      }
      _ => {}
    }

    mark_block(self.arena.bytes_mut(), block, Tag::free(size));
    self.cursor = block;

    Ok(())
  }

  /// Tag of the block whose payload starts at `payload`, if that offset can
  /// be a payload of this heap.
  fn block_at(
    &self,
    payload: usize,
  ) -> Result<Tag, PayloadError> {
    if payload < self.base + WORD_SIZE || payload >= self.top {
      return Err(PayloadError::OutOfBounds { offset: payload });
    }
    if !is_aligned(payload) {
      return Err(PayloadError::Misaligned { offset: payload });
    }

    let block = block_offset(payload);
    match read_tag(self.arena.bytes(), block) {
      Some(tag)
        if tag.size >= MIN_BLOCK_SIZE
          && block.checked_add(tag.size).is_some_and(|end| end <= self.top) =>
      {
        Ok(tag)
      }
      _ => Err(PayloadError::OutOfBounds { offset: payload }),
    }
  }

  /// Payload bytes of the block whose payload starts at `payload`.
  pub fn payload(
    &self,
    payload: usize,
  ) -> Result<&[u8], PayloadError> {
    let tag = self.block_at(payload)?;
    Ok(&self.arena.bytes()[payload..payload + payload_size(tag.size)])
  }

  pub fn payload_mut(
    &mut self,
    payload: usize,
  ) -> Result<&mut [u8], PayloadError> {
    let tag = self.block_at(payload)?;
    Ok(&mut self.arena.bytes_mut()[payload..payload + payload_size(tag.size)])
  }

  /// Validates the block list; see [`check::check_heap`].
  pub fn check_heap(&self) -> Result<(), Vec<Violation>> {
    check::check_heap(self.arena.bytes(), self.base, self.top)
  }

  /// Adjacent free blocks left unmerged by single-neighbour coalescing.
  pub fn adjacent_free_runs(&self) -> Vec<(usize, usize)> {
    check::adjacent_free_runs(self.arena.bytes(), self.base, self.top)
  }

  /// Iterates blocks from `base` to `top`, stopping early at a malformed block.
  pub fn blocks(&self) -> Blocks<'_> {
    Blocks {
      bytes: self.arena.bytes(),
      offset: self.base,
      top: self.top,
    }
  }

  pub fn stats(&self) -> HeapStats {
    let mut stats = HeapStats {
      heap_bytes: self.top - self.base,
      ..HeapStats::default()
    };

    for block in self.blocks() {
      stats.blocks += 1;
      if block.allocated {
        stats.allocated_blocks += 1;
        stats.allocated_bytes += block.size;
      } else {
        stats.free_blocks += 1;
        stats.free_bytes += block.size;
      }
    }

    stats
  }

  pub fn base(&self) -> usize {
    self.base
  }

  pub fn top(&self) -> usize {
    self.top
  }

  /// Where the next next-fit search starts.
  pub fn cursor(&self) -> usize {
    self.cursor
  }

  pub fn config(&self) -> &HeapConfig {
    &self.config
  }

  pub fn arena(&self) -> &A {
    &self.arena
  }
}

/// Iterator over the blocks of a [`Heap`].
pub struct Blocks<'a> {
  bytes: &'a [u8],
  offset: usize,
  top: usize,
}

impl Iterator for Blocks<'_> {
  type Item = BlockInfo;

  fn next(&mut self) -> Option<Self::Item> {
    if self.offset >= self.top {
      return None;
    }

    let tag = read_tag(self.bytes, self.offset)?;
    let end = self.offset.checked_add(tag.size)?;
    if tag.size < MIN_BLOCK_SIZE || end > self.top {
      self.offset = self.top;
      return None;
    }

    let info = BlockInfo {
      offset: self.offset,
      size: tag.size,
      allocated: tag.allocated,
    };
    self.offset = end;

    Some(info)
  }
}
