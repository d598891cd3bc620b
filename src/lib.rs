//! # tagalloc - A Boundary-Tag Heap Allocator
//!
//! This crate provides an **implicit free list** allocator with boundary tags,
//! managing a single contiguous arena that grows at its end the way `sbrk`
//! grows the program break.
//!
//! ## Overview
//!
//! Every byte between `base` and `top` belongs to exactly one block. Each
//! block carries its size and allocation bit twice, once at each end:
//!
//! ```text
//!   Heap Layout:
//!
//!   base                                                              top
//!   ▼                                                                  ▼
//!   ┌────┬─────────┬────┬────┬──────────────┬────┬────┬──────────┬────┐
//!   │ 33 │ payload │ 33 │ 64 │     free     │ 64 │ 49 │ payload  │ 49 │ ...
//!   └────┴─────────┴────┴────┴──────────────┴────┴────┴──────────┴────┘
//!   │◄──── 32, used ────►│◄───── 64, free ──────►│◄──── 48, used ────►│
//!
//!   Header and footer hold (size | allocated). The footer lets a block
//!   inspect its predecessor in O(1).
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   tagalloc
//!   ├── align      - Alignment macro (align!) and rounding helpers
//!   ├── block      - Boundary tag codec and block addressing
//!   ├── arena      - Arena trait (growth service) and VecArena
//!   ├── search     - First-fit / forward-only next-fit placement
//!   ├── heap       - Heap: allocate, release, block walk
//!   ├── check      - Heap checker
//!   ├── config     - HeapConfig, SearchMode
//!   └── error      - Error types
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use tagalloc::Heap;
//!
//! let mut heap = Heap::new().unwrap();
//!
//! let p = heap.allocate(64).unwrap();
//! heap.payload_mut(p).unwrap()[..5].copy_from_slice(b"hello");
//! assert_eq!(&heap.payload(p).unwrap()[..5], b"hello");
//!
//! heap.release(p).unwrap();
//! assert!(heap.check_heap().is_ok());
//! ```
//!
//! ## How It Works
//!
//! - **Placement**: the search resumes from a cursor that `release` leaves at
//!   the block it just freed, and scans forward to `top` only. A fit before
//!   the cursor is not seen until a later release moves the cursor back.
//! - **Growth**: when nothing fits, the arena is extended. Requests below 256
//!   bytes take 256 bytes of slack so later small requests can reuse it.
//! - **Splitting**: a block is split only when the remainder is larger than
//!   one minimum block (header, footer, 16-byte payload).
//! - **Coalescing**: a released block merges with its successor if that is
//!   free, otherwise with its predecessor if that is free. Never both.
//!
//! ## Limitations
//!
//! - **Single-threaded only**: no synchronization; wrap a `Heap` in a lock
//!   to share it.
//! - **Partial coalescing**: adjacent free blocks can survive a release;
//!   see [`Heap::adjacent_free_runs`].
//! - **No double-free detection**: only offsets that cannot be a payload
//!   are rejected.
//! - **Offsets, not pointers**: payloads are byte offsets into the arena.

pub mod align;
pub mod arena;
pub mod block;
pub mod check;
pub mod config;
pub mod error;
mod heap;
pub mod search;

pub use arena::{Arena, VecArena};
pub use config::{HeapConfig, SearchMode};
pub use error::{AllocError, ArenaExhausted, ConfigError, HeapError, PayloadError, Violation};
pub use heap::{BlockInfo, Blocks, Heap, HeapStats};
