use std::io::Read;

use tagalloc::{Heap, HeapConfig, SearchMode, VecArena};

/// Waits until the user presses ENTER, when `--step` is given.
fn pause(step: bool) {
  if step {
    println!("\n>>> Press ENTER to continue...");
    let _ = std::io::stdin().bytes().next();
  }
}

/// Prints every block between base and top.
fn print_heap(
  label: &str,
  heap: &Heap,
) {
  println!(
    "[{}] base = {}, top = {}, cursor = {}",
    label,
    heap.base(),
    heap.top(),
    heap.cursor()
  );
  for block in heap.blocks() {
    println!(
      "    {:>6}  {:>6} bytes  {}",
      block.offset,
      block.size,
      if block.allocated { "used" } else { "free" }
    );
  }
  match heap.check_heap() {
    Ok(()) => println!("    heap ok"),
    Err(violations) => {
      for violation in violations {
        println!("    violation: {violation}");
      }
    }
  }
}

fn main() {
  env_logger::init();
  let step = std::env::args().any(|arg| arg == "--step");

  let config = HeapConfig::new(128).with_search(SearchMode::NextFit);
  let mut heap = match Heap::with_config(VecArena::new(), config) {
    Ok(heap) => heap,
    Err(err) => {
      eprintln!("cannot start heap: {err}");
      return;
    }
  };
  print_heap("start", &heap);
  pause(step);

  // --------------------------------------------------------------------
  // 1) Three small allocations fill the initial 128-byte chunk.
  // --------------------------------------------------------------------
  let a = heap.allocate(16).unwrap();
  let b = heap.allocate(16).unwrap();
  let c = heap.allocate(16).unwrap();
  heap.payload_mut(b).unwrap()[..4].copy_from_slice(&0xDEADBEEFu32.to_le_bytes());
  print_heap("1: a, b, c", &heap);
  pause(step);

  // --------------------------------------------------------------------
  // 2) Release a, then c. Neither has a free neighbour yet.
  // --------------------------------------------------------------------
  heap.release(a).unwrap();
  heap.release(c).unwrap();
  print_heap("2: release a, c", &heap);
  pause(step);

  // --------------------------------------------------------------------
  // 3) Two more small requests. The first reuses c's block at the cursor;
  //    the second grows the arena even though a's block is free, because
  //    the search never looks behind the cursor.
  // --------------------------------------------------------------------
  let d = heap.allocate(16).unwrap();
  let e = heap.allocate(16).unwrap();
  println!("\n[3] d = {d}, e = {e}");
  print_heap("3: d, e", &heap);
  pause(step);

  // --------------------------------------------------------------------
  // 4) Release b: its successor is in use, its predecessor (a) is free,
  //    so b merges backwards.
  // --------------------------------------------------------------------
  heap.release(b).unwrap();
  print_heap("4: release b", &heap);
  println!("    stats: {:?}", heap.stats());
}
