use super::*;
use crate::bitrow::SlotKind;
use crate::test_utils::*;

fn corruption(err: HypertreeError) -> CorruptionKind {
  match err {
    HypertreeError::StructuralCorruption { kind, .. } => kind,
    other => panic!("Expected structural corruption, got {:?}", other),
  }
}

/// Every `(row, slot, kind)` in row-major, slot-major order.
fn positions(grid: &HypertreeGrid) -> Vec<(usize, usize, SlotKind)> {
  let width = grid.branching_factor();
  grid
    .rows()
    .enumerate()
    .flat_map(|(row, bits)| bits.slots(width).map(move |(slot, kind)| (row, slot, kind)))
    .collect()
}

// =========================================================================
// Fixed topologies
// =========================================================================

#[test]
fn test_one_level_offsets_follow_slots() {
  let grid = one_level_octree();
  let index = RankIndex::build(&grid);
  for slot in 0..8 {
    assert_eq!(index.data_offset(0, slot).unwrap(), slot);
  }
  assert_eq!(index.leaf_total(), 8);
  assert_eq!(index.internal_total(), 0);
}

/// Internal slot resolves to row 1; row 1 numbering continues after row 0.
#[test]
fn test_two_level_child_row_and_offsets() {
  let grid = two_level_octree();
  let index = RankIndex::build(&grid);

  assert_eq!(index.child_row(0, 3).unwrap(), 1);

  // Root leaves: slots 0,1,2 -> 0,1,2 and slots 4..7 -> 3..6
  assert_eq!(index.data_offset(0, 2).unwrap(), 2);
  assert_eq!(index.data_offset(0, 4).unwrap(), 3);
  assert_eq!(index.data_offset(0, 7).unwrap(), 6);

  // Row 1 continues at 7
  for slot in 0..8 {
    assert_eq!(index.data_offset(1, slot).unwrap(), 7 + slot);
  }
}

#[test]
fn test_masked_root_two_level() {
  let grid = masked_root_two_level_octree();
  let index = RankIndex::build(&grid);

  assert_eq!(index.child_row(0, 0).unwrap(), 1);
  assert_eq!(index.data_offset(1, 0).unwrap(), 0);
  assert_eq!(index.data_offset(1, 7).unwrap(), 7);
}

// =========================================================================
// Corruption
// =========================================================================

#[test]
fn test_child_row_past_end() {
  // Slot 0 is internal but no row 1 exists
  let grid = HypertreeGrid::new(2, 3, &UNIT_CUBE, vec![0x7F], vec![0x00], vec![]).unwrap();
  let err = RankIndex::build(&grid).child_row(0, 0).unwrap_err();
  assert_eq!(
    corruption(err),
    CorruptionKind::ChildRowOutOfRange {
      row: 0,
      slot: 0,
      child_row: 1,
      rows: 1,
    }
  );
}

#[test]
fn test_child_row_pointing_backwards() {
  // Row 1 has no internal slots, so row 2's internal slot ranks as row 2
  let grid = HypertreeGrid::new(
    2,
    3,
    &UNIT_CUBE,
    vec![0x7F, 0xFF, 0x7F],
    vec![0x00, 0x00, 0x00],
    vec![],
  )
  .unwrap();

  for index in [&RankIndex::build(&grid) as &dyn RankLookup, &ScanRank::new(&grid)] {
    let err = index.child_row(2, 0).unwrap_err();
    assert_eq!(
      corruption(err),
      CorruptionKind::ChildRowNotForward {
        row: 2,
        slot: 0,
        child_row: 2,
      }
    );
  }
}

#[test]
fn test_data_offset_past_end() {
  // Seven leaves then an internal slot: no data slot 7 exists
  let grid = HypertreeGrid::new(
    2,
    3,
    &UNIT_CUBE,
    vec![0x00, 0xFF],
    vec![0xFE, 0x00],
    vec![0.0; 7],
  )
  .unwrap();
  let err = RankIndex::build(&grid).data_offset(0, 7).unwrap_err();
  assert_eq!(
    corruption(err),
    CorruptionKind::DataOffsetOutOfRange {
      row: 0,
      slot: 7,
      offset: 7,
      len: 7,
    }
  );
}

#[test]
fn test_row_out_of_range() {
  let grid = one_level_octree();
  let err = RankIndex::build(&grid).data_offset(1, 0).unwrap_err();
  assert_eq!(corruption(err), CorruptionKind::RowOutOfRange { row: 1, rows: 1 });
}

// =========================================================================
// Properties over random trees
// =========================================================================

/// Raw ranks never decrease in (row, slot) order.
#[test]
fn test_ranks_are_monotonic() {
  for seed in 0..32 {
    let grid = random_tree(seed, 2, 3, 3);
    let index = RankIndex::build(&grid);
    let mut last = (0, 0);
    for (row, slot, _) in positions(&grid) {
      let current = (
        index.leaves_before(row, slot),
        index.internals_through(row, slot),
      );
      assert!(current.0 >= last.0, "leaf rank decreased at ({}, {})", row, slot);
      assert!(current.1 >= last.1, "internal rank decreased at ({}, {})", row, slot);
      last = current;
    }
  }
}

/// Leaves map to 0..n without repeats; internal slots map to 1..rows.
#[test]
fn test_ranks_are_injective() {
  for seed in 0..32 {
    let grid = random_tree(seed, 2, 3, 3);
    let index = RankIndex::build(&grid);

    let mut offsets = Vec::new();
    let mut rows = Vec::new();
    for (row, slot, kind) in positions(&grid) {
      match kind {
        SlotKind::Leaf => offsets.push(index.data_offset(row, slot).unwrap()),
        SlotKind::Internal => rows.push(index.child_row(row, slot).unwrap()),
        SlotKind::Masked => {}
      }
    }

    assert_eq!(offsets, (0..grid.data().len()).collect::<Vec<_>>(), "seed {}", seed);
    assert_eq!(rows, (1..grid.row_count()).collect::<Vec<_>>(), "seed {}", seed);
  }
}

/// The prefix table and the per-query scan agree everywhere.
#[test]
fn test_prefix_table_matches_scan() {
  for (seed, dimension) in (0..16).flat_map(|s| [(s, 2), (s, 3)]) {
    let grid = random_tree(seed, 2, dimension, 4);
    let table = RankIndex::build(&grid);
    let scan = ScanRank::new(&grid);
    for (row, slot, _) in positions(&grid) {
      assert_eq!(table.leaves_before(row, slot), scan.leaves_before(row, slot));
      assert_eq!(
        table.internals_through(row, slot),
        scan.internals_through(row, slot)
      );
    }
  }
}

/// Quadtree rows with garbage in the low nibble rank as if it were masked.
#[test]
fn test_quadtree_ranks_ignore_low_bits() {
  let clean = HypertreeGrid::new(
    2,
    2,
    &UNIT_SQUARE,
    vec![0x0F, 0x0F],
    vec![0xB0, 0xF0],
    vec![0.0; 7],
  )
  .unwrap();
  let noisy = HypertreeGrid::new(
    2,
    2,
    &UNIT_SQUARE,
    vec![0x05, 0x0A],
    vec![0xBA, 0xF5],
    vec![0.0; 7],
  )
  .unwrap();

  let (a, b) = (RankIndex::build(&clean), RankIndex::build(&noisy));
  assert_eq!(a.child_row(0, 1).unwrap(), 1);
  assert_eq!(b.child_row(0, 1).unwrap(), 1);
  for slot in 0..4 {
    assert_eq!(a.leaves_before(1, slot), b.leaves_before(1, slot));
  }
}
