//! Tests for the tree walker.
//!
//! A plain recursive walker serves as the reference for emission order and
//! value alignment.

use glam::DVec3;

use super::*;
use crate::error::{CorruptionKind, HypertreeError};
use crate::test_utils::*;

/// Recursive reference: `(value, bounds)` per leaf in pre-order.
fn reference_walk(grid: &HypertreeGrid) -> Vec<(f64, CellBounds)> {
  fn visit(
    grid: &HypertreeGrid,
    index: &RankIndex,
    row: usize,
    bounds: CellBounds,
    out: &mut Vec<(f64, CellBounds)>,
  ) {
    let width = grid.branching_factor();
    let bits = grid.row_at(row);
    if bits.is_fully_masked(width) {
      return;
    }
    for slot in 0..width {
      let child = bounds.child_bounds(slot, grid.refinement(), grid.dimension());
      match bits.kind(slot) {
        SlotKind::Masked => {}
        SlotKind::Leaf => out.push((grid.data()[index.data_offset(row, slot).unwrap()], child)),
        SlotKind::Internal => visit(grid, index, index.child_row(row, slot).unwrap(), child, out),
      }
    }
  }

  let index = RankIndex::build(grid);
  let mut out = Vec::new();
  visit(grid, &index, 0, *grid.bounds(), &mut out);
  out
}

fn cell_bounds(mesh: &TreeMesh, cell: usize) -> CellBounds {
  let corners = mesh.cells[cell].map(|i| mesh.points[i]);
  CellBounds::new(corners[0], corners[6])
}

fn volume(bounds: &CellBounds) -> f64 {
  let size = bounds.size();
  size.x * size.y * size.z
}

// =============================================================================
// Fixed topologies
// =============================================================================

/// 8 leaves tile the root into octants, values in slot order.
#[test]
fn test_one_level_octree_tiles_root() {
  let grid = one_level_octree();
  let mesh = walk_grid(&grid, true).unwrap();

  assert_eq!(mesh.cell_count(), 8);
  assert_eq!(mesh.points.len(), 64);
  assert_eq!(mesh.values, (0..8).map(f64::from).collect::<Vec<_>>());

  for cell in 0..8 {
    let bounds = cell_bounds(&mesh, cell);
    assert_eq!(bounds.size(), DVec3::splat(0.5));
    assert_eq!(bounds, grid.bounds().child_bounds(cell, 2, 3));
  }
  let total: f64 = (0..8).map(|c| volume(&cell_bounds(&mesh, c))).sum();
  assert_eq!(total, 1.0);
}

#[test]
fn test_fully_masked_tree_is_empty() {
  let mesh = walk_grid(&empty_octree(), true).unwrap();
  assert!(mesh.is_empty());
  assert!(mesh.values.is_empty());
  assert!(mesh.points.is_empty());
}

/// Depth-first: the internal slot's children come before later root slots.
#[test]
fn test_two_level_preorder() {
  let grid = two_level_octree();
  let mesh = walk_grid(&grid, true).unwrap();

  assert_eq!(mesh.cell_count(), 15);
  let expected: Vec<f64> = [0, 1, 2]
    .into_iter()
    .chain(7..15)
    .chain(3..7)
    .map(f64::from)
    .collect();
  assert_eq!(mesh.values, expected);

  // Row 1 cells subdivide root slot 3: x and y high, z low
  let parent = grid.bounds().child_bounds(3, 2, 3);
  assert_eq!(parent.min, DVec3::new(0.5, 0.5, 0.0));
  for cell in 3..11 {
    let bounds = cell_bounds(&mesh, cell);
    assert!(parent.contains_point(bounds.min) && parent.contains_point(bounds.max));
    assert_eq!(bounds.size(), DVec3::splat(0.25));
  }

  let total: f64 = (0..15).map(|c| volume(&cell_bounds(&mesh, c))).sum();
  assert_eq!(total, 1.0);
}

#[test]
fn test_masked_root_two_level() {
  let mesh = walk_grid(&masked_root_two_level_octree(), true).unwrap();
  assert_eq!(mesh.cell_count(), 8);
  assert_eq!(mesh.values, (0..8).map(f64::from).collect::<Vec<_>>());
  for cell in 0..8 {
    let bounds = cell_bounds(&mesh, cell);
    assert!(bounds.max.cmple(DVec3::splat(0.5)).all());
  }
}

/// When every row's internal slot is its last, pre-order equals row-major
/// order and `data[i] = i` comes out strictly increasing.
#[test]
fn test_chain_values_strictly_increase() {
  let grid = HypertreeGrid::new(
    2,
    3,
    &UNIT_CUBE,
    vec![0x00, 0x00, 0x00],
    vec![0xFE, 0xFE, 0xFF],
    (0..22).map(f64::from).collect(),
  )
  .unwrap();
  let mesh = walk_grid(&grid, true).unwrap();

  assert_eq!(mesh.cell_count(), 22);
  assert!(mesh.values.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_quadtree_emits_flat_cells() {
  let grid = HypertreeGrid::new(
    2,
    2,
    &[0.0, 2.0, 0.0, 2.0],
    vec![0x0F],
    vec![0xF0],
    vec![1.0, 2.0, 3.0, 4.0],
  )
  .unwrap();
  let mesh = walk_grid(&grid, true).unwrap();

  assert_eq!(mesh.cell_count(), 4);
  assert!(mesh.points.iter().all(|p| p.z == 0.0));
  assert_eq!(cell_bounds(&mesh, 3).min, DVec3::new(1.0, 1.0, 0.0));
  assert_eq!(mesh.values, vec![1.0, 2.0, 3.0, 4.0]);
}

/// A fully masked child row contributes nothing but is not an error.
#[test]
fn test_fully_masked_child_row() {
  let grid = HypertreeGrid::new(
    2,
    3,
    &UNIT_CUBE,
    vec![0x00, 0xFF],
    vec![0x7F, 0x00],
    (0..7).map(f64::from).collect(),
  )
  .unwrap();
  let mesh = walk_grid(&grid, true).unwrap();
  assert_eq!(mesh.cell_count(), 7);
}

// =============================================================================
// Corruption
// =============================================================================

#[test]
fn test_missing_child_row_fails_without_partial_output() {
  // Leaves in slots 0..6, slot 7 internal with no row behind it
  let grid = HypertreeGrid::new(
    2,
    3,
    &UNIT_CUBE,
    vec![0x00],
    vec![0xFE],
    vec![0.0; 7],
  )
  .unwrap();

  for precomputed in [true, false] {
    let err = walk_grid(&grid, precomputed).unwrap_err();
    assert!(matches!(
      err,
      HypertreeError::StructuralCorruption {
        kind: CorruptionKind::ChildRowOutOfRange { child_row: 1, .. },
        ..
      }
    ));
  }
}

#[test]
fn test_dangling_row_below_masked_sibling() {
  // Root slots 0 and 1 are internal (rows 1 and 2). Row 1 is fully masked,
  // row 2 points past the end.
  let grid = HypertreeGrid::new(
    2,
    3,
    &UNIT_CUBE,
    vec![0x3F, 0xFF, 0x7F],
    vec![0x00, 0x00, 0x00],
    vec![],
  )
  .unwrap();

  let err = walk_grid(&grid, true).unwrap_err();
  assert!(err.is_structural());
  assert!(matches!(
    err,
    HypertreeError::StructuralCorruption {
      kind: CorruptionKind::ChildRowOutOfRange { row: 2, child_row: 3, .. },
      ..
    }
  ));
}

// =============================================================================
// Random topologies
// =============================================================================

#[test]
fn test_random_trees_match_reference() {
  for (seed, dimension) in (0..24).flat_map(|s| [(s, 2), (s, 3)]) {
    let grid = random_tree(seed, 2, dimension, 4);
    let mesh = walk_grid(&grid, true).unwrap();
    let reference = reference_walk(&grid);

    assert_eq!(mesh.cell_count(), grid.leaf_position_count(), "seed {}", seed);
    assert_eq!(mesh.points.len(), 8 * mesh.cell_count());
    assert_eq!(mesh.values.len(), mesh.cell_count());

    for (cell, (value, bounds)) in reference.iter().enumerate() {
      assert_eq!(mesh.values[cell], *value, "seed {} cell {}", seed, cell);
      assert_eq!(cell_bounds(&mesh, cell), *bounds, "seed {} cell {}", seed, cell);
    }

    // data[i] = i: every index is emitted exactly once
    let mut sorted = mesh.values.clone();
    sorted.sort_by(f64::total_cmp);
    let expected: Vec<f64> = (0..mesh.cell_count()).map(|i| i as f64).collect();
    assert_eq!(sorted, expected, "seed {}", seed);
  }
}

#[test]
fn test_scan_and_table_walks_agree() {
  for seed in 0..16 {
    let grid = random_tree(seed, 2, 3, 4);
    assert_eq!(
      walk_grid(&grid, true).unwrap(),
      walk_grid(&grid, false).unwrap(),
      "seed {}",
      seed
    );
  }
}
