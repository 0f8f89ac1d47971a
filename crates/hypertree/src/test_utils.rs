//! Test utilities: fixture trees and seeded random topologies.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::grid::{HypertreeGrid, NodeSpec, TreeBuilder};

pub const UNIT_CUBE: [f64; 6] = [0.0, 1.0, 0.0, 1.0, 0.0, 1.0];
pub const UNIT_SQUARE: [f64; 4] = [0.0, 1.0, 0.0, 1.0];

// =============================================================================
// Fixed fixtures
// =============================================================================

/// One row, eight unmasked leaves, `data = [0..7]`.
pub fn one_level_octree() -> HypertreeGrid {
  HypertreeGrid::new(
    2,
    3,
    &UNIT_CUBE,
    vec![0x00],
    vec![0xFF],
    (0..8).map(f64::from).collect(),
  )
  .unwrap()
}

/// Root row with slot 3 internal and seven leaves; row 1 is eight leaves.
///
/// `data[i] = i`: root leaves take 0..7, row 1 takes 7..15.
pub fn two_level_octree() -> HypertreeGrid {
  HypertreeGrid::new(
    2,
    3,
    &UNIT_CUBE,
    vec![0x00, 0x00],
    vec![0b1110_1111, 0xFF],
    (0..15).map(f64::from).collect(),
  )
  .unwrap()
}

/// Root row whose only unmasked slot (slot 0) is internal; row 1 is eight
/// leaves. The masked root slots carry leaf flags that must be ignored.
pub fn masked_root_two_level_octree() -> HypertreeGrid {
  HypertreeGrid::new(
    2,
    3,
    &UNIT_CUBE,
    vec![0x7F, 0x00],
    vec![0x7F, 0xFF],
    (0..8).map(f64::from).collect(),
  )
  .unwrap()
}

/// Fully masked single-row tree.
pub fn empty_octree() -> HypertreeGrid {
  HypertreeGrid::new(2, 3, &UNIT_CUBE, vec![0xFF], vec![0x00], vec![]).unwrap()
}

// =============================================================================
// Random topologies
// =============================================================================

/// Random children for one node. Internal nodes only appear above `depth` 0.
pub fn random_children(rng: &mut StdRng, width: usize, depth: usize) -> Vec<NodeSpec> {
  (0..width)
    .map(|_| {
      let roll = rng.random_range(0..10);
      match roll {
        0..=2 => NodeSpec::Masked,
        3..=6 => NodeSpec::Leaf(0.0),
        _ if depth == 0 => NodeSpec::Leaf(0.0),
        _ => NodeSpec::Internal(random_children(rng, width, depth - 1)),
      }
    })
    .collect()
}

/// Seeded random tree whose data is `data[i] = i`.
pub fn random_tree(seed: u64, refinement: usize, dimension: usize, depth: usize) -> HypertreeGrid {
  let mut rng = StdRng::seed_from_u64(seed);
  let bounds: &[f64] = if dimension == 3 {
    &UNIT_CUBE
  } else {
    &UNIT_SQUARE
  };
  let width = refinement.pow(dimension as u32);
  let root = random_children(&mut rng, width, depth);
  let grid = TreeBuilder::new(refinement, dimension, bounds)
    .build(&root)
    .unwrap();
  with_index_data(&grid, bounds)
}

/// Same topology as `grid`, with `data[i] = i`.
pub fn with_index_data(grid: &HypertreeGrid, bounds: &[f64]) -> HypertreeGrid {
  HypertreeGrid::new(
    grid.refinement(),
    grid.dimension(),
    bounds,
    grid.child_mask().to_vec(),
    grid.child_is_leaf().to_vec(),
    (0..grid.leaf_position_count()).map(|i| i as f64).collect(),
  )
  .unwrap()
}
