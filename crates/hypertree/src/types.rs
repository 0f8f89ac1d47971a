//! Core data types for hypertree conversion: the output mesh and the
//! conversion configuration.

use glam::DVec3;

use crate::constants::{DEFAULT_FIELD_NAME, POINTS_PER_CELL, VTK_HEXAHEDRON};
use crate::grid::CellBounds;

/// Hexahedron connectivity: 8 point indices in VTK corner order.
pub type HexCell = [usize; POINTS_PER_CELL];

/// Named per-cell scalar field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScalarField {
  pub name: String,
  /// One value per cell, in cell emission order.
  pub values: Vec<f64>,
}

impl ScalarField {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      values: Vec::new(),
    }
  }
}

/// Private output buffer of a single tree walk.
///
/// Point indices are local to the tree; [`OutputMesh::append_tree`] rebases
/// them when the buffer is merged.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreeMesh {
  pub points: Vec<DVec3>,
  pub cells: Vec<HexCell>,
  pub values: Vec<f64>,
}

impl TreeMesh {
  pub fn new() -> Self {
    Self::default()
  }

  /// Reserve room for `cells` voxels.
  pub fn with_capacity(cells: usize) -> Self {
    Self {
      points: Vec::with_capacity(cells * POINTS_PER_CELL),
      cells: Vec::with_capacity(cells),
      values: Vec::with_capacity(cells),
    }
  }

  /// Append one voxel: 8 fresh corner points, one cell, one value.
  pub fn push_voxel(&mut self, bounds: &CellBounds, value: f64) {
    let base = self.points.len();
    self.points.extend_from_slice(&bounds.corners());
    self.cells.push(std::array::from_fn(|corner| base + corner));
    self.values.push(value);
  }

  pub fn cell_count(&self) -> usize {
    self.cells.len()
  }

  /// Returns true if no voxel was emitted.
  pub fn is_empty(&self) -> bool {
    self.cells.is_empty()
  }
}

/// Explicit hexahedral mesh with one named scalar per cell.
///
/// Adjacent voxels never share points: every cell owns 8 points.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputMesh {
  pub points: Vec<DVec3>,
  pub cells: Vec<HexCell>,
  pub field: ScalarField,
}

impl Default for OutputMesh {
  fn default() -> Self {
    Self::new(DEFAULT_FIELD_NAME)
  }
}

impl OutputMesh {
  pub fn new(field_name: impl Into<String>) -> Self {
    Self {
      points: Vec::new(),
      cells: Vec::new(),
      field: ScalarField::new(field_name),
    }
  }

  /// Reserve room for `cells` more voxels.
  pub fn reserve(&mut self, cells: usize) {
    self.points.reserve(cells * POINTS_PER_CELL);
    self.cells.reserve(cells);
    self.field.values.reserve(cells);
  }

  /// Merge one tree's buffer, rebasing its point indices.
  pub fn append_tree(&mut self, tree: TreeMesh) {
    let offset = self.points.len();
    self.points.extend(tree.points);
    self
      .cells
      .extend(tree.cells.into_iter().map(|cell| cell.map(|i| i + offset)));
    self.field.values.extend(tree.values);
  }

  /// Concatenate another mesh after this one. The field keeps this mesh's name.
  pub fn append(&mut self, other: OutputMesh) {
    self.append_tree(TreeMesh {
      points: other.points,
      cells: other.cells,
      values: other.field.values,
    });
  }

  pub fn cell_count(&self) -> usize {
    self.cells.len()
  }

  pub fn point_count(&self) -> usize {
    self.points.len()
  }

  /// Returns true if no geometry was generated.
  pub fn is_empty(&self) -> bool {
    self.cells.is_empty()
  }

  /// Corner positions of cell `index`.
  ///
  /// # Panics
  /// If `index >= cell_count()`.
  pub fn cell_points(&self, index: usize) -> [DVec3; POINTS_PER_CELL] {
    self.cells[index].map(|i| self.points[i])
  }

  /// Axis-aligned box spanned by cell `index`.
  ///
  /// # Panics
  /// If `index >= cell_count()`.
  pub fn cell_bounds(&self, index: usize) -> CellBounds {
    let corners = self.cell_points(index);
    let min = corners.iter().copied().fold(DVec3::INFINITY, DVec3::min);
    let max = corners.iter().copied().fold(DVec3::NEG_INFINITY, DVec3::max);
    CellBounds::new(min, max)
  }

  /// Box around every point, or `None` for an empty mesh.
  pub fn bounds(&self) -> Option<CellBounds> {
    if self.points.is_empty() {
      return None;
    }
    let min = self.points.iter().copied().fold(DVec3::INFINITY, DVec3::min);
    let max = self.points.iter().copied().fold(DVec3::NEG_INFINITY, DVec3::max);
    Some(CellBounds::new(min, max))
  }

  /// VTK cell type of every cell (all hexahedra).
  pub fn cell_types(&self) -> impl Iterator<Item = u8> + '_ {
    self.cells.iter().map(|_| VTK_HEXAHEDRON)
  }
}

// =============================================================================
// Statistics
// =============================================================================

/// Outcome of one tree's walk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeReport {
  /// Index of the tree in its forest.
  pub tree: usize,
  /// Cells emitted (0 for a skipped tree).
  pub cells: usize,
  /// Walk time in microseconds.
  pub walk_us: u64,
  pub skipped: bool,
}

/// Counts and timings for one conversion call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversionStats {
  pub trees: usize,
  pub converted: usize,
  pub skipped: usize,
  pub cells: usize,
  pub points: usize,
  /// Per-tree reports in forest order.
  pub reports: Vec<TreeReport>,
  /// Wall time of the walk stage (all trees).
  pub walk_us: u64,
  /// Time spent merging tree buffers into the output mesh.
  pub merge_us: u64,
  pub total_us: u64,
}

impl ConversionStats {
  /// Sum of per-tree walk times. Exceeds `walk_us` when trees ran in parallel.
  pub fn tree_walk_us(&self) -> u64 {
    self.reports.iter().map(|r| r.walk_us).sum()
  }
}

// =============================================================================
// Configuration
// =============================================================================

/// What to do when one tree of a forest turns out to be corrupt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CorruptTreePolicy {
  /// Fail the whole conversion with the first failing tree's error.
  #[default]
  Abort,
  /// Drop the tree (zero cells) and keep converting the rest.
  Skip,
}

/// Configuration for forest conversion.
#[derive(Clone, Debug)]
pub struct ConvertConfig {
  /// Walk trees on the rayon pool. Output order does not depend on this.
  pub parallel: bool,

  /// Handling of trees whose walk fails.
  pub on_corrupt_tree: CorruptTreePolicy,

  /// Build a prefix-sum table per tree (O(1) lookups) instead of rescanning
  /// the row prefix on every lookup.
  pub precomputed_ranks: bool,
}

impl Default for ConvertConfig {
  fn default() -> Self {
    Self {
      parallel: true,
      on_corrupt_tree: CorruptTreePolicy::default(),
      precomputed_ranks: true,
    }
  }
}

impl ConvertConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_parallel(mut self, parallel: bool) -> Self {
    self.parallel = parallel;
    self
  }

  pub fn with_corrupt_tree_policy(mut self, policy: CorruptTreePolicy) -> Self {
    self.on_corrupt_tree = policy;
    self
  }

  pub fn with_precomputed_ranks(mut self, precomputed: bool) -> Self {
    self.precomputed_ranks = precomputed;
    self
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
