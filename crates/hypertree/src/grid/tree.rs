//! HypertreeGrid - one adaptive tree stored as flat bit-packed rows.
//!
//! ```text
//! row:            0          1
//! child_mask:   [ 0x00 ]   [ 0xF0 ]      bit set = slot pruned
//! child_is_leaf:[ 0x7F ]   [ 0x0F ]      bit set = slot is a leaf
//! data:         [ d0 d1 .. d6 | d7 d8 d9 d10 ]        one value per unmasked leaf,
//!                 └── row 0 ──┘ └── row 1 ──┘          row-major, slot-major
//! ```
//!
//! Rows of internal children are not linked by pointers. Row `k` belongs to
//! the `k`-th unmasked internal slot in row-major, slot-major order; see
//! [`super::rank`].

use super::bounds::CellBounds;
use crate::bitrow::BitRow;
use crate::constants::{MAX_BRANCHING_FACTOR, SUPPORTED_DIMENSIONS};
use crate::error::{CorruptionKind, HypertreeError, Result};

/// One adaptive tree of a hypertree forest. Immutable once validated.
#[derive(Clone, Debug, PartialEq)]
pub struct HypertreeGrid {
  refinement: usize,
  dimension: usize,
  branching_factor: usize,
  bounds: CellBounds,
  child_mask: Vec<u8>,
  child_is_leaf: Vec<u8>,
  data: Vec<f64>,
}

/// Branching factor for a supported `(refinement, dimension)` pair.
///
/// Supported means the bisector has a rule for it and the children fit in
/// one row byte: `dimension` in 2..=3, `refinement >= 2`,
/// `refinement^dimension <= 8`.
pub fn branching_factor(refinement: usize, dimension: usize) -> Result<usize> {
  let unsupported = HypertreeError::UnsupportedBranchingFactor {
    tree: None,
    refinement,
    dimension,
  };
  if !SUPPORTED_DIMENSIONS.contains(&dimension) || refinement < 2 {
    return Err(unsupported);
  }
  match refinement.checked_pow(dimension as u32) {
    Some(factor) if factor <= MAX_BRANCHING_FACTOR => Ok(factor),
    _ => Err(unsupported),
  }
}

impl HypertreeGrid {
  /// Validate and build a tree.
  ///
  /// Checks, in order: the branching configuration, the bounds, that the
  /// two row arrays are aligned and non-empty, and that `data` holds exactly
  /// one value per unmasked leaf slot.
  pub fn new(
    refinement: usize,
    dimension: usize,
    bounds: &[f64],
    child_mask: Vec<u8>,
    child_is_leaf: Vec<u8>,
    data: Vec<f64>,
  ) -> Result<Self> {
    let branching_factor = branching_factor(refinement, dimension)?;
    let bounds = CellBounds::from_slice(bounds, dimension)?;

    if child_mask.len() != child_is_leaf.len() {
      return Err(HypertreeError::corrupt(CorruptionKind::RowLengthMismatch {
        mask_rows: child_mask.len(),
        leaf_rows: child_is_leaf.len(),
      }));
    }
    if child_mask.is_empty() {
      return Err(HypertreeError::corrupt(CorruptionKind::MissingRoot));
    }

    let grid = Self {
      refinement,
      dimension,
      branching_factor,
      bounds,
      child_mask,
      child_is_leaf,
      data,
    };

    let expected = grid.leaf_position_count();
    if grid.data.len() != expected {
      return Err(HypertreeError::corrupt(CorruptionKind::DataLengthMismatch {
        expected,
        found: grid.data.len(),
      }));
    }

    Ok(grid)
  }

  #[inline]
  pub fn refinement(&self) -> usize {
    self.refinement
  }

  #[inline]
  pub fn dimension(&self) -> usize {
    self.dimension
  }

  /// `refinement^dimension`: slots examined per row.
  #[inline]
  pub fn branching_factor(&self) -> usize {
    self.branching_factor
  }

  /// Root cell bounds.
  #[inline]
  pub fn bounds(&self) -> &CellBounds {
    &self.bounds
  }

  pub fn child_mask(&self) -> &[u8] {
    &self.child_mask
  }

  pub fn child_is_leaf(&self) -> &[u8] {
    &self.child_is_leaf
  }

  pub fn data(&self) -> &[f64] {
    &self.data
  }

  #[inline]
  pub fn row_count(&self) -> usize {
    self.child_mask.len()
  }

  /// Row `row` decoded, if it exists.
  #[inline]
  pub fn row(&self, row: usize) -> Option<BitRow> {
    Some(BitRow::new(
      *self.child_mask.get(row)?,
      *self.child_is_leaf.get(row)?,
    ))
  }

  /// Row `row` decoded.
  ///
  /// # Panics
  /// If `row >= row_count()`.
  #[inline]
  pub fn row_at(&self, row: usize) -> BitRow {
    BitRow::new(self.child_mask[row], self.child_is_leaf[row])
  }

  /// Iterate all rows in order.
  pub fn rows(&self) -> impl Iterator<Item = BitRow> + '_ {
    self
      .child_mask
      .iter()
      .zip(&self.child_is_leaf)
      .map(|(&mask, &leaf)| BitRow::new(mask, leaf))
  }

  /// Number of unmasked leaf slots across all rows.
  pub fn leaf_position_count(&self) -> usize {
    let width = self.branching_factor;
    self.rows().map(|row| row.leaf_count(width)).sum()
  }

  /// Number of unmasked internal slots across all rows.
  pub fn internal_position_count(&self) -> usize {
    let width = self.branching_factor;
    self.rows().map(|row| row.internal_count(width)).sum()
  }

  /// Root row has every slot masked: the tree converts to nothing.
  pub fn is_empty(&self) -> bool {
    self
      .row(0)
      .map_or(true, |root| root.is_fully_masked(self.branching_factor))
  }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
