//! Rank indexer - pointer-free child and data addressing by prefix counts.
//!
//! ```text
//! rows:        row 0               row 1               row 2
//! slots:   0 1 2 3 4 5 6 7     0 1 2 3 4 5 6 7     0 1 2 3 ...
//! kind:    L I M L I L M M     L L L L L L L L     ...
//!            │     │
//!            │     └── 2nd internal slot overall → child row 2
//!            └──────── 1st internal slot overall → child row 1
//!
//! data_offset(row, slot) = unmasked leaves strictly before (row, slot)
//! child_row(row, slot)   = unmasked internal slots up to and including
//!                          (row, slot); row 0 is the root, so the first
//!                          internal slot lands on row 1
//! ```
//!
//! Counts run over the whole array prefix, not just the visited subtree,
//! which is why encoders must allocate rows in row-major, slot-major order.
//! Only the first `branching_factor` slots of each row take part.

use super::tree::HypertreeGrid;
use crate::error::{CorruptionKind, HypertreeError, Result};

/// Prefix-count queries over one tree.
///
/// `leaves_before` and `internals_through` are the raw ranks and panic on a
/// row past the end. `data_offset` and `child_row` are the checked lookups
/// the walker uses.
pub trait RankLookup {
  /// The tree being indexed.
  fn grid(&self) -> &HypertreeGrid;

  /// Unmasked leaf slots strictly before `(row, slot)`.
  fn leaves_before(&self, row: usize, slot: usize) -> usize;

  /// Unmasked internal slots up to and including `(row, slot)`.
  fn internals_through(&self, row: usize, slot: usize) -> usize;

  /// Index into `data` of the leaf at `(row, slot)`.
  fn data_offset(&self, row: usize, slot: usize) -> Result<usize> {
    let grid = self.grid();
    check_row(grid, row)?;
    let offset = self.leaves_before(row, slot);
    let len = grid.data().len();
    if offset >= len {
      return Err(HypertreeError::corrupt(
        CorruptionKind::DataOffsetOutOfRange {
          row,
          slot,
          offset,
          len,
        },
      ));
    }
    Ok(offset)
  }

  /// Row holding the children of the internal slot at `(row, slot)`.
  ///
  /// The result must lie strictly after `row`; anything else would revisit
  /// a row and is reported as corruption.
  fn child_row(&self, row: usize, slot: usize) -> Result<usize> {
    let grid = self.grid();
    check_row(grid, row)?;
    let child_row = self.internals_through(row, slot);
    let rows = grid.row_count();
    if child_row >= rows {
      return Err(HypertreeError::corrupt(CorruptionKind::ChildRowOutOfRange {
        row,
        slot,
        child_row,
        rows,
      }));
    }
    if child_row <= row {
      return Err(HypertreeError::corrupt(CorruptionKind::ChildRowNotForward {
        row,
        slot,
        child_row,
      }));
    }
    Ok(child_row)
  }
}

fn check_row(grid: &HypertreeGrid, row: usize) -> Result<()> {
  let rows = grid.row_count();
  if row >= rows {
    return Err(HypertreeError::corrupt(CorruptionKind::RowOutOfRange {
      row,
      rows,
    }));
  }
  Ok(())
}

// =============================================================================
// RankIndex - precomputed per-row prefix sums, O(1) per query
// =============================================================================

/// Prefix-sum table built once per tree before traversal.
///
/// `leaf_prefix[r]` / `internal_prefix[r]` hold the counts over rows `0..r`,
/// so both tables have `row_count + 1` entries.
#[derive(Clone, Debug)]
pub struct RankIndex<'a> {
  grid: &'a HypertreeGrid,
  leaf_prefix: Vec<usize>,
  internal_prefix: Vec<usize>,
}

impl<'a> RankIndex<'a> {
  pub fn build(grid: &'a HypertreeGrid) -> Self {
    let width = grid.branching_factor();
    let mut leaf_prefix = Vec::with_capacity(grid.row_count() + 1);
    let mut internal_prefix = Vec::with_capacity(grid.row_count() + 1);
    let (mut leaves, mut internals) = (0, 0);
    leaf_prefix.push(0);
    internal_prefix.push(0);

    for row in grid.rows() {
      leaves += row.leaf_count(width);
      internals += row.internal_count(width);
      leaf_prefix.push(leaves);
      internal_prefix.push(internals);
    }

    Self {
      grid,
      leaf_prefix,
      internal_prefix,
    }
  }

  /// Total unmasked leaves in the tree.
  pub fn leaf_total(&self) -> usize {
    self.leaf_prefix[self.leaf_prefix.len() - 1]
  }

  /// Total unmasked internal slots in the tree.
  pub fn internal_total(&self) -> usize {
    self.internal_prefix[self.internal_prefix.len() - 1]
  }
}

impl RankLookup for RankIndex<'_> {
  fn grid(&self) -> &HypertreeGrid {
    self.grid
  }

  #[inline]
  fn leaves_before(&self, row: usize, slot: usize) -> usize {
    let bits = self.grid.row_at(row);
    self.leaf_prefix[row] + bits.leaf_count(slot)
  }

  #[inline]
  fn internals_through(&self, row: usize, slot: usize) -> usize {
    let bits = self.grid.row_at(row);
    self.internal_prefix[row] + bits.internal_count(slot + 1)
  }
}

// =============================================================================
// ScanRank - forward counting pass per query, no table
// =============================================================================

/// Rank lookups that rescan the row prefix on every query: O(row) each.
///
/// Needs no allocation; the walker produces identical output with either
/// implementation.
#[derive(Clone, Copy, Debug)]
pub struct ScanRank<'a> {
  grid: &'a HypertreeGrid,
}

impl<'a> ScanRank<'a> {
  pub fn new(grid: &'a HypertreeGrid) -> Self {
    Self { grid }
  }
}

impl RankLookup for ScanRank<'_> {
  fn grid(&self) -> &HypertreeGrid {
    self.grid
  }

  fn leaves_before(&self, row: usize, slot: usize) -> usize {
    let width = self.grid.branching_factor();
    let bits = self.grid.row_at(row);
    let before: usize = self.grid.rows().take(row).map(|r| r.leaf_count(width)).sum();
    before + bits.leaf_count(slot)
  }

  fn internals_through(&self, row: usize, slot: usize) -> usize {
    let width = self.grid.branching_factor();
    let bits = self.grid.row_at(row);
    let before: usize = self
      .grid
      .rows()
      .take(row)
      .map(|r| r.internal_count(width))
      .sum();
    before + bits.internal_count(slot + 1)
  }
}

#[cfg(test)]
#[path = "rank_test.rs"]
mod rank_test;
