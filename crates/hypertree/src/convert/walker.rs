//! Tree walker - depth-first, pre-order expansion of one tree into voxels.
//!
//! ```text
//! visit(row, bounds):
//!   row fully masked ──► done
//!   for slot in 0..branching_factor:
//!     Masked   ──► skip
//!     Leaf     ──► push_voxel(child_bounds, data[data_offset(row, slot)])
//!     Internal ──► visit(child_row(row, slot), child_bounds)
//! ```
//!
//! The recursion runs on an explicit stack so a deep (or hostile) tree
//! cannot overflow the call stack. Each frame remembers the next slot to
//! resume from, which keeps the emission order identical to the recursive
//! form. Child rows always lie after their parent row, so the stack never
//! holds more frames than the tree has rows.

use smallvec::SmallVec;

use crate::bitrow::SlotKind;
use crate::error::Result;
use crate::grid::{CellBounds, HypertreeGrid, RankIndex, RankLookup, ScanRank};
use crate::types::TreeMesh;

struct Frame {
  row: usize,
  bounds: CellBounds,
  next_slot: usize,
}

/// Expand one tree into a private voxel buffer.
///
/// On error nothing is returned for the tree: the partial buffer is dropped.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "convert::walk_tree"))]
pub fn walk_tree<R: RankLookup>(ranks: &R) -> Result<TreeMesh> {
  let grid = ranks.grid();
  let width = grid.branching_factor();
  let refinement = grid.refinement();
  let dimension = grid.dimension();

  let mut out = TreeMesh::with_capacity(grid.data().len());
  if grid.is_empty() {
    return Ok(out);
  }

  let mut stack: SmallVec<[Frame; 16]> = SmallVec::new();
  stack.push(Frame {
    row: 0,
    bounds: *grid.bounds(),
    next_slot: 0,
  });

  while let Some(frame) = stack.last_mut() {
    let row = frame.row;
    let bits = grid.row_at(row);
    let mut descend = None;

    while frame.next_slot < width {
      let slot = frame.next_slot;
      frame.next_slot += 1;

      match bits.kind(slot) {
        SlotKind::Masked => {}
        SlotKind::Leaf => {
          let offset = ranks.data_offset(row, slot)?;
          let child_bounds = frame.bounds.child_bounds(slot, refinement, dimension);
          out.push_voxel(&child_bounds, grid.data()[offset]);
        }
        SlotKind::Internal => {
          let child_row = ranks.child_row(row, slot)?;
          descend = Some(Frame {
            row: child_row,
            bounds: frame.bounds.child_bounds(slot, refinement, dimension),
            next_slot: 0,
          });
          break;
        }
      }
    }

    match descend {
      Some(child) => {
        if !grid.row_at(child.row).is_fully_masked(width) {
          stack.push(child);
        }
      }
      None => {
        stack.pop();
      }
    }
  }

  Ok(out)
}

/// Walk `grid` with either rank strategy.
pub fn walk_grid(grid: &HypertreeGrid, precomputed_ranks: bool) -> Result<TreeMesh> {
  if precomputed_ranks {
    walk_tree(&RankIndex::build(grid))
  } else {
    walk_tree(&ScanRank::new(grid))
  }
}

#[cfg(test)]
#[path = "walker_test.rs"]
mod walker_test;
