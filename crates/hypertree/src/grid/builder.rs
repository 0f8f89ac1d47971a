//! TreeBuilder - encodes a nested node description into flat rows.
//!
//! Rows are allocated breadth-first: the root is row 0, then the children
//! of every internal slot in row-major, slot-major order. This is exactly
//! the order [`super::rank`] assumes when it turns prefix counts back into
//! row indices, so anything built here decodes to the same topology.
//!
//! ```text
//! Internal[ Leaf(a), Internal[..x..], Masked, Internal[..y..] ]
//!
//!   row 0: [a][→1][ ][→2]      data: a, x.., y..
//!   row 1: x..
//!   row 2: y..
//! ```

use std::collections::VecDeque;

use super::tree::{branching_factor, HypertreeGrid};
use crate::bitrow::{slot_bit, width_mask};
use crate::error::{CorruptionKind, HypertreeError, Result};

/// One child slot in a nested tree description.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeSpec {
  /// Pruned slot.
  Masked,
  /// Terminal cell carrying one scalar.
  Leaf(f64),
  /// Subdivided cell; missing trailing children are masked.
  Internal(Vec<NodeSpec>),
}

impl NodeSpec {
  /// Internal node whose children are all leaves with `values`.
  pub fn leaves<I: IntoIterator<Item = f64>>(values: I) -> Self {
    NodeSpec::Internal(values.into_iter().map(NodeSpec::Leaf).collect())
  }
}

/// Encoder for one [`HypertreeGrid`].
#[derive(Clone, Debug)]
pub struct TreeBuilder {
  refinement: usize,
  dimension: usize,
  bounds: Vec<f64>,
}

impl TreeBuilder {
  pub fn new(refinement: usize, dimension: usize, bounds: &[f64]) -> Self {
    Self {
      refinement,
      dimension,
      bounds: bounds.to_vec(),
    }
  }

  /// Octree over `bounds` (`[xmin, xmax, ymin, ymax, zmin, zmax]`).
  pub fn octree(bounds: &[f64]) -> Self {
    Self::new(2, 3, bounds)
  }

  /// Quadtree over `bounds` (`[xmin, xmax, ymin, ymax]`).
  pub fn quadtree(bounds: &[f64]) -> Self {
    Self::new(2, 2, bounds)
  }

  /// Encode the root's children into a validated tree.
  ///
  /// Slots past `root_children.len()` (and past the branching factor in the
  /// row byte) are written as masked.
  pub fn build(&self, root_children: &[NodeSpec]) -> Result<HypertreeGrid> {
    let width = branching_factor(self.refinement, self.dimension)?;

    let mut child_mask = Vec::new();
    let mut child_is_leaf = Vec::new();
    let mut data = Vec::new();
    let mut queue: VecDeque<&[NodeSpec]> = VecDeque::new();
    queue.push_back(root_children);

    while let Some(children) = queue.pop_front() {
      let row = child_mask.len();
      if children.len() > width {
        return Err(HypertreeError::corrupt(CorruptionKind::TooManyChildren {
          row,
          children: children.len(),
          branching_factor: width,
        }));
      }

      let mut mask = !width_mask(children.len());
      let mut leaf = 0u8;
      for (slot, child) in children.iter().enumerate() {
        match child {
          NodeSpec::Masked => mask |= slot_bit(slot),
          NodeSpec::Leaf(value) => {
            leaf |= slot_bit(slot);
            data.push(*value);
          }
          NodeSpec::Internal(grandchildren) => queue.push_back(grandchildren),
        }
      }
      child_mask.push(mask);
      child_is_leaf.push(leaf);
    }

    HypertreeGrid::new(
      self.refinement,
      self.dimension,
      &self.bounds,
      child_mask,
      child_is_leaf,
      data,
    )
  }
}

#[cfg(test)]
#[path = "builder_test.rs"]
mod builder_test;
