//! Error taxonomy for hypertree decoding.
//!
//! Every error optionally carries the index of the tree it came from inside
//! its forest. Errors raised while validating a standalone grid have
//! `tree: None`; the forest driver fills it in with [`HypertreeError::for_tree`].

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HypertreeError>;

/// What exactly is inconsistent in a corrupt tree.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CorruptionKind {
  #[error("child_mask has {mask_rows} rows but child_is_leaf has {leaf_rows}")]
  RowLengthMismatch { mask_rows: usize, leaf_rows: usize },

  #[error("tree has no root row")]
  MissingRoot,

  #[error("row {row} requested but the tree has {rows} rows")]
  RowOutOfRange { row: usize, rows: usize },

  #[error("node at row {row} lists {children} children but the branching factor is {branching_factor}")]
  TooManyChildren {
    row: usize,
    children: usize,
    branching_factor: usize,
  },

  #[error("data has {found} values but the rows describe {expected} leaves")]
  DataLengthMismatch { expected: usize, found: usize },

  #[error("leaf at row {row} slot {slot} maps to data[{offset}] but data has {len} values")]
  DataOffsetOutOfRange {
    row: usize,
    slot: usize,
    offset: usize,
    len: usize,
  },

  #[error("internal slot at row {row} slot {slot} maps to row {child_row} but the tree has {rows} rows")]
  ChildRowOutOfRange {
    row: usize,
    slot: usize,
    child_row: usize,
    rows: usize,
  },

  #[error("internal slot at row {row} slot {slot} maps back to row {child_row}")]
  ChildRowNotForward {
    row: usize,
    slot: usize,
    child_row: usize,
  },
}

/// Errors surfaced while validating or converting a hypertree forest.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum HypertreeError {
  #[error("{}structural corruption: {kind}", tree_prefix(.tree))]
  StructuralCorruption {
    tree: Option<usize>,
    kind: CorruptionKind,
  },

  #[error(
    "{}unsupported branching: refinement {refinement} in {dimension}D",
    tree_prefix(.tree)
  )]
  UnsupportedBranchingFactor {
    tree: Option<usize>,
    refinement: usize,
    dimension: usize,
  },

  #[error(
    "{}invalid bounds: expected {expected} ordered values, got {found:?}",
    tree_prefix(.tree)
  )]
  InvalidBounds {
    tree: Option<usize>,
    expected: usize,
    found: Vec<f64>,
  },
}

fn tree_prefix(tree: &Option<usize>) -> String {
  match tree {
    Some(index) => format!("tree {index}: "),
    None => String::new(),
  }
}

impl HypertreeError {
  pub(crate) fn corrupt(kind: CorruptionKind) -> Self {
    HypertreeError::StructuralCorruption { tree: None, kind }
  }

  /// Attribute this error to the tree at `index` within its forest.
  pub fn for_tree(self, index: usize) -> Self {
    match self {
      HypertreeError::StructuralCorruption { kind, .. } => HypertreeError::StructuralCorruption {
        tree: Some(index),
        kind,
      },
      HypertreeError::UnsupportedBranchingFactor {
        refinement,
        dimension,
        ..
      } => HypertreeError::UnsupportedBranchingFactor {
        tree: Some(index),
        refinement,
        dimension,
      },
      HypertreeError::InvalidBounds {
        expected, found, ..
      } => HypertreeError::InvalidBounds {
        tree: Some(index),
        expected,
        found,
      },
    }
  }

  /// Index of the offending tree, when known.
  pub fn tree(&self) -> Option<usize> {
    match self {
      HypertreeError::StructuralCorruption { tree, .. }
      | HypertreeError::UnsupportedBranchingFactor { tree, .. }
      | HypertreeError::InvalidBounds { tree, .. } => *tree,
    }
  }

  /// True for errors in the bit-packed arrays themselves.
  pub fn is_structural(&self) -> bool {
    matches!(self, HypertreeError::StructuralCorruption { .. })
  }
}
