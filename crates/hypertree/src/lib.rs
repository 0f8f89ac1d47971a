//! hypertree - decoder for bit-packed hypertree grids
//!
//! A hypertree grid stores each tree as two parallel byte arrays (one byte
//! per row, one bit per child slot) plus a flat array of leaf values. No
//! child pointers are stored: the row of an internal child and the value of
//! a leaf are recovered by counting bits. This crate turns such forests into
//! an explicit hexahedral mesh with one scalar per cell.
//!
//! # Features
//!
//! - **Rank addressing**: prefix-sum tables per tree (O(1) lookups), or a
//!   per-query scan
//! - **Stack-based walk**: depth-first, pre-order, no recursion
//! - **Per-tree parallelism**: rayon over trees, merged in forest order
//! - **Quadtrees and octrees**: 2D trees emit flat hexahedra at z = 0
//!
//! # Example
//!
//! ```ignore
//! use hypertree::{convert_to_mesh, HypertreeForest, HypertreeGrid};
//!
//! let tree = HypertreeGrid::new(
//!     2, 3,
//!     &[0.0, 1.0, 0.0, 1.0, 0.0, 1.0],
//!     vec![0x00],            // no slot masked
//!     vec![0xFF],            // every slot a leaf
//!     (0..8).map(f64::from).collect(),
//! )?;
//! let forest = HypertreeForest::from(vec![tree]);
//! let mesh = convert_to_mesh(&forest, "density")?;
//!
//! println!("{} hexahedra, {} points", mesh.cell_count(), mesh.point_count());
//! ```

pub mod bitrow;
pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items
pub use bitrow::{BitRow, SlotKind};
pub use constants::{DEFAULT_FIELD_NAME, HEX_CORNERS, MAX_BRANCHING_FACTOR, VTK_HEXAHEDRON};
pub use error::{CorruptionKind, HypertreeError, Result};
pub use types::{
  ConversionStats, ConvertConfig, CorruptTreePolicy, HexCell, OutputMesh, ScalarField, TreeMesh,
  TreeReport,
};

// Data model and rank addressing
pub mod grid;
pub use grid::{
  CellBounds, HypertreeForest, HypertreeGrid, NodeSpec, RankIndex, RankLookup, ScanRank,
  TreeBuilder,
};

// Tree walk and forest conversion
pub mod convert;
pub use convert::{convert_to_mesh, convert_with_config, Conversion};

// Feature-gated conversion metrics
pub mod metrics;

#[cfg(test)]
mod test_utils;
