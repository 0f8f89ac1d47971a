//! Bit layout and mesh constants shared by the decoder.
//!
//! # Row Layout
//!
//! Every tree row is one byte of `child_mask` plus one byte of
//! `child_is_leaf`. Slot 0 is the most significant bit.
//!
//! ```text
//! bit:    7     6     5     4     3     2     1     0
//!       ┌─────┬─────┬─────┬─────┬─────┬─────┬─────┬─────┐
//! slot: │  0  │  1  │  2  │  3  │  4  │  5  │  6  │  7  │
//!       └─────┴─────┴─────┴─────┴─────┴─────┴─────┴─────┘
//!         0x80  0x40  0x20  0x10  0x08  0x04  0x02  0x01
//!
//! quadtree (4 slots): only slots 0..3 are read, bits 3..0 are ignored
//! ```
//!
//! # Hexahedron Corner Order
//!
//! ```text
//!            7──────────6
//!           /│         /│        +Y
//!          4─┼────────5 │         │
//!          │ │        │ │         │
//!          │ 3────────┼─2         └───── +X
//!          │/         │/         /
//!          0──────────1         +Z
//!
//!   0 = (x0,y0,z0)   4 = (x0,y1,z0)
//!   1 = (x1,y0,z0)   5 = (x1,y1,z0)
//!   2 = (x1,y0,z1)   6 = (x1,y1,z1)
//!   3 = (x0,y0,z1)   7 = (x0,y1,z1)
//! ```

/// Number of slot flags packed into one row byte.
pub const ROW_BITS: usize = 8;

/// Largest branching factor the one-byte-per-row encoding can express.
pub const MAX_BRANCHING_FACTOR: usize = ROW_BITS;

/// Mask byte with every slot pruned.
pub const FULLY_MASKED_ROW: u8 = 0xFF;

/// Spatial dimensions the bisector knows how to split.
pub const SUPPORTED_DIMENSIONS: std::ops::RangeInclusive<usize> = 2..=3;

/// Hexahedron corners as (x, y, z) selectors: 0 = min extent, 1 = max extent.
pub const HEX_CORNERS: [[usize; 3]; 8] = [
  [0, 0, 0],
  [1, 0, 0],
  [1, 0, 1],
  [0, 0, 1],
  [0, 1, 0],
  [1, 1, 0],
  [1, 1, 1],
  [0, 1, 1],
];

/// Points emitted per voxel (no welding between neighbours).
pub const POINTS_PER_CELL: usize = HEX_CORNERS.len();

/// VTK cell type id for a linear hexahedron.
pub const VTK_HEXAHEDRON: u8 = 12;

/// Scalar field name used when the caller does not supply one.
pub const DEFAULT_FIELD_NAME: &str = "CellData";

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
