//! Conversion of hypertree forests into explicit hexahedral meshes.
//!
//! - [`walker`]: one tree into a private `TreeMesh`
//! - [`driver`]: a whole forest into one `OutputMesh`

pub mod driver;
pub mod walker;

pub use driver::{convert_to_mesh, convert_with_config, Conversion};
pub use walker::{walk_grid, walk_tree};
