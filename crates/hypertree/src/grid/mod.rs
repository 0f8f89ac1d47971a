//! Hypertree data model: bit-packed trees, their forest, and the index math
//! that recovers the tree topology from flat arrays.
//!
//! No explicit tree nodes are stored. A child row is found by counting
//! qualifying bits before its parent slot, and a leaf's value by counting
//! leaves before it.
//!
//! # Module Structure
//!
//! - [`bounds`]: `CellBounds` - cell boxes and slot bisection
//! - [`tree`]: `HypertreeGrid` - one validated tree
//! - [`forest`]: `HypertreeForest` - ordered independent trees
//! - [`rank`]: `RankIndex` / `ScanRank` - prefix-count addressing
//! - [`builder`]: `TreeBuilder` - nested description to flat rows

pub mod bounds;
pub mod builder;
pub mod forest;
pub mod rank;
pub mod tree;

// Re-exports
pub use bounds::CellBounds;
pub use builder::{NodeSpec, TreeBuilder};
pub use forest::HypertreeForest;
pub use rank::{RankIndex, RankLookup, ScanRank};
pub use tree::{branching_factor, HypertreeGrid};
