//! Forest driver: walk every tree, merge the buffers in forest order.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │ HypertreeForest [tree 0, tree 1, ... tree n-1]                    │
//! │        │ par_iter (or iter)                                       │
//! │        ▼                                                          │
//! │  walk_grid(tree i) ──► TreeMesh i   (private buffer per tree)     │
//! │        │ collect, order preserved                                 │
//! │        ▼                                                          │
//! │  OutputMesh::append_tree(0..n)      (single writer, rebased)      │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Trees share nothing: row numbers and data offsets are local to a tree.
//! The merged mesh is identical whether the walk ran in parallel or not.

use log::{debug, info, warn};
use rayon::prelude::*;
use web_time::Instant;

use super::walker::walk_grid;
use crate::error::{HypertreeError, Result};
use crate::grid::{HypertreeForest, HypertreeGrid};
use crate::types::{
  ConversionStats, ConvertConfig, CorruptTreePolicy, OutputMesh, TreeMesh, TreeReport,
};

/// Result of [`convert_with_config`].
#[derive(Debug)]
pub struct Conversion {
  pub mesh: OutputMesh,
  pub stats: ConversionStats,
  /// Errors of trees dropped under [`CorruptTreePolicy::Skip`], in forest order.
  pub skipped: Vec<HypertreeError>,
}

struct TreeWalk {
  result: Result<TreeMesh>,
  walk_us: u64,
}

fn walk_indexed(index: usize, grid: &HypertreeGrid, precomputed_ranks: bool) -> TreeWalk {
  let start = Instant::now();
  let result = walk_grid(grid, precomputed_ranks).map_err(|err| err.for_tree(index));
  TreeWalk {
    result,
    walk_us: start.elapsed().as_micros() as u64,
  }
}

/// Convert a forest with the default configuration.
///
/// Any corrupt tree fails the whole call; the error carries the tree index.
pub fn convert_to_mesh(forest: &HypertreeForest, field_name: &str) -> Result<OutputMesh> {
  convert_with_config(forest, field_name, &ConvertConfig::default()).map(|c| c.mesh)
}

/// Convert a forest into one mesh with one named per-cell field.
#[cfg_attr(
  feature = "tracing",
  tracing::instrument(skip_all, name = "convert::forest", fields(trees = forest.len()))
)]
pub fn convert_with_config(
  forest: &HypertreeForest,
  field_name: &str,
  config: &ConvertConfig,
) -> Result<Conversion> {
  let start = Instant::now();
  let trees = forest.trees();
  let precomputed = config.precomputed_ranks;

  let walks: Vec<TreeWalk> = {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("convert::walk", parallel = config.parallel).entered();

    if config.parallel {
      trees
        .par_iter()
        .enumerate()
        .map(|(index, grid)| walk_indexed(index, grid, precomputed))
        .collect()
    } else {
      trees
        .iter()
        .enumerate()
        .map(|(index, grid)| walk_indexed(index, grid, precomputed))
        .collect()
    }
  };
  let walk_us = start.elapsed().as_micros() as u64;

  #[cfg(feature = "tracing")]
  let _merge_span = tracing::info_span!("convert::merge").entered();
  let merge_start = Instant::now();

  let total_cells: usize = walks
    .iter()
    .filter_map(|walk| walk.result.as_ref().ok())
    .map(TreeMesh::cell_count)
    .sum();
  let mut mesh = OutputMesh::new(field_name);
  mesh.reserve(total_cells);

  let mut stats = ConversionStats {
    trees: trees.len(),
    walk_us,
    ..Default::default()
  };
  let mut skipped = Vec::new();

  for (index, walk) in walks.into_iter().enumerate() {
    match walk.result {
      Ok(tree_mesh) => {
        debug!(
          "tree {}: {} cells in {}us",
          index,
          tree_mesh.cell_count(),
          walk.walk_us
        );
        stats.reports.push(TreeReport {
          tree: index,
          cells: tree_mesh.cell_count(),
          walk_us: walk.walk_us,
          skipped: false,
        });
        stats.converted += 1;
        mesh.append_tree(tree_mesh);
      }
      Err(err) => match config.on_corrupt_tree {
        CorruptTreePolicy::Abort => return Err(err),
        CorruptTreePolicy::Skip => {
          warn!("skipping corrupt tree: {}", err);
          stats.reports.push(TreeReport {
            tree: index,
            cells: 0,
            walk_us: walk.walk_us,
            skipped: true,
          });
          stats.skipped += 1;
          skipped.push(err);
        }
      },
    }
  }

  stats.cells = mesh.cell_count();
  stats.points = mesh.point_count();
  stats.merge_us = merge_start.elapsed().as_micros() as u64;
  stats.total_us = start.elapsed().as_micros() as u64;

  info!(
    "converted {}/{} trees ({} skipped): {} cells, {} points in {}us",
    stats.converted, stats.trees, stats.skipped, stats.cells, stats.points, stats.total_us
  );

  Ok(Conversion {
    mesh,
    stats,
    skipped,
  })
}

#[cfg(test)]
#[path = "driver_test.rs"]
mod driver_test;
