//! Forest description parsing.
//!
//! A tree is given either as raw row arrays or as a nested `root` that is
//! encoded with `TreeBuilder`. Nested children are `"masked"`, a bare
//! number, `{ value = x }` or `{ children = [...] }`.

use anyhow::{bail, Context, Result};
use hypertree::{
	ConvertConfig, CorruptTreePolicy, HypertreeError, HypertreeForest, HypertreeGrid, NodeSpec,
	TreeBuilder, DEFAULT_FIELD_NAME,
};
use log::warn;
use serde::Deserialize;
use std::path::Path;

/// Root of a forest description file.
#[derive(Debug, Deserialize)]
pub struct ForestConfig {
	/// Name of the per-cell scalar field.
	#[serde(default = "default_field_name")]
	pub field_name: String,
	/// Walk trees in parallel.
	#[serde(default = "default_true")]
	pub parallel: bool,
	/// Drop corrupt trees instead of failing the conversion.
	#[serde(default)]
	pub skip_corrupt_trees: bool,
	/// Use prefix-sum rank tables (otherwise scan per lookup).
	#[serde(default = "default_true")]
	pub precomputed_ranks: bool,
	/// Trees in forest order.
	#[serde(default)]
	pub trees: Vec<TreeConfig>,
}

/// One tree: shared header plus raw arrays or a nested root.
#[derive(Debug, Deserialize)]
pub struct TreeConfig {
	pub refinement: usize,
	pub dimension: usize,
	pub bounds: Vec<f64>,
	pub child_mask: Option<Vec<u8>>,
	pub child_is_leaf: Option<Vec<u8>>,
	pub data: Option<Vec<f64>>,
	pub root: Option<NodeConfig>,
}

/// Nested node description.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum NodeConfig {
	/// Bare number: a leaf.
	Value(f64),
	/// Keyword, only `"masked"` is accepted.
	Keyword(String),
	Leaf { value: f64 },
	Internal { children: Vec<NodeConfig> },
}

fn default_field_name() -> String {
	DEFAULT_FIELD_NAME.to_string()
}

fn default_true() -> bool {
	true
}

impl ForestConfig {
	/// Load a forest description from a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read forest file: {}", path.display()))?;
		Self::parse(&content)
	}

	/// Parse a forest description from TOML text.
	pub fn parse(content: &str) -> Result<Self> {
		let config: ForestConfig =
			toml::from_str(content).with_context(|| "Failed to parse forest TOML")?;

		if config.trees.is_empty() {
			bail!("Forest must have at least one tree");
		}
		if config.field_name.trim().is_empty() {
			bail!("field_name must not be empty");
		}

		Ok(config)
	}

	/// Decode every tree into a validated forest.
	///
	/// With `skip_corrupt_trees`, trees whose rows or data are inconsistent
	/// are dropped and returned in [`LoadedForest::dropped`]. Unsupported
	/// configurations and bad bounds always fail.
	pub fn to_forest(&self) -> Result<LoadedForest> {
		let mut loaded = LoadedForest::default();

		for (index, tree) in self.trees.iter().enumerate() {
			let err = match tree.to_grid(index) {
				Ok(grid) => {
					loaded.forest.push(grid);
					loaded.source_index.push(index);
					continue;
				}
				Err(err) => err,
			};

			match err.downcast::<HypertreeError>() {
				Ok(grid_err) if self.skip_corrupt_trees && grid_err.is_structural() => {
					warn!("dropping corrupt tree: {}", grid_err);
					loaded.dropped.push(grid_err);
				}
				Ok(grid_err) => return Err(grid_err.into()),
				Err(err) => return Err(err),
			}
		}

		Ok(loaded)
	}

	pub fn convert_config(&self) -> ConvertConfig {
		let policy = if self.skip_corrupt_trees {
			CorruptTreePolicy::Skip
		} else {
			CorruptTreePolicy::Abort
		};
		ConvertConfig::new()
			.with_parallel(self.parallel)
			.with_corrupt_tree_policy(policy)
			.with_precomputed_ranks(self.precomputed_ranks)
	}
}

/// Trees decoded from a description file.
#[derive(Debug, Default)]
pub struct LoadedForest {
	pub forest: HypertreeForest,
	/// File position of each tree in `forest`.
	pub source_index: Vec<usize>,
	/// Trees dropped while loading, indexed by file position.
	pub dropped: Vec<HypertreeError>,
}

impl LoadedForest {
	/// Re-attribute a conversion error from its forest index to its file position.
	pub fn to_source(&self, err: &HypertreeError) -> HypertreeError {
		match err.tree().and_then(|tree| self.source_index.get(tree)) {
			Some(&index) => err.clone().for_tree(index),
			None => err.clone(),
		}
	}
}

impl TreeConfig {
	/// Build the tree at forest position `index`.
	pub fn to_grid(&self, index: usize) -> Result<HypertreeGrid> {
		let grid = match (&self.child_mask, &self.child_is_leaf, &self.root) {
			(Some(mask), Some(leaf), None) => HypertreeGrid::new(
				self.refinement,
				self.dimension,
				&self.bounds,
				mask.clone(),
				leaf.clone(),
				self.data.clone().unwrap_or_default(),
			),
			(None, None, Some(root)) => {
				if self.data.is_some() {
					bail!("tree {}: data is taken from the nested root, remove `data`", index);
				}
				let children = match root {
					NodeConfig::Internal { children } => children,
					_ => bail!("tree {}: root must be a `{{ children = [...] }}` node", index),
				};
				let children = children
					.iter()
					.map(NodeConfig::to_spec)
					.collect::<Result<Vec<_>>>()
					.with_context(|| format!("tree {}", index))?;
				TreeBuilder::new(self.refinement, self.dimension, &self.bounds).build(&children)
			}
			(None, None, None) => bail!("tree {}: give child_mask/child_is_leaf or root", index),
			(_, _, Some(_)) => bail!("tree {}: give either raw arrays or root, not both", index),
			_ => bail!("tree {}: child_mask and child_is_leaf go together", index),
		};

		grid.map_err(|err| err.for_tree(index).into())
	}
}

impl NodeConfig {
	pub fn to_spec(&self) -> Result<NodeSpec> {
		Ok(match self {
			NodeConfig::Value(value) | NodeConfig::Leaf { value } => NodeSpec::Leaf(*value),
			NodeConfig::Keyword(word) if word == "masked" => NodeSpec::Masked,
			NodeConfig::Keyword(word) => bail!("unknown node keyword {:?}, expected \"masked\"", word),
			NodeConfig::Internal { children } => NodeSpec::Internal(
				children
					.iter()
					.map(NodeConfig::to_spec)
					.collect::<Result<Vec<_>>>()?,
			),
		})
	}
}
