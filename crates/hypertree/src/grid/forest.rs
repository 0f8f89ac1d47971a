//! HypertreeForest - ordered, independent trees converted into one mesh.

use super::tree::HypertreeGrid;

/// Ordered sequence of trees. Row numbering and data indexing never cross
/// tree boundaries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HypertreeForest {
  trees: Vec<HypertreeGrid>,
}

impl HypertreeForest {
  /// Create an empty forest.
  pub fn new() -> Self {
    Self::default()
  }

  /// Append a tree; its forest index is the previous length.
  pub fn push(&mut self, tree: HypertreeGrid) -> usize {
    self.trees.push(tree);
    self.trees.len() - 1
  }

  pub fn len(&self) -> usize {
    self.trees.len()
  }

  pub fn is_empty(&self) -> bool {
    self.trees.is_empty()
  }

  pub fn get(&self, index: usize) -> Option<&HypertreeGrid> {
    self.trees.get(index)
  }

  pub fn trees(&self) -> &[HypertreeGrid] {
    &self.trees
  }

  pub fn iter(&self) -> impl Iterator<Item = &HypertreeGrid> {
    self.trees.iter()
  }

  /// Cells a full conversion will emit.
  pub fn total_leaf_count(&self) -> usize {
    self.trees.iter().map(HypertreeGrid::leaf_position_count).sum()
  }
}

impl From<Vec<HypertreeGrid>> for HypertreeForest {
  fn from(trees: Vec<HypertreeGrid>) -> Self {
    Self { trees }
  }
}

impl FromIterator<HypertreeGrid> for HypertreeForest {
  fn from_iter<I: IntoIterator<Item = HypertreeGrid>>(iter: I) -> Self {
    Self {
      trees: iter.into_iter().collect(),
    }
  }
}
