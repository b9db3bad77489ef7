use super::{ClassifierError, InvestmentClassifier};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Tree ensemble exported from a random-forest classifier.
///
/// Nodes are stored flat; each split points forward to child indices, so
/// traversal always terminates. Prediction is a majority vote with ties going
/// to label 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestModel {
    feature_names: Vec<String>,
    trees: Vec<DecisionTree>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        label: u8,
    },
}

#[derive(Debug)]
pub enum ModelLoadError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Empty,
    EmptyTree { tree: usize },
    FeatureOutOfRange { tree: usize, node: usize, feature: usize },
    BackwardEdge { tree: usize, node: usize, child: usize },
    InvalidThreshold { tree: usize, node: usize },
    NonBinaryLabel { tree: usize, node: usize, label: u8 },
}

impl std::fmt::Display for ModelLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelLoadError::Io(err) => write!(f, "failed to read model artifact: {}", err),
            ModelLoadError::Json(err) => write!(f, "invalid model artifact: {}", err),
            ModelLoadError::Empty => write!(f, "model artifact contains no trees"),
            ModelLoadError::EmptyTree { tree } => write!(f, "tree {} has no nodes", tree),
            ModelLoadError::FeatureOutOfRange {
                tree,
                node,
                feature,
            } => write!(
                f,
                "tree {} node {} splits on unknown feature index {}",
                tree, node, feature
            ),
            ModelLoadError::BackwardEdge { tree, node, child } => write!(
                f,
                "tree {} node {} points to child {} which is not after it or does not exist",
                tree, node, child
            ),
            ModelLoadError::InvalidThreshold { tree, node } => {
                write!(f, "tree {} node {} has a non-finite threshold", tree, node)
            }
            ModelLoadError::NonBinaryLabel { tree, node, label } => write!(
                f,
                "tree {} node {} emits label {}; only 0 and 1 are supported",
                tree, node, label
            ),
        }
    }
}

impl std::error::Error for ModelLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelLoadError::Io(err) => Some(err),
            ModelLoadError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ModelLoadError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ModelLoadError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl ForestModel {
    pub fn new(
        feature_names: Vec<String>,
        trees: Vec<DecisionTree>,
    ) -> Result<Self, ModelLoadError> {
        let model = Self {
            feature_names,
            trees,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ModelLoadError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ModelLoadError> {
        let model: Self = serde_json::from_reader(reader)?;
        model.validate()?;
        Ok(model)
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    fn validate(&self) -> Result<(), ModelLoadError> {
        if self.trees.is_empty() {
            return Err(ModelLoadError::Empty);
        }

        for (tree_index, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(ModelLoadError::EmptyTree { tree: tree_index });
            }

            for (node_index, node) in tree.nodes.iter().enumerate() {
                match node {
                    TreeNode::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    } => {
                        if *feature >= self.feature_names.len() {
                            return Err(ModelLoadError::FeatureOutOfRange {
                                tree: tree_index,
                                node: node_index,
                                feature: *feature,
                            });
                        }
                        if !threshold.is_finite() {
                            return Err(ModelLoadError::InvalidThreshold {
                                tree: tree_index,
                                node: node_index,
                            });
                        }
                        for child in [*left, *right] {
                            if child <= node_index || child >= tree.nodes.len() {
                                return Err(ModelLoadError::BackwardEdge {
                                    tree: tree_index,
                                    node: node_index,
                                    child,
                                });
                            }
                        }
                    }
                    TreeNode::Leaf { label } if *label > 1 => {
                        return Err(ModelLoadError::NonBinaryLabel {
                            tree: tree_index,
                            node: node_index,
                            label: *label,
                        });
                    }
                    TreeNode::Leaf { .. } => {}
                }
            }
        }

        Ok(())
    }
}

impl DecisionTree {
    fn predict(&self, features: &[f64]) -> u8 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { label } => return *label,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

impl InvestmentClassifier for ForestModel {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, features: &[f64]) -> Result<u8, ClassifierError> {
        if features.len() != self.feature_names.len() {
            return Err(ClassifierError::LengthMismatch {
                expected: self.feature_names.len(),
                actual: features.len(),
            });
        }

        let good_votes = self
            .trees
            .iter()
            .filter(|tree| tree.predict(features) == 1)
            .count();
        let avoid_votes = self.trees.len() - good_votes;

        Ok(u8::from(good_votes > avoid_votes))
    }
}
