use nextree_core::ComponentType;
use serde::{Deserialize, Serialize};

use crate::tree::{NodeId, Tree};

/// Plain nested shape consumed by the hierarchical layout renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedTree {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_type: Option<ComponentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub cycle: bool,
    #[serde(default)]
    pub children: Vec<SerializedTree>,
}

impl SerializedTree {
    /// Converts an arena tree without recursing, so import depth is not bounded by the stack.
    ///
    /// Children always have larger ids than their parent, so walking ids from
    /// last to first finishes every subtree before the node that owns it.
    pub fn from_tree(tree: &Tree) -> Self {
        let mut built: Vec<Option<Self>> = vec![None; tree.len()];
        for id in (0..tree.len()).rev() {
            let node = tree.node(id);
            let children = node.children.iter().filter_map(|c| built[*c].take()).collect();
            built[id] = Some(Self::leaf(tree, id, children));
        }
        built[tree.root()].take().unwrap_or_else(|| Self::leaf(tree, tree.root(), Vec::new()))
    }

    fn leaf(tree: &Tree, id: NodeId, children: Vec<Self>) -> Self {
        let node = tree.node(id);
        Self {
            name: node.component.name.clone(),
            component_type: node.component.component_type,
            path: Some(node.component.path.to_string_lossy().to_string()),
            cycle: node.cycle,
            children,
        }
    }

    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(&node.children);
        }
        count
    }
}
