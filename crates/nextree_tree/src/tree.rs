use nextree_core::Component;
use std::{fmt, path::Path};

pub type NodeId = usize;

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub component: Component,
    /// Direct imports, in the order they appear in the file
    pub children: Vec<NodeId>,
    /// Set when this import points back at a file on the current ancestor chain
    pub cycle: bool,
    parent: Option<NodeId>,
}

impl TreeNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// Import tree of a single route, stored as an arena. The root is always node 0.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<TreeNode>,
}

impl Tree {
    pub fn new(root: Component) -> Self {
        let root = TreeNode { component: root, children: Vec::new(), cycle: false, parent: None };
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut TreeNode {
        &mut self.nodes[id]
    }

    pub fn add_child(&mut self, parent: NodeId, component: Component) -> NodeId {
        let id = self.nodes.len();
        let node = TreeNode { component, children: Vec::new(), cycle: false, parent: Some(parent) };
        self.nodes.push(node);
        self.nodes[parent].children.push(id);
        id
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &TreeNode> {
        self.nodes[id].children.iter().map(|c| &self.nodes[*c])
    }

    /// `id` followed by its parent, grandparent and so on up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), |cur| self.nodes[*cur].parent)
    }

    /// Whether `path` is the file of `id` or of any of its ancestors.
    pub fn is_on_path(&self, id: NodeId, path: &Path) -> bool {
        self.ancestors(id).any(|a| self.nodes[a].component.path == path)
    }

    /// Node ids in depth-first pre-order.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id].children.iter().rev());
        }
        order
    }

    /// First node in pre-order whose component points at `path`.
    pub fn find_by_path(&self, path: &Path) -> Option<NodeId> {
        self.preorder().into_iter().find(|id| self.nodes[*id].component.path == path)
    }

    pub fn depth_of(&self, id: NodeId) -> usize {
        self.ancestors(id).count() - 1
    }

    pub fn max_depth(&self) -> usize {
        (0..self.nodes.len()).map(|id| self.depth_of(id)).max().unwrap_or(0)
    }
}

/// One tab per level, one name per line.
impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for id in self.preorder() {
            writeln!(f, "{}{}", "\t".repeat(self.depth_of(id)), self.nodes[id].component.name)?;
        }
        Ok(())
    }
}
