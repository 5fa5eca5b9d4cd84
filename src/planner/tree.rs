//! Search Tree Module
//! Arena-backed tree of planner states with parent links and path costs.

/// Index of a node in a [`SearchTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone)]
pub struct TreeNode<S> {
    pub state: S,
    pub parent: Option<NodeId>,
    /// Cost of the path from the root to this node.
    pub cost: f64,
    children: Vec<NodeId>,
}

/// The root is always node 0 and is the only node without a parent.
#[derive(Debug, Clone)]
pub struct SearchTree<S> {
    nodes: Vec<TreeNode<S>>,
}

impl<S> SearchTree<S> {
    pub fn new(root: S) -> Self {
        Self::with_capacity(root, 1)
    }

    /// Tree holding only `root`, with room for `capacity` nodes.
    pub fn with_capacity(root: S, capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(TreeNode {
            state: root,
            parent: None,
            cost: 0.0,
            children: Vec::new(),
        });
        Self { nodes }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &TreeNode<S> {
        &self.nodes[id.0]
    }

    pub fn nodes(&self) -> &[TreeNode<S>] {
        &self.nodes
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Attach a new node under `parent`.
    pub fn push(&mut self, state: S, parent: NodeId, cost: f64) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            state,
            parent: Some(parent),
            cost,
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Move `id` under `new_parent` with a new cost; every descendant's cost
    /// shifts by the same amount.
    ///
    /// `new_parent` must not be a descendant of `id`.
    pub fn reparent(&mut self, id: NodeId, new_parent: NodeId, new_cost: f64) {
        if let Some(old_parent) = self.nodes[id.0].parent {
            self.nodes[old_parent.0].children.retain(|&c| c != id);
        }
        self.nodes[new_parent.0].children.push(id);
        self.nodes[id.0].parent = Some(new_parent);

        let delta = new_cost - self.nodes[id.0].cost;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            self.nodes[current.0].cost += delta;
            stack.extend(self.nodes[current.0].children.iter().copied());
        }
    }

    /// Node ids from the root down to `id`.
    pub fn ancestor_path(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = id;
        while let Some(parent) = self.nodes[current.0].parent {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }

    /// `(child, parent)` state pairs, one per non-root node.
    pub fn edges(&self) -> impl Iterator<Item = (&S, &S)> {
        self.nodes.iter().filter_map(move |node| {
            node.parent
                .map(|parent| (&node.state, &self.nodes[parent.0].state))
        })
    }
}
