//! Per-subtree traversal index.
//!
//! Pre-order positions make every subtree a contiguous slice, which turns
//! descendant tests and lockstep walks into range arithmetic.

use graft_ir::{subtree_metrics, Metrics, NodeId, Tree};

const OUTSIDE: u32 = u32::MAX;

/// Pre-order, post-order, depth and content metrics of one subtree.
pub struct TreeIndex {
    root: NodeId,
    preorder: Vec<NodeId>,
    postorder: Vec<NodeId>,
    /// Pre-order position by node, `OUTSIDE` for nodes outside the subtree.
    pre: Vec<u32>,
    depth: Vec<u32>,
    metrics: Metrics,
}

impl TreeIndex {
    pub fn new(tree: &Tree, root: NodeId) -> Self {
        let preorder: Vec<NodeId> = tree.preorder(root).collect();
        let mut pre = vec![OUTSIDE; tree.len()];
        let mut depth = vec![0; tree.len()];
        for (i, &id) in preorder.iter().enumerate() {
            pre[id.index()] = u32::try_from(i).unwrap_or(OUTSIDE - 1);
            if id != root {
                if let Some(parent) = tree.parent(id) {
                    depth[id.index()] = depth[parent.index()] + 1;
                }
            }
        }
        TreeIndex {
            root,
            postorder: tree.postorder(root).collect(),
            preorder,
            pre,
            depth,
            metrics: subtree_metrics(tree, root),
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn preorder(&self) -> &[NodeId] {
        &self.preorder
    }

    #[inline]
    pub fn postorder(&self) -> &[NodeId] {
        &self.postorder
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.pre.get(id.index()).is_some_and(|&p| p != OUTSIDE)
    }

    /// Pre-order position within the subtree.
    #[inline]
    pub fn pre_index(&self, id: NodeId) -> usize {
        self.pre[id.index()] as usize
    }

    /// Depth relative to the indexed root.
    #[inline]
    pub fn depth(&self, id: NodeId) -> u32 {
        self.depth[id.index()]
    }

    #[inline]
    pub fn hash(&self, id: NodeId) -> u64 {
        self.metrics.hash(id)
    }

    #[inline]
    pub fn height(&self, id: NodeId) -> u32 {
        self.metrics.height(id)
    }

    #[inline]
    pub fn size(&self, id: NodeId) -> u32 {
        self.metrics.size(id)
    }

    /// `id` followed by all its descendants, in pre-order.
    pub fn subtree(&self, id: NodeId) -> &[NodeId] {
        let start = self.pre_index(id);
        &self.preorder[start..start + self.size(id) as usize]
    }

    /// Strict descendants of `id`, in pre-order.
    pub fn descendants(&self, id: NodeId) -> &[NodeId] {
        &self.subtree(id)[1..]
    }

    /// Whether `node` lies strictly below `ancestor`.
    pub fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        if !self.contains(node) || !self.contains(ancestor) {
            return false;
        }
        let (n, a) = (self.pre_index(node), self.pre_index(ancestor));
        n > a && n < a + self.size(ancestor) as usize
    }

    /// Parent of `id` if it lies inside the subtree.
    pub fn parent(&self, tree: &Tree, id: NodeId) -> Option<NodeId> {
        if id == self.root {
            return None;
        }
        tree.parent(id).filter(|&p| self.contains(p))
    }
}
