// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This module provides the arena holding the nodes of the branch-and-bound
//! tree. Nodes are addressed by their `NodeId` (their index in the arena) and
//! only refer to their parent through its id.

use crate::{BoundChange, Constraint, NodeId, NodeStatus, NodeSummary};

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub parent: Option<NodeId>,
    pub depth : usize,
    /// The bound change which distinguishes this node from its parent
    pub change: Option<BoundChange>,
    /// The cuts which were added while processing this node
    pub cuts  : Vec<Constraint>,
    pub status: NodeStatus,
    pub bound : f64,
}

#[derive(Debug, Default, Clone)]
pub struct SearchTree {
    nodes: Vec<TreeNode>,
}

impl SearchTree {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
    pub fn clear(&mut self) {
        self.nodes.clear()
    }
    pub fn get(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }
    pub fn get_mut(&mut self, id: NodeId) -> &mut TreeNode {
        &mut self.nodes[id.0]
    }

    /// Creates the root node
    pub fn root(&mut self) -> NodeId {
        self.push(TreeNode {
            parent: None,
            depth : 0,
            change: None,
            cuts  : vec![],
            status: NodeStatus::Open,
            bound : f64::NEG_INFINITY,
        })
    }
    /// Creates an open child of `parent`
    pub fn add_child(&mut self, parent: NodeId, change: BoundChange, bound: f64) -> NodeId {
        let depth = self.nodes[parent.0].depth + 1;
        self.push(TreeNode {
            parent: Some(parent),
            depth,
            change: Some(change),
            cuts  : vec![],
            status: NodeStatus::Open,
            bound,
        })
    }
    fn push(&mut self, node: TreeNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Closes a node with the given status and bound
    pub fn close(&mut self, id: NodeId, status: NodeStatus, bound: f64) {
        let node = &mut self.nodes[id.0];
        node.status = status;
        node.bound  = bound;
    }

    /// The bound changes and the cuts applying to a node, from the root
    /// down to the node itself.
    pub fn path(&self, id: NodeId) -> (Vec<BoundChange>, Vec<Constraint>) {
        let mut chain = vec![];
        let mut current = Some(id);
        while let Some(n) = current {
            chain.push(n);
            current = self.nodes[n.0].parent;
        }
        let mut changes = vec![];
        let mut cuts = vec![];
        for n in chain.iter().rev() {
            let node = &self.nodes[n.0];
            if let Some(change) = node.change {
                changes.push(change);
            }
            cuts.extend(node.cuts.iter().cloned());
        }
        (changes, cuts)
    }

    /// Marks all open nodes as interrupted
    pub fn interrupt_open(&mut self) {
        for node in self.nodes.iter_mut() {
            if node.status == NodeStatus::Open {
                node.status = NodeStatus::Interrupted;
            }
        }
    }

    /// The lowest bound among the nodes which are not closed with a proof
    /// (+inf when there is none)
    pub fn unproved_bound(&self) -> f64 {
        self.nodes.iter()
            .filter(|n| matches!(n.status, NodeStatus::Open | NodeStatus::Interrupted))
            .map(|n| n.bound)
            .fold(f64::INFINITY, f64::min)
    }

    pub fn summaries(&self) -> Vec<NodeSummary> {
        self.nodes.iter().enumerate()
            .map(|(i, n)| NodeSummary { id: NodeId(i), parent: n.parent, depth: n.depth, status: n.status, bound: n.bound })
            .collect()
    }
}

#[cfg(test)]
mod test_tree {
    use crate::*;
    use crate::implementation::solver::tree::*;

    #[test]
    fn path_collects_changes_and_cuts_from_the_root() {
        let mut tree = SearchTree::new();
        let root = tree.root();
        let cut  = Constraint::le("cut", LinExpr::from_term(VarId(0), 1.0), 1.0);
        tree.get_mut(root).cuts.push(cut.clone());
        let a = tree.add_child(root, BoundChange::upper(VarId(0), 0.0), 1.0);
        let b = tree.add_child(a, BoundChange::lower(VarId(1), 1.0), 2.0);
        let _ = tree.add_child(root, BoundChange::lower(VarId(0), 1.0), 1.0);

        let (changes, cuts) = tree.path(b);
        assert_eq!(vec![BoundChange::upper(VarId(0), 0.0), BoundChange::lower(VarId(1), 1.0)], changes);
        assert_eq!(vec![cut], cuts);
        assert_eq!(2, tree.get(b).depth);
        assert_eq!(Some(a), tree.get(b).parent);
        assert_eq!(4, tree.len());
    }
    #[test]
    fn unproved_bound_ignores_closed_nodes() {
        let mut tree = SearchTree::new();
        let root = tree.root();
        assert_eq!(f64::NEG_INFINITY, tree.unproved_bound());
        tree.close(root, NodeStatus::SolvedFractional, 1.0);
        let a = tree.add_child(root, BoundChange::upper(VarId(0), 0.0), 3.0);
        let b = tree.add_child(root, BoundChange::lower(VarId(0), 1.0), 2.0);
        assert_eq!(2.0, tree.unproved_bound());
        tree.close(b, NodeStatus::Infeasible, f64::INFINITY);
        assert_eq!(3.0, tree.unproved_bound());
        tree.interrupt_open();
        assert_eq!(NodeStatus::Interrupted, tree.get(a).status);
        assert_eq!(3.0, tree.unproved_bound());
        tree.close(a, NodeStatus::Pruned, 3.0);
        assert_eq!(f64::INFINITY, tree.unproved_bound());
    }
    #[test]
    fn summaries_mirror_the_arena() {
        let mut tree = SearchTree::new();
        let root = tree.root();
        let a = tree.add_child(root, BoundChange::upper(VarId(0), 0.0), 3.0);
        let s = tree.summaries();
        assert_eq!(2, s.len());
        assert_eq!(None, s[0].parent);
        assert_eq!(Some(root), s[1].parent);
        assert_eq!(a, s[1].id);
        assert_eq!(NodeStatus::Open, s[1].status);
    }
}
