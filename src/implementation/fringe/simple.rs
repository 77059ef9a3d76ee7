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

//! This module provides the implementation of a simple solver fringe (priority queue)

use binary_heap_plus::BinaryHeap;

use crate::*;


/// The simplest fringe implementation you can think of: is basically consists
/// of a binary heap that pushes and pops open nodes
///
/// # Note
/// This is the fringe used by both sequential and parallel solvers. The
/// order in which it pops its nodes is entirely determined by its ranking.
pub struct SimpleFringe<O: NodeRanking> {
    heap: BinaryHeap<OpenNode, CompareNode<O>>
}
impl <O> SimpleFringe<O> where O: NodeRanking {
    /// This creates a new simple fringe which uses a custom fringe order.
    pub fn new(o: O) -> Self {
        Self{ heap: BinaryHeap::from_vec_cmp(vec![], CompareNode::new(o)) }
    }
}
impl <O> Fringe for SimpleFringe<O> where O: NodeRanking {
    fn push(&mut self, node: OpenNode) {
        self.heap.push(node)
    }

    fn pop(&mut self) -> Option<OpenNode> {
        self.heap.pop()
    }

    fn clear(&mut self) {
        self.heap.clear()
    }

    fn len(&self) -> usize {
        self.heap.len()
    }

    fn min_bound(&self) -> Option<f64> {
        self.heap.iter().map(|n| n.bound).min_by(|a, b| a.total_cmp(b))
    }
}


#[cfg(test)]
mod test_simple_fringe {
    use crate::*;

    fn node(id: usize, bound: f64, depth: usize) -> OpenNode {
        OpenNode { id: NodeId(id), bound, depth }
    }

    // by default, it is empty
    #[test]
    fn by_default_it_is_empty() {
        let fringe = SimpleFringe::new(BestBoundRanking);
        assert!(fringe.is_empty());
        assert_eq!(0, fringe.len());
        assert!(fringe.min_bound().is_none());
    }

    // when I push a node onto the fringe then the length increases
    #[test]
    fn when_i_push_a_node_onto_the_fringe_then_the_length_increases() {
        let mut fringe = SimpleFringe::new(BestBoundRanking);
        fringe.push(node(0, 10.0, 0));
        fringe.push(node(1, 20.0, 1));
        assert_eq!(fringe.len(), 2);
        assert!(!fringe.is_empty());
    }

    // when I pop a node off the fringe then the length decreases
    #[test]
    fn when_i_pop_a_node_off_the_fringe_then_the_length_decreases() {
        let mut fringe = SimpleFringe::new(BestBoundRanking);
        fringe.push(node(0, 10.0, 0));
        fringe.push(node(1, 20.0, 1));
        fringe.pop();
        assert_eq!(fringe.len(), 1);
        fringe.pop();
        assert_eq!(fringe.len(), 0);
        assert!(fringe.pop().is_none());
    }

    // when I pop a node, it is always the one with the lowest bound
    #[test]
    fn with_best_bound_nodes_are_popped_by_increasing_bound() {
        let mut fringe = SimpleFringe::new(BestBoundRanking);
        fringe.push(node(0, 4.0, 1));
        fringe.push(node(1, 2.0, 1));
        fringe.push(node(2, 3.0, 2));
        fringe.push(node(3, 1.0, 3));
        fringe.push(node(4, 2.0, 2));

        let popped: Vec<usize> = std::iter::from_fn(|| fringe.pop()).map(|n| n.id.id()).collect();
        assert_eq!(vec![3, 1, 4, 2, 0], popped);
    }

    #[test]
    fn min_bound_does_not_depend_on_the_ranking() {
        let mut fringe = SimpleFringe::new(DepthFirstRanking);
        fringe.push(node(0, 4.0, 1));
        fringe.push(node(1, 7.0, 5));
        fringe.push(node(2, 3.0, 0));
        assert_eq!(Some(3.0), fringe.min_bound());
        assert_eq!(NodeId(1), fringe.pop().unwrap().id);
    }

    #[test]
    fn clear_empties_the_fringe() {
        let mut fringe = SimpleFringe::new(BestBoundRanking);
        fringe.push(node(0, 4.0, 1));
        fringe.push(node(1, 2.0, 1));
        fringe.clear();
        assert!(fringe.is_empty());
    }
}
