//! Utilities to traverse the KdTree structure.

use crate::point::{is_degenerate, Point, PointSet, SharedPoint};
use crate::r#type::Scalar;

/// A node in the KdTree.
///
/// Every node retains the full set of points in its subtree, not only leaves. Points are shared
/// with the node's ancestors; only the collection of handles belongs to this node.
#[derive(Debug)]
pub struct Node<N: Scalar = f64, T = ()> {
    pub(crate) points: PointSet<N, T>,

    /// The pivot threshold. Zero for leaves.
    pub(crate) split_value: N,

    /// Distance from the root. The split axis is `depth % dimensions`.
    pub(crate) depth: usize,

    /// Points with a coordinate strictly below `split_value` on this node's axis.
    pub(crate) left: Option<Box<Node<N, T>>>,

    /// Points with a coordinate at or above `split_value` on this node's axis.
    pub(crate) right: Option<Box<Node<N, T>>>,
}

impl<N: Scalar, T> Node<N, T> {
    pub(crate) fn leaf(points: PointSet<N, T>, depth: usize) -> Self {
        Self {
            points,
            split_value: N::zero(),
            depth,
            left: None,
            right: None,
        }
    }

    /// All points in the subtree rooted at this node.
    pub fn points(&self) -> &[SharedPoint<N, T>] {
        &self.points
    }

    /// The number of points in the subtree rooted at this node.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Nodes are never built without points, so this is `false` for every node in a tree.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The threshold this node splits on. Zero for leaves.
    pub fn split_value(&self) -> N {
        self.split_value
    }

    /// Distance from the root of the tree.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The dimensionality of the points under this node.
    pub fn dimensions(&self) -> usize {
        self.points.first().map_or(0, |point| point.dimensions())
    }

    /// The coordinate axis this node splits on.
    pub fn axis(&self) -> usize {
        self.depth % self.dimensions().max(1)
    }

    /// The child holding points below the split value.
    pub fn left(&self) -> Option<&Node<N, T>> {
        self.left.as_deref()
    }

    /// The child holding points at or above the split value.
    pub fn right(&self) -> Option<&Node<N, T>> {
        self.right.as_deref()
    }

    /// Returns `true` if this is a leaf node without children.
    ///
    /// Leaves hold a single point or a degenerate cluster of identical points.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Returns `true` if this is an intermediate node with children.
    #[inline]
    pub fn is_parent(&self) -> bool {
        !self.is_leaf()
    }

    /// Returns `true` if this node holds two or more identical points.
    pub fn is_degenerate(&self) -> bool {
        is_degenerate(&self.points)
    }

    /// The greatest depth among the leaves under this node.
    pub fn max_depth(&self) -> usize {
        self.leaves().map(Node::depth).max().unwrap_or(self.depth)
    }

    /// An iterator over the leaves under this node, left to right.
    pub fn leaves(&self) -> Leaves<'_, N, T> {
        Leaves { stack: vec![self] }
    }

    /// The child a descent towards `target` continues into.
    ///
    /// When the preferred side is absent because every point fell on the other side of the split,
    /// the descent continues into the side that exists. `None` only for leaves.
    pub(crate) fn child_towards<U>(&self, target: &Point<N, U>) -> Option<&Node<N, T>> {
        let (preferred, other) = if target.at(self.axis()) < self.split_value {
            (self.left(), self.right())
        } else {
            (self.right(), self.left())
        };
        preferred.or(other)
    }
}

impl<N: Scalar, T> Clone for Node<N, T> {
    fn clone(&self) -> Self {
        Self {
            points: self.points.clone(),
            split_value: self.split_value,
            depth: self.depth,
            left: self.left.clone(),
            right: self.right.clone(),
        }
    }
}

/// Depth-first iterator over the leaves of a subtree. Created by [`Node::leaves`].
#[derive(Debug)]
pub struct Leaves<'a, N: Scalar, T> {
    stack: Vec<&'a Node<N, T>>,
}

impl<'a, N: Scalar, T> Iterator for Leaves<'a, N, T> {
    type Item = &'a Node<N, T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if node.is_leaf() {
                return Some(node);
            }
            // pushed in reverse so the left subtree is yielded first
            self.stack.extend(node.right());
            self.stack.extend(node.left());
        }
        None
    }
}
