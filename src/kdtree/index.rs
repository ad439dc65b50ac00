use std::fmt;

use crate::error::Result;
use crate::kdtree::builder::build;
use crate::kdtree::pivot::{LazyAverage, PivotStrategy};
use crate::kdtree::{KdTreeBuilder, Node};
use crate::point::{Point, PointSet, SharedPoint};
use crate::r#type::Scalar;

/// An owned KdTree.
///
/// Usually this will be created from scratch via [`KdTree::new`] or
/// [`KdTreeBuilder`][crate::kdtree::KdTreeBuilder]. A tree is immutable once built; queries are
/// provided by the [`KdTreeIndex`][crate::kdtree::KdTreeIndex] trait.
pub struct KdTree<N: Scalar = f64, T = ()> {
    pub(crate) root: Option<Node<N, T>>,
}

impl<N: Scalar, T> KdTree<N, T> {
    /// Build a tree, partitioning with [`LazyAverage`] pivots.
    pub fn new(points: impl IntoIterator<Item = Point<N, T>>) -> Result<Self> {
        Self::with_pivot(points, &LazyAverage)
    }

    /// Build a tree, partitioning with the given pivot strategy.
    pub fn with_pivot<P: PivotStrategy<N>>(
        points: impl IntoIterator<Item = Point<N, T>>,
        strategy: &P,
    ) -> Result<Self> {
        let points = points.into_iter();
        let mut builder = KdTreeBuilder::with_capacity(points.size_hint().0);
        for point in points {
            builder.add(point)?;
        }
        Ok(builder.finish_with(strategy))
    }

    /// Build a tree over points that are already shared with other owners.
    pub fn from_shared<P: PivotStrategy<N>>(points: PointSet<N, T>, strategy: &P) -> Result<Self> {
        Ok(Self {
            root: build(points, 0, strategy)?,
        })
    }

    /// The number of points in this tree.
    pub fn len(&self) -> usize {
        self.root.as_ref().map_or(0, Node::len)
    }

    /// Returns `true` if this tree holds no points.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The dimensionality of the indexed points, or `None` for an empty tree.
    pub fn dimensions(&self) -> Option<usize> {
        self.root.as_ref().map(Node::dimensions)
    }

    /// The greatest depth of any leaf. Zero for an empty tree.
    pub fn max_depth(&self) -> usize {
        self.root.as_ref().map_or(0, Node::max_depth)
    }

    /// Every point in this tree, in the order the root retains them.
    pub fn points(&self) -> &[SharedPoint<N, T>] {
        self.root.as_ref().map(Node::points).unwrap_or_default()
    }

    /// Consume the tree, returning its root node.
    pub fn into_root(self) -> Option<Node<N, T>> {
        self.root
    }
}

impl<N: Scalar, T> Default for KdTree<N, T> {
    fn default() -> Self {
        Self { root: None }
    }
}

impl<N: Scalar, T> Clone for KdTree<N, T> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
        }
    }
}

impl<N: Scalar, T> From<Node<N, T>> for KdTree<N, T> {
    fn from(root: Node<N, T>) -> Self {
        Self { root: Some(root) }
    }
}

impl<N: Scalar, T> fmt::Debug for KdTree<N, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KdTree")
            .field("num_items", &self.len())
            .field("dimensions", &self.dimensions().unwrap_or(0))
            .field("max_depth", &self.max_depth())
            .finish()
    }
}
