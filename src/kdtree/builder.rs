use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::{KdTreeError, Result};
use crate::kdtree::pivot::{splitting_threshold, LazyAverage, PivotStrategy};
use crate::kdtree::{KdTree, Node};
use crate::point::{check_same_dimensions, is_degenerate, Point, PointSet, SharedPoint};
use crate::r#type::Scalar;

/// A builder to create a [`KdTree`].
///
/// Points are validated as they are added, so [`finish`][Self::finish] cannot fail.
#[derive(Debug)]
pub struct KdTreeBuilder<N: Scalar = f64, T = ()> {
    points: PointSet<N, T>,
    dimensions: Option<usize>,
}

impl<N: Scalar, T> KdTreeBuilder<N, T> {
    /// Create a new, empty builder.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a new builder with room for `num_items` points.
    pub fn with_capacity(num_items: usize) -> Self {
        Self {
            points: Vec::with_capacity(num_items),
            dimensions: None,
        }
    }

    /// Add a point to the index, returning its insertion index.
    ///
    /// Fails if the point has no coordinates, has a NaN coordinate, or has a different
    /// dimensionality than the points added before it.
    pub fn add(&mut self, point: Point<N, T>) -> Result<usize> {
        self.add_shared(Arc::new(point))
    }

    /// Add a point that is already shared with other owners.
    pub fn add_shared(&mut self, point: SharedPoint<N, T>) -> Result<usize> {
        let dimensions = validate_point(&point, self.dimensions)?;
        self.dimensions = Some(dimensions);
        let index = self.points.len();
        self.points.push(point);
        Ok(index)
    }

    /// The number of points added so far.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if no points were added.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consume this builder, partitioning with [`LazyAverage`] pivots.
    pub fn finish(self) -> KdTree<N, T> {
        self.finish_with(&LazyAverage)
    }

    /// Consume this builder, partitioning with the given pivot strategy.
    pub fn finish_with<P: PivotStrategy<N>>(self, strategy: &P) -> KdTree<N, T> {
        let num_items = self.points.len();
        let root = self
            .dimensions
            .map(|dimensions| build_node(self.points, 0, dimensions, strategy, 0));
        let tree = KdTree { root };
        debug!(
            num_items,
            dimensions = self.dimensions.unwrap_or(0),
            max_depth = tree.max_depth(),
            "built kd-tree"
        );
        tree
    }
}

impl<N: Scalar, T> Default for KdTreeBuilder<N, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Recursively partition `points` into a subtree whose root sits at `depth`.
///
/// Returns `None` for an empty point set. Fails if the points do not share one non-zero
/// dimensionality or contain a NaN coordinate.
pub fn build<N, T, P>(
    points: PointSet<N, T>,
    depth: usize,
    strategy: &P,
) -> Result<Option<Node<N, T>>>
where
    N: Scalar,
    P: PivotStrategy<N>,
{
    let mut dimensions = None;
    for point in &points {
        dimensions = Some(validate_point(point, dimensions)?);
    }
    Ok(dimensions.map(|dimensions| build_node(points, depth, dimensions, strategy, 0)))
}

fn validate_point<N: Scalar, T>(point: &Point<N, T>, expected: Option<usize>) -> Result<usize> {
    let actual = point.dimensions();
    if actual == 0 {
        return Err(KdTreeError::ZeroDimensions);
    }
    if let Some(expected) = expected {
        check_same_dimensions(expected, actual)?;
    }
    if point.coords().iter().any(|c| c.is_nan()) {
        return Err(KdTreeError::NanCoordinate);
    }
    Ok(actual)
}

/// `stalled` counts the consecutive ancestors whose pivot left every point on one side.
fn build_node<N, T, P>(
    mut points: PointSet<N, T>,
    depth: usize,
    dimensions: usize,
    strategy: &P,
    stalled: usize,
) -> Node<N, T>
where
    N: Scalar,
    P: PivotStrategy<N>,
{
    if points.len() <= 1 {
        return Node::leaf(points, depth);
    }
    if is_degenerate(&points) {
        trace!(depth, len = points.len(), "degenerate cluster");
        return Node::leaf(points, depth);
    }

    let axis = depth % dimensions;
    let mut split_value = strategy.split_value(&mut points, axis);
    let (mut left, mut right) = partition(&points, axis, split_value);

    // Once every axis has been tried without progress, force a split so recursion terminates.
    if (left.is_empty() || right.is_empty()) && stalled >= dimensions {
        if let Some(threshold) = splitting_threshold(&points, axis) {
            trace!(depth, axis, "pivot left every point on one side, forcing a split");
            split_value = threshold;
            (left, right) = partition(&points, axis, split_value);
        }
    }

    let stalled = if left.is_empty() || right.is_empty() {
        stalled + 1
    } else {
        0
    };
    let child = |set: PointSet<N, T>| {
        (!set.is_empty())
            .then(|| Box::new(build_node(set, depth + 1, dimensions, strategy, stalled)))
    };
    let left = child(left);
    let right = child(right);

    Node {
        points,
        split_value,
        depth,
        left,
        right,
    }
}

/// Stable partition into points strictly below `split_value` on `axis` and all others.
fn partition<N: Scalar, T>(
    points: &[SharedPoint<N, T>],
    axis: usize,
    split_value: N,
) -> (PointSet<N, T>, PointSet<N, T>) {
    points
        .iter()
        .cloned()
        .partition(|point| point.at(axis) < split_value)
}
