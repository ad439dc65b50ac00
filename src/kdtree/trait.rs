use geo_traits::{CoordTrait, RectTrait};

use crate::error::{KdTreeError, Result};
use crate::kdtree::constants::{DEFAULT_GRANULARITY, RANGE_SCAN_THRESHOLD};
use crate::kdtree::{KdTree, Node};
use crate::point::{
    check_same_dimensions, sort_by_axis, unchecked_distance_squared, Point, SharedPoint,
};
use crate::r#type::Scalar;

/// A trait for searching and accessing data out of a KdTree.
///
/// Implemented by [`KdTree`] and by [`Node`], so every query can also run against a subtree.
pub trait KdTreeIndex<N: Scalar, T>: Sized {
    /// Access the root node for manual traversal. `None` for an empty tree.
    fn root(&self) -> Option<&Node<N, T>>;

    /// The number of items in this index.
    fn num_items(&self) -> usize {
        self.root().map_or(0, Node::len)
    }

    /// Approximate nearest neighbor: descend towards `target` without backtracking and return a
    /// member of the leaf reached.
    ///
    /// The answer is always an indexed point, but not necessarily the closest one.
    fn ann<U>(&self, target: &Point<N, U>) -> Result<&SharedPoint<N, T>> {
        let mut node = query_root(self.root(), target)?;
        while let Some(child) = node.child_towards(target) {
            node = child;
        }
        node.points().first().ok_or(KdTreeError::EmptyQuery)
    }

    /// Descend towards `target` like [`ann`][Self::ann], but stop at the first node holding at
    /// most `granularity` points, returning its whole point set as a candidate bin.
    fn area_search<U>(
        &self,
        target: &Point<N, U>,
        granularity: usize,
    ) -> Result<&[SharedPoint<N, T>]> {
        let mut node = query_root(self.root(), target)?;
        // degenerate clusters are leaves, so the descent stops at them too
        while node.len() > granularity {
            match node.child_towards(target) {
                Some(child) => node = child,
                None => break,
            }
        }
        Ok(node.points())
    }

    /// Nearest neighbor within the candidate bin of [`area_search`][Self::area_search] with the
    /// default granularity of 10.
    ///
    /// The bin is scanned linearly and the first closest candidate wins. Sibling subtrees are
    /// never visited, so a closer point just across a split boundary is missed. Use
    /// [`nearest`][Self::nearest] for an exact answer.
    fn nn<U>(&self, target: &Point<N, U>) -> Result<&SharedPoint<N, T>> {
        let bin = self.area_search(target, DEFAULT_GRANULARITY)?;
        let mut best: Option<(&SharedPoint<N, T>, N)> = None;
        for point in bin {
            let dist = unchecked_distance_squared(point.coords(), target.coords());
            if best.map_or(true, |(_, best_dist)| dist < best_dist) {
                best = Some((point, dist));
            }
        }
        best.map(|(point, _)| point).ok_or(KdTreeError::EmptyQuery)
    }

    /// Exact nearest neighbor.
    ///
    /// Descends towards `target` first, then backtracks into the far side of a split whenever
    /// the splitting hyperplane is closer than the best candidate found so far.
    fn nearest<U>(&self, target: &Point<N, U>) -> Result<&SharedPoint<N, T>> {
        let root = query_root(self.root(), target)?;
        let mut best = None;
        nearest_recursive(root, target, &mut best);
        best.map(|(point, _)| point).ok_or(KdTreeError::EmptyQuery)
    }

    /// Search the index for points within an axis-aligned box.
    ///
    /// `bounds` holds one inclusive `(min, max)` pair per axis. Results list the points found
    /// under left children before those under right children.
    fn range(&self, bounds: &[(N, N)]) -> Result<Vec<&SharedPoint<N, T>>> {
        for (axis, &(min, max)) in bounds.iter().enumerate() {
            if min > max || min.is_nan() || max.is_nan() {
                return Err(KdTreeError::MalformedBounds(format!(
                    "axis {axis} has invalid bounds ({min}, {max}), expected min <= max"
                )));
            }
        }

        let Some(root) = self.root() else {
            return Ok(vec![]);
        };
        let dimensions = root.dimensions();
        if bounds.len() != dimensions {
            return Err(KdTreeError::MalformedBounds(format!(
                "expected bounds for {dimensions} axes, got {}",
                bounds.len()
            )));
        }

        let mut result = vec![];
        range_recursive(root, bounds, &mut result);
        Ok(result)
    }

    /// Search the index for points within a rectangle of any dimensionality.
    fn range_rect(&self, rect: &impl RectTrait<T = N>) -> Result<Vec<&SharedPoint<N, T>>> {
        let dimensions = rect.dim().size();
        let (min, max) = (rect.min(), rect.max());
        if min.dim().size() != dimensions || max.dim().size() != dimensions {
            return Err(KdTreeError::MalformedBounds(
                "rectangle corners disagree with the rectangle's dimensions".to_string(),
            ));
        }
        let bounds = (0..dimensions)
            .map(|axis| (min.nth_or_panic(axis), max.nth_or_panic(axis)))
            .collect::<Vec<_>>();
        self.range(&bounds)
    }
}

impl<N: Scalar, T> KdTreeIndex<N, T> for KdTree<N, T> {
    fn root(&self) -> Option<&Node<N, T>> {
        self.root.as_ref()
    }
}

impl<N: Scalar, T> KdTreeIndex<N, T> for Node<N, T> {
    fn root(&self) -> Option<&Node<N, T>> {
        Some(self)
    }
}

fn query_root<'a, N: Scalar, T, U>(
    root: Option<&'a Node<N, T>>,
    target: &Point<N, U>,
) -> Result<&'a Node<N, T>> {
    let root = root.ok_or(KdTreeError::EmptyQuery)?;
    check_same_dimensions(root.dimensions(), target.dimensions())?;
    Ok(root)
}

fn nearest_recursive<'a, N: Scalar, T, U>(
    node: &'a Node<N, T>,
    target: &Point<N, U>,
    best: &mut Option<(&'a SharedPoint<N, T>, N)>,
) {
    if node.is_leaf() {
        for point in node.points() {
            let dist = unchecked_distance_squared(point.coords(), target.coords());
            if best.map_or(true, |(_, best_dist)| dist < best_dist) {
                *best = Some((point, dist));
            }
        }
        return;
    }

    let diff = target.at(node.axis()) - node.split_value();
    let (near, far) = if diff < N::zero() {
        (node.left(), node.right())
    } else {
        (node.right(), node.left())
    };

    if let Some(near) = near {
        nearest_recursive(near, target, best);
    }
    // every point across the split is at least `diff` away on this axis alone
    if let Some(far) = far {
        if best.map_or(true, |(_, best_dist)| diff * diff < best_dist) {
            nearest_recursive(far, target, best);
        }
    }
}

fn range_recursive<'a, N: Scalar, T>(
    node: &'a Node<N, T>,
    bounds: &[(N, N)],
    result: &mut Vec<&'a SharedPoint<N, T>>,
) {
    if (node.len() <= RANGE_SCAN_THRESHOLD || node.is_leaf()) && contained(node.points(), bounds) {
        result.extend(node.points());
        return;
    }
    if node.is_leaf() {
        return;
    }

    let (min, max) = bounds[node.axis()];
    if node.split_value() > min {
        if let Some(left) = node.left() {
            range_recursive(left, bounds, result);
        }
    }
    if node.split_value() <= max {
        if let Some(right) = node.right() {
            range_recursive(right, bounds, result);
        }
    }
}

/// Whether the extrema of `points` on every axis lie within `bounds`.
///
/// Sorts a scratch list of handles per axis; the node's own order is left untouched.
fn contained<N: Scalar, T>(points: &[SharedPoint<N, T>], bounds: &[(N, N)]) -> bool {
    let mut scratch = points.iter().collect::<Vec<_>>();
    bounds.iter().enumerate().all(|(axis, &(min, max))| {
        sort_by_axis::<N, T, _>(&mut scratch, axis);
        match (scratch.first(), scratch.last()) {
            (Some(first), Some(last)) => first.at(axis) >= min && last.at(axis) <= max,
            _ => true,
        }
    })
}
