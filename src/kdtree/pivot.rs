//! Strategies for choosing the split threshold of a node.

use std::cmp::Ordering;

use crate::point::{sort_by_axis, SharedPoint};
use crate::r#type::Scalar;

/// A strategy computing the split threshold of a set of points on one axis.
///
/// The builder trusts the returned value: points strictly below it go to the left child and all
/// others go to the right child. A poor threshold only costs balance, never correctness.
///
/// Strategies are always called with at least two points, each with more than `axis`
/// dimensions. They may reorder `points`; the node keeps whatever order the strategy leaves.
pub trait PivotStrategy<N: Scalar> {
    /// Compute the split threshold for `points` on `axis`.
    fn split_value<T>(&self, points: &mut [SharedPoint<N, T>], axis: usize) -> N;
}

impl<N: Scalar, S: PivotStrategy<N>> PivotStrategy<N> for &S {
    #[inline]
    fn split_value<T>(&self, points: &mut [SharedPoint<N, T>], axis: usize) -> N {
        (**self).split_value(points, axis)
    }
}

/// The average of the first and last point on the axis, in their current order.
///
/// This is O(1) and gives good splits only when the input order is representative, e.g.
/// pre-sorted or uniformly shuffled data.
#[derive(Debug, Clone, Copy, Default)]
pub struct LazyAverage;

impl<N: Scalar> PivotStrategy<N> for LazyAverage {
    fn split_value<T>(&self, points: &mut [SharedPoint<N, T>], axis: usize) -> N {
        match (points.first(), points.last()) {
            (Some(first), Some(last)) => (first.at(axis) + last.at(axis)) / (N::one() + N::one()),
            _ => N::zero(),
        }
    }
}

/// The coordinate of the element at index `len / 2` after sorting ascending on the axis.
///
/// For even sizes this is the upper of the two middle elements; values are never interpolated.
#[derive(Debug, Clone, Copy, Default)]
pub struct Median;

impl<N: Scalar> PivotStrategy<N> for Median {
    fn split_value<T>(&self, points: &mut [SharedPoint<N, T>], axis: usize) -> N {
        sort_by_axis::<N, T, _>(points, axis);
        points
            .get(points.len() / 2)
            .map_or(N::zero(), |point| point.at(axis))
    }
}

/// The arithmetic mean of every point on the axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mean;

impl<N: Scalar> PivotStrategy<N> for Mean {
    fn split_value<T>(&self, points: &mut [SharedPoint<N, T>], axis: usize) -> N {
        let (sum, count) = points
            .iter()
            .fold((N::zero(), N::zero()), |(sum, count), point| {
                (sum + point.at(axis), count + N::one())
            });
        if count == N::zero() {
            return N::zero();
        }
        sum / count
    }
}

/// A threshold guaranteed to split `points` on `axis`, or `None` if every point shares one
/// coordinate there.
///
/// This is the upper median when it lies above the axis minimum, otherwise the smallest
/// coordinate above the minimum. Either way both sides are non-empty and the left side holds
/// every point at the minimum.
pub(crate) fn splitting_threshold<N: Scalar, T>(
    points: &[SharedPoint<N, T>],
    axis: usize,
) -> Option<N> {
    let mut values = points.iter().map(|point| point.at(axis)).collect::<Vec<_>>();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let min = *values.first()?;
    let middle = values[values.len() / 2];
    if middle > min {
        return Some(middle);
    }
    values.into_iter().find(|&value| value > min)
}
