//! Points and the geometric primitives the tree is built on.
//!
//! A [`Point`] is an immutable vector of coordinates with an optional payload. Trees never copy
//! points: every node holds [`SharedPoint`] handles onto the same allocation, so a point in a leaf
//! is also referenced by each of its ancestors.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use geo_traits::CoordTrait;

use crate::error::{KdTreeError, Result};
use crate::r#type::Scalar;

/// A point shared between every node whose subtree contains it.
pub type SharedPoint<N = f64, T = ()> = Arc<Point<N, T>>;

/// An ordered collection of shared points.
pub type PointSet<N = f64, T = ()> = Vec<SharedPoint<N, T>>;

/// A fixed-length vector of coordinates, optionally tagged with a payload.
#[derive(Debug, Clone)]
pub struct Point<N: Scalar = f64, T = ()> {
    coords: Box<[N]>,
    payload: Option<T>,
}

impl<N: Scalar> Point<N> {
    /// Create a new point without a payload.
    pub fn new(coords: Vec<N>) -> Self {
        Self {
            coords: coords.into_boxed_slice(),
            payload: None,
        }
    }

    /// Read every dimension of a [`CoordTrait`] implementation into a new point.
    pub fn from_coord(coord: &impl CoordTrait<T = N>) -> Self {
        let dimensions = coord.dim().size();
        (0..dimensions).map(|axis| coord.nth_or_panic(axis)).collect()
    }
}

impl<N: Scalar, T> Point<N, T> {
    /// Create a new point carrying `payload`.
    pub fn with_payload(coords: Vec<N>, payload: T) -> Self {
        Self {
            coords: coords.into_boxed_slice(),
            payload: Some(payload),
        }
    }

    /// The coordinates of this point.
    #[inline]
    pub fn coords(&self) -> &[N] {
        &self.coords
    }

    /// An owned copy of the coordinates of this point.
    pub fn to_vec(&self) -> Vec<N> {
        self.coords.to_vec()
    }

    /// The coordinate on `axis`, or `None` if this point has fewer dimensions.
    #[inline]
    pub fn coord(&self, axis: usize) -> Option<N> {
        self.coords.get(axis).copied()
    }

    /// The number of coordinates in this point.
    #[inline]
    pub fn dimensions(&self) -> usize {
        self.coords.len()
    }

    /// The payload attached to this point, if any.
    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    /// Consume this point, returning its payload.
    pub fn into_payload(self) -> Option<T> {
        self.payload
    }

    /// Squared Euclidean distance to `other`.
    pub fn distance_squared<U>(&self, other: &Point<N, U>) -> Result<N> {
        distance_squared(self, other)
    }

    /// Euclidean distance to `other`.
    pub fn distance<U>(&self, other: &Point<N, U>) -> Result<N> {
        distance(self, other)
    }

    /// Unchecked access for callers that already validated dimensionality.
    #[inline]
    pub(crate) fn at(&self, axis: usize) -> N {
        self.coords[axis]
    }
}

#[cfg(feature = "rand")]
impl<N> Point<N>
where
    N: Scalar + rand::distributions::uniform::SampleUniform,
{
    /// A random point in `dimensions` dimensions with every coordinate in `[0, 1)`.
    ///
    /// Useful for testing or for adding noise to a dataset.
    pub fn random<R: rand::Rng + ?Sized>(dimensions: usize, rng: &mut R) -> Self {
        Self::random_in_range(dimensions, N::zero(), N::one(), rng)
    }

    /// A random point in `dimensions` dimensions with every coordinate in `[min, max)`.
    ///
    /// Panics if `min >= max`.
    pub fn random_in_range<R: rand::Rng + ?Sized>(
        dimensions: usize,
        min: N,
        max: N,
        rng: &mut R,
    ) -> Self {
        (0..dimensions).map(|_| rng.gen_range(min..max)).collect()
    }
}

impl<N: Scalar> FromIterator<N> for Point<N> {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<N: Scalar, T> AsRef<Point<N, T>> for Point<N, T> {
    fn as_ref(&self) -> &Point<N, T> {
        self
    }
}

/// Points are equal when they have the same dimensionality and exactly equal coordinates.
/// Payloads are not compared.
impl<N: Scalar, T, U> PartialEq<Point<N, U>> for Point<N, T> {
    fn eq(&self, other: &Point<N, U>) -> bool {
        self.coords == other.coords
    }
}

impl<N: Scalar, T> fmt::Display for Point<N, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, c) in self.coords.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, ")")
    }
}

#[inline]
pub(crate) fn check_same_dimensions(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(KdTreeError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

/// The squared Euclidean distance between `p` and `q`.
pub fn distance_squared<N: Scalar, T, U>(p: &Point<N, T>, q: &Point<N, U>) -> Result<N> {
    check_same_dimensions(p.dimensions(), q.dimensions())?;
    Ok(unchecked_distance_squared(p.coords(), q.coords()))
}

/// The Euclidean length of the line connecting `p` and `q`.
pub fn distance<N: Scalar, T, U>(p: &Point<N, T>, q: &Point<N, U>) -> Result<N> {
    distance_squared(p, q).map(N::sqrt)
}

#[inline]
pub(crate) fn unchecked_distance_squared<N: Scalar>(p: &[N], q: &[N]) -> N {
    p.iter().zip(q).fold(N::zero(), |acc, (&a, &b)| {
        let d = b - a;
        acc + d * d
    })
}

/// A predicate ordering two points by their coordinate on `axis`.
///
/// Points without a coordinate on `axis` never compare less than anything.
pub fn axis_less<N: Scalar, T>(axis: usize) -> impl Fn(&Point<N, T>, &Point<N, T>) -> bool {
    move |p, q| matches!((p.coord(axis), q.coord(axis)), (Some(a), Some(b)) if a < b)
}

/// Compare two points on `axis`, failing if either point lacks that axis.
pub fn compare_axis<N: Scalar, T, U>(
    p: &Point<N, T>,
    q: &Point<N, U>,
    axis: usize,
) -> Result<Ordering> {
    check_same_dimensions(p.dimensions(), q.dimensions())?;
    match (p.coord(axis), q.coord(axis)) {
        (Some(a), Some(b)) => Ok(a.partial_cmp(&b).unwrap_or(Ordering::Equal)),
        _ => Err(KdTreeError::DimensionMismatch {
            expected: axis + 1,
            actual: p.dimensions(),
        }),
    }
}

#[inline]
pub(crate) fn axis_ordering<N: Scalar, T, U>(
    p: &Point<N, T>,
    q: &Point<N, U>,
    axis: usize,
) -> Ordering {
    p.at(axis).partial_cmp(&q.at(axis)).unwrap_or(Ordering::Equal)
}

/// Stable ascending sort of `points` by their coordinate on `axis`.
///
/// Every point must have more than `axis` dimensions.
pub fn sort_by_axis<N, T, P>(points: &mut [P], axis: usize)
where
    N: Scalar,
    P: AsRef<Point<N, T>>,
{
    points.sort_by(|p, q| axis_ordering(p.as_ref(), q.as_ref(), axis));
}

/// Two point sets are equal when they hold identical coordinates, pairwise, in order.
pub fn point_sets_equal<N, T, U, P, Q>(a: &[P], b: &[Q]) -> bool
where
    N: Scalar,
    P: AsRef<Point<N, T>>,
    Q: AsRef<Point<N, U>>,
{
    a.len() == b.len() && a.iter().zip(b).all(|(p, q)| p.as_ref() == q.as_ref())
}

/// Validate that every point in `points` shares one non-zero dimensionality.
///
/// Returns that dimensionality, or `None` for an empty set.
pub fn check_dimensions<N, T, P>(points: &[P]) -> Result<Option<usize>>
where
    N: Scalar,
    P: AsRef<Point<N, T>>,
{
    let Some(first) = points.first() else {
        return Ok(None);
    };
    let expected = first.as_ref().dimensions();
    if expected == 0 {
        return Err(KdTreeError::ZeroDimensions);
    }
    for point in &points[1..] {
        check_same_dimensions(expected, point.as_ref().dimensions())?;
    }
    Ok(Some(expected))
}

/// Returns `true` when `points` holds at least two points and all of them are identical.
pub(crate) fn is_degenerate<N: Scalar, T>(points: &[SharedPoint<N, T>]) -> bool {
    match points.split_first() {
        Some((first, rest)) if !rest.is_empty() => rest.iter().all(|p| **p == **first),
        _ => false,
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use geo_traits::{CoordTrait, Dimensions};

    use super::*;

    struct Coord3 {
        values: [f64; 3],
    }

    impl CoordTrait for Coord3 {
        type T = f64;

        fn dim(&self) -> Dimensions {
            Dimensions::Xyz
        }

        fn x(&self) -> f64 {
            self.values[0]
        }

        fn y(&self) -> f64 {
            self.values[1]
        }

        fn nth_or_panic(&self, n: usize) -> f64 {
            self.values[n]
        }
    }

    #[test]
    fn squared_and_euclidean_distance() {
        let a = Point::new(vec![0., 0.]);
        let b = Point::new(vec![0., 1.]);
        assert_eq!(distance_squared(&a, &b).unwrap(), 1.);
        assert_eq!(distance(&a, &b).unwrap(), 1.);

        let c = Point::new(vec![3., 3., 3.]);
        let d = Point::new(vec![-2., 7.5, 0.125]);
        let want_sq = (-2f64 - 3.).powi(2) + (7.5f64 - 3.).powi(2) + (0.125f64 - 3.).powi(2);
        assert_eq!(c.distance_squared(&d).unwrap(), want_sq);
        assert_eq!(c.distance(&d).unwrap(), want_sq.sqrt());
    }

    #[test]
    fn distance_rejects_mismatched_dimensions() {
        let a = Point::new(vec![0., 0.]);
        let b = Point::new(vec![0., 1., 2.]);
        assert_eq!(
            distance_squared(&a, &b),
            Err(KdTreeError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        );
        assert!(distance(&a, &b).is_err());
        assert!(compare_axis(&a, &b, 0).is_err());
    }

    #[test]
    fn equality_ignores_payload() {
        let a = Point::with_payload(vec![1., 2.], "alpha");
        let b = Point::with_payload(vec![1., 2.], 42u32);
        let c = Point::new(vec![1., 2., 0.]);
        assert!(a == b);
        assert!(a != c);
        assert_eq!(a.payload(), Some(&"alpha"));
        assert_eq!(Point::new(vec![1.]).payload(), None);
    }

    #[test]
    fn coordinates_are_copied_out() {
        let p = Point::with_payload(vec![6.0000125, 6.10000125, -1.3173, 1373.], "cassandra");
        let mut copy = p.to_vec();
        copy[0] = 0.;
        assert_eq!(p.coords(), &[6.0000125, 6.10000125, -1.3173, 1373.]);
        assert_eq!(p.dimensions(), 4);
        assert_eq!(p.coord(3), Some(1373.));
        assert_eq!(p.coord(4), None);
        assert_eq!(p.into_payload(), Some("cassandra"));
    }

    #[test]
    fn display() {
        let p = Point::new(vec![0.6227283173637045, 0.3696928436398219]);
        assert_eq!(p.to_string(), "(0.6227283173637045, 0.3696928436398219)");
        assert_eq!(Point::new(vec![100.3]).to_string(), "(100.3)");
    }

    #[test]
    fn axis_sort_is_stable() {
        let mut points: Vec<SharedPoint<f64, &str>> = vec![
            Arc::new(Point::with_payload(vec![3., 1.], "a")),
            Arc::new(Point::with_payload(vec![1., 5.], "b")),
            Arc::new(Point::with_payload(vec![3., 0.], "c")),
            Arc::new(Point::with_payload(vec![2., 9.], "d")),
        ];
        sort_by_axis::<f64, &str, _>(&mut points, 0);
        let order: Vec<&str> = points.iter().map(|p| *p.payload().unwrap()).collect();
        assert_eq!(order, vec!["b", "d", "a", "c"]);

        let less = axis_less(1);
        assert!(less(&*points[3], &*points[2]));
        assert!(!less(&*points[2], &*points[3]));
        assert!(!axis_less(5)(&*points[0], &*points[1]));
    }

    #[test]
    fn point_set_equality() {
        let a = vec![Point::new(vec![1., 2.]), Point::new(vec![3., 4.])];
        let b: PointSet = a.iter().cloned().map(Arc::new).collect();
        let reversed: PointSet = a.iter().rev().cloned().map(Arc::new).collect();
        assert!(point_sets_equal::<f64, (), (), _, _>(&a, &b));
        assert!(!point_sets_equal::<f64, (), (), _, _>(&a, &reversed));
        assert!(!point_sets_equal::<f64, (), (), _, _>(&a, &b[..1]));
    }

    #[test]
    fn dimension_validation() {
        let empty: Vec<Point> = vec![];
        assert_eq!(check_dimensions::<f64, (), _>(&empty), Ok(None));

        let ok = vec![Point::new(vec![1., 2.]), Point::new(vec![3., 4.])];
        assert_eq!(check_dimensions::<f64, (), _>(&ok), Ok(Some(2)));

        let mixed = vec![Point::new(vec![1., 2.]), Point::new(vec![3.])];
        assert_eq!(
            check_dimensions::<f64, (), _>(&mixed),
            Err(KdTreeError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        );

        let zero = vec![Point::<f64>::new(vec![])];
        assert_eq!(check_dimensions::<f64, (), _>(&zero), Err(KdTreeError::ZeroDimensions));
    }

    #[test]
    fn degenerate_detection() {
        let same: PointSet = (0..3).map(|_| Arc::new(Point::new(vec![1., 1.]))).collect();
        assert!(is_degenerate(&same));
        assert!(!is_degenerate(&same[..1]));

        let mut different = same.clone();
        different.push(Arc::new(Point::new(vec![1., 2.])));
        assert!(!is_degenerate(&different));
    }

    #[test]
    fn from_geo_coord() {
        let p = Point::from_coord(&Coord3 {
            values: [1., 2., 3.],
        });
        assert_eq!(p.coords(), &[1., 2., 3.]);
    }

    #[cfg(feature = "rand")]
    #[test]
    fn random_points_lie_in_range() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut rng = StdRng::seed_from_u64(7);
        for dimensions in 1..=10 {
            let p = Point::<f64>::random(dimensions, &mut rng);
            assert_eq!(p.dimensions(), dimensions);
            assert!(p.coords().iter().all(|c| (0. ..1.).contains(c)));

            let q = Point::<f64>::random_in_range(dimensions, -5., 5., &mut rng);
            assert!(q.coords().iter().all(|c| (-5. ..5.).contains(c)));
        }
    }
}
