//! Conversion between external record types and [`Point`]s.

use std::sync::Arc;

use crate::error::Result;
use crate::kdtree::{KdTree, KdTreeBuilder, LazyAverage, PivotStrategy};
use crate::point::{Point, PointSet};
use crate::r#type::Scalar;

/// A record that can produce a point from itself.
pub trait IntoPoint<N: Scalar> {
    /// The payload attached to produced points.
    type Payload;

    /// Produce a point, typically carrying an identifier of this record as its payload.
    fn to_point(&self) -> Point<N, Self::Payload>;
}

impl<N: Scalar, T: Clone> IntoPoint<N> for Point<N, T> {
    type Payload = T;

    fn to_point(&self) -> Point<N, T> {
        self.clone()
    }
}

/// A record that can update its own fields from a point.
pub trait FromPoint<N: Scalar> {
    /// Overwrite this record's coordinate fields with those of `point`.
    fn update_from_point<T>(&mut self, point: &Point<N, T>);
}

/// Convert `record` and append it to `points`.
pub fn import<N: Scalar, R: IntoPoint<N>>(points: &mut PointSet<N, R::Payload>, record: &R) {
    points.push(Arc::new(record.to_point()));
}

impl<N: Scalar, T> KdTree<N, T> {
    /// Build a tree from records, partitioning with [`LazyAverage`] pivots.
    pub fn from_records<'a, R>(records: impl IntoIterator<Item = &'a R>) -> Result<Self>
    where
        R: IntoPoint<N, Payload = T> + 'a,
    {
        Self::from_records_with(records, &LazyAverage)
    }

    /// Build a tree from records, partitioning with the given pivot strategy.
    pub fn from_records_with<'a, R, P>(
        records: impl IntoIterator<Item = &'a R>,
        strategy: &P,
    ) -> Result<Self>
    where
        R: IntoPoint<N, Payload = T> + 'a,
        P: PivotStrategy<N>,
    {
        let mut builder = KdTreeBuilder::new();
        for record in records {
            builder.add(record.to_point())?;
        }
        Ok(builder.finish_with(strategy))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::KdTreeError;
    use crate::kdtree::{KdTreeIndex, Median};

    #[derive(Debug, Default, PartialEq)]
    struct Station {
        id: u32,
        lon: f64,
        lat: f64,
    }

    impl IntoPoint<f64> for Station {
        type Payload = u32;

        fn to_point(&self) -> Point<f64, u32> {
            Point::with_payload(vec![self.lon, self.lat], self.id)
        }
    }

    impl FromPoint<f64> for Station {
        fn update_from_point<T>(&mut self, point: &Point<f64, T>) {
            if let [lon, lat] = point.coords() {
                self.lon = *lon;
                self.lat = *lat;
            }
        }
    }

    fn stations() -> Vec<Station> {
        vec![
            Station {
                id: 1,
                lon: 13.4,
                lat: 52.5,
            },
            Station {
                id: 2,
                lon: 2.35,
                lat: 48.86,
            },
            Station {
                id: 3,
                lon: -0.13,
                lat: 51.51,
            },
            Station {
                id: 4,
                lon: 12.5,
                lat: 41.9,
            },
        ]
    }

    #[test]
    fn tree_from_records() {
        let stations = stations();
        let tree = KdTree::from_records_with(&stations, &Median).unwrap();
        assert_eq!(tree.len(), 4);

        let berlin = tree.nearest(&Point::new(vec![13., 52.])).unwrap();
        assert_eq!(berlin.payload(), Some(&1));

        let found = tree.range(&[(-1., 3.), (45., 55.)]).unwrap();
        let mut ids = found.iter().filter_map(|p| p.payload()).collect::<Vec<_>>();
        ids.sort();
        assert_eq!(ids, vec![&2, &3]);
    }

    #[test]
    fn records_are_validated() {
        struct Ragged(Vec<f64>);

        impl IntoPoint<f64> for Ragged {
            type Payload = ();

            fn to_point(&self) -> Point<f64> {
                Point::new(self.0.clone())
            }
        }

        let records = [Ragged(vec![1., 2.]), Ragged(vec![3.])];
        assert_eq!(
            KdTree::from_records(&records).map(|tree| tree.len()),
            Err(KdTreeError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn import_and_export() {
        let mut points: PointSet<f64, u32> = Vec::new();
        for station in &stations() {
            import(&mut points, station);
        }
        assert_eq!(points.len(), 4);
        assert_eq!(points[3].payload(), Some(&4));

        let mut station = Station::default();
        station.update_from_point(&*points[1]);
        assert_eq!(station.lon, 2.35);
        assert_eq!(station.lat, 48.86);

        let copy = points[0].to_point();
        assert_eq!(copy, *points[0]);
        assert_eq!(copy.payload(), Some(&1));
    }
}
