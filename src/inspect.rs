//! Structured serialization of points and trees, for debugging and tooling.
//!
//! Every node is written with its depth, cardinality, retained points, split value and both
//! children, recursively. Absent children are written as null.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::kdtree::{KdTree, Node};
use crate::point::Point;
use crate::r#type::Scalar;

impl<N: Scalar + Serialize, T: Serialize> Serialize for Point<N, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Point", 2)?;
        state.serialize_field("payload", &self.payload())?;
        state.serialize_field("coordinates", self.coords())?;
        state.end()
    }
}

impl<N: Scalar + Serialize, T: Serialize> Serialize for Node<N, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Node", 6)?;
        state.serialize_field("depth", &self.depth())?;
        state.serialize_field("cardinality", &self.len())?;
        state.serialize_field("points", self.points())?;
        state.serialize_field("split_value", &self.split_value())?;
        state.serialize_field("left", &self.left())?;
        state.serialize_field("right", &self.right())?;
        state.end()
    }
}

impl<N: Scalar + Serialize, T: Serialize> Serialize for KdTree<N, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let root = self.root.as_ref();
        let mut state = serializer.serialize_struct("KdTree", 2)?;
        state.serialize_field("dimensions", &root.map(Node::dimensions))?;
        state.serialize_field("root", &root)?;
        state.end()
    }
}
