#![doc = include_str!("../README.md")]

pub mod convert;
mod error;
#[cfg(feature = "serde")]
mod inspect;
pub mod kdtree;
pub mod point;
mod r#type;

pub use error::{KdTreeError, Result};
pub use point::{Point, PointSet, SharedPoint};
pub use r#type::Scalar;
