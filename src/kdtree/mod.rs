//! A recursive k-dimensional tree over shared points.
//!
//! Every node retains the full point set of its subtree. Points are shared between a node and
//! its ancestors through [`SharedPoint`][crate::SharedPoint] handles, never copied.

#![warn(missing_docs)]

mod builder;
pub mod constants;
mod index;
mod pivot;
mod r#trait;
mod traversal;

pub use builder::{build, KdTreeBuilder};
pub use index::KdTree;
pub use pivot::{LazyAverage, Mean, Median, PivotStrategy};
pub use r#trait::KdTreeIndex;
pub use traversal::{Leaves, Node};
