use std::fmt::{Debug, Display};

use num_traits::{Float, NumCast};

/// A trait for types that can be used as point coordinates.
///
/// This trait is sealed and cannot be implemented for external types. Every pivot strategy and
/// query relies on floating point semantics (averages, midpoints, square roots), so only `f32`
/// and `f64` are supported.
pub trait Scalar:
    private::Sealed + Float + NumCast + Debug + Display + Default + Send + Sync + 'static
{
}

impl Scalar for f32 {}

impl Scalar for f64 {}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed
mod private {
    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for f64 {}
}
