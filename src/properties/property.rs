use enum_as_inner::EnumAsInner;
use ndarray::prelude::*;

/// A `Property` is a piece of data that is stored in the [Properties](super::Properties) of a
/// system. The `EnumAsInner` macro gives direct access to the inner values through the
/// generated `as_$name()` and `into_$name()` methods.
#[derive(Debug, Clone, EnumAsInner)]
pub enum Property {
    /// Boolean property
    Bool(bool),
    /// Integer property
    Usize(usize),
    /// Floating point property
    Double(f64),
    /// Arraybase<f64, Ix1> property
    Array1(Array1<f64>),
    /// Arraybase<f64, Ix2> property
    Array2(Array2<f64>),
}

impl Default for Property {
    fn default() -> Self {
        Property::Bool(false)
    }
}

impl From<usize> for Property {
    fn from(value: usize) -> Self {
        Property::Usize(value)
    }
}

impl From<f64> for Property {
    fn from(value: f64) -> Self {
        Property::Double(value)
    }
}

impl From<Array1<f64>> for Property {
    fn from(value: Array1<f64>) -> Self {
        Property::Array1(value)
    }
}

impl From<Array2<f64>> for Property {
    fn from(value: Array2<f64>) -> Self {
        Property::Array2(value)
    }
}
