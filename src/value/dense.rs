//! Dense host storage: one `ndarray::ArrayD` per host class.
//!
//! Shapes always carry at least two axes, matching the host runtime where a
//! scalar is 1x1 and a vector is 1xN. The native linear order of an array is
//! ndarray's logical iteration order.

use ndarray::{ArrayD, Axis};
use num_traits::ToPrimitive;

use crate::types::{Char, HostClass};

#[derive(Debug, Clone, PartialEq)]
pub enum DenseArray {
    Bool(ArrayD<bool>),
    Char(ArrayD<Char>),
    Int8(ArrayD<i8>),
    UInt8(ArrayD<u8>),
    Int16(ArrayD<i16>),
    UInt16(ArrayD<u16>),
    Int32(ArrayD<i32>),
    UInt32(ArrayD<u32>),
    Single(ArrayD<f32>),
    Double(ArrayD<f64>),
}

/// Applies `$body` to the inner array of every variant.
macro_rules! each_variant {
    ($value:expr, $inner:ident => $body:expr) => {
        match $value {
            DenseArray::Bool($inner) => $body,
            DenseArray::Char($inner) => $body,
            DenseArray::Int8($inner) => $body,
            DenseArray::UInt8($inner) => $body,
            DenseArray::Int16($inner) => $body,
            DenseArray::UInt16($inner) => $body,
            DenseArray::Int32($inner) => $body,
            DenseArray::UInt32($inner) => $body,
            DenseArray::Single($inner) => $body,
            DenseArray::Double($inner) => $body,
        }
    };
}

impl DenseArray {
    /// Pads the shape with leading unit axes until it has at least two.
    pub fn normalized(self) -> Self {
        match self {
            Self::Bool(a) => Self::Bool(at_least_2d(a)),
            Self::Char(a) => Self::Char(at_least_2d(a)),
            Self::Int8(a) => Self::Int8(at_least_2d(a)),
            Self::UInt8(a) => Self::UInt8(at_least_2d(a)),
            Self::Int16(a) => Self::Int16(at_least_2d(a)),
            Self::UInt16(a) => Self::UInt16(at_least_2d(a)),
            Self::Int32(a) => Self::Int32(at_least_2d(a)),
            Self::UInt32(a) => Self::UInt32(at_least_2d(a)),
            Self::Single(a) => Self::Single(at_least_2d(a)),
            Self::Double(a) => Self::Double(at_least_2d(a)),
        }
    }

    pub fn class(&self) -> HostClass {
        match self {
            Self::Bool(_) => HostClass::Bool,
            Self::Char(_) => HostClass::Char,
            Self::Int8(_) => HostClass::Int8,
            Self::UInt8(_) => HostClass::UInt8,
            Self::Int16(_) => HostClass::Int16,
            Self::UInt16(_) => HostClass::UInt16,
            Self::Int32(_) => HostClass::Int32,
            Self::UInt32(_) => HostClass::UInt32,
            Self::Single(_) => HostClass::Single,
            Self::Double(_) => HostClass::Double,
        }
    }

    pub fn shape(&self) -> &[usize] {
        each_variant!(self, a => a.shape())
    }

    pub fn len(&self) -> usize {
        each_variant!(self, a => a.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The shape padded with leading unit axes to at least two entries.
    pub fn dims(&self) -> Vec<usize> {
        let shape = self.shape();
        let mut dims = vec![1; 2usize.saturating_sub(shape.len())];
        dims.extend_from_slice(shape);
        dims
    }

    /// Extent of the first axis.
    pub fn rows(&self) -> usize {
        self.dims()[0]
    }

    /// Extent of the second axis (not the product of the trailing axes).
    pub fn cols(&self) -> usize {
        self.dims()[1]
    }

    /// The value of a 1x1 numeric array widened to `f64`.
    pub fn real_scalar(&self) -> Option<f64> {
        if !self.class().is_numeric() || self.len() != 1 {
            return None;
        }
        match self {
            Self::Int8(a) => first_as_f64(a),
            Self::UInt8(a) => first_as_f64(a),
            Self::Int16(a) => first_as_f64(a),
            Self::UInt16(a) => first_as_f64(a),
            Self::Int32(a) => first_as_f64(a),
            Self::UInt32(a) => first_as_f64(a),
            Self::Single(a) => first_as_f64(a),
            Self::Double(a) => first_as_f64(a),
            Self::Bool(_) | Self::Char(_) => None,
        }
    }

    /// The value of a 1x1 logical array.
    pub fn bool_scalar(&self) -> Option<bool> {
        match self {
            Self::Bool(a) if a.len() == 1 => a.iter().next().copied(),
            _ => None,
        }
    }
}

fn at_least_2d<T>(mut array: ArrayD<T>) -> ArrayD<T> {
    while array.ndim() < 2 {
        array = array.insert_axis(Axis(0));
    }
    array
}

fn first_as_f64<T: ToPrimitive>(array: &ArrayD<T>) -> Option<f64> {
    array.iter().next().and_then(ToPrimitive::to_f64)
}
