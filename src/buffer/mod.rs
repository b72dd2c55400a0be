// In: src/buffer/mod.rs

//! Owned, strongly-typed buffers handed to the toolkit.
//!
//! Every buffer produced by the importer is moved out to the caller: the
//! session keeps no reference to it and never frees it. `into_vec` and
//! `into_parts` are the explicit hand-off points.

pub mod sparse;
pub mod strings;

pub use sparse::{SparseEntry, SparseMatrix, SparseVector};
pub use strings::{StringList, StringRecord};

use bytemuck::Pod;
use ndarray::{ArrayViewD, IxDyn};

use crate::error::MarshalError;

//==================================================================================
// 1. Shape Descriptor
//==================================================================================

/// The shape that accompanies a flat buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Vector(usize),
    /// `num_feat` elements per vector, `num_vec` vectors stored one after another.
    Matrix { num_feat: usize, num_vec: usize },
    /// Per-axis extents in the host's axis order.
    NdArray(Vec<i32>),
}

impl Shape {
    /// The number of elements a buffer of this shape must hold, or `None` on
    /// overflow or a negative extent.
    pub fn element_count(&self) -> Option<usize> {
        match self {
            Self::Vector(len) => Some(*len),
            Self::Matrix { num_feat, num_vec } => num_feat.checked_mul(*num_vec),
            Self::NdArray(dims) => dims.iter().try_fold(1usize, |acc, &d| {
                usize::try_from(d).ok().and_then(|d| acc.checked_mul(d))
            }),
        }
    }

    fn axes(&self) -> Vec<usize> {
        match self {
            Self::Vector(len) => vec![*len],
            Self::Matrix { num_feat, num_vec } => vec![*num_vec, *num_feat],
            Self::NdArray(dims) => dims.iter().map(|&d| d.max(0) as usize).collect(),
        }
    }
}

//==================================================================================
// 2. TypedBuffer
//==================================================================================

/// A contiguous buffer of toolkit elements plus its shape.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedBuffer<T> {
    data: Vec<T>,
    shape: Shape,
}

impl<T: Pod> TypedBuffer<T> {
    /// Pairs `data` with `shape`, checking that the length matches.
    pub fn new(data: Vec<T>, shape: Shape) -> Result<Self, MarshalError> {
        match shape.element_count() {
            Some(expected) if expected == data.len() => Ok(Self { data, shape }),
            expected => Err(MarshalError::InvalidArgument(format!(
                "buffer of {} elements does not match shape {:?} ({:?} elements)",
                data.len(),
                shape,
                expected
            ))),
        }
    }

    pub fn vector(data: Vec<T>) -> Self {
        let shape = Shape::Vector(data.len());
        Self { data, shape }
    }

    pub fn matrix(data: Vec<T>, num_feat: usize, num_vec: usize) -> Result<Self, MarshalError> {
        Self::new(data, Shape::Matrix { num_feat, num_vec })
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The raw bytes of the buffer, for handing to code that takes untyped memory.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// The per-axis extents of an N-D buffer.
    pub fn dims(&self) -> Option<&[i32]> {
        match &self.shape {
            Shape::NdArray(dims) => Some(dims),
            _ => None,
        }
    }

    /// A view in the toolkit's layout: a matrix is `[num_vec, num_feat]`
    /// (one row per vector), an N-D buffer keeps its own axes.
    pub fn to_ndarray(&self) -> Result<ArrayViewD<'_, T>, MarshalError> {
        ArrayViewD::from_shape(IxDyn(&self.shape.axes()), &self.data)
            .map_err(|e| MarshalError::InvalidArgument(format!("buffer view failed: {}", e)))
    }

    /// Transfers ownership of the elements to the caller.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn into_parts(self) -> (Vec<T>, Shape) {
        (self.data, self.shape)
    }
}

//==================================================================================
// 3. Fallible Allocation
//==================================================================================

/// Reserves room for exactly `len` elements, mapping allocator failure or a
/// configured ceiling to `OutOfMemory`.
pub(crate) fn try_allocate<T>(len: usize, max_elements: Option<usize>) -> Result<Vec<T>, MarshalError> {
    if max_elements.is_some_and(|max| len > max) {
        return Err(MarshalError::OutOfMemory { requested: len });
    }
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| MarshalError::OutOfMemory { requested: len })?;
    Ok(buffer)
}
