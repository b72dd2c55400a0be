//! Sparse host storage in compressed-column form.
//!
//! The fields are public because hosts hand their storage over as-is. Use
//! `SparseArray::from_csc` to build a validated value; the importer re-checks
//! everything it reads, so unvalidated storage is detected there instead.

use crate::error::MarshalError;
use crate::types::{Char, HostClass};

#[derive(Debug, Clone, PartialEq)]
pub enum SparseValues {
    Bool(Vec<bool>),
    Char(Vec<Char>),
    UInt8(Vec<u8>),
    Int16(Vec<i16>),
    UInt16(Vec<u16>),
    Int32(Vec<i32>),
    Single(Vec<f32>),
    Double(Vec<f64>),
}

impl SparseValues {
    pub fn class(&self) -> HostClass {
        match self {
            Self::Bool(_) => HostClass::Bool,
            Self::Char(_) => HostClass::Char,
            Self::UInt8(_) => HostClass::UInt8,
            Self::Int16(_) => HostClass::Int16,
            Self::UInt16(_) => HostClass::UInt16,
            Self::Int32(_) => HostClass::Int32,
            Self::Single(_) => HostClass::Single,
            Self::Double(_) => HostClass::Double,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Bool(v) => v.len(),
            Self::Char(v) => v.len(),
            Self::UInt8(v) => v.len(),
            Self::Int16(v) => v.len(),
            Self::UInt16(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::Single(v) => v.len(),
            Self::Double(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SparseArray {
    pub num_rows: usize,
    pub num_cols: usize,
    /// Start offset of every column, followed by a final sentinel.
    pub col_ptr: Vec<usize>,
    pub row_idx: Vec<usize>,
    pub values: SparseValues,
}

impl SparseArray {
    /// Builds a sparse array from compressed-column parts, checking that the
    /// column pointers are monotone, start at zero and end at the number of
    /// stored values, and that every row index is in range.
    pub fn from_csc(
        num_rows: usize,
        num_cols: usize,
        col_ptr: Vec<usize>,
        row_idx: Vec<usize>,
        values: SparseValues,
    ) -> Result<Self, MarshalError> {
        if col_ptr.len() != num_cols + 1 {
            return Err(MarshalError::InvalidArgument(format!(
                "sparse column pointer has {} entries, expected {}",
                col_ptr.len(),
                num_cols + 1
            )));
        }
        if col_ptr.first() != Some(&0) || col_ptr.windows(2).any(|w| w[0] > w[1]) {
            return Err(MarshalError::InvalidArgument(
                "sparse column pointers must start at 0 and never decrease".to_string(),
            ));
        }
        let nnz = values.len();
        if col_ptr[num_cols] != nnz || row_idx.len() != nnz {
            return Err(MarshalError::InvalidArgument(format!(
                "sparse storage disagrees on the non-zero count: sentinel {}, {} row indices, {} values",
                col_ptr[num_cols],
                row_idx.len(),
                nnz
            )));
        }
        if let Some(&row) = row_idx.iter().find(|&&row| row >= num_rows) {
            return Err(MarshalError::InvalidArgument(format!(
                "sparse row index {} out of range for {} rows",
                row, num_rows
            )));
        }
        Ok(Self {
            num_rows,
            num_cols,
            col_ptr,
            row_idx,
            values,
        })
    }

    /// Builds a double-precision sparse array from per-column `(row, value)`
    /// lists.
    pub fn from_columns(
        num_rows: usize,
        columns: &[Vec<(usize, f64)>],
    ) -> Result<Self, MarshalError> {
        let mut col_ptr = Vec::with_capacity(columns.len() + 1);
        let mut row_idx = Vec::new();
        let mut values = Vec::new();
        col_ptr.push(0);
        for column in columns {
            for &(row, value) in column {
                row_idx.push(row);
                values.push(value);
            }
            col_ptr.push(values.len());
        }
        Self::from_csc(
            num_rows,
            columns.len(),
            col_ptr,
            row_idx,
            SparseValues::Double(values),
        )
    }

    pub fn class(&self) -> HostClass {
        self.values.class()
    }

    /// The number of stored values the storage declares.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }
}
