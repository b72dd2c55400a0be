//! The exporter: builds a host value from a toolkit buffer and appends it at
//! the write cursor. Every `write_*` produces exactly one output.

use ndarray::{Array2, ArrayD, IxDyn};

use crate::buffer::{Shape, SparseMatrix, StringList, StringRecord, TypedBuffer};
use crate::error::MarshalError;
use crate::session::MarshalSession;
use crate::types::{Element, StringElement};
use crate::value::{DynamicValue, SparseArray, SparseValues};

impl MarshalSession {
    //==============================================================================
    // 1. Scalars
    //==============================================================================

    /// Integers go back to the host as double-precision scalars.
    pub fn write_int(&mut self, scalar: i32) -> Result<(), MarshalError> {
        self.push_output(DynamicValue::scalar_f64(f64::from(scalar)))
    }

    pub fn write_float(&mut self, scalar: f64) -> Result<(), MarshalError> {
        self.push_output(DynamicValue::scalar_f64(scalar))
    }

    pub fn write_bool(&mut self, scalar: bool) -> Result<(), MarshalError> {
        self.push_output(DynamicValue::scalar_bool(scalar))
    }

    //==============================================================================
    // 2. Dense Vectors, Matrices and N-D Arrays
    //==============================================================================

    /// Writes `vector` as a 1xN host row of the matching class.
    pub fn write_vector<T: Element>(&mut self, vector: &[T]) -> Result<(), MarshalError> {
        let mut data = self.allocate(vector.len())?;
        data.extend_from_slice(vector);
        self.push_output(DynamicValue::row_vector(data))
    }

    /// Writes a toolkit matrix of `num_vec` contiguous vectors of `num_feat`
    /// features as a `num_feat x num_vec` host matrix, vector i becoming
    /// column i.
    pub fn write_matrix<T: Element>(
        &mut self,
        matrix: &[T],
        num_feat: usize,
        num_vec: usize,
    ) -> Result<(), MarshalError> {
        if num_feat.checked_mul(num_vec) != Some(matrix.len()) {
            return Err(MarshalError::InvalidArgument(format!(
                "matrix of {} elements does not hold {} vectors of {} features",
                matrix.len(),
                num_vec,
                num_feat
            )));
        }
        let mut data = self.allocate(matrix.len())?;
        // host(j, i) = matrix[j + i * num_feat]
        for j in 0..num_feat {
            data.extend((0..num_vec).map(|i| matrix[j + i * num_feat]));
        }
        let host = Array2::from_shape_vec((num_feat, num_vec), data)
            .map_err(|e| MarshalError::InvalidArgument(format!("matrix export failed: {}", e)))?;
        self.push_output(DynamicValue::from_array(host))
    }

    /// Writes an N-D buffer back with the given extents, taking elements in
    /// the host's native linear order. Inverse of `read_ndarray`.
    pub fn write_ndarray<T: Element>(&mut self, data: &[T], dims: &[i32]) -> Result<(), MarshalError> {
        let extents = dims
            .iter()
            .map(|&extent| usize::try_from(extent))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| MarshalError::InvalidArgument(format!("negative extent in dims {:?}", dims)))?;

        let mut elements = self.allocate(data.len())?;
        elements.extend_from_slice(data);
        let array = ArrayD::from_shape_vec(IxDyn(&extents), elements).map_err(|_| {
            MarshalError::InvalidArgument(format!(
                "{} elements do not fill an array with dims {:?}",
                data.len(),
                dims
            ))
        })?;
        self.push_output(DynamicValue::from_array(array))
    }

    /// Writes a buffer according to its own shape.
    pub fn write_buffer<T: Element>(&mut self, buffer: &TypedBuffer<T>) -> Result<(), MarshalError> {
        match buffer.shape() {
            Shape::Vector(_) => self.write_vector(buffer.as_slice()),
            Shape::Matrix { num_feat, num_vec } => {
                self.write_matrix(buffer.as_slice(), *num_feat, *num_vec)
            }
            Shape::NdArray(dims) => self.write_ndarray(buffer.as_slice(), dims),
        }
    }

    //==============================================================================
    // 3. Sparse Matrices
    //==============================================================================

    /// Writes a sparse toolkit matrix as a `num_feat x num_vec` double sparse
    /// host matrix.
    pub fn write_sparse_matrix(&mut self, matrix: &SparseMatrix<f64>) -> Result<(), MarshalError> {
        let num_vec = matrix.num_vec();
        let nnz = matrix.nnz();

        let mut col_ptr = self.allocate(num_vec + 1)?;
        let mut row_idx = self.allocate(nnz)?;
        let mut values = self.allocate(nnz)?;

        let mut offset = 0;
        for vector in matrix.vectors() {
            col_ptr.push(offset);
            for entry in vector.entries() {
                row_idx.push(entry.feat_index);
                values.push(entry.entry);
                offset += 1;
            }
        }
        col_ptr.push(offset);

        let sparse = SparseArray::from_csc(
            matrix.num_feat(),
            num_vec,
            col_ptr,
            row_idx,
            SparseValues::Double(values),
        )?;
        self.push_output(DynamicValue::Sparse(sparse))
    }

    //==============================================================================
    // 4. String Lists
    //==============================================================================

    /// Writes a string list as a cell array of 1xlen rows.
    pub fn write_string_list<T: StringElement>(
        &mut self,
        strings: Option<&StringList<T>>,
    ) -> Result<(), MarshalError> {
        let strings = strings.ok_or_else(invalid_strings)?;
        self.write_string_records(Some(strings.records()), strings.len())
    }

    /// Writes `num_str` records as a cell array. Zero-length records leave
    /// their slot holding the empty placeholder, so they come back as 0x0
    /// rather than 1x0.
    pub fn write_string_records<T: StringElement>(
        &mut self,
        records: Option<&[StringRecord<T>]>,
        num_str: usize,
    ) -> Result<(), MarshalError> {
        let records = records.ok_or_else(invalid_strings)?;

        let mut cell = self.allocate(num_str)?;
        cell.resize(num_str, DynamicValue::placeholder());
        if records.len() != cell.len() {
            return Err(MarshalError::AllocationMismatch {
                requested: num_str,
                actual: records.len(),
            });
        }

        for (slot, record) in cell.iter_mut().zip(records) {
            if let Some(content) = record.as_slice() {
                let mut data = self.allocate(content.len())?;
                data.extend_from_slice(content);
                *slot = DynamicValue::row_vector(data);
            }
        }
        self.push_output(DynamicValue::Cell(cell))
    }
}

fn invalid_strings() -> MarshalError {
    MarshalError::InvalidArgument("Given strings are invalid.".to_string())
}
