//! The importer: validates the input at the read cursor and extracts it into
//! an owned, strongly-typed buffer. Every `read_*` consumes exactly one
//! cursor position.

use ndarray::{ArrayD, ArrayView2, Axis, Ix2};
use num_traits::ToPrimitive;

use crate::buffer::{Shape, SparseEntry, SparseMatrix, SparseVector, StringList, StringRecord, TypedBuffer};
use crate::error::MarshalError;
use crate::session::MarshalSession;
use crate::types::{Char, Element, StringElement};
use crate::value::{DynamicValue, SparseValues};

impl MarshalSession {
    //==============================================================================
    // 1. Scalars
    //==============================================================================

    /// Reads a real scalar with no fractional part as a 32-bit integer.
    pub fn read_int(&mut self) -> Result<i32, MarshalError> {
        let index = self.next_input()?;
        let position = index + 1;
        let value = self.inputs[index]
            .real_scalar()
            .ok_or_else(|| MarshalError::type_mismatch(position, "Scalar Integer"))?;

        // NaN and the infinities have a NaN fractional part and fail here too.
        if value.fract() != 0.0 {
            return Err(MarshalError::NotIntegral { position, value });
        }
        value
            .trunc()
            .to_i32()
            .ok_or(MarshalError::NotIntegral { position, value })
    }

    pub fn read_float(&mut self) -> Result<f64, MarshalError> {
        let index = self.next_input()?;
        self.inputs[index]
            .real_scalar()
            .ok_or_else(|| MarshalError::type_mismatch(index + 1, "Scalar Float"))
    }

    /// Reads a logical scalar, or a real scalar where any non-zero value is true.
    pub fn read_bool(&mut self) -> Result<bool, MarshalError> {
        let index = self.next_input()?;
        let value = &self.inputs[index];
        if let Some(flag) = value.bool_scalar() {
            return Ok(flag);
        }
        value
            .real_scalar()
            .map(|real| real != 0.0)
            .ok_or_else(|| MarshalError::type_mismatch(index + 1, "Scalar Boolean"))
    }

    //==============================================================================
    // 2. Strings
    //==============================================================================

    /// Reads a character row into a NUL-terminated record.
    ///
    /// An empty string is an error unless `reject_empty_strings` is off, in
    /// which case the null record is returned.
    pub fn read_string(&mut self) -> Result<StringRecord<Char>, MarshalError> {
        let index = self.next_input()?;
        let position = index + 1;
        let value = &self.inputs[index];
        let chars = value
            .as_dense()
            .filter(|_| value.is_string())
            .and_then(Char::view)
            .ok_or_else(|| MarshalError::type_mismatch(position, "String"))?;

        if chars.is_empty() {
            if self.config.reject_empty_strings {
                return Err(MarshalError::EmptyString { position });
            }
            return Ok(StringRecord::null());
        }
        let mut content = self.allocate(chars.len() + 1)?;
        content.extend(chars.iter().copied());
        Ok(StringRecord::from_content(content))
    }

    //==============================================================================
    // 3. Dense Vectors, Matrices and N-D Arrays
    //==============================================================================

    /// Reads a 1xN dense row of element type `T`.
    pub fn read_vector<T: Element>(&mut self) -> Result<TypedBuffer<T>, MarshalError> {
        let index = self.next_input()?;
        let position = index + 1;
        let value = &self.inputs[index];
        let expected = format!("{} Vector", T::LABEL);

        let array = value
            .as_dense()
            .and_then(T::view)
            .ok_or_else(|| MarshalError::type_mismatch(position, expected.clone()))?;
        let row = matrix_view(array)
            .filter(|row| row.nrows() == 1)
            .ok_or_else(|| MarshalError::ShapeMismatch {
                position,
                expected,
                found: value.describe(),
            })?;

        let len = row.ncols();
        let mut data = self.allocate(len)?;
        data.extend(row.iter().copied());
        log::debug!("argument {}: {} vector of {}", position, T::LABEL, len);
        TypedBuffer::new(data, Shape::Vector(len))
    }

    /// Reads a dense matrix, turning each host column into one contiguous
    /// toolkit vector.
    pub fn read_matrix<T: Element>(&mut self) -> Result<TypedBuffer<T>, MarshalError> {
        let index = self.next_input()?;
        let position = index + 1;
        let value = &self.inputs[index];
        let expected = format!("{} Matrix", T::LABEL);

        let array = value
            .as_dense()
            .and_then(T::view)
            .ok_or_else(|| MarshalError::type_mismatch(position, expected.clone()))?;
        let matrix = matrix_view(array).ok_or_else(|| MarshalError::ShapeMismatch {
            position,
            expected,
            found: value.describe(),
        })?;

        let (num_feat, num_vec) = matrix.dim();
        let mut data = self.allocate(num_feat * num_vec)?;
        // data[i * num_feat + j] = host(j, i)
        for i in 0..num_vec {
            for j in 0..num_feat {
                data.push(matrix[[j, i]]);
            }
        }
        log::debug!(
            "argument {}: {} matrix, {} features x {} vectors",
            position,
            T::LABEL,
            num_feat,
            num_vec
        );
        TypedBuffer::new(data, Shape::Matrix { num_feat, num_vec })
    }

    /// Reads a dense array of any rank. Unlike `read_matrix`, elements are
    /// copied in the array's native linear order with no transposition, so a
    /// 2-D input comes out differently from `read_matrix` on the same value.
    pub fn read_ndarray<T: Element>(&mut self) -> Result<TypedBuffer<T>, MarshalError> {
        let index = self.next_input()?;
        let position = index + 1;
        let value = &self.inputs[index];

        let array = value
            .as_dense()
            .and_then(T::view)
            .ok_or_else(|| MarshalError::type_mismatch(position, format!("{} ND Array", T::LABEL)))?;

        let extents = value.dims();
        let mut dims = self.allocate::<i32>(extents.len())?;
        for &extent in &extents {
            let extent = i32::try_from(extent).map_err(|_| MarshalError::ShapeMismatch {
                position,
                expected: "axis extents that fit in 32 bits".to_string(),
                found: value.describe(),
            })?;
            dims.push(extent);
        }

        let mut data = self.allocate(array.len())?;
        data.extend(array.iter().copied());
        log::debug!("argument {}: {} array with dims {:?}", position, T::LABEL, dims);
        TypedBuffer::new(data, Shape::NdArray(dims))
    }

    //==============================================================================
    // 4. Sparse Matrices
    //==============================================================================

    /// Reads a double-precision sparse matrix column by column. The storage is
    /// re-validated while walking it; any inconsistency is reported as
    /// `CorruptedSparseInput` rather than trusted.
    pub fn read_sparse_matrix(&mut self) -> Result<SparseMatrix<f64>, MarshalError> {
        let index = self.next_input()?;
        let position = index + 1;
        let (sparse, values) = match &self.inputs[index] {
            DynamicValue::Sparse(sparse) => match &sparse.values {
                SparseValues::Double(values) => (sparse, values),
                _ => return Err(MarshalError::type_mismatch(position, "Sparse Double Matrix")),
            },
            _ => return Err(MarshalError::type_mismatch(position, "Sparse Double Matrix")),
        };
        let corrupted = |detail: String| MarshalError::CorruptedSparseInput { position, detail };

        let num_vec = sparse.num_cols;
        let num_feat = sparse.num_rows;
        let nnz = values.len();
        if sparse.col_ptr.len() != num_vec + 1 {
            return Err(corrupted(format!(
                "{} column pointers for {} columns",
                sparse.col_ptr.len(),
                num_vec
            )));
        }
        if sparse.col_ptr[0] != 0 {
            return Err(corrupted(format!(
                "first column pointer is {}, expected 0",
                sparse.col_ptr[0]
            )));
        }
        if sparse.col_ptr[num_vec] != nnz {
            return Err(corrupted(format!(
                "columns account for {} entries but {} are stored",
                sparse.col_ptr[num_vec], nnz
            )));
        }
        if sparse.row_idx.len() != nnz {
            return Err(corrupted(format!(
                "{} row indices for {} stored values",
                sparse.row_idx.len(),
                nnz
            )));
        }

        let mut vectors = self.allocate(num_vec)?;
        let mut offset = 0usize;
        for i in 0..num_vec {
            if offset != sparse.col_ptr[i] {
                return Err(corrupted(format!(
                    "column {} starts at entry {} but {} entries precede it",
                    i, sparse.col_ptr[i], offset
                )));
            }
            let len = sparse.col_ptr[i + 1]
                .checked_sub(sparse.col_ptr[i])
                .ok_or_else(|| corrupted(format!("column pointer decreases at column {}", i)))?;

            let features = if len > 0 {
                let mut entries = self.allocate(len)?;
                for _ in 0..len {
                    let (feat_index, entry) = match (sparse.row_idx.get(offset), values.get(offset)) {
                        (Some(&row), Some(&entry)) => (row, entry),
                        _ => return Err(corrupted(format!("entry {} is missing", offset))),
                    };
                    if feat_index >= num_feat {
                        return Err(corrupted(format!(
                            "row {} out of range for {} rows",
                            feat_index, num_feat
                        )));
                    }
                    entries.push(SparseEntry { feat_index, entry });
                    offset += 1;
                }
                Some(entries)
            } else {
                None
            };
            vectors.push(SparseVector {
                vec_index: i,
                features,
            });
        }

        if offset != nnz {
            return Err(corrupted(format!(
                "columns account for {} entries but {} are stored",
                offset, nnz
            )));
        }
        log::debug!(
            "argument {}: sparse matrix {}x{} with {} non-zeros",
            position,
            num_feat,
            num_vec,
            nnz
        );
        SparseMatrix::new(vectors, num_feat, nnz)
    }

    //==============================================================================
    // 5. String Lists
    //==============================================================================

    /// Reads a list of strings of element type `T`, either from a cell array
    /// of 1xN rows (ragged) or from a dense matrix whose columns are the
    /// strings (all of the same length).
    pub fn read_string_list<T: StringElement>(&mut self) -> Result<StringList<T>, MarshalError> {
        let index = self.next_input()?;
        let position = index + 1;
        let value = &self.inputs[index];
        let expected = || format!("String of type {}", T::LABEL);

        match value {
            DynamicValue::Cell(elements) => {
                if elements.is_empty() {
                    return Err(MarshalError::ShapeMismatch {
                        position,
                        expected: format!("non-empty cell array of {} strings", T::LABEL),
                        found: value.describe(),
                    });
                }
                let mut strings = self.allocate(elements.len())?;
                let mut max_string_len = 0;
                for (i, element) in elements.iter().enumerate() {
                    let row = element
                        .as_dense()
                        .and_then(T::view)
                        .and_then(matrix_view)
                        .filter(|row| row.nrows() == 1)
                        .ok_or_else(|| MarshalError::type_mismatch(position, expected()))?;

                    let len = row.ncols();
                    let record = if len > 0 {
                        let mut content = self.allocate(len + 1)?;
                        content.extend(row.iter().copied());
                        max_string_len = max_string_len.max(len);
                        StringRecord::from_content(content)
                    } else {
                        self.warn_empty_string(i);
                        StringRecord::null()
                    };
                    strings.push(record);
                }
                Ok(StringList::from_parts(strings, max_string_len))
            }
            DynamicValue::Dense(dense) => {
                let array =
                    T::view(dense).ok_or_else(|| MarshalError::type_mismatch(position, expected()))?;
                let table = matrix_view(array)
                    .ok_or_else(|| MarshalError::type_mismatch(position, expected()))?;

                let (len, num_str) = table.dim();
                let mut strings = self.allocate(num_str)?;
                for (i, column) in table.columns().into_iter().enumerate() {
                    let record = if len > 0 {
                        let mut content = self.allocate(len + 1)?;
                        content.extend(column.iter().copied());
                        StringRecord::from_content(content)
                    } else {
                        self.warn_empty_string(i);
                        StringRecord::null()
                    };
                    strings.push(record);
                }
                Ok(StringList::from_parts(strings, len))
            }
            _ => Err(MarshalError::type_mismatch(position, expected())),
        }
    }

    fn warn_empty_string(&self, index: usize) {
        if self.config.warn_on_empty_strings {
            self.reporter
                .warning(&format!("string with index {} has zero length.", index + 1));
        }
    }
}

/// Views dense storage as a 2-D matrix, padding rank 0 and 1 with leading
/// unit axes. Arrays of rank three or more have no matrix view.
fn matrix_view<T>(array: &ArrayD<T>) -> Option<ArrayView2<'_, T>> {
    let mut view = array.view();
    while view.ndim() < 2 {
        view = view.insert_axis(Axis(0));
    }
    view.into_dimensionality::<Ix2>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarshalConfig;
    use crate::report::MemoryReporter;
    use crate::value::{DenseArray, SparseArray};
    use ndarray::{arr1, array, ArrayD, IxDyn};
    use std::sync::Arc;

    fn session_with(inputs: Vec<DynamicValue>) -> MarshalSession {
        MarshalSession::new(inputs, 0, Arc::new(MarshalConfig::default()), Arc::new(MemoryReporter::new()))
    }

    #[test]
    fn test_read_int_accepts_integral_and_rejects_fractional() {
        let mut session = session_with(vec![
            DynamicValue::scalar_f64(3.0),
            DynamicValue::scalar_f64(3.5),
        ]);
        assert_eq!(session.read_int().unwrap(), 3);
        let err = session.read_int().unwrap_err();
        assert!(matches!(err, MarshalError::NotIntegral { position: 2, value } if value == 3.5));
    }

    #[test]
    fn test_read_int_rejects_non_finite_and_out_of_range() {
        let mut session = session_with(vec![
            DynamicValue::scalar_f64(f64::NAN),
            DynamicValue::scalar_f64(f64::INFINITY),
            DynamicValue::scalar_f64(4_294_967_296.0),
        ]);
        assert!(matches!(session.read_int(), Err(MarshalError::NotIntegral { position: 1, .. })));
        assert!(matches!(session.read_int(), Err(MarshalError::NotIntegral { position: 2, .. })));
        assert!(matches!(session.read_int(), Err(MarshalError::NotIntegral { position: 3, .. })));
    }

    #[test]
    fn test_read_int_requires_real_scalar() {
        let mut session = session_with(vec![DynamicValue::string("7")]);
        assert!(matches!(session.read_int(), Err(MarshalError::TypeMismatch { position: 1, .. })));
    }

    #[test]
    fn test_read_int_accepts_integer_classed_scalar() {
        let mut session = session_with(vec![DynamicValue::from_array(array![[-12i32]])]);
        assert_eq!(session.read_int().unwrap(), -12);
    }

    #[test]
    fn test_read_float_returns_value_unmodified() {
        let mut session = session_with(vec![DynamicValue::scalar_f64(-0.125), DynamicValue::scalar_bool(true)]);
        assert_eq!(session.read_float().unwrap(), -0.125);
        assert!(matches!(session.read_float(), Err(MarshalError::TypeMismatch { position: 2, .. })));
    }

    #[test]
    fn test_read_bool_accepts_logical_and_real() {
        let mut session = session_with(vec![
            DynamicValue::scalar_bool(true),
            DynamicValue::scalar_f64(0.0),
            DynamicValue::scalar_f64(-2.0),
            DynamicValue::string("yes"),
        ]);
        assert!(session.read_bool().unwrap());
        assert!(!session.read_bool().unwrap());
        assert!(session.read_bool().unwrap());
        assert!(matches!(session.read_bool(), Err(MarshalError::TypeMismatch { position: 4, .. })));
    }

    #[test]
    fn test_read_string_terminates_content() {
        let mut session = session_with(vec![DynamicValue::string("gauss")]);
        let record = session.read_string().unwrap();
        assert_eq!(record.len(), 5);
        assert_eq!(record.to_string_lossy(), "gauss");
        assert_eq!(record.as_terminated().unwrap().last(), Some(&Char(0)));
    }

    #[test]
    fn test_read_string_rejects_empty_by_default() {
        let mut session = session_with(vec![DynamicValue::string("")]);
        assert!(matches!(session.read_string(), Err(MarshalError::EmptyString { position: 1 })));
    }

    #[test]
    fn test_read_string_returns_null_record_when_empty_allowed() {
        let config = MarshalConfig {
            reject_empty_strings: false,
            ..Default::default()
        };
        let mut session = MarshalSession::new(
            vec![DynamicValue::string("")],
            0,
            Arc::new(config),
            Arc::new(MemoryReporter::new()),
        );
        assert!(session.read_string().unwrap().is_null());
    }

    #[test]
    fn test_read_string_rejects_multi_row_char_matrix() {
        let table = DynamicValue::from_array(array![[Char(b'a')], [Char(b'b')]]);
        let mut session = session_with(vec![table]);
        assert!(matches!(session.read_string(), Err(MarshalError::TypeMismatch { .. })));
    }

    #[test]
    fn test_read_vector_of_every_element_type() {
        let mut session = session_with(vec![
            DynamicValue::row_vector(vec![1u8, 2]),
            DynamicValue::string("ab"),
            DynamicValue::row_vector(vec![-1i32, 5]),
            DynamicValue::row_vector(vec![-3i16]),
            DynamicValue::row_vector(vec![0.5f32, 1.5]),
            DynamicValue::row_vector(vec![2.25f64]),
            DynamicValue::row_vector(vec![65535u16]),
        ]);
        assert_eq!(session.read_vector::<u8>().unwrap().as_slice(), &[1, 2]);
        assert_eq!(session.read_vector::<Char>().unwrap().as_slice(), Char::slice_from_str("ab"));
        assert_eq!(session.read_vector::<i32>().unwrap().as_slice(), &[-1, 5]);
        assert_eq!(session.read_vector::<i16>().unwrap().as_slice(), &[-3]);
        assert_eq!(session.read_vector::<f32>().unwrap().as_slice(), &[0.5, 1.5]);
        assert_eq!(session.read_vector::<f64>().unwrap().as_slice(), &[2.25]);
        let words = session.read_vector::<u16>().unwrap();
        assert_eq!(words.as_slice(), &[65535]);
        assert_eq!(words.shape(), &Shape::Vector(1));
    }

    #[test]
    fn test_read_vector_rejects_wrong_class_and_multiple_rows() {
        let mut session = session_with(vec![
            DynamicValue::row_vector(vec![1.0f32]),
            DynamicValue::from_array(array![[1.0f64], [2.0]]),
        ]);
        assert!(matches!(session.read_vector::<f64>(), Err(MarshalError::TypeMismatch { position: 1, .. })));
        let err = session.read_vector::<f64>().unwrap_err();
        assert!(matches!(err, MarshalError::ShapeMismatch { position: 2, ref found, .. } if found == "2x1 double matrix"));
    }

    #[test]
    fn test_read_vector_accepts_unnormalized_rank_one_storage() {
        let raw = DynamicValue::Dense(DenseArray::Int32(arr1(&[4, 5, 6]).into_dyn()));
        let mut session = session_with(vec![raw]);
        assert_eq!(session.read_vector::<i32>().unwrap().as_slice(), &[4, 5, 6]);
    }

    #[test]
    fn test_read_matrix_allows_empty_extents() {
        let empty = DynamicValue::Dense(DenseArray::Double(ArrayD::zeros(IxDyn(&[3, 0]))));
        let mut session = session_with(vec![empty]);
        let buffer = session.read_matrix::<f64>().unwrap();
        assert!(buffer.is_empty());
        assert_eq!(buffer.shape(), &Shape::Matrix { num_feat: 3, num_vec: 0 });
    }

    #[test]
    fn test_read_matrix_rejects_higher_rank() {
        let cube = DynamicValue::Dense(DenseArray::Int16(ArrayD::zeros(IxDyn(&[2, 2, 2]))));
        let mut session = session_with(vec![cube]);
        assert!(matches!(session.read_matrix::<i16>(), Err(MarshalError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_read_ndarray_reports_dims() {
        let cube = ArrayD::from_shape_vec(IxDyn(&[2, 3, 4]), (0..24u16).collect()).unwrap();
        let mut session = session_with(vec![DynamicValue::dense(DenseArray::UInt16(cube))]);
        let buffer = session.read_ndarray::<u16>().unwrap();
        assert_eq!(buffer.dims(), Some(&[2, 3, 4][..]));
        assert_eq!(buffer.len(), 24);
        assert_eq!(buffer.as_slice()[..4], [0, 1, 2, 3]);
    }

    #[test]
    fn test_read_ndarray_requires_matching_class() {
        let mut session = session_with(vec![DynamicValue::row_vector(vec![1u8])]);
        let err = session.read_ndarray::<u16>().unwrap_err();
        assert_eq!(err.to_string(), "Expected Word ND Array as argument 1");
    }

    #[test]
    fn test_read_sparse_matrix_requires_double_sparse() {
        let dense = DynamicValue::scalar_f64(1.0);
        let single = DynamicValue::Sparse(
            SparseArray::from_csc(1, 1, vec![0, 1], vec![0], SparseValues::Single(vec![1.0])).unwrap(),
        );
        let mut session = session_with(vec![dense, single]);
        assert!(matches!(session.read_sparse_matrix(), Err(MarshalError::TypeMismatch { position: 1, .. })));
        assert!(matches!(session.read_sparse_matrix(), Err(MarshalError::TypeMismatch { position: 2, .. })));
    }

    #[test]
    fn test_read_sparse_matrix_detects_unaccounted_entries() {
        // Column pointers cover two entries but three are stored.
        let corrupt = SparseArray {
            num_rows: 3,
            num_cols: 2,
            col_ptr: vec![0, 1, 2],
            row_idx: vec![0, 1, 2],
            values: SparseValues::Double(vec![1.0, 2.0, 3.0]),
        };
        let mut session = session_with(vec![DynamicValue::Sparse(corrupt)]);
        let err = session.read_sparse_matrix().unwrap_err();
        assert!(matches!(err, MarshalError::CorruptedSparseInput { position: 1, ref detail } if detail.contains("2 entries but 3")));
    }

    #[test]
    fn test_read_sparse_matrix_detects_bad_pointers_and_rows() {
        let decreasing = SparseArray {
            num_rows: 2,
            num_cols: 2,
            col_ptr: vec![0, 2, 1],
            row_idx: vec![0, 1],
            values: SparseValues::Double(vec![1.0, 2.0]),
        };
        let bad_row = SparseArray {
            num_rows: 2,
            num_cols: 1,
            col_ptr: vec![0, 1],
            row_idx: vec![5],
            values: SparseValues::Double(vec![1.0]),
        };
        let truncated = SparseArray {
            num_rows: 2,
            num_cols: 1,
            col_ptr: vec![0, 2],
            row_idx: vec![0],
            values: SparseValues::Double(vec![1.0]),
        };
        // Pointers shifted by one: the sentinel claims three entries, two are stored.
        let shifted = SparseArray {
            num_rows: 2,
            num_cols: 2,
            col_ptr: vec![1, 2, 3],
            row_idx: vec![0, 1],
            values: SparseValues::Double(vec![1.0, 2.0]),
        };
        let extra_row_index = SparseArray {
            num_rows: 2,
            num_cols: 1,
            col_ptr: vec![0, 1],
            row_idx: vec![0, 1],
            values: SparseValues::Double(vec![5.0]),
        };
        let mut session = session_with(vec![
            DynamicValue::Sparse(decreasing),
            DynamicValue::Sparse(bad_row),
            DynamicValue::Sparse(truncated),
            DynamicValue::Sparse(shifted),
            DynamicValue::Sparse(extra_row_index),
        ]);
        for _ in 0..5 {
            assert!(matches!(session.read_sparse_matrix(), Err(MarshalError::CorruptedSparseInput { .. })));
        }
    }

    #[test]
    fn test_read_string_list_from_cell_is_fail_fast() {
        let mixed = DynamicValue::cell(vec![
            DynamicValue::row_vector(vec![1i16, 2]),
            DynamicValue::row_vector(vec![1i32]),
        ]);
        let mut session = session_with(vec![mixed]);
        let err = session.read_string_list::<i16>().unwrap_err();
        assert_eq!(err.to_string(), "Expected String of type Short as argument 1");
    }

    #[test]
    fn test_read_string_list_rejects_empty_cell_and_other_values() {
        let mut session = session_with(vec![
            DynamicValue::cell(vec![]),
            DynamicValue::scalar_bool(true),
        ]);
        assert!(matches!(session.read_string_list::<Char>(), Err(MarshalError::ShapeMismatch { .. })));
        assert!(matches!(session.read_string_list::<Char>(), Err(MarshalError::TypeMismatch { position: 2, .. })));
    }

    #[test]
    fn test_read_string_list_rejects_higher_rank_table() {
        let cube = DynamicValue::Dense(DenseArray::Char(ArrayD::from_elem(IxDyn(&[2, 2, 2]), Char(b'x'))));
        let mut session = session_with(vec![cube]);
        let err = session.read_string_list::<Char>().unwrap_err();
        assert!(matches!(err, MarshalError::TypeMismatch { position: 1, .. }));
        assert_eq!(err.to_string(), "Expected String of type Char as argument 1");
    }

    #[test]
    fn test_read_string_list_warns_on_zero_length_cell_entry() {
        let reporter = Arc::new(MemoryReporter::new());
        let mut session = MarshalSession::new(
            vec![DynamicValue::cell(vec![
                DynamicValue::string("acgt"),
                DynamicValue::string(""),
                DynamicValue::string("tt"),
            ])],
            0,
            Arc::new(MarshalConfig::default()),
            reporter.clone(),
        );
        let list = session.read_string_list::<Char>().unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list.max_string_len(), 4);
        let empty = list.get(1).unwrap();
        assert!(empty.is_null());
        assert_eq!(empty.len(), 0);
        assert_eq!(reporter.warnings(), vec!["string with index 2 has zero length.".to_string()]);
    }

    #[test]
    fn test_read_string_list_table_with_zero_rows() {
        let reporter = Arc::new(MemoryReporter::new());
        let table = DynamicValue::Dense(DenseArray::UInt8(ArrayD::zeros(IxDyn(&[0, 2]))));
        let mut session = MarshalSession::new(
            vec![table],
            0,
            Arc::new(MarshalConfig::default()),
            reporter.clone(),
        );
        let list = session.read_string_list::<u8>().unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.iter().all(StringRecord::is_null));
        assert_eq!(list.max_string_len(), 0);
        assert_eq!(reporter.warnings().len(), 2);
    }

    #[test]
    fn test_empty_string_warning_can_be_disabled() {
        let reporter = Arc::new(MemoryReporter::new());
        let config = MarshalConfig {
            warn_on_empty_strings: false,
            ..Default::default()
        };
        let mut session = MarshalSession::new(
            vec![DynamicValue::cell(vec![DynamicValue::row_vector(Vec::<u16>::new())])],
            0,
            Arc::new(config),
            reporter.clone(),
        );
        assert!(session.read_string_list::<u16>().unwrap().get(0).unwrap().is_null());
        assert!(reporter.warnings().is_empty());
    }

    #[test]
    fn test_allocation_ceiling_surfaces_as_out_of_memory() {
        let config = MarshalConfig {
            max_elements: Some(4),
            ..Default::default()
        };
        let mut session = MarshalSession::new(
            vec![DynamicValue::row_vector(vec![0.0f64; 5])],
            0,
            Arc::new(config),
            Arc::new(MemoryReporter::new()),
        );
        assert!(matches!(session.read_vector::<f64>(), Err(MarshalError::OutOfMemory { requested: 5 })));
    }
}
