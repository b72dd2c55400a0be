//! The host runtime's self-describing values, modelled as a closed union.
//!
//! A `DynamicValue` is what crosses the boundary: the importer inspects one
//! and extracts a typed buffer from it, the exporter builds one from a typed
//! buffer. The predicates below mirror the introspection queries the host
//! runtime offers, so classification can be written as a single ordered match.

pub mod dense;
pub mod sparse;

pub use dense::DenseArray;
pub use sparse::{SparseArray, SparseValues};

use ndarray::{Array, Array1, Array2, ArrayD, Axis, Dimension, IxDyn};

use crate::types::{Char, Element, HostClass};

#[derive(Debug, Clone, PartialEq)]
pub enum DynamicValue {
    Dense(DenseArray),
    Sparse(SparseArray),
    /// A cell array. Slots that were never assigned hold `placeholder()`.
    Cell(Vec<DynamicValue>),
}

impl DynamicValue {
    //==============================================================================
    // 1. Constructors
    //==============================================================================

    pub fn dense(array: DenseArray) -> Self {
        Self::Dense(array.normalized())
    }

    /// Wraps an ndarray of any dimensionality as a dense host value.
    pub fn from_array<T: Element, D: Dimension>(array: Array<T, D>) -> Self {
        Self::dense(T::wrap(array.into_dyn()))
    }

    /// A 1xN row vector.
    pub fn row_vector<T: Element>(values: Vec<T>) -> Self {
        let row = Array1::from_vec(values).insert_axis(Axis(0));
        Self::Dense(T::wrap(row.into_dyn()))
    }

    pub fn scalar_f64(value: f64) -> Self {
        Self::Dense(DenseArray::Double(Array2::from_elem((1, 1), value).into_dyn()))
    }

    pub fn scalar_bool(value: bool) -> Self {
        Self::Dense(DenseArray::Bool(Array2::from_elem((1, 1), value).into_dyn()))
    }

    /// A 1xN character row holding the bytes of `text`.
    pub fn string(text: &str) -> Self {
        Self::row_vector(Char::slice_from_str(text).to_vec())
    }

    pub fn cell(elements: Vec<DynamicValue>) -> Self {
        Self::Cell(elements)
    }

    /// The empty 0x0 double matrix held by unassigned cell slots.
    pub fn placeholder() -> Self {
        Self::Dense(DenseArray::Double(ArrayD::zeros(IxDyn(&[0, 0]))))
    }

    //==============================================================================
    // 2. Introspection
    //==============================================================================

    /// The element class; cells have none.
    pub fn class(&self) -> Option<HostClass> {
        match self {
            Self::Dense(dense) => Some(dense.class()),
            Self::Sparse(sparse) => Some(sparse.class()),
            Self::Cell(_) => None,
        }
    }

    pub fn as_dense(&self) -> Option<&DenseArray> {
        match self {
            Self::Dense(dense) => Some(dense),
            _ => None,
        }
    }

    pub fn as_sparse(&self) -> Option<&SparseArray> {
        match self {
            Self::Sparse(sparse) => Some(sparse),
            _ => None,
        }
    }

    pub fn as_cell(&self) -> Option<&[DynamicValue]> {
        match self {
            Self::Cell(elements) => Some(elements),
            _ => None,
        }
    }

    pub fn is_dense(&self) -> bool {
        matches!(self, Self::Dense(_))
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self, Self::Sparse(_))
    }

    pub fn is_cell(&self) -> bool {
        matches!(self, Self::Cell(_))
    }

    pub fn is_char_matrix(&self) -> bool {
        matches!(self, Self::Dense(DenseArray::Char(_)))
    }

    /// A character array with at most one row.
    pub fn is_string(&self) -> bool {
        match self {
            Self::Dense(dense @ DenseArray::Char(_)) => {
                dense.dims().len() == 2 && dense.rows() <= 1
            }
            _ => false,
        }
    }

    pub fn is_real_scalar(&self) -> bool {
        self.real_scalar().is_some()
    }

    pub fn is_bool_scalar(&self) -> bool {
        self.bool_scalar().is_some()
    }

    pub fn real_scalar(&self) -> Option<f64> {
        self.as_dense().and_then(DenseArray::real_scalar)
    }

    pub fn bool_scalar(&self) -> Option<bool> {
        self.as_dense().and_then(DenseArray::bool_scalar)
    }

    pub fn dims(&self) -> Vec<usize> {
        match self {
            Self::Dense(dense) => dense.dims(),
            Self::Sparse(sparse) => vec![sparse.num_rows, sparse.num_cols],
            Self::Cell(elements) => vec![elements.len(), 1],
        }
    }

    pub fn rows(&self) -> usize {
        self.dims()[0]
    }

    pub fn cols(&self) -> usize {
        self.dims()[1]
    }

    /// A short description for error messages, e.g. `2x3 double matrix`.
    pub fn describe(&self) -> String {
        let dims = self
            .dims()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("x");
        match self {
            Self::Dense(dense) => format!("{} {} matrix", dims, dense.class()),
            Self::Sparse(sparse) => format!("{} sparse {} matrix", dims, sparse.class()),
            Self::Cell(_) => format!("{} cell array", dims),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, array};

    #[test]
    fn test_string_is_a_single_char_row() {
        let value = DynamicValue::string("hello");
        assert!(value.is_string());
        assert!(value.is_char_matrix());
        assert_eq!(value.dims(), vec![1, 5]);
        assert_eq!(value.class(), Some(HostClass::Char));
    }

    #[test]
    fn test_multi_row_char_matrix_is_not_a_string() {
        let table = DynamicValue::from_array(array![
            [Char(b'a'), Char(b'b')],
            [Char(b'c'), Char(b'd')]
        ]);
        assert!(table.is_char_matrix());
        assert!(!table.is_string());
    }

    #[test]
    fn test_scalar_predicates() {
        assert!(DynamicValue::scalar_f64(2.0).is_real_scalar());
        assert!(!DynamicValue::scalar_f64(2.0).is_bool_scalar());
        assert!(DynamicValue::scalar_bool(false).is_bool_scalar());
        assert!(!DynamicValue::scalar_bool(false).is_real_scalar());
        assert!(!DynamicValue::string("x").is_real_scalar());
    }

    #[test]
    fn test_from_array_promotes_one_dimensional_input_to_a_row() {
        let value = DynamicValue::from_array(arr1(&[1u16, 2, 3]));
        assert_eq!(value.dims(), vec![1, 3]);
        assert_eq!(value.describe(), "1x3 uint16 matrix");
    }

    #[test]
    fn test_placeholder_is_empty_double() {
        let slot = DynamicValue::placeholder();
        assert_eq!(slot.dims(), vec![0, 0]);
        assert_eq!(slot.class(), Some(HostClass::Double));
        assert!(!slot.is_real_scalar());
    }

    #[test]
    fn test_cell_has_no_class() {
        let cell = DynamicValue::cell(vec![DynamicValue::string("a")]);
        assert!(cell.is_cell());
        assert_eq!(cell.class(), None);
        assert_eq!(cell.describe(), "1x1 cell array");
    }
}
