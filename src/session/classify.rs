//! Type introspection: mapping a host value to the `ElementKind` handed to
//! command handlers.

use crate::error::MarshalError;
use crate::session::MarshalSession;
use crate::types::{Char, ElementKind, HostClass, StringElement};
use crate::value::{DenseArray, DynamicValue};

impl MarshalSession {
    /// Classifies the input at the read cursor without consuming it.
    pub fn classify(&self) -> Result<ElementKind, MarshalError> {
        let index = self.cursor.peek_read(self.inputs.len())?;
        let kind = classify_value(&self.inputs[index]);
        log::debug!("argument {} classified as {}", index + 1, kind);
        Ok(kind)
    }
}

/// Classifies `value`. The checks run in a fixed order because several
/// predicates overlap: a character matrix is always a char string and a dense
/// uint8 matrix is always a byte string, before any sparse or dense rule runs.
pub fn classify_value(value: &DynamicValue) -> ElementKind {
    if value.is_char_matrix() {
        return ElementKind::StringChar;
    }
    if value.is_dense() && value.class() == Some(HostClass::UInt8) {
        return ElementKind::StringByte;
    }

    match value {
        DynamicValue::Sparse(sparse) => match sparse.class() {
            HostClass::UInt8 => ElementKind::SparseByte,
            HostClass::Char => ElementKind::SparseChar,
            HostClass::Int32 => ElementKind::SparseInt,
            HostClass::Double => ElementKind::SparseReal,
            HostClass::Int16 => ElementKind::SparseShort,
            HostClass::Single => ElementKind::SparseShortReal,
            HostClass::UInt16 => ElementKind::SparseWord,
            _ => ElementKind::Undefined,
        },
        // uint16 is deliberately absent: it imports as a Word matrix but has
        // no dense kind at this level.
        DynamicValue::Dense(dense) => match dense.class() {
            HostClass::Int32 => ElementKind::DenseInt,
            HostClass::Double => ElementKind::DenseReal,
            HostClass::Int16 => ElementKind::DenseShort,
            HostClass::Single => ElementKind::DenseShortReal,
            _ => ElementKind::Undefined,
        },
        // Only the first element decides; the rest are checked on import.
        DynamicValue::Cell(elements) => elements
            .first()
            .map_or(ElementKind::Undefined, classify_cell_head),
    }
}

fn classify_cell_head(first: &DynamicValue) -> ElementKind {
    let Some(dense) = first.as_dense() else {
        return ElementKind::Undefined;
    };
    if dense.rows() != 1 {
        return ElementKind::Undefined;
    }
    match dense {
        DenseArray::Char(_) => <Char as StringElement>::STRING_KIND,
        DenseArray::UInt8(_) => <u8 as StringElement>::STRING_KIND,
        DenseArray::Int32(_) => <i32 as StringElement>::STRING_KIND,
        DenseArray::Int16(_) => <i16 as StringElement>::STRING_KIND,
        DenseArray::UInt16(_) => <u16 as StringElement>::STRING_KIND,
        _ => ElementKind::Undefined,
    }
}
