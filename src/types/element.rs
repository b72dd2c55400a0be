//! The element descriptor that replaces one hand-written routine per element
//! type. Every generic import/export routine in `session` is written once
//! against `Element`, and the seven toolkit element types plug into it here.

use bytemuck::{Pod, Zeroable};
use ndarray::ArrayD;
use std::fmt;

use crate::types::{ElementKind, HostClass};
use crate::value::DenseArray;

/// A single character of host text, stored as one byte.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct Char(pub u8);

impl Char {
    /// Reinterprets the bytes of `text` as host characters without copying.
    pub fn slice_from_str(text: &str) -> &[Char] {
        bytemuck::cast_slice(text.as_bytes())
    }

    /// Reinterprets host characters as raw bytes without copying.
    pub fn as_bytes(chars: &[Char]) -> &[u8] {
        bytemuck::cast_slice(chars)
    }
}

impl From<u8> for Char {
    fn from(byte: u8) -> Self {
        Char(byte)
    }
}

impl fmt::Debug for Char {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0 as char)
    }
}

/// Describes how one toolkit element type is found in, and put back into, a
/// host dense array.
pub trait Element: Pod + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// The host class whose storage holds this element type.
    const CLASS: HostClass;
    /// The name used for this element type in error messages.
    const LABEL: &'static str;

    /// Returns the typed storage if `array` holds this element type.
    fn view(array: &DenseArray) -> Option<&ArrayD<Self>>;

    /// Wraps typed storage into the matching host array variant.
    fn wrap(array: ArrayD<Self>) -> DenseArray;
}

/// The element types that can be carried in a string list.
pub trait StringElement: Element {
    /// The kind a list of strings of this element type classifies as.
    const STRING_KIND: ElementKind;
}

macro_rules! impl_element {
    ($t:ty, $variant:ident, $label:literal) => {
        impl Element for $t {
            const CLASS: HostClass = HostClass::$variant;
            const LABEL: &'static str = $label;

            fn view(array: &DenseArray) -> Option<&ArrayD<Self>> {
                match array {
                    DenseArray::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn wrap(array: ArrayD<Self>) -> DenseArray {
                DenseArray::$variant(array)
            }
        }
    };
}

impl_element!(u8, UInt8, "Byte");
impl_element!(Char, Char, "Char");
impl_element!(i32, Int32, "Integer");
impl_element!(i16, Int16, "Short");
impl_element!(f32, Single, "Single Precision");
impl_element!(f64, Double, "Double Precision");
impl_element!(u16, UInt16, "Word");

macro_rules! impl_string_element {
    ($t:ty, $kind:ident) => {
        impl StringElement for $t {
            const STRING_KIND: ElementKind = ElementKind::$kind;
        }
    };
}

impl_string_element!(u8, StringByte);
impl_string_element!(Char, StringChar);
impl_string_element!(i32, StringInt);
impl_string_element!(i16, StringShort);
impl_string_element!(u16, StringWord);
