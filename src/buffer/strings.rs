//! Ragged string collections.
//!
//! A record owns a NUL-terminated buffer and reports its length without the
//! terminator. A zero-length record owns no buffer at all, and callers must
//! check `is_null` before touching the contents.

use bytemuck::Pod;

use crate::types::Char;

#[derive(Debug, Clone, PartialEq)]
pub struct StringRecord<T> {
    /// Content plus one trailing zero element, or `None` for a zero-length string.
    buffer: Option<Vec<T>>,
}

impl<T: Pod> StringRecord<T> {
    /// Takes ownership of `content` and appends the terminator.
    pub fn from_content(mut content: Vec<T>) -> Self {
        if content.is_empty() {
            return Self::null();
        }
        content.push(T::zeroed());
        Self {
            buffer: Some(content),
        }
    }

    pub fn from_slice(content: &[T]) -> Self {
        Self::from_content(content.to_vec())
    }

    /// The zero-length record.
    pub fn null() -> Self {
        Self { buffer: None }
    }

    pub fn is_null(&self) -> bool {
        self.buffer.is_none()
    }

    /// Length in elements, excluding the terminator.
    pub fn len(&self) -> usize {
        self.buffer.as_ref().map_or(0, |b| b.len() - 1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The content without the terminator.
    pub fn as_slice(&self) -> Option<&[T]> {
        self.buffer.as_deref().map(|b| &b[..b.len() - 1])
    }

    /// The content including the terminator.
    pub fn as_terminated(&self) -> Option<&[T]> {
        self.buffer.as_deref()
    }

    /// Transfers the terminated buffer to the caller.
    pub fn into_buffer(self) -> Option<Vec<T>> {
        self.buffer
    }
}

impl StringRecord<Char> {
    /// The content as text, replacing invalid UTF-8.
    pub fn to_string_lossy(&self) -> String {
        self.as_slice()
            .map(|chars| String::from_utf8_lossy(Char::as_bytes(chars)).into_owned())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringList<T> {
    strings: Vec<StringRecord<T>>,
    max_string_len: usize,
}

impl<T: Pod> StringList<T> {
    pub fn new(strings: Vec<StringRecord<T>>) -> Self {
        let max_string_len = strings.iter().map(StringRecord::len).max().unwrap_or(0);
        Self {
            strings,
            max_string_len,
        }
    }

    pub(crate) fn from_parts(strings: Vec<StringRecord<T>>, max_string_len: usize) -> Self {
        Self {
            strings,
            max_string_len,
        }
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn max_string_len(&self) -> usize {
        self.max_string_len
    }

    pub fn get(&self, index: usize) -> Option<&StringRecord<T>> {
        self.strings.get(index)
    }

    pub fn records(&self) -> &[StringRecord<T>] {
        &self.strings
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StringRecord<T>> {
        self.strings.iter()
    }

    /// Transfers ownership of the records to the caller.
    pub fn into_records(self) -> Vec<StringRecord<T>> {
        self.strings
    }
}

impl StringList<Char> {
    pub fn from_strs(texts: &[&str]) -> Self {
        Self::new(
            texts
                .iter()
                .map(|text| StringRecord::from_slice(Char::slice_from_str(text)))
                .collect(),
        )
    }
}
