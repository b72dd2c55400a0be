//! The toolkit's sparse matrix: one record per column ("vector"), each
//! owning the `(row, value)` pairs stored in that column.

use crate::error::MarshalError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparseEntry<T> {
    /// Row of the entry, `0 <= feat_index < num_feat`.
    pub feat_index: usize,
    pub entry: T,
}

/// One column. An empty column owns no entry array at all.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseVector<T> {
    pub vec_index: usize,
    pub features: Option<Vec<SparseEntry<T>>>,
}

impl<T> SparseVector<T> {
    pub fn num_feat_entries(&self) -> usize {
        self.features.as_ref().map_or(0, Vec::len)
    }

    pub fn entries(&self) -> &[SparseEntry<T>] {
        self.features.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix<T> {
    vectors: Vec<SparseVector<T>>,
    num_feat: usize,
    nnz: usize,
}

impl<T> SparseMatrix<T> {
    /// Checks that the per-column counts add up to `nnz` and that every row
    /// index is below `num_feat`. Row indices within a column may be unsorted.
    pub fn new(
        vectors: Vec<SparseVector<T>>,
        num_feat: usize,
        nnz: usize,
    ) -> Result<Self, MarshalError> {
        let total: usize = vectors.iter().map(SparseVector::num_feat_entries).sum();
        if total != nnz {
            return Err(MarshalError::InvalidArgument(format!(
                "sparse columns hold {} entries but {} were declared",
                total, nnz
            )));
        }
        let out_of_range = vectors
            .iter()
            .flat_map(|v| v.entries().iter().map(move |e| (v.vec_index, e.feat_index)))
            .find(|&(_, row)| row >= num_feat);
        if let Some((column, row)) = out_of_range {
            return Err(MarshalError::InvalidArgument(format!(
                "sparse entry row {} in column {} is out of range for {} features",
                row, column, num_feat
            )));
        }
        Ok(Self {
            vectors,
            num_feat,
            nnz,
        })
    }

    /// Builds a matrix from per-column `(row, value)` lists.
    pub fn from_columns(
        num_feat: usize,
        columns: Vec<Vec<(usize, T)>>,
    ) -> Result<Self, MarshalError> {
        let mut nnz = 0;
        let vectors = columns
            .into_iter()
            .enumerate()
            .map(|(vec_index, column)| {
                nnz += column.len();
                let features = (!column.is_empty()).then(|| {
                    column
                        .into_iter()
                        .map(|(feat_index, entry)| SparseEntry { feat_index, entry })
                        .collect()
                });
                SparseVector {
                    vec_index,
                    features,
                }
            })
            .collect();
        Self::new(vectors, num_feat, nnz)
    }

    pub fn num_feat(&self) -> usize {
        self.num_feat
    }

    pub fn num_vec(&self) -> usize {
        self.vectors.len()
    }

    pub fn nnz(&self) -> usize {
        self.nnz
    }

    pub fn vectors(&self) -> &[SparseVector<T>] {
        &self.vectors
    }

    /// Transfers ownership of the column records to the caller.
    pub fn into_vectors(self) -> Vec<SparseVector<T>> {
        self.vectors
    }
}
