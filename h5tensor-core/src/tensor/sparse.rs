use crate::{DenseTensor, Error, Result, Shape};

/// A sparse tensor in coordinate form.
///
/// - `indices`: `[nnz, rank]` integer tensor, one row per stored element
/// - `values`: `[nnz]` tensor of the stored elements
/// - `dense_shape`: the full logical shape
#[derive(Clone, Debug)]
pub struct SparseTensor {
    indices: DenseTensor,
    values: DenseTensor,
    dense_shape: Shape,
}

impl SparseTensor {
    /// Assemble a sparse tensor after checking that the three parts agree.
    ///
    /// `name` identifies the source in error messages.
    pub fn new(
        name: &str,
        indices: DenseTensor,
        values: DenseTensor,
        dense_shape: Shape,
    ) -> Result<Self> {
        let inconsistent = |reason: String| {
            Error::Inconsistent {
                group: name.to_string(),
                reason,
            }
            .bt()
        };

        if !indices.dtype().is_integral() {
            return Err(inconsistent(format!(
                "indices must have an integer dtype, found {}",
                indices.dtype()
            )));
        }
        if indices.rank() != 2 {
            return Err(inconsistent(format!(
                "indices must be rank 2, found shape {:?}",
                indices.shape()
            )));
        }
        if values.rank() != 1 {
            return Err(inconsistent(format!(
                "values must be rank 1, found shape {:?}",
                values.shape()
            )));
        }
        let (rows, cols) = (indices.dims()[0], indices.dims()[1]);
        if rows != values.dims()[0] {
            return Err(inconsistent(format!(
                "{rows} index rows but {} values",
                values.dims()[0]
            )));
        }
        if cols != dense_shape.rank() {
            return Err(inconsistent(format!(
                "indices have {cols} columns but dense_shape {dense_shape:?} has rank {}",
                dense_shape.rank()
            )));
        }

        Ok(Self::from_parts_unchecked(indices, values, dense_shape))
    }

    /// Assemble a sparse tensor as given, without any consistency checks.
    pub fn from_parts_unchecked(
        indices: DenseTensor,
        values: DenseTensor,
        dense_shape: Shape,
    ) -> Self {
        Self {
            indices,
            values,
            dense_shape,
        }
    }

    pub fn indices(&self) -> &DenseTensor {
        &self.indices
    }

    pub fn values(&self) -> &DenseTensor {
        &self.values
    }

    pub fn dense_shape(&self) -> &Shape {
        &self.dense_shape
    }

    /// Number of stored elements.
    pub fn nnz(&self) -> usize {
        self.values.element_count()
    }

    pub fn rank(&self) -> usize {
        self.dense_shape.rank()
    }
}
