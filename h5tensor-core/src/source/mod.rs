//! Handles to stored datasets and groups.
//!
//! The materializer only sees these traits. [`mem`] keeps everything in memory;
//! `h5` (feature `hdf5`) implements them for `hdf5::Dataset` and `hdf5::Group`.

#[cfg(feature = "hdf5")]
pub mod h5;
pub mod mem;

use crate::{DType, Error, Result, Shape, StorageType};

/// Attribute holding the logical shape of a dataset stored flattened.
pub const ORIGINAL_SHAPE: &str = "original_shape";
/// Group attribute holding the full shape of a sparse tensor.
pub const DENSE_SHAPE: &str = "dense_shape";
/// Child dataset with the coordinates of a sparse tensor.
pub const INDICES: &str = "indices";
/// Child dataset with the stored elements of a sparse tensor.
pub const VALUES: &str = "values";

/// A read-only, typed, shaped array on storage.
pub trait DatasetSource {
    fn name(&self) -> String;

    /// Shape as laid out on storage.
    fn shape(&self) -> Result<Shape>;

    /// Number of stored elements.
    fn size(&self) -> Result<usize> {
        self.shape()?
            .checked_element_count()
            .ok_or_else(|| Error::read(self.name(), "stored shape overflows usize"))
    }

    fn storage_type(&self) -> Result<StorageType>;

    /// An integer-sequence attribute read as a shape, `None` when absent.
    fn shape_attr(&self, name: &str) -> Result<Option<Shape>>;

    /// Read the whole dataset in one call into a new host buffer of `T`.
    fn read_direct<T: DType>(&self) -> Result<Vec<T>>;
}

/// A named collection of datasets with attributes.
pub trait GroupSource {
    type Dataset: DatasetSource;

    fn name(&self) -> String;

    /// The child dataset `name`, `None` when absent.
    fn dataset(&self, name: &str) -> Result<Option<Self::Dataset>>;

    fn shape_attr(&self, name: &str) -> Result<Option<Shape>>;
}
