//! h5tensor materializes tensors from datasets stored in HDF5 files.
//!
//! A dataset becomes a [`DenseTensor`]; a group holding `indices` and `values`
//! datasets plus a `dense_shape` attribute becomes a [`SparseTensor`].
//!
//! Reads always land in host memory first. The tensor is then reshaped to its
//! logical shape (the `original_shape` attribute, when the data was stored
//! flattened) and moved to the target [`Device`] in the same step.
//!
//! Storage is reached through the [`DatasetSource`] and [`GroupSource`] traits.
//! With the `hdf5` feature they are implemented for `hdf5::Dataset` and
//! `hdf5::Group`; [`mem`] provides in-memory sources.
//!
//! ```
//! use h5tensor_core::{mem::{MemDataset, MemGroup}, Device, Materializer};
//!
//! let m = Materializer::new().on(Device::Cpu);
//!
//! let flat = MemDataset::new("x", [6], vec![1f32, 2., 3., 4., 5., 6.])
//!     .with_attr("original_shape", &[2, 3]);
//! let dense = m.make_dense(&flat).unwrap();
//! assert_eq!(dense.dims(), &[2, 3]);
//! assert_eq!(dense.to_vec::<f32>().unwrap(), vec![1., 2., 3., 4., 5., 6.]);
//!
//! let group = MemGroup::new("hist")
//!     .with_dataset("indices", MemDataset::new("indices", [2, 2], vec![0i64, 1, 3, 4]))
//!     .with_dataset("values", MemDataset::new("values", [2], vec![0.5f64, 1.5]))
//!     .with_attr("dense_shape", &[5, 5]);
//! let sparse = m.make_sparse(&group).unwrap();
//! assert_eq!(sparse.nnz(), 2);
//! assert_eq!(sparse.dense_shape().dims(), &[5, 5]);
//! ```

mod cpu_storage;
#[cfg(feature = "cuda")]
mod cuda_backend;
mod device;
mod dtype;
mod error;
mod materialize;
mod shape;
pub mod source;
mod storage;
mod tensor;

pub use device::Device;
pub use dtype::{DType, ElementType, StorageType};
pub use error::{Error, Result};
pub use materialize::{make_dense, make_sparse, Materializer};
pub use shape::Shape;
pub use source::{mem, DatasetSource, GroupSource};
pub use tensor::{DenseTensor, SparseTensor, Tensor};
