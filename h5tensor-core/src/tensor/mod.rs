pub mod concretetensor;
pub mod dense;
pub mod sparse;

pub use concretetensor::Tensor;
pub use dense::DenseTensor;
pub use sparse::SparseTensor;
