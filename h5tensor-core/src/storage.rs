use std::borrow::Cow;

#[cfg(feature = "cuda")]
use crate::cuda_backend::CudaStorage;
use crate::{cpu_storage::CpuStorage, DType, Result};

pub enum Storage<T: DType> {
    #[cfg(feature = "cuda")]
    Cuda(CudaStorage<T>),
    Cpu(CpuStorage<T>),
}

impl<T: DType> Storage<T> {
    pub(crate) fn to_cpu_storage(&self) -> Result<Cow<'_, CpuStorage<T>>> {
        match self {
            Self::Cpu(cpu) => cpu.to_cpu_storage(),
            #[cfg(feature = "cuda")]
            Self::Cuda(cuda) => cuda.to_cpu_storage(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Cpu(cpu) => cpu.len(),
            #[cfg(feature = "cuda")]
            Self::Cuda(cuda) => cuda.len(),
        }
    }
}

pub trait BackendStorage<T: DType> {
    /// Host view of the buffer. Borrows when the buffer already lives on the host.
    fn to_cpu_storage(&self) -> Result<Cow<'_, CpuStorage<T>>>;

    fn len(&self) -> usize;
}

pub trait BackendDevice {
    type Storage<X: DType>: BackendStorage<X>;

    fn zeros<T: DType>(&self, n: usize) -> Result<Self::Storage<T>>;

    /// Copy a staged host buffer onto this device.
    fn upload<T: DType>(&self, host: &[T]) -> Result<Self::Storage<T>>;
}
