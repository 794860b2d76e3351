use std::sync::OnceLock;

#[cfg(feature = "cuda")]
use crate::cuda_backend::CudaDevice;
use crate::{
    cpu_storage::CpuDevice,
    storage::{BackendDevice, Storage},
    DType, Result,
};

/// A concrete compute location for tensor buffers.
#[derive(Clone)]
pub enum Device {
    #[cfg(feature = "cuda")]
    Cuda(CudaDevice),
    Cpu,
}

impl Device {
    #[cfg(feature = "cuda")]
    pub fn new_cuda(ordinal: usize) -> Result<Self> {
        Ok(Self::Cuda(CudaDevice::new(ordinal)?))
    }

    /// Where bulk reads land. Storage libraries write into host memory only.
    pub fn staging() -> Self {
        Self::Cpu
    }

    /// The process default: the first CUDA device if one opens, else the CPU.
    ///
    /// Resolved once per process; later calls share the same device.
    pub fn best() -> Self {
        static BEST: OnceLock<Device> = OnceLock::new();
        BEST.get_or_init(Self::probe).clone()
    }

    fn probe() -> Self {
        #[cfg(feature = "cuda")]
        match CudaDevice::new(0) {
            Ok(cuda) => return Self::Cuda(cuda),
            Err(err) => tracing::warn!("CUDA device 0 unavailable, falling back to CPU: {err}"),
        }
        Self::Cpu
    }

    pub fn same_device(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Cpu, Self::Cpu) => true,
            #[cfg(feature = "cuda")]
            (Self::Cuda(a), Self::Cuda(b)) => a.ordinal() == b.ordinal(),
            #[cfg(feature = "cuda")]
            _ => false,
        }
    }

    pub(crate) fn zeros<T: DType>(&self, n: usize) -> Result<Storage<T>> {
        match self {
            #[cfg(feature = "cuda")]
            Self::Cuda(cuda) => Ok(Storage::Cuda(cuda.zeros::<T>(n)?)),
            Self::Cpu => Ok(Storage::Cpu(CpuDevice.zeros::<T>(n)?)),
        }
    }

    pub(crate) fn upload<T: DType>(&self, host: &[T]) -> Result<Storage<T>> {
        match self {
            #[cfg(feature = "cuda")]
            Self::Cuda(cuda) => Ok(Storage::Cuda(cuda.upload(host)?)),
            Self::Cpu => Ok(Storage::Cpu(CpuDevice.upload(host)?)),
        }
    }
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "cuda")]
            Self::Cuda(cuda) => write!(f, "cuda:{}", cuda.ordinal()),
            Self::Cpu => write!(f, "cpu"),
        }
    }
}
