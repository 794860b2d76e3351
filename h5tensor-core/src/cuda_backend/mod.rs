use std::{borrow::Cow, sync::Arc};

use cudarc::driver::{CudaContext, CudaSlice, CudaStream};
use error::{CudaError, WrapErr};

use crate::{
    cpu_storage::CpuStorage,
    storage::{BackendDevice, BackendStorage},
    DType, Result,
};

pub(crate) mod error;

#[derive(Clone)]
pub struct CudaDevice {
    ordinal: usize,
    context: Arc<CudaContext>,
    stream: Arc<CudaStream>,
}

impl CudaDevice {
    pub(crate) fn new(ordinal: usize) -> Result<Self> {
        let context = CudaContext::new(ordinal).w()?;
        let stream = context.new_stream().w()?;
        Ok(Self {
            ordinal,
            context,
            stream,
        })
    }

    pub(crate) fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub(crate) fn stream(&self) -> Arc<CudaStream> {
        self.stream.clone()
    }

    pub(crate) fn context(&self) -> &Arc<CudaContext> {
        &self.context
    }
}

pub struct CudaStorage<T: DType> {
    slice: CudaSlice<T>,
    device: CudaDevice,
}

impl<T: DType> BackendStorage<T> for CudaStorage<T> {
    fn to_cpu_storage(&self) -> Result<Cow<'_, CpuStorage<T>>> {
        let data = self.device.stream().memcpy_dtov(&self.slice).w()?;
        if data.len() != self.slice.len() {
            Err(CudaError::LengthMismatch {
                expected: self.slice.len(),
                actual: data.len(),
            })?
        }
        Ok(Cow::Owned(CpuStorage(data)))
    }

    fn len(&self) -> usize {
        self.slice.len()
    }
}

impl BackendDevice for CudaDevice {
    type Storage<X: DType> = CudaStorage<X>;

    fn zeros<T: DType>(&self, n: usize) -> Result<Self::Storage<T>> {
        self.upload(&vec![T::ZERO; n])
    }

    fn upload<T: DType>(&self, host: &[T]) -> Result<Self::Storage<T>> {
        self.context().bind_to_thread().w()?;
        let slice = self.stream.memcpy_stov(host).w()?;
        Ok(CudaStorage {
            slice,
            device: self.clone(),
        })
    }
}
