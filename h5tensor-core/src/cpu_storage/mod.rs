use std::borrow::Cow;

use crate::{
    storage::{BackendDevice, BackendStorage},
    DType, Result,
};

pub struct CpuDevice;

#[derive(Clone)]
pub struct CpuStorage<T: DType>(pub(crate) Vec<T>);

impl<T: DType> BackendStorage<T> for CpuStorage<T> {
    fn to_cpu_storage(&self) -> Result<Cow<'_, CpuStorage<T>>> {
        Ok(Cow::Borrowed(self))
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

impl BackendDevice for CpuDevice {
    type Storage<X: DType> = CpuStorage<X>;

    fn zeros<T: DType>(&self, n: usize) -> Result<Self::Storage<T>> {
        Ok(CpuStorage(vec![T::ZERO; n]))
    }

    fn upload<T: DType>(&self, host: &[T]) -> Result<Self::Storage<T>> {
        Ok(CpuStorage(host.to_vec()))
    }
}
