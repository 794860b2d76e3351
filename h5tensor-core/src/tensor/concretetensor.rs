use crate::{
    cpu_storage::CpuStorage, storage::Storage, DType, Device, ElementType, Error, Result, Shape,
};

use std::{ops::Deref, sync::Arc};

pub struct Tensor_<T: DType> {
    storage: Arc<Storage<T>>,
    shape: Shape,
    device: Device,
}

/// Tensors are immutable n dimensional arrays. Only functions which allocate,
/// copy data, or change the view return `Result`s.
#[derive(Clone)]
pub struct Tensor<T: DType>(Arc<Tensor_<T>>);

impl<T: DType> Deref for Tensor<T> {
    type Target = Tensor_<T>;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

pub(crate) fn from_storage<T: DType>(
    storage: Arc<Storage<T>>,
    shape: Shape,
    device: Device,
) -> Tensor<T> {
    Tensor(Arc::new(Tensor_ {
        storage,
        shape,
        device,
    }))
}

impl<T: DType> Tensor<T> {
    /// A tensor of `shape` filled with zero, allocated directly on `device`.
    pub fn zeros(shape: impl Into<Shape>, device: &Device) -> Result<Self> {
        let shape = shape.into();
        let storage = device.zeros::<T>(shape.element_count())?;
        Ok(from_storage(Arc::new(storage), shape, device.clone()))
    }

    /// Wrap a host buffer. On the CPU the buffer is adopted without copying.
    pub fn from_vec(data: Vec<T>, shape: impl Into<Shape>, device: &Device) -> Result<Self> {
        let shape = shape.into();
        if data.len() != shape.element_count() {
            Err(Error::ShapeMismatch {
                src: Shape::new([data.len()]),
                dst: shape.clone(),
            }
            .bt())?
        }
        let storage = match device {
            Device::Cpu => Storage::Cpu(CpuStorage(data)),
            #[cfg(feature = "cuda")]
            other => other.upload(&data)?,
        };
        Ok(from_storage(Arc::new(storage), shape, device.clone()))
    }

    /// View the same buffer under another shape with equal element count.
    pub fn reshape(&self, shape: impl Into<Shape>) -> Result<Self> {
        let shape = self.check_view(shape.into())?;
        Ok(from_storage(self.storage.clone(), shape, self.device.clone()))
    }

    pub fn to_device(&self, device: &Device) -> Result<Self> {
        self.reshape_on(self.shape.clone(), device)
    }

    /// Reshape and relocate in one step. When `device` differs from the current
    /// device the buffer is copied exactly once; otherwise nothing is copied.
    pub fn reshape_on(&self, shape: impl Into<Shape>, device: &Device) -> Result<Self> {
        let shape = self.check_view(shape.into())?;
        if self.device.same_device(device) {
            return Ok(from_storage(self.storage.clone(), shape, device.clone()));
        }
        tracing::trace!(from = ?self.device, to = ?device, %shape, "relocating tensor");
        let host = self.storage.to_cpu_storage()?;
        let storage = device.upload(&host.0)?;
        Ok(from_storage(Arc::new(storage), shape, device.clone()))
    }

    fn check_view(&self, shape: Shape) -> Result<Shape> {
        if shape.element_count() != self.shape.element_count() {
            return Err(Error::ShapeMismatch {
                src: self.shape.clone(),
                dst: shape,
            }
            .bt());
        }
        Ok(shape)
    }

    /// Copy the elements to a host vector in row-major order.
    pub fn to_vec(&self) -> Result<Vec<T>> {
        let data = self.storage.to_cpu_storage()?;
        Ok(data.into_owned().0)
    }

    /// Whether both tensors view the same buffer.
    pub fn shares_storage(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.storage, &other.storage)
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    pub fn element_count(&self) -> usize {
        self.storage.len()
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn dtype(&self) -> ElementType {
        T::ELEMENT
    }
}

impl<T: DType> std::fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tensor")
            .field("dtype", &T::NAME)
            .field("shape", &self.shape)
            .field("device", &self.device)
            .finish()
    }
}
