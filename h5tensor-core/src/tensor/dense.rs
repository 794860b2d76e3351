use std::any::Any;

#[cfg(feature = "bfloat")]
use half::bf16;
#[cfg(feature = "half")]
use half::f16;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::{DType, Device, ElementType, Error, Result, Shape, Tensor};

/// Produces a typed tensor once the element type is known at runtime.
pub(crate) trait DTypeVisitor {
    fn visit<T: DType>(self) -> Result<Tensor<T>>;
}

macro_rules! dense_tensor {
    ($($(#[$meta:meta])* $variant:ident => $ty:ty),* $(,)?) => {
        /// A dense tensor whose element type is only known at runtime.
        #[derive(Clone, Debug)]
        pub enum DenseTensor {
            $($(#[$meta])* $variant(Tensor<$ty>),)*
        }

        $(
            $(#[$meta])*
            impl From<Tensor<$ty>> for DenseTensor {
                fn from(t: Tensor<$ty>) -> Self {
                    Self::$variant(t)
                }
            }
        )*

        impl DenseTensor {
            /// Run `visitor` with the Rust type behind `dtype`.
            pub(crate) fn visit<V: DTypeVisitor>(dtype: ElementType, visitor: V) -> Result<Self> {
                match dtype {
                    $($(#[$meta])* ElementType::$variant => visitor.visit::<$ty>().map(Self::$variant),)*
                }
            }

            pub fn dtype(&self) -> ElementType {
                match self {
                    $($(#[$meta])* Self::$variant(_) => ElementType::$variant,)*
                }
            }

            pub fn shape(&self) -> &Shape {
                match self {
                    $($(#[$meta])* Self::$variant(t) => t.shape(),)*
                }
            }

            pub fn device(&self) -> &Device {
                match self {
                    $($(#[$meta])* Self::$variant(t) => t.device(),)*
                }
            }

            pub fn element_count(&self) -> usize {
                match self {
                    $($(#[$meta])* Self::$variant(t) => t.element_count(),)*
                }
            }

            /// The typed tensor, if the element type is `T`.
            pub fn as_tensor<T: DType>(&self) -> Option<&Tensor<T>> {
                match self {
                    $($(#[$meta])* Self::$variant(t) => (t as &dyn Any).downcast_ref::<Tensor<T>>(),)*
                }
            }

            /// Host copy of the elements, converted to `f64`.
            pub fn to_f64_vec(&self) -> Result<Vec<f64>> {
                match self {
                    $($(#[$meta])* Self::$variant(t) => Ok(to_f64(&t.to_vec()?)),)*
                }
            }

            pub fn to_device(&self, device: &Device) -> Result<Self> {
                match self {
                    $($(#[$meta])* Self::$variant(t) => t.to_device(device).map(Self::$variant),)*
                }
            }

            pub fn reshape(&self, shape: impl Into<Shape>) -> Result<Self> {
                let shape = shape.into();
                match self {
                    $($(#[$meta])* Self::$variant(t) => t.reshape(shape).map(Self::$variant),)*
                }
            }
        }
    };
}

dense_tensor! {
    U8 => u8,
    U16 => u16,
    U32 => u32,
    U64 => u64,
    I8 => i8,
    I16 => i16,
    I32 => i32,
    I64 => i64,
    F32 => f32,
    F64 => f64,
    #[cfg(feature = "half")]
    F16 => f16,
    #[cfg(feature = "bfloat")]
    BF16 => bf16,
}

fn to_f64<T: DType>(data: &[T]) -> Vec<f64> {
    data.par_iter().map(|x| x.to_f64()).collect()
}

impl DenseTensor {
    /// A zero-filled tensor of runtime element type `dtype`.
    pub fn zeros(dtype: ElementType, shape: impl Into<Shape>, device: &Device) -> Result<Self> {
        struct Zeros<'a> {
            shape: Shape,
            device: &'a Device,
        }

        impl DTypeVisitor for Zeros<'_> {
            fn visit<T: DType>(self) -> Result<Tensor<T>> {
                Tensor::zeros(self.shape, self.device)
            }
        }

        Self::visit(
            dtype,
            Zeros {
                shape: shape.into(),
                device,
            },
        )
    }

    /// Host copy of the elements as `T`. Fails unless the element type is `T`.
    pub fn to_vec<T: DType>(&self) -> Result<Vec<T>> {
        match self.as_tensor::<T>() {
            Some(t) => t.to_vec(),
            None => Err(Error::DTypeMismatch {
                actual: self.dtype().name(),
                requested: T::NAME,
            }
            .bt()),
        }
    }

    pub fn dims(&self) -> &[usize] {
        self.shape().dims()
    }

    pub fn rank(&self) -> usize {
        self.shape().rank()
    }
}
