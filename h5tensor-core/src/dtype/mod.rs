use std::{any::Any, fmt};

#[cfg(feature = "bfloat")]
use half::bf16;
#[cfg(feature = "half")]
use half::f16;

#[cfg(feature = "cuda")]
use cudarc::driver::DeviceRepr;

use crate::{Error, Result};

/// Element type tag as reported by the storage library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    Int { bytes: usize },
    Uint { bytes: usize },
    Float { bytes: usize },
    Bool,
    String,
    /// Compound, enum, reference, array and other layouts.
    Other(String),
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int { bytes } => write!(f, "int{}", bytes * 8),
            Self::Uint { bytes } => write!(f, "uint{}", bytes * 8),
            Self::Float { bytes } => write!(f, "float{}", bytes * 8),
            Self::Bool => write!(f, "bool"),
            Self::String => write!(f, "string"),
            Self::Other(desc) => write!(f, "{desc}"),
        }
    }
}

/// Runtime tag of a tensor element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    #[cfg(feature = "half")]
    F16,
    #[cfg(feature = "bfloat")]
    BF16,
}

impl ElementType {
    /// Map a storage type tag to the tensor element type with the same width
    /// and signedness. Any tag without an exact counterpart is an
    /// [`Error::UnsupportedDType`] for `dataset`.
    pub fn from_storage(tag: &StorageType, dataset: &str) -> Result<Self> {
        let mapped = match tag {
            StorageType::Int { bytes: 1 } => Some(Self::I8),
            StorageType::Int { bytes: 2 } => Some(Self::I16),
            StorageType::Int { bytes: 4 } => Some(Self::I32),
            StorageType::Int { bytes: 8 } => Some(Self::I64),
            StorageType::Uint { bytes: 1 } => Some(Self::U8),
            StorageType::Uint { bytes: 2 } => Some(Self::U16),
            StorageType::Uint { bytes: 4 } => Some(Self::U32),
            StorageType::Uint { bytes: 8 } => Some(Self::U64),
            #[cfg(feature = "half")]
            StorageType::Float { bytes: 2 } => Some(Self::F16),
            StorageType::Float { bytes: 4 } => Some(Self::F32),
            StorageType::Float { bytes: 8 } => Some(Self::F64),
            #[cfg(feature = "bfloat")]
            StorageType::Other(desc) if desc == "bfloat16" => Some(Self::BF16),
            _ => None,
        };
        mapped.ok_or_else(|| {
            Error::UnsupportedDType {
                dataset: dataset.to_string(),
                dtype: tag.to_string(),
            }
            .bt()
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::U8 => u8::NAME,
            Self::U16 => u16::NAME,
            Self::U32 => u32::NAME,
            Self::U64 => u64::NAME,
            Self::I8 => i8::NAME,
            Self::I16 => i16::NAME,
            Self::I32 => i32::NAME,
            Self::I64 => i64::NAME,
            Self::F32 => f32::NAME,
            Self::F64 => f64::NAME,
            #[cfg(feature = "half")]
            Self::F16 => f16::NAME,
            #[cfg(feature = "bfloat")]
            Self::BF16 => bf16::NAME,
        }
    }

    pub fn size_in_bytes(&self) -> usize {
        match self {
            Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::U64 | Self::I64 | Self::F64 => 8,
            #[cfg(feature = "half")]
            Self::F16 => 2,
            #[cfg(feature = "bfloat")]
            Self::BF16 => 2,
        }
    }

    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            Self::U8
                | Self::U16
                | Self::U32
                | Self::U64
                | Self::I8
                | Self::I16
                | Self::I32
                | Self::I64
        )
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(feature = "cuda")]
pub trait DeviceReprLike: DeviceRepr {}

#[cfg(not(feature = "cuda"))]
pub trait DeviceReprLike {}

impl DeviceReprLike for u8 {}
impl DeviceReprLike for u16 {}
impl DeviceReprLike for u32 {}
impl DeviceReprLike for u64 {}
impl DeviceReprLike for i8 {}
impl DeviceReprLike for i16 {}
impl DeviceReprLike for i32 {}
impl DeviceReprLike for i64 {}
impl DeviceReprLike for f32 {}
impl DeviceReprLike for f64 {}

/// Marker trait for tensor datatypes.
pub trait DType:
    fmt::Debug + Copy + PartialEq + Send + Sync + DeviceReprLike + 'static
{
    const ZERO: Self;
    const NAME: &'static str;
    const ELEMENT: ElementType;

    fn to_f64(&self) -> f64;
}

macro_rules! dtype {
    ($rt:ident, $zero:expr, $elem:ident) => {
        impl DType for $rt {
            const ZERO: $rt = $zero;
            const NAME: &'static str = stringify!($rt);
            const ELEMENT: ElementType = ElementType::$elem;

            fn to_f64(&self) -> f64 {
                *self as f64
            }
        }
    };
}

dtype!(u8, 0u8, U8);
dtype!(u16, 0u16, U16);
dtype!(u32, 0u32, U32);
dtype!(u64, 0u64, U64);
dtype!(i8, 0i8, I8);
dtype!(i16, 0i16, I16);
dtype!(i32, 0i32, I32);
dtype!(i64, 0i64, I64);
dtype!(f32, 0f32, F32);
dtype!(f64, 0f64, F64);

#[cfg(feature = "half")]
impl DeviceReprLike for f16 {}
#[cfg(feature = "half")]
impl DType for f16 {
    const ZERO: f16 = f16::from_f64_const(0.0);
    const NAME: &'static str = "f16";
    const ELEMENT: ElementType = ElementType::F16;

    fn to_f64(&self) -> f64 {
        self.to_f64_const()
    }
}

#[cfg(feature = "bfloat")]
impl DeviceReprLike for bf16 {}
#[cfg(feature = "bfloat")]
impl DType for bf16 {
    const ZERO: bf16 = bf16::from_f64_const(0.0);
    const NAME: &'static str = "bf16";
    const ELEMENT: ElementType = ElementType::BF16;

    fn to_f64(&self) -> f64 {
        self.to_f64_const()
    }
}

/// Reinterpret a host buffer read as `S` as a buffer of `T` without copying.
/// Returns `None` unless `S` and `T` are the same type.
#[cfg(feature = "hdf5")]
pub(crate) fn cast_vec<S: 'static, T: 'static>(data: Vec<S>) -> Option<Vec<T>> {
    let boxed: Box<dyn Any> = Box::new(data);
    boxed.downcast::<Vec<T>>().ok().map(|v| *v)
}
