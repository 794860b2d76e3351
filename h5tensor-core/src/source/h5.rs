//! HDF5 datasets and groups as tensor sources.

use hdf5::{
    types::{FloatSize, IntSize, TypeDescriptor},
    Container, Dataset, Group, Location,
};

use crate::{
    dtype::cast_vec, DType, DatasetSource, ElementType, Error, GroupSource, Result, Shape,
    StorageType,
};

fn int_bytes(size: IntSize) -> usize {
    match size {
        IntSize::U1 => 1,
        IntSize::U2 => 2,
        IntSize::U4 => 4,
        IntSize::U8 => 8,
    }
}

fn float_bytes(size: FloatSize) -> usize {
    match size {
        FloatSize::U4 => 4,
        FloatSize::U8 => 8,
        #[allow(unreachable_patterns)]
        _ => 2,
    }
}

fn shape_attr(loc: &Location, name: &str) -> Result<Option<Shape>> {
    let owner = loc.name();
    let names = loc.attr_names().map_err(|e| Error::backend(&owner, e))?;
    if !names.iter().any(|n| n == name) {
        return Ok(None);
    }
    let label = format!("{owner}@{name}");
    let attr = loc.attr(name).map_err(|e| Error::backend(&label, e))?;
    let descriptor = attr
        .dtype()
        .and_then(|dtype| dtype.to_descriptor())
        .map_err(|e| Error::backend(&label, e))?;
    // Integer types only: a soft conversion would truncate floats.
    let values = match descriptor {
        TypeDescriptor::Integer(_) => attr
            .read_raw::<i64>()
            .map_err(|e| Error::backend(&label, e))?,
        TypeDescriptor::Unsigned(_) => attr
            .read_raw::<u64>()
            .map_err(|e| Error::backend(&label, e))?
            .into_iter()
            .map(|v| {
                i64::try_from(v)
                    .map_err(|_| Error::read(&label, format!("extent {v} out of range")))
            })
            .collect::<Result<Vec<_>>>()?,
        other => {
            return Err(Error::read(
                &label,
                format!("expected an integer attribute, found {other:?}"),
            ))
        }
    };
    Shape::from_attr(&values)
        .map(Some)
        .map_err(|reason| Error::read(&label, reason))
}

impl DatasetSource for Dataset {
    fn name(&self) -> String {
        Location::name(self)
    }

    fn shape(&self) -> Result<Shape> {
        Ok(Shape::new(Container::shape(self)))
    }

    fn size(&self) -> Result<usize> {
        Ok(Container::size(self))
    }

    fn storage_type(&self) -> Result<StorageType> {
        let descriptor = Container::dtype(self)
            .and_then(|dtype| dtype.to_descriptor())
            .map_err(|e| Error::backend(Location::name(self), e))?;
        Ok(match descriptor {
            TypeDescriptor::Integer(size) => StorageType::Int {
                bytes: int_bytes(size),
            },
            TypeDescriptor::Unsigned(size) => StorageType::Uint {
                bytes: int_bytes(size),
            },
            TypeDescriptor::Float(size) => StorageType::Float {
                bytes: float_bytes(size),
            },
            TypeDescriptor::Boolean => StorageType::Bool,
            TypeDescriptor::FixedAscii(_)
            | TypeDescriptor::FixedUnicode(_)
            | TypeDescriptor::VarLenAscii
            | TypeDescriptor::VarLenUnicode => StorageType::String,
            other => StorageType::Other(format!("{other:?}")),
        })
    }

    fn shape_attr(&self, name: &str) -> Result<Option<Shape>> {
        shape_attr(self, name)
    }

    fn read_direct<T: DType>(&self) -> Result<Vec<T>> {
        let reader = self.as_reader();
        macro_rules! read_as {
            ($t:ty) => {{
                let data = reader
                    .read_raw::<$t>()
                    .map_err(|e| Error::backend(Location::name(self), e))?;
                cast_vec::<$t, T>(data)
            }};
        }

        let data = match T::ELEMENT {
            ElementType::U8 => read_as!(u8),
            ElementType::U16 => read_as!(u16),
            ElementType::U32 => read_as!(u32),
            ElementType::U64 => read_as!(u64),
            ElementType::I8 => read_as!(i8),
            ElementType::I16 => read_as!(i16),
            ElementType::I32 => read_as!(i32),
            ElementType::I64 => read_as!(i64),
            ElementType::F32 => read_as!(f32),
            ElementType::F64 => read_as!(f64),
            #[cfg(feature = "half")]
            ElementType::F16 => read_as!(half::f16),
            // HDF5 has no predefined bfloat16 type.
            #[cfg(feature = "bfloat")]
            ElementType::BF16 => None,
        };
        data.ok_or_else(|| {
            Error::UnsupportedDType {
                dataset: Location::name(self),
                dtype: T::NAME.to_string(),
            }
            .bt()
        })
    }
}

impl GroupSource for Group {
    type Dataset = Dataset;

    fn name(&self) -> String {
        Location::name(self)
    }

    fn dataset(&self, name: &str) -> Result<Option<Dataset>> {
        if !self.link_exists(name) {
            return Ok(None);
        }
        Group::dataset(self, name)
            .map(Some)
            .map_err(|e| Error::backend(format!("{}/{name}", Location::name(self)), e))
    }

    fn shape_attr(&self, name: &str) -> Result<Option<Shape>> {
        shape_attr(self, name)
    }
}
