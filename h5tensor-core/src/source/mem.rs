//! In-memory datasets and groups.

use std::{
    any::Any,
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use crate::{DType, DatasetSource, ElementType, Error, GroupSource, Result, Shape, StorageType};

/// A dataset held in a host vector.
///
/// The stored vector is not checked against the shape, so malformed datasets
/// can be modelled. Clones share the read counter.
#[derive(Clone)]
pub struct MemDataset {
    name: String,
    shape: Shape,
    storage_type: StorageType,
    data: Arc<dyn Any + Send + Sync>,
    attrs: HashMap<String, Vec<i64>>,
    failure: Option<String>,
    reads: Arc<AtomicUsize>,
}

impl MemDataset {
    pub fn new<T: DType>(name: impl Into<String>, shape: impl Into<Shape>, data: Vec<T>) -> Self {
        Self {
            name: name.into(),
            shape: shape.into(),
            storage_type: storage_type_of(T::ELEMENT),
            data: Arc::new(data),
            attrs: HashMap::new(),
            failure: None,
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, values: &[i64]) -> Self {
        self.attrs.insert(name.into(), values.to_vec());
        self
    }

    /// Report `tag` as the stored element type instead of the vector's type.
    pub fn with_storage_type(mut self, tag: StorageType) -> Self {
        self.storage_type = tag;
        self
    }

    /// Make every read fail with `reason`.
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.failure = Some(reason.into());
        self
    }

    /// Number of bulk reads performed so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

fn storage_type_of(elem: ElementType) -> StorageType {
    let bytes = elem.size_in_bytes();
    match elem {
        ElementType::I8 | ElementType::I16 | ElementType::I32 | ElementType::I64 => {
            StorageType::Int { bytes }
        }
        ElementType::U8 | ElementType::U16 | ElementType::U32 | ElementType::U64 => {
            StorageType::Uint { bytes }
        }
        ElementType::F32 | ElementType::F64 => StorageType::Float { bytes },
        #[cfg(feature = "half")]
        ElementType::F16 => StorageType::Float { bytes },
        #[cfg(feature = "bfloat")]
        ElementType::BF16 => StorageType::Other("bfloat16".to_string()),
    }
}

fn attr_shape(
    attrs: &HashMap<String, Vec<i64>>,
    owner: &str,
    name: &str,
) -> Result<Option<Shape>> {
    attrs
        .get(name)
        .map(|values| {
            Shape::from_attr(values).map_err(|reason| Error::read(format!("{owner}@{name}"), reason))
        })
        .transpose()
}

impl DatasetSource for MemDataset {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn shape(&self) -> Result<Shape> {
        Ok(self.shape.clone())
    }

    fn storage_type(&self) -> Result<StorageType> {
        Ok(self.storage_type.clone())
    }

    fn shape_attr(&self, name: &str) -> Result<Option<Shape>> {
        attr_shape(&self.attrs, &self.name, name)
    }

    fn read_direct<T: DType>(&self) -> Result<Vec<T>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = &self.failure {
            return Err(Error::read(&self.name, reason));
        }
        match self.data.downcast_ref::<Vec<T>>() {
            Some(data) => Ok(data.clone()),
            None => Err(Error::read(
                &self.name,
                format!("stored as {}, read as {}", self.storage_type, T::NAME),
            )),
        }
    }
}

/// A group of in-memory datasets.
#[derive(Clone, Default)]
pub struct MemGroup {
    name: String,
    datasets: HashMap<String, MemDataset>,
    attrs: HashMap<String, Vec<i64>>,
}

impl MemGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_dataset(mut self, name: impl Into<String>, dataset: MemDataset) -> Self {
        self.datasets.insert(name.into(), dataset);
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, values: &[i64]) -> Self {
        self.attrs.insert(name.into(), values.to_vec());
        self
    }

    /// Total bulk reads across all child datasets.
    pub fn reads(&self) -> usize {
        self.datasets.values().map(MemDataset::reads).sum()
    }
}

impl GroupSource for MemGroup {
    type Dataset = MemDataset;

    fn name(&self) -> String {
        self.name.clone()
    }

    fn dataset(&self, name: &str) -> Result<Option<MemDataset>> {
        Ok(self.datasets.get(name).cloned())
    }

    fn shape_attr(&self, name: &str) -> Result<Option<Shape>> {
        attr_shape(&self.attrs, &self.name, name)
    }
}
