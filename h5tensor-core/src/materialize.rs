use tracing::{debug, trace};

use crate::{
    source::{DENSE_SHAPE, INDICES, ORIGINAL_SHAPE, VALUES},
    tensor::dense::DTypeVisitor,
    DType, DatasetSource, DenseTensor, Device, ElementType, Error, GroupSource, Result, Shape,
    SparseTensor, Tensor,
};

/// Builds tensors from stored datasets and groups.
///
/// Every bulk read lands on [`Device::staging`] and is then moved to the
/// target device together with the logical reshape. The materializer holds no
/// state between calls.
#[derive(Clone, Debug)]
pub struct Materializer {
    device: Device,
    validate_sparse: bool,
}

impl Default for Materializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Materializer {
    /// Target [`Device::best`] and validate sparse tensors.
    pub fn new() -> Self {
        Self {
            device: Device::best(),
            validate_sparse: true,
        }
    }

    /// Place materialized tensors on `device`.
    pub fn on(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Check that the parts of a sparse tensor agree before assembling it.
    pub fn validate_sparse(mut self, validate: bool) -> Self {
        self.validate_sparse = validate;
        self
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Materialize `dataset` as a dense tensor.
    ///
    /// The tensor takes the shape in the `original_shape` attribute when
    /// present, else the stored shape. Empty datasets yield zeros without
    /// reading.
    pub fn make_dense<D: DatasetSource>(&self, dataset: &D) -> Result<DenseTensor> {
        let name = dataset.name();
        let dtype = ElementType::from_storage(&dataset.storage_type()?, &name)?;
        let native = dataset.shape()?;
        let logical = match dataset.shape_attr(ORIGINAL_SHAPE)? {
            Some(shape) => shape,
            None => native.clone(),
        };

        let logical_count = logical
            .checked_element_count()
            .filter(|n| fits_allocation(*n, dtype))
            .ok_or_else(|| {
                Error::read(
                    &name,
                    format!("{logical:?} of {dtype} exceeds the addressable size"),
                )
            })?;

        if dataset.size()? == 0 {
            trace!(dataset = %name, %dtype, %logical, "empty dataset, filling zeros");
            return DenseTensor::zeros(dtype, logical, &self.device);
        }

        if native.checked_element_count() != Some(logical_count) {
            return Err(Error::read(
                &name,
                format!("{ORIGINAL_SHAPE} {logical:?} does not match stored shape {native:?}"),
            ));
        }

        let tensor = DenseTensor::visit(
            dtype,
            ReadDense {
                dataset,
                name: &name,
                native: &native,
                logical: &logical,
                device: &self.device,
            },
        )?;
        debug!(
            dataset = %name,
            %dtype,
            %native,
            %logical,
            device = ?self.device,
            "materialized dense tensor"
        );
        Ok(tensor)
    }

    /// Materialize a sparse tensor from a group holding `indices` and
    /// `values` datasets and a `dense_shape` attribute.
    ///
    /// All three are located before anything is read.
    pub fn make_sparse<G: GroupSource>(&self, group: &G) -> Result<SparseTensor> {
        let name = group.name();
        let missing = |field: &'static str| {
            Error::MissingField {
                group: name.clone(),
                field,
            }
            .bt()
        };

        let indices = group.dataset(INDICES)?.ok_or_else(|| missing(INDICES))?;
        let values = group.dataset(VALUES)?.ok_or_else(|| missing(VALUES))?;
        let dense_shape = group
            .shape_attr(DENSE_SHAPE)?
            .ok_or_else(|| missing(DENSE_SHAPE))?;

        let indices = self.make_dense(&indices)?;
        let values = self.make_dense(&values)?;
        debug!(
            group = %name,
            nnz = values.element_count(),
            %dense_shape,
            "materialized sparse tensor"
        );

        if self.validate_sparse {
            SparseTensor::new(&name, indices, values, dense_shape)
        } else {
            Ok(SparseTensor::from_parts_unchecked(
                indices,
                values,
                dense_shape,
            ))
        }
    }
}

struct ReadDense<'a, D> {
    dataset: &'a D,
    name: &'a str,
    native: &'a Shape,
    logical: &'a Shape,
    device: &'a Device,
}

impl<D: DatasetSource> DTypeVisitor for ReadDense<'_, D> {
    fn visit<T: DType>(self) -> Result<Tensor<T>> {
        let data = self.dataset.read_direct::<T>()?;
        if data.len() != self.native.element_count() {
            return Err(Error::read(
                self.name,
                format!(
                    "read {} elements, stored shape {:?} holds {}",
                    data.len(),
                    self.native,
                    self.native.element_count()
                ),
            ));
        }
        let staged = Tensor::from_vec(data, self.native.clone(), &Device::staging())?;
        staged.reshape_on(self.logical.clone(), self.device)
    }
}

/// Whether `n` elements of `dtype` stay within the largest allocation Rust
/// permits (`isize::MAX` bytes).
fn fits_allocation(n: usize, dtype: ElementType) -> bool {
    n.checked_mul(dtype.size_in_bytes())
        .is_some_and(|bytes| bytes <= isize::MAX as usize)
}

/// [`Materializer::make_dense`] onto the default device.
pub fn make_dense<D: DatasetSource>(dataset: &D) -> Result<DenseTensor> {
    Materializer::new().make_dense(dataset)
}

/// [`Materializer::make_sparse`] onto the default device.
pub fn make_sparse<G: GroupSource>(group: &G) -> Result<SparseTensor> {
    Materializer::new().make_sparse(group)
}
