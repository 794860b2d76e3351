use std::fmt;

/// Row-major dimensions of a tensor.
///
/// `[]` is a scalar with one element, `[0]` is an empty vector.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    pub fn new<D: Into<Vec<usize>>>(dims: D) -> Self {
        Self { dims: dims.into() }
    }

    pub fn scalar() -> Self {
        Self { dims: Vec::new() }
    }

    /// Build a shape from an integer attribute such as `original_shape` or
    /// `dense_shape`. Negative extents and shapes whose element count does
    /// not fit in `usize` are rejected.
    pub fn from_attr(values: &[i64]) -> std::result::Result<Self, String> {
        let shape = values
            .iter()
            .map(|&v| usize::try_from(v).map_err(|_| format!("negative extent {v} in {values:?}")))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Self::new)?;
        match shape.checked_element_count() {
            Some(_) => Ok(shape),
            None => Err(format!("element count of {values:?} overflows")),
        }
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn element_count(&self) -> usize {
        self.dims.iter().product()
    }

    /// Element count, or `None` if the product overflows `usize`.
    pub fn checked_element_count(&self) -> Option<usize> {
        self.dims.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
    }

    pub fn is_empty(&self) -> bool {
        self.element_count() == 0
    }

    /// Contiguous strides, in elements.
    pub fn strides(&self) -> Vec<usize> {
        let mut strides = Vec::with_capacity(self.dims.len());
        let mut acc = 1;
        // Iterate dims in reverse to accumulate products
        for dim in self.dims.iter().rev() {
            strides.push(acc);
            acc *= *dim;
        }
        strides.reverse();
        strides
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.dims)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims = self
            .dims
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join("x");
        if dims.is_empty() {
            write!(f, "scalar")
        } else {
            write!(f, "{dims}")
        }
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Self::new(dims)
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Self::new(dims.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dims: [usize; N]) -> Self {
        Self::new(dims.to_vec())
    }
}

impl PartialEq<[usize]> for Shape {
    fn eq(&self, other: &[usize]) -> bool {
        self.dims == other
    }
}

impl<const N: usize> PartialEq<[usize; N]> for Shape {
    fn eq(&self, other: &[usize; N]) -> bool {
        self.dims == other
    }
}
