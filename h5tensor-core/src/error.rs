use std::fmt::Display;

use crate::Shape;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The bulk read of a dataset, or one of its attributes, could not complete.
    #[error("failed to read `{dataset}`: {reason}")]
    Read {
        dataset: String,
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The on-disk element type has no tensor element type.
    #[error("dataset `{dataset}` has element type {dtype} which has no tensor representation")]
    UnsupportedDType { dataset: String, dtype: String },

    /// A child dataset or attribute required for a sparse tensor is absent.
    #[error("group `{group}` is missing `{field}`")]
    MissingField { group: String, field: &'static str },

    /// The parts of a sparse tensor do not describe the same tensor.
    #[error("inconsistent sparse tensor in `{group}`: {reason}")]
    Inconsistent { group: String, reason: String },

    #[error("cannot view a tensor of shape {src:?} as {dst:?}")]
    ShapeMismatch { src: Shape, dst: Shape },

    #[error("tensor has dtype {actual}, requested {requested}")]
    DTypeMismatch {
        actual: &'static str,
        requested: &'static str,
    },

    #[error(transparent)]
    Cuda(Box<dyn std::error::Error + Send + Sync>),

    #[error("{inner}\n{backtrace}")]
    WithBacktrace {
        inner: Box<Self>,
        backtrace: Box<std::backtrace::Backtrace>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn read(dataset: impl Into<String>, reason: impl Display) -> Self {
        Self::Read {
            dataset: dataset.into(),
            reason: reason.to_string(),
            source: None,
        }
        .bt()
    }

    /// A read failure raised by the storage library. `err` stays reachable
    /// through [`std::error::Error::source`].
    pub fn backend(
        dataset: impl Into<String>,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Read {
            dataset: dataset.into(),
            reason: err.to_string(),
            source: Some(Box::new(err)),
        }
        .bt()
    }

    pub fn bt(self) -> Self {
        let backtrace = std::backtrace::Backtrace::capture();
        match backtrace.status() {
            std::backtrace::BacktraceStatus::Disabled
            | std::backtrace::BacktraceStatus::Unsupported => self,
            _ => Self::WithBacktrace {
                inner: Box::new(self),
                backtrace: Box::new(backtrace),
            },
        }
    }

    /// The error with any backtrace wrapper removed.
    pub fn inner(&self) -> &Self {
        match self {
            Self::WithBacktrace { inner, .. } => inner.inner(),
            other => other,
        }
    }

    pub fn is_read_failure(&self) -> bool {
        matches!(self.inner(), Self::Read { .. })
    }

    pub fn is_unsupported_dtype(&self) -> bool {
        matches!(self.inner(), Self::UnsupportedDType { .. })
    }

    pub fn is_missing_field(&self) -> bool {
        matches!(self.inner(), Self::MissingField { .. })
    }

    pub fn is_inconsistent(&self) -> bool {
        matches!(self.inner(), Self::Inconsistent { .. })
    }
}
