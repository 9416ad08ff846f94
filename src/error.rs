use thiserror::Error;

/// Errors raised while decoding input or validating configuration.
///
/// Geometric operations never fail; degenerate input is absorbed into the
/// degenerate hull states instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KernelError {
    #[error("tolerance must be finite and positive, got {0}")]
    InvalidTolerance(f64),

    #[error("refinement needs at least one iteration")]
    InvalidIterations,

    #[error("buffer of length {len} is not a multiple of {stride}")]
    MalformedBuffer { len: usize, stride: usize },
}

pub type Result<T> = std::result::Result<T, KernelError>;

/// Checks that a flat buffer holds whole records of `stride` values.
pub(crate) fn check_stride(buffer: &[f64], stride: usize) -> Result<()> {
    if buffer.len() % stride != 0 {
        return Err(KernelError::MalformedBuffer {
            len: buffer.len(),
            stride,
        });
    }
    Ok(())
}
