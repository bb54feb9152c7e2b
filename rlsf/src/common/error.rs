#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Out of memory: failed to allocate {bytes} bytes")]
    OutOfMemory { bytes: usize },
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Invalid color format: {0}")]
    InvalidColorFormat(String),
    #[error("GPU error: {0}")]
    Gpu(String),
    #[error("GPU context not available")]
    NoGpuContext,
}

impl From<bytemuck::PodCastError> for Error {
    fn from(e: bytemuck::PodCastError) -> Self {
        Error::InvalidColorFormat(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Allocates a zero-filled vector, reporting allocation failure as
/// [`Error::OutOfMemory`] instead of aborting.
pub(crate) fn try_alloc_zeroed<T: Copy + Default>(len: usize) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len).map_err(|_| Error::OutOfMemory {
        bytes: len.saturating_mul(std::mem::size_of::<T>()),
    })?;
    v.resize(len, T::default());
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_zeroed_returns_requested_len() {
        let v: Vec<u32> = try_alloc_zeroed(17).unwrap();
        assert_eq!(v.len(), 17);
        assert!(v.iter().all(|&x| x == 0));
    }

    #[test]
    fn alloc_zeroed_reports_out_of_memory() {
        let result = try_alloc_zeroed::<u64>(usize::MAX / 2);
        match result {
            Err(Error::OutOfMemory { bytes }) => assert!(bytes > 0),
            other => panic!("expected OutOfMemory, got {:?}", other.map(|v| v.len())),
        }
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            Error::InvalidArgument("radius must be positive".into()).to_string(),
            "Invalid argument: radius must be positive"
        );
        assert_eq!(Error::NoGpuContext.to_string(), "GPU context not available");
    }
}
