use std::collections::TryReserveError;
use std::error::Error;
use std::num::NonZeroU32;
use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PlatformError {
    /// A resize was requested with a zero width or height.
    #[error("Backbuffer size {width}x{height} is empty.")]
    InvalidSize { width: u32, height: u32 },

    /// The pixel memory for this size does not fit in the address space.
    #[error("Backbuffer size {width}x{height} out of range.")]
    SizeOutOfRange {
        width: NonZeroU32,
        height: NonZeroU32,
    },

    #[error("Failed to allocate {bytes} bytes of pixel memory.")]
    OutOfMemory {
        bytes: usize,
        #[source]
        source: TryReserveError,
    },

    /// The backbuffer has no pixel memory or surface yet.
    #[error("The backbuffer is not allocated, resize it first.")]
    NotAllocated,

    #[error(
        "Presentation surface is {actual_width}x{actual_height}, expected {width}x{height}."
    )]
    SurfaceMismatch {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("Invalid value {value:?} for {key}.")]
    InvalidConfig { key: &'static str, value: String },

    #[error("Platform error: {}", .0.as_deref().unwrap_or("unknown"))]
    Platform(Option<String>, Option<Box<dyn Error>>),
}

pub(crate) fn unwrap<T, E: std::error::Error + 'static>(
    res: Result<T, E>,
    str: &str,
) -> Result<T, PlatformError> {
    match res {
        Ok(t) => Ok(t),
        Err(e) => Err(PlatformError::Platform(
            Some(str.into()),
            Some(Box::new(e)),
        )),
    }
}
