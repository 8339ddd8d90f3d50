//! Errors

use thiserror::Error;

/// Failures of a fill
///
/// An empty path or a path too thin to cover any pixel is not an error.
/// Neither is a band shrinking to fit the table limit.
#[derive(Debug,Error)]
pub enum ScanError {
    /// Edge table allocation failed
    #[error("unable to allocate {bytes} bytes for the edge table")]
    Alloc { bytes: usize },
    /// Edge table size does not fit in the address space
    #[error("edge table size overflows")]
    SizeOverflow,
    /// Band cannot shrink any further and still exceeds the table limit
    #[error("band of {height} rows cannot be shrunk below the table limit")]
    OutOfMemory { height: i32 },
    /// A row received more records than were planned for it
    #[error("row {row} exceeds its planned capacity of {capacity} records")]
    Inconsistent { row: i32, capacity: usize },
    /// Failure reported by the receiving device
    #[error("device: {0}")]
    Device(String),
    /// Reading or writing an image file
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Decoding an image file
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Result of a fill or a device call
pub type Result<T> = std::result::Result<T, ScanError>;
