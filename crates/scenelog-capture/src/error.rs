//! Capture error types.

use thiserror::Error;

/// Errors that can occur while acquiring or encoding a frame.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The device produced no usable frame.
    #[error("could not grab a frame from device {0}")]
    FrameNotFound(String),

    #[error("device error: {0}")]
    Device(#[from] std::io::Error),

    #[error("unsupported pixel format: {0}")]
    UnsupportedPixelFormat(String),

    #[error("frame encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("capture device is closed")]
    Closed,
}
