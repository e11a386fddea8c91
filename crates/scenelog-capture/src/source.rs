//! The frame source capability.

use image::RgbImage;

use crate::error::CaptureError;

/// A device that yields raw RGB frames.
///
/// The handle is owned by the ingest path for the process lifetime;
/// implementations release the underlying device on drop so every exit
/// path cleans up.
pub trait FrameSource: Send {
    /// Grab a single frame. May block briefly on hardware I/O.
    fn read(&mut self) -> Result<RgbImage, CaptureError>;

    /// Whether the underlying device is still open.
    fn is_open(&self) -> bool;

    /// Release the underlying device early. Reads after close fail with
    /// [`CaptureError::Closed`].
    fn close(&mut self);
}
