//! Frame acquisition for the ingest pipeline.
//!
//! Provides the [`FrameSource`] capability consumed by the ingest job, a
//! V4L2 [`Camera`] implementation, and PNG encoding of captured frames.

pub mod camera;
pub mod error;
pub mod png;
pub mod source;

pub use camera::Camera;
pub use error::CaptureError;
pub use png::encode_png;
pub use source::FrameSource;
