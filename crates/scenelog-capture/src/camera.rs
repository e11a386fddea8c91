//! V4L2 camera frame source.

use std::pin::Pin;

use image::RgbImage;
use tracing::{info, warn};
use v4l::buffer::Type;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;
use v4l::FourCC;

use crate::error::CaptureError;
use crate::source::FrameSource;

const CAPTURE_WIDTH: u32 = 640;
const CAPTURE_HEIGHT: u32 = 480;
const BUFFER_COUNT: u32 = 4;

/// V4L2 camera negotiated to 640x480 YUYV.
///
/// The v4l `Stream` borrows its `Device`, so the device is pinned on the
/// heap and the stream's borrow is extended to `'static`. This is sound
/// because the device never moves and the stream is always dropped first
/// (see `Drop` and `close`).
pub struct Camera {
    device: Pin<Box<Device>>,
    stream: Option<Stream<'static>>,
    path: String,
    width: u32,
    height: u32,
}

impl Camera {
    /// Open the capture device at `device_path` and start streaming.
    pub fn open(device_path: &str) -> Result<Self, CaptureError> {
        let device = Box::pin(Device::with_path(device_path)?);

        let mut format = device.format()?;
        format.width = CAPTURE_WIDTH;
        format.height = CAPTURE_HEIGHT;
        format.fourcc = FourCC::new(b"YUYV");
        let format = device.set_format(&format)?;

        if format.fourcc != FourCC::new(b"YUYV") {
            return Err(CaptureError::UnsupportedPixelFormat(format!(
                "{}",
                format.fourcc
            )));
        }

        let mut camera = Self {
            device,
            stream: None,
            path: device_path.to_string(),
            width: format.width,
            height: format.height,
        };

        // SAFETY: the device is pinned on the heap and stored alongside the
        // stream; the stream is taken out of the Option before the device
        // drops, so the extended borrow never dangles.
        let stream = unsafe {
            let device_ref: &Device = &camera.device;
            let device_static: &'static Device = std::mem::transmute(device_ref);
            Stream::with_buffers(device_static, Type::VideoCapture, BUFFER_COUNT)?
        };
        camera.stream = Some(stream);

        info!(
            device = device_path,
            width = camera.width,
            height = camera.height,
            "opened capture device"
        );
        Ok(camera)
    }
}

impl FrameSource for Camera {
    fn read(&mut self) -> Result<RgbImage, CaptureError> {
        let stream = self.stream.as_mut().ok_or(CaptureError::Closed)?;

        let (buffer, _meta) = stream.next().map_err(|e| {
            warn!(device = %self.path, error = %e, "frame grab failed");
            CaptureError::FrameNotFound(self.path.clone())
        })?;

        let rgb = yuyv_to_rgb(buffer, self.width, self.height);
        RgbImage::from_raw(self.width, self.height, rgb)
            .ok_or_else(|| CaptureError::FrameNotFound(self.path.clone()))
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    fn close(&mut self) {
        self.stream.take();
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        // stream must drop before the pinned device
        self.stream.take();
    }
}

/// Convert a packed YUYV 4:2:2 buffer to RGB24.
fn yuyv_to_rgb(yuyv: &[u8], width: u32, height: u32) -> Vec<u8> {
    let mut rgb = Vec::with_capacity((width * height * 3) as usize);

    for chunk in yuyv.chunks(4) {
        if chunk.len() < 4 {
            break;
        }

        let y0 = chunk[0] as f32;
        let u = chunk[1] as f32 - 128.0;
        let y1 = chunk[2] as f32;
        let v = chunk[3] as f32 - 128.0;

        for y in [y0, y1] {
            let r = (y + 1.402 * v).clamp(0.0, 255.0) as u8;
            let g = (y - 0.344 * u - 0.714 * v).clamp(0.0, 255.0) as u8;
            let b = (y + 1.772 * u).clamp(0.0, 255.0) as u8;
            rgb.extend_from_slice(&[r, g, b]);
        }
    }

    rgb
}
