//! Frame capture from a local camera device
//!
//! The device handle is opened and released inside each call; nothing is
//! held across iterations.

use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use nokhwa::Camera;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};

use crate::{Error, Result};

/// JPEG quality for encoded frames
const JPEG_QUALITY: u8 = 80;

/// Capture one frame from the camera at `index` and return it as JPEG bytes
///
/// # Errors
///
/// Returns error if the device cannot be opened, the frame read fails, or
/// JPEG encoding fails
pub fn capture_jpeg(index: u32) -> Result<Vec<u8>> {
    let requested =
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution);

    let mut camera = Camera::new(CameraIndex::Index(index), requested)
        .map_err(|e| Error::Camera(format!("cannot open camera {index}: {e}")))?;

    camera
        .open_stream()
        .map_err(|e| Error::Camera(format!("cannot start camera {index} stream: {e}")))?;

    let frame = camera
        .frame()
        .map_err(|e| Error::Camera(format!("frame read failed: {e}")));

    // Release the device before touching the frame result
    if let Err(e) = camera.stop_stream() {
        tracing::debug!(error = %e, "camera stream stop failed");
    }

    let rgb = frame?
        .decode_image::<RgbFormat>()
        .map_err(|e| Error::Camera(format!("frame decode failed: {e}")))?;

    tracing::debug!(
        width = rgb.width(),
        height = rgb.height(),
        "captured camera frame"
    );

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY)
        .encode(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            image::ColorType::Rgb8,
        )
        .map_err(|e| Error::Camera(format!("JPEG encode failed: {e}")))?;

    Ok(jpeg)
}

/// Capture one frame and return it base64-encoded for inline image use
///
/// # Errors
///
/// Returns error if capture or encoding fails
pub fn capture_frame(index: u32) -> Result<String> {
    let jpeg = capture_jpeg(index)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(jpeg))
}
