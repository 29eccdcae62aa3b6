use image::{ImageBuffer, ImageFormat, Rgba};
use thiserror::Error;

use crate::domain::entities::frame::ImageFrame;

#[derive(Error, Debug)]
pub enum ImagingError {
    #[error("failed to decode PNG: {0}")]
    Decode(String),
    #[error("failed to encode PNG: {0}")]
    Encode(String),
    #[error("pixel buffer inconsistent with dimensions")]
    MalformedFrame,
}

/// Decode PNG bytes into a raw RGBA frame.
///
/// # Errors
///
/// Returns `ImagingError::Decode` when the bytes are not a valid PNG.
pub fn decode_png(bytes: &[u8]) -> Result<ImageFrame, ImagingError> {
    let img = image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .map_err(|e| ImagingError::Decode(e.to_string()))?;
    let rgba = img.to_rgba8();
    Ok(ImageFrame::new(
        rgba.width(),
        rgba.height(),
        rgba.into_raw(),
    ))
}

/// Encode a raw RGBA frame as PNG bytes.
///
/// # Errors
///
/// Returns `ImagingError::MalformedFrame` when the buffer does not match
/// the declared dimensions, `ImagingError::Encode` on codec failure.
pub fn encode_png(frame: &ImageFrame) -> Result<Vec<u8>, ImagingError> {
    let buffer =
        ImageBuffer::<Rgba<u8>, _>::from_raw(frame.width, frame.height, frame.data.clone())
            .ok_or(ImagingError::MalformedFrame)?;
    let mut bytes = Vec::new();
    buffer
        .write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| ImagingError::Encode(e.to_string()))?;
    Ok(bytes)
}
