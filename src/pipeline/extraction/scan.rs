use std::io::Cursor;

use base64::Engine;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageOutputFormat};

use super::dicom::{decode_dicom, is_dicom_upload};
use super::ExtractionError;

/// Bounding box the scan is shrunk into before inference.
pub const SCAN_MAX_DIM: u32 = 512;

/// A decoded scan, normalized to RGB within the model's bounding box.
#[derive(Debug, Clone)]
pub struct ScanImage {
    png: Vec<u8>,
    width: u32,
    height: u32,
}

impl ScanImage {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// PNG payload, base64-encoded for the model runtime.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.png)
    }
}

/// Decode, convert to RGB, fit within `SCAN_MAX_DIM` and re-encode as PNG.
///
/// Files named `*.dcm` go through the DICOM decoder; everything else is
/// sniffed by the image crate.
pub fn preprocess_scan(bytes: &[u8], file_name: Option<&str>) -> Result<ScanImage, ExtractionError> {
    let img = if is_dicom_upload(file_name) {
        decode_dicom(bytes)?
    } else {
        image::load_from_memory(bytes)
            .map_err(|e| ExtractionError::ImageProcessing(format!("decode failed: {e}")))?
    };

    let (w, h) = img.dimensions();
    let (new_w, new_h) = fit_within(w, h, SCAN_MAX_DIM);
    let rgb = if (new_w, new_h) == (w, h) {
        img.to_rgb8()
    } else {
        image::imageops::resize(&img.to_rgb8(), new_w, new_h, FilterType::Lanczos3)
    };

    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(rgb)
        .write_to(&mut cursor, ImageOutputFormat::Png)
        .map_err(|e| ExtractionError::ImageProcessing(format!("PNG encoding failed: {e}")))?;

    tracing::info!(width = new_w, height = new_h, "Scan image preprocessed");
    Ok(ScanImage {
        png: cursor.into_inner(),
        width: new_w,
        height: new_h,
    })
}

/// Aspect-preserving fit inside a `max`×`max` box. Never upscales.
fn fit_within(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width <= max && height <= max {
        return (width, height);
    }
    let scale = max as f32 / width.max(height) as f32;
    let new_w = ((width as f32 * scale).round() as u32).clamp(1, max);
    let new_h = ((height as f32 * scale).round() as u32).clamp(1, max);
    (new_w, new_h)
}
