pub mod dicom;
pub mod scan;
pub mod pdf;
pub mod text;

pub use pdf::PdfTextExtractor;
pub use scan::{preprocess_scan, ScanImage, SCAN_MAX_DIM};
pub use text::{clean_text, decode_text_upload, is_pdf_upload, truncate_for_model, TRUNCATION_MARKER};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),
}
