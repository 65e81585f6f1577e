//! Multipart form collection and source resolution for analysis uploads.

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::api::error::ApiError;
use crate::config::MAX_UPLOAD_BYTES;
use crate::pipeline::extraction::{clean_text, decode_text_upload, is_pdf_upload, PdfTextExtractor};

/// A file part that carried content.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn is_pdf(&self) -> bool {
        is_pdf_upload(self.content_type.as_deref(), self.file_name.as_deref())
    }
}

/// All parts of one multipart request, keyed by field name.
#[derive(Debug, Default)]
pub struct MultipartForm {
    texts: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    /// Drain the request. File parts above `MAX_UPLOAD_BYTES` are rejected
    /// with 413; a file part with no name and no bytes counts as absent.
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();
            let file_name = field.file_name().map(|s| s.to_string());

            match file_name {
                Some(file_name) => {
                    let content_type = field.content_type().map(|s| s.to_string());
                    let bytes = field.bytes().await?;
                    if bytes.len() > MAX_UPLOAD_BYTES {
                        return Err(ApiError::PayloadTooLarge(format!(
                            "{name} file exceeds the 20 MB limit."
                        )));
                    }
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    form.files.insert(
                        name,
                        UploadedFile {
                            file_name: Some(file_name).filter(|f| !f.is_empty()),
                            content_type,
                            bytes: bytes.to_vec(),
                        },
                    );
                }
                None => {
                    let value = field.text().await?;
                    form.texts.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    /// Text field value; empty string when absent.
    pub fn text(&self, name: &str) -> &str {
        self.texts.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}

/// Text for one clinical source. An uploaded file wins over the text field.
pub fn resolve_source(text: &str, file: Option<UploadedFile>, label: &str) -> String {
    match file {
        Some(file) if file.is_pdf() => {
            let extracted = clean_text(&PdfTextExtractor.extract_text(&file.bytes));
            if extracted.is_empty() {
                tracing::warn!(source = label, "No text extracted from uploaded PDF");
            }
            extracted
        }
        Some(file) => clean_text(&decode_text_upload(&file.bytes)),
        None => clean_text(text),
    }
}
