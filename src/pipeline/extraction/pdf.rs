use super::ExtractionError;

/// PDF text extractor using the pdf-extract crate.
/// Handles digital PDFs with embedded text layers; scanned PDFs yield nothing.
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    /// Per-page text, in page order.
    pub fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        // pdf-extract panics on some malformed documents
        std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(pdf_bytes))
            .map_err(|_| ExtractionError::PdfParsing("parser panicked".into()))?
            .map_err(|e| ExtractionError::PdfParsing(e.to_string()))
    }

    /// Pages with text rendered as `[Page N]` blocks separated by blank lines.
    ///
    /// Returns an empty string when the document cannot be parsed or holds no
    /// text layer; callers decide whether that is fatal.
    pub fn extract_text(&self, pdf_bytes: &[u8]) -> String {
        let pages = match self.extract_pages(pdf_bytes) {
            Ok(pages) => pages,
            Err(e) => {
                tracing::warn!(error = %e, "PDF extraction failed");
                return String::new();
            }
        };

        let blocks: Vec<String> = pages
            .iter()
            .enumerate()
            .filter_map(|(i, text)| {
                let text = text.trim();
                (!text.is_empty()).then(|| format!("[Page {}]\n{text}", i + 1))
            })
            .collect();

        tracing::info!(pages = pages.len(), with_text = blocks.len(), "PDF extracted");
        blocks.join("\n\n")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Generate a single-page PDF with text using lopdf (what pdf-extract uses internally).
    pub(crate) fn make_test_pdf(text: &str) -> Vec<u8> {
        use lopdf::dictionary;
        use lopdf::{Document, Object, Stream};

        let mut doc = Document::with_version("1.4");

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let content = format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET");
        let content_stream = Stream::new(dictionary! {}, content.into_bytes());
        let content_id = doc.add_object(content_stream);

        let resources = dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        };

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources,
        });

        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        });

        if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(page_id) {
            dict.set("Parent", pages_id);
        }

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });

        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn extract_text_labels_pages() {
        let pdf_bytes = make_test_pdf("Creatinine 1.9 mg/dL");
        let text = PdfTextExtractor.extract_text(&pdf_bytes);
        assert!(text.starts_with("[Page 1]\n"), "got: {text}");
        assert!(text.contains("Creatinine"), "got: {text}");
    }

    #[test]
    fn invalid_pdf_yields_empty_text() {
        assert_eq!(PdfTextExtractor.extract_text(b"not a pdf"), "");
    }

    #[test]
    fn invalid_pdf_pages_is_error() {
        assert!(PdfTextExtractor.extract_pages(b"%PDF-broken").is_err());
    }
}
