/// Suffix appended when a document is cut to fit the model budget.
pub const TRUNCATION_MARKER: &str = "\n[...document truncated for processing]";

/// Trim every line and drop blank ones. No content interpretation.
pub fn clean_text(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Decode an uploaded text file, replacing invalid UTF-8 sequences.
pub fn decode_text_upload(bytes: &[u8]) -> String {
    clean_text(&String::from_utf8_lossy(bytes))
}

/// Cut `text` to at most `max_chars` characters, marking the cut.
pub fn truncate_for_model(text: String, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        return text;
    }
    tracing::warn!(
        from = char_count,
        to = max_chars,
        "Report text truncated for model safety"
    );
    let mut truncated: String = text.chars().take(max_chars).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}

/// Upload looks like a PDF by content type or filename.
pub fn is_pdf_upload(content_type: Option<&str>, filename: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("pdf"))
        || filename.is_some_and(|name| name.ends_with(".pdf"))
}
