use crate::domain::FileReference;

pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Map a lowercased file extension to its MIME type.
pub fn content_type_for_extension(extension: &str) -> Option<&'static str> {
    let content_type = match extension {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        _ => return None,
    };
    Some(content_type)
}

/// Resolve the content type of a file reference.
///
/// A declared MIME type wins, then a declared kind, then the extension of the
/// URI (everything after the last `.`), then the generic binary type.
pub fn resolve_content_type(file: &FileReference) -> String {
    if let Some(mime_type) = file.mime_type() {
        return mime_type.to_string();
    }
    if let Some(kind) = file.kind() {
        return kind.to_string();
    }

    let extension = file
        .uri()
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_lowercase();

    content_type_for_extension(&extension)
        .unwrap_or(FALLBACK_CONTENT_TYPE)
        .to_string()
}
