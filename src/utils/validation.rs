use crate::api::error::UploadError;

/// Number of leading bytes inspected when sniffing content
pub const SNIFF_LEN: usize = 1024;

/// Admits a part only when its declared media type is `text/plain`.
///
/// Parameters such as `charset` are ignored. A part without a declared type
/// counts as `text/plain`, which is what multipart parsers assume for it.
pub fn check_declared_type(content_type: Option<&str>) -> Result<(), UploadError> {
    let Some(raw) = content_type else {
        return Ok(());
    };

    let parsed: mime::Mime = raw.trim().parse().map_err(|_| UploadError::NotPlainText)?;
    if parsed
        .essence_str()
        .eq_ignore_ascii_case(mime::TEXT_PLAIN.essence_str())
    {
        Ok(())
    } else {
        tracing::debug!("Rejecting upload with declared type '{}'", raw);
        Err(UploadError::NotPlainText)
    }
}

/// Rejects content whose leading bytes look binary.
///
/// Text-family signatures (html, xml, shell scripts) are still text and pass.
pub fn check_text_content(head: &[u8]) -> Result<(), UploadError> {
    let head = &head[..head.len().min(SNIFF_LEN)];

    if let Some(kind) = infer::get(head).filter(|k| k.matcher_type() != infer::MatcherType::Text) {
        return Err(UploadError::BinaryContent(kind.mime_type().to_string()));
    }

    if head.contains(&0) {
        return Err(UploadError::BinaryContent("NUL bytes".to_string()));
    }

    Ok(())
}
