pub fn detect_upload_mime(bytes: &[u8]) -> &'static str {
    match bytes {
        // "%PDF"
        [0x25, 0x50, 0x44, 0x46, ..] => "application/pdf",
        _ => {
            tracing::warn!(
                "Unrecognized file format (first 4 bytes: {:02X?}), falling back to application/octet-stream",
                &bytes[..bytes.len().min(4)]
            );
            "application/octet-stream"
        }
    }
}
