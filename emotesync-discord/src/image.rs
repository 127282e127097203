//! Image payload encoding for emoji uploads.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use emotesync_sync::RemoteError;

/// MIME type from the file's magic bytes.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else {
        None
    }
}

/// `data:` URI accepted by the create-emoji endpoint.
pub fn data_uri(name: &str, bytes: &[u8]) -> Result<String, RemoteError> {
    let mime = sniff_mime(bytes).ok_or_else(|| {
        RemoteError::UnsupportedFormat(format!("{name}: not a PNG, JPEG, or GIF image"))
    })?;
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}
