//! HTTP failure classification into [`RemoteError`].

use emotesync_sync::RemoteError;

use crate::api::ApiErrorBody;

/// JSON error code: uploaded file exceeds the maximum size.
const CODE_FILE_TOO_LARGE: u64 = 50045;
/// JSON error code: the asset could not be resized below the maximum size.
const CODE_ASSET_RESIZE_FAILED: u64 = 50138;

/// Map an HTTP error status and its body to a [`RemoteError`].
pub fn classify(status: u16, body: &str) -> RemoteError {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .message
        .clone()
        .unwrap_or_else(|| body.trim().to_string());

    match (status, parsed.code) {
        (429, _) => RemoteError::RateLimited {
            retry_after_secs: parsed.retry_after.unwrap_or(0.0),
        },
        (404, _) => RemoteError::NotFound(message),
        (401 | 403, _) => RemoteError::PermissionDenied(message),
        (413, _) => RemoteError::PayloadTooLarge(message),
        (400, Some(CODE_FILE_TOO_LARGE | CODE_ASSET_RESIZE_FAILED)) => {
            RemoteError::PayloadTooLarge(message)
        }
        _ => RemoteError::Api { status, message },
    }
}

/// Convert a `ureq` failure, consuming the response body for status errors.
pub fn from_ureq(err: ureq::Error) -> RemoteError {
    match err {
        ureq::Error::Status(status, response) => {
            let body = response.into_string().unwrap_or_default();
            classify(status, &body)
        }
        ureq::Error::Transport(transport) => RemoteError::Transport(transport.to_string()),
    }
}
