//! Media type gate deciding which bodies are JSON-shaped.

use mime::Mime;
use tracing::trace;

/// Returns `true` when the declared content type describes a JSON body.
///
/// A body is JSON-shaped when its media type is `application/json` or uses the
/// `+json` structured syntax suffix (e.g. `application/problem+json`).
/// Parameters such as `charset` are ignored, and comparison is case-insensitive.
///
/// Anything that does not parse as a media type is not JSON.
///
/// # Example
///
/// ```rust
/// use bodyfilter_core::is_json;
///
/// assert!(is_json("application/json"));
/// assert!(is_json("application/vnd.api+json; charset=utf-8"));
/// assert!(!is_json("application/xml"));
/// ```
#[must_use]
pub fn is_json(media_type: &str) -> bool {
    let Ok(mime) = media_type.trim().parse::<Mime>() else {
        trace!(%media_type, "unparsable media type");
        return false;
    };

    (mime.type_() == mime::APPLICATION && mime.subtype() == mime::JSON)
        || mime.suffix() == Some(mime::JSON)
}
