//! Compact share-link payloads: an `{id, title}` pair encoded for a URL
//! query parameter. Resolving a decoded payload against a result set is
//! the presentation layer's job.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};

/// The item reference carried by a share link.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShareTarget {
    pub id: String,
    pub title: String,
}

/// Encode a share target as a URL-safe query parameter value.
pub fn encode_share_param(target: &ShareTarget) -> String {
    let json = serde_json::to_vec(target).expect("share target serializes");
    URL_SAFE_NO_PAD.encode(json)
}

/// Decode a share parameter. Returns None for anything malformed.
pub fn decode_share_param(param: &str) -> Option<ShareTarget> {
    let bytes = URL_SAFE_NO_PAD.decode(param).ok()?;
    serde_json::from_slice(&bytes).ok()
}
