use rustc_hash::FxHashMap;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub message: String,
}

/// Result of the `get` method.
#[derive(Debug, Deserialize)]
pub struct GetResult {
    pub streaming_url: Option<String>,
}

/// Result of the `resolve` method, keyed by the requested claim URL.
pub type ResolveResult = FxHashMap<String, Claim>;

#[derive(Debug, Deserialize)]
pub struct Claim {
    pub claim_id: Option<String>,
    pub value: Option<ClaimValue>,
}

#[derive(Debug, Deserialize)]
pub struct ClaimValue {
    pub title: Option<String>,
    pub description: Option<String>,
    pub video: Option<MediaMeta>,
    pub audio: Option<MediaMeta>,
}

#[derive(Debug, Deserialize)]
pub struct MediaMeta {
    pub duration: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}
