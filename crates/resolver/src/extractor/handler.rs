use rustc_hash::FxHashMap;
use serde_json::Value;
use url::Url;

use super::error::ExtractorError;
use super::request::RequestDescriptor;
use super::transport::Response;
use crate::media::MediaInfo;

/// Control signal returned by every parse step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// The media info is complete, stop.
    Ok,
    /// Another request round is needed with the same handler.
    Restart,
    /// Parsing failed without further detail.
    Error,
}

/// Body handed to [`Handler::parse_response`].
#[derive(Debug, Clone)]
pub enum ResponseBody {
    /// Decoded by the resolver, for handlers reading JSON APIs.
    Json(Value),
    /// Untouched response, for handlers that parse the body themselves.
    Raw(Response),
}

impl ResponseBody {
    pub fn into_json(self) -> Result<Value, ExtractorError> {
        match self {
            ResponseBody::Json(value) => Ok(value),
            ResponseBody::Raw(response) => Ok(serde_json::from_slice(&response.body)?),
        }
    }

    pub fn into_raw(self) -> Result<Response, ExtractorError> {
        match self {
            ResponseBody::Raw(response) => Ok(response),
            ResponseBody::Json(_) => Err(ExtractorError::Other(
                "expected a raw response body".to_string(),
            )),
        }
    }
}

/// Data extracted while matching a URL against a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchContext {
    pub url: Url,
    pub video_id: String,
    pub params: FxHashMap<String, String>,
}

impl MatchContext {
    pub fn new(url: Url, video_id: impl Into<String>) -> Self {
        Self {
            url,
            video_id: video_id.into(),
            params: FxHashMap::default(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

/// Site specific request/parse protocol driven by the resolver.
///
/// A handler keeps whatever it learned between rounds on itself. Which request
/// comes next must follow from that stored state alone, so every handler can
/// be exercised by calling these methods directly.
pub trait Handler: Send {
    fn name(&self) -> &'static str;

    /// When `true`, the next response is passed as [`ResponseBody::Raw`]
    /// instead of being decoded as JSON first. Queried once per round.
    fn handles_raw_body(&self) -> bool {
        false
    }

    fn create_request(&mut self, info: &MediaInfo) -> Result<RequestDescriptor, ExtractorError>;

    fn parse_response(
        &mut self,
        body: ResponseBody,
        info: &mut MediaInfo,
    ) -> Result<Flow, ExtractorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_body_decodes_json_on_demand() {
        let body = ResponseBody::Raw(Response::new("https://a", r#"{"ok":true}"#));
        let value = body.into_json().unwrap();
        assert_eq!(value["ok"], Value::Bool(true));
    }

    #[test]
    fn test_json_body_is_not_raw() {
        let body = ResponseBody::Json(Value::Null);
        assert!(body.into_raw().is_err());
    }

    #[test]
    fn test_match_context_params() {
        let url = Url::parse("https://example.com/w/abc").unwrap();
        let context = MatchContext::new(url, "abc").with_param("host", "example.com");
        assert_eq!(context.video_id, "abc");
        assert_eq!(context.param("host"), Some("example.com"));
        assert_eq!(context.param("missing"), None);
    }
}
