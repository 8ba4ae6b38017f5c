use bytes::Bytes;
use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::str::FromStr;
use tracing::debug;

/// A request a handler asks the transport to perform.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: String,
    pub body: Option<Bytes>,
    pub content_type: Option<String>,
    /// Handler specific headers, sent in addition to the transport defaults
    pub headers: HeaderMap,
}

impl RequestDescriptor {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            content_type: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn head(url: impl Into<String>) -> Self {
        Self::new(Method::HEAD, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn body(mut self, content_type: impl Into<String>, body: impl Into<Bytes>) -> Self {
        self.content_type = Some(content_type.into());
        self.body = Some(body.into());
        self
    }

    /// Serializes `value` as the request body with the given content type.
    pub fn json_body<T: serde::Serialize>(
        self,
        content_type: impl Into<String>,
        value: &T,
    ) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_vec(value)?;
        Ok(self.body(content_type, body))
    }

    pub fn header<K: AsRef<str>, V: AsRef<str>>(mut self, key: K, value: V) -> Self {
        match (
            HeaderName::from_str(key.as_ref()),
            HeaderValue::from_str(value.as_ref()),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => {
                debug!(header = key.as_ref(), "Invalid header; skipping");
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_body_sets_content_type() {
        let request = RequestDescriptor::post("https://example.com/api")
            .json_body("application/json-rpc", &serde_json::json!({"method": "get"}))
            .unwrap();

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.content_type.as_deref(), Some("application/json-rpc"));
        assert_eq!(request.body.as_deref(), Some(&br#"{"method":"get"}"#[..]));
    }

    #[test]
    fn test_get_has_no_body() {
        let request = RequestDescriptor::get("https://example.com").header("Referer", "https://a");
        assert!(request.body.is_none());
        assert!(request.content_type.is_none());
        assert_eq!(request.headers.get("referer").unwrap(), "https://a");
    }
}
