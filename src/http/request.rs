use std::collections::HashMap;

use reqwest::header::{HeaderMap as Headers, HeaderName, HeaderValue};
use serde::Serialize;
use url::Url;

use crate::http::types::Method;
use crate::{MangoError, Result};

/// Header carrying the Pivotal Tracker API token.
pub const TRACKER_TOKEN_HEADER: &str = "X-TrackerToken";

pub struct Request {
    pub method: Method,
    pub url: Url,
    pub headers: Headers,
    pub body: Option<String>,
    pub query_params: HashMap<String, String>,
}

impl Request {
    pub fn new(method: Method, url: &str) -> Result<Self> {
        Ok(Self {
            method,
            url: Url::parse(url)?,
            headers: Headers::new(),
            body: None,
            query_params: HashMap::new(),
        })
    }

    fn insert_header(&mut self, key: &str, value: &str) -> Result<()> {
        let header_name: HeaderName = key
            .parse()
            .map_err(|_| MangoError::InvalidHeader(key.to_string()))?;
        // The value may be a secret, so only the header name goes in the error.
        let header_value =
            HeaderValue::from_str(value).map_err(|_| MangoError::InvalidHeader(key.to_string()))?;
        self.headers.insert(header_name, header_value);
        Ok(())
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Result<Self> {
        self.insert_header(key, value)?;
        Ok(self)
    }

    pub fn with_tracker_token(self, token: &str) -> Result<Self> {
        self.with_header(TRACKER_TOKEN_HEADER, token)
    }

    pub fn with_json<T: Serialize>(mut self, data: &T) -> Result<Self> {
        let json = serde_json::to_string(data)?;
        self.insert_header("Content-Type", "application/json")?;
        self.body = Some(json);
        Ok(self)
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query_params.insert(key.to_string(), value.to_string());
        self
    }

    /// Full URL including query parameters, as it will be sent.
    pub fn full_url(&self) -> Result<Url> {
        if self.query_params.is_empty() {
            return Ok(self.url.clone());
        }
        Ok(Url::parse_with_params(
            self.url.as_str(),
            &self.query_params,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_token_header() {
        let request = Request::new(Method::Get, "https://example.com/projects/1")
            .unwrap()
            .with_tracker_token("secret")
            .unwrap();

        assert_eq!(
            request.headers.get(TRACKER_TOKEN_HEADER).unwrap(),
            "secret"
        );
    }

    #[test]
    fn test_invalid_header_value_does_not_leak_value() {
        let err = Request::new(Method::Get, "https://example.com")
            .unwrap()
            .with_tracker_token("bad\ntoken")
            .err()
            .unwrap();

        assert!(matches!(err, MangoError::InvalidHeader(_)));
        assert!(!err.to_string().contains("bad"));
    }

    #[test]
    fn test_with_json_sets_body_and_content_type() {
        let request = Request::new(Method::Put, "https://example.com/stories/7")
            .unwrap()
            .with_json(&serde_json::json!({ "current_state": "started" }))
            .unwrap();

        assert_eq!(
            request.body.as_deref(),
            Some(r#"{"current_state":"started"}"#)
        );
        assert_eq!(
            request.headers.get("content-type").unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_full_url_without_query() {
        let request = Request::new(Method::Get, "https://example.com/stories").unwrap();
        assert_eq!(
            request.full_url().unwrap().as_str(),
            "https://example.com/stories"
        );
    }

    #[test]
    fn test_full_url_with_query() {
        let request = Request::new(Method::Get, "https://example.com/stories")
            .unwrap()
            .with_query("with_state", "started");
        assert_eq!(
            request.full_url().unwrap().as_str(),
            "https://example.com/stories?with_state=started"
        );
    }
}
