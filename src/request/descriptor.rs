//! Outbound request description
//!
//! A [`RequestDescriptor`] carries everything needed for a single call:
//! target, method, headers, query, JSON body and the optional
//! instrumentation hooks.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Request, Url};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::RequestError;

/// Called with the elapsed time in milliseconds after a successful request
pub type SuccessHook = Box<dyn Fn(u64) + Send + Sync>;

/// Called with the error after a failed request
pub type ErrorHook = Box<dyn Fn(&RequestError) + Send + Sync>;

/// Methods the request wrapper knows how to send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    /// Headers and query string
    Get,
    /// Headers and JSON body
    Post,
    /// Headers and JSON body
    Put,
}

impl RequestMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
        }
    }

    fn to_reqwest(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
        }
    }
}

impl FromStr for RequestMethod {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Self::Get),
            "post" => Ok(Self::Post),
            "put" => Ok(Self::Put),
            _ => Err(RequestError::UnsupportedMethod(s.to_string())),
        }
    }
}

/// One outbound HTTP request
pub struct RequestDescriptor {
    pub url: String,
    /// Case-insensitive method name, `get` by default
    pub method: String,
    pub headers: BTreeMap<String, String>,
    pub query: BTreeMap<String, String>,
    pub body: Map<String, Value>,
    pub(crate) on_success: Option<SuccessHook>,
    pub(crate) on_error: Option<ErrorHook>,
}

impl RequestDescriptor {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: "get".to_string(),
            headers: BTreeMap::new(),
            query: BTreeMap::new(),
            body: Map::new(),
            on_success: None,
            on_error: None,
        }
    }

    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Set one field of the JSON body
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn body(mut self, body: Map<String, Value>) -> Self {
        self.body = body;
        self
    }

    #[must_use]
    pub fn on_success(mut self, hook: impl Fn(u64) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn on_error(mut self, hook: impl Fn(&RequestError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(hook));
        self
    }

    /// URL with the query map appended
    fn url_with_query(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let sep = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{sep}{query}", self.url)
    }

    fn has_header(&self, name: &str) -> bool {
        self.headers.keys().any(|k| k.eq_ignore_ascii_case(name))
    }

    /// Build the request for `method` on `client`
    ///
    /// GET sends the query map, POST and PUT send the body map as JSON.
    pub(crate) fn build_request(
        &self,
        client: &Client,
        method: RequestMethod,
    ) -> Result<Request, RequestError> {
        let url = match method {
            RequestMethod::Get => self.url_with_query(),
            RequestMethod::Post | RequestMethod::Put => self.url.clone(),
        };
        let parsed = Url::parse(&url).map_err(|e| RequestError::InvalidUrl {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        let mut builder = client.request(method.to_reqwest(), parsed);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if matches!(method, RequestMethod::Post | RequestMethod::Put) {
            if !self.has_header(CONTENT_TYPE.as_str()) {
                builder = builder.header(CONTENT_TYPE, "application/json");
            }
            builder = builder.body(serde_json::to_vec(&self.body)?);
        }

        Ok(builder.build()?)
    }
}

impl fmt::Debug for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestDescriptor")
            .field("url", &self.url)
            .field("method", &self.method)
            .field("headers", &self.headers)
            .field("query", &self.query)
            .field("body", &self.body)
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(desc: &RequestDescriptor, method: RequestMethod) -> Result<Request, RequestError> {
        desc.build_request(&Client::new(), method)
    }

    #[test]
    fn test_method_parse_case_insensitive() {
        assert_eq!("get".parse::<RequestMethod>().unwrap(), RequestMethod::Get);
        assert_eq!("GeT".parse::<RequestMethod>().unwrap(), RequestMethod::Get);
        assert_eq!("POST".parse::<RequestMethod>().unwrap(), RequestMethod::Post);
        assert_eq!("put".parse::<RequestMethod>().unwrap(), RequestMethod::Put);
    }

    #[test]
    fn test_method_parse_unsupported() {
        for m in ["delete", "PATCH", "target", ""] {
            assert!(matches!(
                m.parse::<RequestMethod>(),
                Err(RequestError::UnsupportedMethod(ref s)) if s == m
            ));
        }
    }

    #[test]
    fn test_default_method_is_get() {
        let desc = RequestDescriptor::new("http://localhost/");
        assert_eq!(desc.method, "get");
    }

    #[test]
    fn test_get_appends_encoded_query() {
        let desc = RequestDescriptor::new("http://localhost/search")
            .query("q", "a b&c")
            .query("page", "2");
        let req = build(&desc, RequestMethod::Get).unwrap();
        assert_eq!(req.method(), Method::GET);
        assert_eq!(req.url().as_str(), "http://localhost/search?page=2&q=a%20b%26c");
    }

    #[test]
    fn test_get_extends_existing_query() {
        let desc = RequestDescriptor::new("http://localhost/list?sort=asc").query("page", "1");
        let req = build(&desc, RequestMethod::Get).unwrap();
        assert_eq!(req.url().query(), Some("sort=asc&page=1"));
    }

    #[test]
    fn test_post_sends_json_body() {
        let desc = RequestDescriptor::new("http://localhost/items")
            .header("X-Token", "abc")
            .query("ignored", "yes")
            .field("name", "lamp")
            .field("count", 3);
        let req = build(&desc, RequestMethod::Post).unwrap();

        assert_eq!(req.method(), Method::POST);
        assert_eq!(req.url().query(), None);
        assert_eq!(req.headers()["x-token"], "abc");
        assert_eq!(req.headers()[CONTENT_TYPE], "application/json");

        let body = req.body().and_then(reqwest::Body::as_bytes).unwrap();
        let value: Value = serde_json::from_slice(body).unwrap();
        assert_eq!(value, serde_json::json!({"name": "lamp", "count": 3}));
    }

    #[test]
    fn test_explicit_content_type_kept() {
        let desc = RequestDescriptor::new("http://localhost/items")
            .header("content-type", "application/vnd.api+json");
        let req = build(&desc, RequestMethod::Put).unwrap();
        assert_eq!(req.headers()[CONTENT_TYPE], "application/vnd.api+json");
        assert_eq!(req.headers().get_all(CONTENT_TYPE).iter().count(), 1);
    }

    #[test]
    fn test_invalid_url() {
        let desc = RequestDescriptor::new("http://exa mple.com/");
        assert!(matches!(
            build(&desc, RequestMethod::Get),
            Err(RequestError::InvalidUrl { .. })
        ));
        let desc = RequestDescriptor::new("/relative/path");
        assert!(matches!(
            build(&desc, RequestMethod::Get),
            Err(RequestError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_https_url_accepted() {
        let desc = RequestDescriptor::new("https://api.example.com/v1/items").query("id", "9");
        let req = build(&desc, RequestMethod::Get).unwrap();
        assert_eq!(req.url().scheme(), "https");
        assert_eq!(req.url().query(), Some("id=9"));
    }

    #[test]
    fn test_invalid_header_is_caller_error() {
        let desc = RequestDescriptor::new("http://localhost/").header("bad header", "x");
        let err = build(&desc, RequestMethod::Get).unwrap_err();
        assert!(matches!(err, RequestError::Transport(_)));
        assert!(err.is_caller_error());
    }
}
