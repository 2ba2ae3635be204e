//! Request helper
//!
//! One-call HTTP requests with JSON bodies, typed responses and
//! injectable defaults.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::RequestError;

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Patch => "PATCH",
        }
    }

    /// GET and HEAD requests never carry a body
    pub fn allows_body(&self) -> bool {
        !matches!(self, Method::Get | Method::Head)
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Head => reqwest::Method::HEAD,
            Method::Options => reqwest::Method::OPTIONS,
            Method::Patch => reqwest::Method::PATCH,
        }
    }
}

/// How the response body is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    #[default]
    Json,
    Text,
}

/// Request body
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Serialized as JSON with `Content-Type: application/json`
    Json(Value),
    /// Sent as-is
    Text(String),
    /// Sent url-encoded
    Form(Vec<(String, String)>),
}

/// Per-call options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub method: Option<Method>,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    pub response_type: Option<ResponseType>,
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        set_header(&mut self.headers, name, value);
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(body.into()));
        self
    }

    pub fn form(mut self, fields: &[(&str, &str)]) -> Self {
        let fields = fields.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.body = Some(RequestBody::Form(fields));
        self
    }

    pub fn response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = Some(response_type);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Defaults applied to every call of a [`Requester`]
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestDefaults {
    /// Base that relative URLs are resolved against
    pub base_url: Option<String>,
    pub method: Option<Method>,
    #[serde(deserialize_with = "header_map")]
    pub headers: Vec<(String, String)>,
    #[serde(rename = "type")]
    pub response_type: Option<ResponseType>,
    pub timeout_ms: Option<u64>,
}

impl RequestDefaults {
    /// Layer `other` over these defaults. Headers merge by name, every
    /// other field is replaced when `other` sets it.
    pub fn merged(&self, other: &RequestDefaults) -> RequestDefaults {
        let mut headers = self.headers.clone();
        for (name, value) in &other.headers {
            set_header(&mut headers, name, value);
        }
        RequestDefaults {
            base_url: other.base_url.clone().or_else(|| self.base_url.clone()),
            method: other.method.or(self.method),
            headers,
            response_type: other.response_type.or(self.response_type),
            timeout_ms: other.timeout_ms.or(self.timeout_ms),
        }
    }
}

/// Headers from a JSON object such as `{ "Accept": "text/plain" }`
fn header_map<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<Vec<(String, String)>, D::Error> {
    let map = std::collections::BTreeMap::<String, String>::deserialize(deserializer)?;
    Ok(map.into_iter().collect())
}

/// Decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseValue {
    Json(Value),
    Text(String),
}

impl ResponseValue {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseValue::Json(v) => Some(v),
            ResponseValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseValue::Text(t) => Some(t),
            ResponseValue::Json(_) => None,
        }
    }

    /// Deserialize a JSON response into `T`
    pub fn deserialize<T: serde::de::DeserializeOwned>(self) -> Result<T, RequestError> {
        match self {
            ResponseValue::Json(v) => serde_json::from_value(v).map_err(|e| RequestError::Decode(e.to_string())),
            ResponseValue::Text(t) => serde_json::from_str(&t).map_err(|e| RequestError::Decode(e.to_string())),
        }
    }
}

/// A fully resolved request, ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    pub response_type: ResponseType,
    pub timeout: Option<Duration>,
}

/// Request issuer carrying injected defaults
#[derive(Debug, Clone, Default)]
pub struct Requester {
    defaults: RequestDefaults,
}

impl Requester {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: RequestDefaults) -> Self {
        Self { defaults }
    }

    /// A new requester whose defaults are these layered with `defaults`
    pub fn inject(&self, defaults: RequestDefaults) -> Requester {
        Requester { defaults: self.defaults.merged(&defaults) }
    }

    pub fn defaults(&self) -> &RequestDefaults {
        &self.defaults
    }

    /// Resolve the URL and merge options over the defaults
    pub fn prepare(&self, url: &str, options: RequestOptions) -> Result<PreparedRequest, RequestError> {
        let url = self.resolve_url(url)?;
        let method = options.method.or(self.defaults.method).unwrap_or_default();

        let mut headers = Vec::new();
        let body = match options.body {
            Some(body) if method.allows_body() => Some(encode_body(body, &mut headers)?),
            Some(_) => {
                tracing::debug!("Dropping body of {} request to {}", method.as_str(), url);
                None
            }
            None => None,
        };
        for (name, value) in self.defaults.headers.iter().chain(options.headers.iter()) {
            set_header(&mut headers, name, value);
        }

        Ok(PreparedRequest {
            method,
            url,
            headers,
            body,
            response_type: options.response_type
                .or(self.defaults.response_type)
                .unwrap_or_default(),
            timeout: options.timeout
                .or_else(|| self.defaults.timeout_ms.map(Duration::from_millis)),
        })
    }

    /// Issue a request and decode the response.
    ///
    /// Non-2xx statuses fail with the response text; failures are logged
    /// before being returned.
    pub fn request(&self, url: &str, options: RequestOptions) -> Result<ResponseValue, RequestError> {
        let result = self.prepare(url, options).and_then(send);
        if let Err(e) = &result {
            tracing::error!("Request failed {}", e);
        }
        result
    }

    fn resolve_url(&self, url: &str) -> Result<Url, RequestError> {
        match Url::parse(url) {
            Ok(parsed) => Ok(parsed),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = self.defaults.base_url.as_deref()
                    .ok_or_else(|| RequestError::InvalidUrl(url.to_string()))?;
                Url::parse(base)
                    .and_then(|b| b.join(url))
                    .map_err(|e| RequestError::InvalidUrl(format!("{url}: {e}")))
            }
            Err(e) => Err(RequestError::InvalidUrl(format!("{url}: {e}"))),
        }
    }
}

fn encode_body(body: RequestBody, headers: &mut Vec<(String, String)>) -> Result<Vec<u8>, RequestError> {
    match body {
        RequestBody::Json(value) => {
            set_header(headers, "Content-Type", "application/json");
            serde_json::to_vec(&value).map_err(|e| RequestError::Decode(e.to_string()))
        }
        RequestBody::Text(text) => Ok(text.into_bytes()),
        RequestBody::Form(fields) => {
            set_header(headers, "Content-Type", "application/x-www-form-urlencoded");
            let encoded = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(fields.iter())
                .finish();
            Ok(encoded.into_bytes())
        }
    }
}

/// Insert or replace a header, matching names case-insensitively
fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    match headers.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
        Some(entry) => entry.1 = value.to_string(),
        None => headers.push((name.to_string(), value.to_string())),
    }
}

fn send(prepared: PreparedRequest) -> Result<ResponseValue, RequestError> {
    let mut client = reqwest::blocking::Client::builder();
    if let Some(timeout) = prepared.timeout {
        client = client.timeout(timeout);
    }
    let client = client.build()?;

    let mut request = client.request(prepared.method.into(), prepared.url.clone());
    for (name, value) in &prepared.headers {
        request = request.header(name.as_str(), value.as_str());
    }
    if let Some(body) = prepared.body {
        request = request.body(body);
    }

    tracing::debug!("{} {}", prepared.method.as_str(), prepared.url);
    let response = request.send()?;
    let status = response.status();
    let text = response.text()?;

    if !status.is_success() {
        return Err(RequestError::Status { status: status.as_u16(), body: text });
    }

    match prepared.response_type {
        ResponseType::Text => Ok(ResponseValue::Text(text)),
        ResponseType::Json if text.trim().is_empty() => Ok(ResponseValue::Json(Value::Null)),
        ResponseType::Json => serde_json::from_str(&text)
            .map(ResponseValue::Json)
            .map_err(|e| RequestError::Decode(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_options_builder() {
        let opts = RequestOptions::new()
            .method(Method::Post)
            .header("Accept", "application/json")
            .header("accept", "text/plain")
            .json(json!({ "key": "value" }));

        assert_eq!(opts.method, Some(Method::Post));
        assert_eq!(opts.headers, vec![("Accept".to_string(), "text/plain".to_string())]);
        assert!(matches!(opts.body, Some(RequestBody::Json(_))));
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let prepared = Requester::new()
            .prepare("https://example.com/api", RequestOptions::new().method(Method::Post).json(json!([1, 2])))
            .unwrap();
        assert_eq!(prepared.body.as_deref(), Some(&b"[1,2]"[..]));
        assert_eq!(prepared.headers, vec![("Content-Type".to_string(), "application/json".to_string())]);
    }

    #[test]
    fn test_caller_content_type_wins() {
        let opts = RequestOptions::new()
            .method(Method::Put)
            .header("content-type", "application/vnd.api+json")
            .json(json!({}));
        let prepared = Requester::new().prepare("https://example.com", opts).unwrap();
        assert_eq!(prepared.headers.len(), 1);
        assert_eq!(prepared.headers[0].1, "application/vnd.api+json");
    }

    #[test]
    fn test_get_drops_body() {
        let prepared = Requester::new()
            .prepare("https://example.com", RequestOptions::new().text("ignored"))
            .unwrap();
        assert_eq!(prepared.method, Method::Get);
        assert!(prepared.body.is_none());
        assert!(prepared.headers.is_empty());
    }

    #[test]
    fn test_form_body() {
        let prepared = Requester::new()
            .prepare("https://example.com", RequestOptions::new().method(Method::Post).form(&[("a", "1 2"), ("b", "&")]))
            .unwrap();
        assert_eq!(prepared.body.as_deref(), Some(&b"a=1+2&b=%26"[..]));
    }

    #[test]
    fn test_defaults_deserialize() {
        let defaults: RequestDefaults = serde_json::from_str(
            r#"{ "baseUrl": "https://api.example.com/v1/", "method": "POST", "type": "text",
                "headers": { "Accept": "text/plain" }, "timeoutMs": 500 }"#,
        ).unwrap();
        assert_eq!(defaults.method, Some(Method::Post));
        assert_eq!(defaults.response_type, Some(ResponseType::Text));
        assert_eq!(defaults.timeout_ms, Some(500));
        assert_eq!(defaults.headers, vec![("Accept".to_string(), "text/plain".to_string())]);
    }

    #[test]
    fn test_response_value_deserialize() {
        #[derive(Deserialize)]
        struct User {
            name: String,
        }
        let user: User = ResponseValue::Json(json!({ "name": "Ann" })).deserialize().unwrap();
        assert_eq!(user.name, "Ann");
        assert!(ResponseValue::Text("nope".into()).deserialize::<User>().is_err());
    }
}
