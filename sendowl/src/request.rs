use http_body_util::{BodyExt, Full};
use hyper::{
    body::Bytes,
    header::{HeaderName, ACCEPT, AUTHORIZATION},
    Method, Request as HyperRequest,
};

use crate::{
    error::{ErrorKind, SendOwlError},
    RequestBody,
};

#[derive(Default)]
pub struct Request {
    uri: Option<String>,
    method: Option<Method>,
    headers: Vec<(HeaderName, String)>,
    query: Vec<(String, String)>,
    body: Option<RequestBody>,
}

/// A body held fully in memory.
pub fn full(bytes: impl Into<Bytes>) -> RequestBody {
    Full::new(bytes.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

impl Request {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    #[must_use]
    pub fn header(mut self, name: HeaderName, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Sets the `Authorization` and `Accept` headers every vendor call carries.
    #[must_use]
    pub fn authorized(self, authorization: &str) -> Self {
        self.header(AUTHORIZATION, authorization)
            .header(ACCEPT, "application/json")
    }

    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    #[must_use]
    pub fn body(self, body: Vec<u8>) -> Self {
        self.stream(full(body))
    }

    #[must_use]
    pub fn stream(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// The full URI, query included.
    pub fn full_uri(&self) -> Result<String, SendOwlError> {
        let uri = self.uri.clone().unwrap_or_default();
        if self.query.is_empty() {
            return Ok(uri);
        }
        let query = serde_urlencoded::to_string(&self.query).map_err(|source| SendOwlError {
            source: Some(Box::new(source)),
            kind: ErrorKind::BuildingRequest,
        })?;
        Ok(format!("{uri}?{query}"))
    }

    pub fn build(self) -> Result<HyperRequest<RequestBody>, SendOwlError> {
        let uri = self.full_uri()?;
        let mut builder = HyperRequest::builder().uri(uri);
        if let Some(method) = self.method {
            builder = builder.method(method);
        }
        for (name, value) in self.headers {
            builder = builder.header(name, value);
        }
        let body = self.body.unwrap_or_else(|| full(Bytes::new()));
        builder.body(body).map_err(|source| SendOwlError {
            source: Some(Box::new(source)),
            kind: ErrorKind::BuildingRequest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::CONTENT_TYPE;

    #[test]
    fn query_is_encoded() {
        let request = Request::new()
            .uri("https://www.sendowl.com/api/v1/products/1/licenses/check_valid")
            .query("key", "AB CD&1");
        assert_eq!(
            request.full_uri().unwrap(),
            "https://www.sendowl.com/api/v1/products/1/licenses/check_valid?key=AB+CD%261"
        );
    }

    #[test]
    fn headers_are_applied() {
        let request = Request::new()
            .uri("https://www.sendowl.com/api/v1/products/")
            .method(Method::GET)
            .authorized("Basic a2V5OnNlY3JldA==")
            .header(CONTENT_TYPE, "text/plain")
            .build()
            .unwrap();
        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.headers()[ACCEPT], "application/json");
        assert_eq!(request.headers()[AUTHORIZATION], "Basic a2V5OnNlY3JldA==");
        assert_eq!(request.headers()[CONTENT_TYPE], "text/plain");
    }

    #[test]
    fn invalid_header_fails_to_build() {
        let err = Request::new()
            .uri("https://www.sendowl.com/")
            .header(AUTHORIZATION, "bad\nvalue")
            .build()
            .err()
            .unwrap();
        assert!(matches!(err.kind(), ErrorKind::BuildingRequest));
    }
}
