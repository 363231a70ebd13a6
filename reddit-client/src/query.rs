use crate::endpoint::Endpoint;
use crate::transport::RawRequest;
use redwatch_core::{CoreError, Credentials};
use reqwest::Method;
use std::collections::BTreeMap;
use url::{form_urlencoded, Url};

/// One call against an [`Endpoint`]. Built per call and discarded after execution.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub endpoint: Endpoint,
    pub args: Vec<String>,
    pub params: BTreeMap<String, String>,
    /// Overrides the endpoint's default host.
    pub host: Option<String>,
    /// Overrides the endpoint's default method.
    pub method: Option<Method>,
}

impl Query {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            args: Vec::new(),
            params: BTreeMap::new(),
            host: None,
            method: None,
        }
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn without_param(mut self, key: &str) -> Self {
        self.params.remove(key);
        self
    }

    pub fn with_limit(self, limit: u32) -> Self {
        self.with_param("limit", limit.to_string())
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn method(&self) -> Method {
        self.method.clone().unwrap_or_else(|| self.endpoint.method())
    }

    pub fn path(&self) -> Result<String, CoreError> {
        self.endpoint.resolve(&self.args)
    }

    /// Builds the unauthenticated request. GET parameters go in the query string,
    /// everything else is sent as a form body.
    pub fn to_request(&self, credentials: &Credentials) -> Result<RawRequest, CoreError> {
        let host = self
            .host
            .clone()
            .unwrap_or_else(|| self.endpoint.host().resolve(credentials));
        let path = self.path()?;
        let mut url =
            Url::parse(&format!("https://{}{}", host, path)).map_err(|e| CoreError::InvalidInput {
                message: format!("invalid URL for {:?}: {}", self.endpoint, e),
            })?;

        let method = self.method();
        if method == Method::GET || self.params.is_empty() {
            if !self.params.is_empty() {
                url.query_pairs_mut().extend_pairs(self.params.iter());
            }
            return Ok(RawRequest::new(method, url));
        }

        let body = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish();
        Ok(RawRequest::new(method, url)
            .with_header("Content-Type", "application/x-www-form-urlencoded")
            .with_body(body))
    }
}
