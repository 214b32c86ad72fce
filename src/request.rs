//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http::HeaderMap;
use percent_encoding::percent_decode_str;
use thiserror::Error;

use crate::method::Method;

/// A path parameter whose percent-decoded bytes are not UTF-8.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("path parameter `{raw}` does not decode to UTF-8")]
pub struct InvalidParam {
    pub raw: String,
}

/// An incoming HTTP request with its body fully buffered.
///
/// Path parameters are percent-decoded once, when the request is built. A
/// parameter that does not decode to UTF-8 is kept as an [`InvalidParam`]
/// so that distinct raw segments never collapse onto one value.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, Result<String, InvalidParam>>,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        parts: http::request::Parts,
        body: Bytes,
        raw_params: Vec<(String, String)>,
    ) -> Self {
        let params = raw_params.into_iter()
            .map(|(k, v)| {
                let decoded = percent_decode_str(&v).decode_utf8().map(|d| d.into_owned());
                (k, decoded.map_err(|_| InvalidParam { raw: v }))
            })
            .collect();
        Self {
            method,
            path: parts.uri.path().to_owned(),
            headers: parts.headers,
            body,
            params,
        }
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup. Values that are not visible ASCII read as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The media type of the body, lowercased, without parameters such as `charset`.
    pub fn content_type(&self) -> Option<String> {
        let raw = self.header("content-type")?;
        let essence = raw.split(';').next().unwrap_or_default().trim();
        Some(essence.to_ascii_lowercase())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/todos/{id}`, `req.param("id")` on `/todos/groceries` returns `Some("groceries")`.
    /// Parameters that failed to decode read as absent; use [`try_param`](Self::try_param)
    /// to tell the two apart.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.try_param(key).ok().flatten()
    }

    /// Like [`param`](Self::param), but reports a parameter that did not decode to UTF-8.
    pub fn try_param(&self, key: &str) -> Result<Option<&str>, InvalidParam> {
        match self.params.get(key) {
            None => Ok(None),
            Some(Ok(value)) => Ok(Some(value.as_str())),
            Some(Err(e)) => Err(e.clone()),
        }
    }
}

#[cfg(test)]
pub(crate) fn test_request(
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: &[u8],
    params: &[(&str, &str)],
) -> Request {
    let mut builder = http::Request::builder().method(method.as_str()).uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    let (parts, ()) = builder.body(()).unwrap().into_parts();
    let params = params.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    Request::new(method, parts, Bytes::copy_from_slice(body), params)
}
