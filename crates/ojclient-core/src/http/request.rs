//! Transient request descriptors
//!
//! A [`RequestDescriptor`] is what a call wrapper produces and what the
//! interceptor pipeline and the transport consume. It lives for one call.

use std::path::Path;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde_json::{Map, Value};

use crate::http::serializer::{self, ArrayFormat, Pair};
use crate::{Error, Result};

/// Content type selected by the wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    /// Whatever the body implies (JSON for JSON bodies, none otherwise)
    ClientDefault,
    /// `application/x-www-form-urlencoded`
    FormUrlEncoded,
    /// `multipart/form-data`; the boundary is added at send time
    Multipart,
}

impl ContentType {
    /// Header value set explicitly by the wrapper, if any
    pub fn header_value(&self) -> Option<&'static str> {
        match self {
            ContentType::ClientDefault => None,
            ContentType::FormUrlEncoded => Some("application/x-www-form-urlencoded"),
            ContentType::Multipart => Some("multipart/form-data"),
        }
    }
}

/// A file attached to a multipart payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Form field name
    pub field: String,
    /// File name reported to the server
    pub file_name: String,
    /// Raw contents
    pub bytes: Vec<u8>,
    /// Optional MIME type
    pub mime: Option<String>,
}

/// Multipart body: text fields plus files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartPayload {
    pub fields: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

impl MultipartPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Add a file from memory
    pub fn file(
        mut self,
        field: impl Into<String>,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
        mime: Option<String>,
    ) -> Self {
        self.files.push(FilePart {
            field: field.into(),
            file_name: file_name.into(),
            bytes,
            mime,
        });
        self
    }

    /// Add a file read from disk, named after its last path component
    pub async fn file_from_path(self, field: impl Into<String>, path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        Ok(self.file(field, file_name, bytes, None))
    }

    /// Convert a plain parameter map into form parts
    ///
    /// Arrays become repeated `key[]` parts and nested maps `outer[inner]`
    /// parts; `null` fields are left out.
    pub fn from_params(params: &Map<String, Value>) -> Self {
        let fields = serializer::flatten(params, ArrayFormat::Brackets)
            .into_iter()
            .filter_map(|pair| match pair {
                Pair::Scalar(key, value) => Some((key, value)),
                Pair::Joined(key, values) => Some((key, values.join(","))),
                Pair::Null(_) => None,
            })
            .collect();
        Self {
            fields,
            files: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.files.is_empty()
    }

    /// Build the reqwest form; called once per send
    pub fn to_form(&self) -> Result<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in &self.fields {
            form = form.text(name.clone(), value.clone());
        }
        for file in &self.files {
            let mut part = reqwest::multipart::Part::bytes(file.bytes.clone())
                .file_name(file.file_name.clone());
            if let Some(mime) = &file.mime {
                part = part.mime_str(mime).map_err(|e| Error::HttpRequest {
                    message: format!("Invalid MIME type for {}: {}", file.file_name, mime),
                    source: Some(Box::new(e)),
                })?;
            }
            form = form.part(file.field.clone(), part);
        }
        Ok(form)
    }
}

/// Body of an outgoing request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Serialized as JSON
    Json(Value),
    /// Already urlencoded text
    Form(String),
    /// Multipart parts
    Multipart(MultipartPayload),
}

/// One outgoing call, before it reaches the transport
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Path relative to the client's base URL (may carry its own query)
    pub path: String,
    /// Query parameters, absent when the caller passed none
    pub query: Option<Map<String, Value>>,
    /// Array encoding for `query`
    pub query_format: ArrayFormat,
    /// Body, absent when the caller passed none
    pub body: Option<RequestBody>,
    pub content_type: ContentType,
    pub headers: HeaderMap,
}

impl RequestDescriptor {
    /// New descriptor with no query, body or extra headers
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            query_format: ArrayFormat::Brackets,
            body: None,
            content_type: ContentType::ClientDefault,
            headers: HeaderMap::new(),
        }
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn with_query(mut self, query: Option<Map<String, Value>>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Option<RequestBody>) -> Self {
        self.body = body;
        self
    }

    /// Set a header, replacing any previous value
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<()> {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| Error::HttpRequest {
            message: format!("Invalid header name: {}", name),
            source: Some(Box::new(e)),
        })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| Error::HttpRequest {
            message: format!("Invalid value for header {}", name),
            source: Some(Box::new(e)),
        })?;
        self.headers.insert(header_name, header_value);
        Ok(())
    }

    /// Header value as text, for inspection
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Encoded query string using the descriptor's array format
    pub fn query_string(&self) -> Option<String> {
        self.query
            .as_ref()
            .map(|query| serializer::stringify(query, self.query_format))
            .filter(|encoded| !encoded.is_empty())
    }
}
