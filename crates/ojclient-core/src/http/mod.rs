//! HTTP access layer for the online-judge API
//!
//! This module provides:
//! - Query/form serialization with selectable array encodings
//! - Call wrappers producing request descriptors
//! - The interceptor pipeline (auth header, failure notifications)
//! - Error classification into user-facing messages
//! - The transport client everything is sent through

pub mod auth;
pub mod client;
pub mod error;
pub mod interceptor;
pub mod notify;
pub mod request;
pub mod serializer;
pub mod wrappers;

pub use auth::{FileTokenStore, MemoryTokenStore, NoTokenStore, TokenStore, TOKEN_KEY};
pub use client::{ClientConfig, HttpClient, HttpClientBuilder, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS};
pub use error::{ErrorClassification, HttpError};
pub use interceptor::{InterceptorPipeline, AUTHORIZATION_HEADER};
pub use notify::{Notifier, RecordingNotifier, TracingNotifier};
pub use request::{ContentType, FilePart, MultipartPayload, RequestBody, RequestDescriptor};
pub use serializer::ArrayFormat;

// Re-export commonly used types
pub use reqwest::{Method, StatusCode};
