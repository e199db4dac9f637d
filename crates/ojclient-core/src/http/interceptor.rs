//! Request/response interceptor pipeline
//!
//! Installed once on the [`HttpClient`](crate::http::HttpClient) and run for
//! every call, whichever wrapper issued it:
//!
//! - pre-send: GET queries switch to comma-joined arrays, and the stored
//!   token (if any) is attached verbatim as `Authorization`;
//! - post-receive: successes pass through untouched; failures with a
//!   response raise a notification and reject; failures without a response
//!   reject silently.

use std::sync::Arc;

use reqwest::Method;

use crate::http::auth::TokenStore;
use crate::http::error::HttpError;
use crate::http::notify::Notifier;
use crate::http::request::RequestDescriptor;
use crate::http::serializer::ArrayFormat;
use crate::{Error, Result};

/// Header carrying the stored token
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// The two hooks every request passes through
#[derive(Clone)]
pub struct InterceptorPipeline {
    token_store: Arc<dyn TokenStore>,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for InterceptorPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptorPipeline").finish_non_exhaustive()
    }
}

impl InterceptorPipeline {
    pub fn new(token_store: Arc<dyn TokenStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            token_store,
            notifier,
        }
    }

    /// Pre-send hook
    pub fn pre_send(&self, request: &mut RequestDescriptor) -> Result<()> {
        if request.method == Method::GET {
            request.query_format = ArrayFormat::Comma;
        }

        let token = self.token_store.get().map_err(|e| Error::Interceptor {
            message: format!("failed to read auth token: {}", e),
            source: Some(anyhow::Error::new(e)),
        })?;

        match token.filter(|t| !t.is_empty()) {
            Some(token) => {
                request
                    .set_header(AUTHORIZATION_HEADER, &token)
                    .map_err(|e| Error::Interceptor {
                        message: "stored auth token is not a valid header value".to_string(),
                        source: Some(anyhow::Error::new(e)),
                    })?;
            }
            None => {
                request.headers.remove(AUTHORIZATION_HEADER);
            }
        }

        Ok(())
    }

    /// Post-receive hook
    pub async fn post_receive(
        &self,
        outcome: std::result::Result<reqwest::Response, reqwest::Error>,
    ) -> Result<reqwest::Response> {
        match outcome {
            Ok(response) if response.status().is_success() => Ok(response),
            Ok(response) => {
                let failure = HttpError::from_response(response).await;
                Err(self.reject(failure))
            }
            Err(error) => Err(Self::transport_failure(error)),
        }
    }

    /// Notify for a failure that carried a response, then turn it into an error
    pub fn reject(&self, failure: HttpError) -> Error {
        if let Some(text) = failure.notification_text() {
            tracing::debug!(
                status = ?failure.status_code,
                classification = ?failure.classification,
                "raising failure notification"
            );
            self.notifier.notify(&text);
        }
        failure.into()
    }

    fn transport_failure(error: reqwest::Error) -> Error {
        let failure = HttpError::from_request_error(&error);
        tracing::debug!(timeout = error.is_timeout(), "no response received: {}", failure.message);
        Error::Transport {
            message: failure.message,
            timeout: error.is_timeout(),
            source: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::auth::{MemoryTokenStore, NoTokenStore};
    use crate::http::error::{
        ErrorClassification, GENERIC_ERROR_MESSAGE, NOT_FOUND_MESSAGE, SESSION_EXPIRED_MESSAGE,
    };
    use crate::http::notify::RecordingNotifier;
    use crate::http::wrappers;
    use reqwest::StatusCode;
    use serde_json::json;

    struct FailingStore;

    impl TokenStore for FailingStore {
        fn get(&self) -> Result<Option<String>> {
            Err(Error::configuration("storage unavailable"))
        }
    }

    fn pipeline(store: Arc<dyn TokenStore>) -> (InterceptorPipeline, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        (InterceptorPipeline::new(store, notifier.clone()), notifier)
    }

    #[test]
    fn test_token_attached_verbatim() {
        let (pipeline, _) = pipeline(Arc::new(MemoryTokenStore::with_token("eyJ.abc.def")));
        let mut request = wrappers::post("/login", wrappers::NO_PARAMS).unwrap();
        pipeline.pre_send(&mut request).unwrap();
        assert_eq!(request.header(AUTHORIZATION_HEADER), Some("eyJ.abc.def"));
    }

    #[test]
    fn test_missing_or_empty_token_omits_header() {
        let (pipeline, _) = pipeline(Arc::new(NoTokenStore));
        let mut request = wrappers::get("/problem-list", wrappers::NO_PARAMS).unwrap();
        pipeline.pre_send(&mut request).unwrap();
        assert!(request.header(AUTHORIZATION_HEADER).is_none());

        let (pipeline, _) = pipeline_with_empty_token();
        let mut request = wrappers::get("/problem-list", wrappers::NO_PARAMS).unwrap();
        pipeline.pre_send(&mut request).unwrap();
        assert!(request.header(AUTHORIZATION_HEADER).is_none());
    }

    fn pipeline_with_empty_token() -> (InterceptorPipeline, Arc<RecordingNotifier>) {
        pipeline(Arc::new(MemoryTokenStore::with_token("")))
    }

    #[test]
    fn test_get_switches_to_comma_arrays() {
        let (pipeline, _) = pipeline(Arc::new(NoTokenStore));
        let params = json!({"ids": ["a", "b"]});

        let mut request = wrappers::get("/problem-list", Some(&params)).unwrap();
        pipeline.pre_send(&mut request).unwrap();
        assert_eq!(request.query_string().as_deref(), Some("ids=a,b"));

        let mut request = wrappers::delete("/admin/category-delete", Some(&params)).unwrap();
        pipeline.pre_send(&mut request).unwrap();
        assert_ne!(request.query_format, ArrayFormat::Comma);
    }

    #[test]
    fn test_store_failure_rejects() {
        let (pipeline, notifier) = pipeline(Arc::new(FailingStore));
        let mut request = wrappers::get("/problem-list", wrappers::NO_PARAMS).unwrap();
        let err = pipeline.pre_send(&mut request).unwrap_err();
        assert!(matches!(err, Error::Interceptor { .. }));
        assert!(notifier.is_empty());
    }

    #[test]
    fn test_invalid_token_rejects() {
        let (pipeline, _) = pipeline(Arc::new(MemoryTokenStore::with_token("line\nbreak")));
        let mut request = wrappers::get("/problem-list", wrappers::NO_PARAMS).unwrap();
        assert!(matches!(
            pipeline.pre_send(&mut request),
            Err(Error::Interceptor { .. })
        ));
    }

    #[test]
    fn test_reject_notifies_then_returns_error() {
        let (pipeline, notifier) = pipeline(Arc::new(NoTokenStore));

        let err = pipeline.reject(HttpError::from_parts(StatusCode::NOT_FOUND, "{}"));
        assert_eq!(notifier.last().as_deref(), Some(NOT_FOUND_MESSAGE));
        assert_eq!(err.status_code(), Some(404));

        let err = pipeline.reject(HttpError::from_parts(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"message":"refresh token无效"}"#,
        ));
        assert_eq!(notifier.last().as_deref(), Some(SESSION_EXPIRED_MESSAGE));
        assert_eq!(err.classification(), Some(ErrorClassification::SessionExpired));

        pipeline.reject(HttpError::from_parts(StatusCode::INTERNAL_SERVER_ERROR, "null"));
        assert_eq!(notifier.last().as_deref(), Some(GENERIC_ERROR_MESSAGE));
        assert_eq!(notifier.messages().len(), 3);
    }
}
