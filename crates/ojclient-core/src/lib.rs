//! OJ Client Core - HTTP access layer for the online-judge web API
//!
//! This crate sits between application code and the judge server. It owns the
//! transport configuration, runs every request through a fixed pair of
//! interceptors and exposes the server's endpoints as typed functions.
//!
//! # Main Components
//!
//! - **Error Handling**: one error enum (`thiserror`) shared by every layer
//! - **HTTP Layer**: call wrappers, query/form serialization, interceptors
//! - **Types**: the server's response envelope, records and request forms
//! - **API**: the endpoint catalog, one function per server route
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ojclient_core::{ClientConfig, HttpClient, MemoryTokenStore, OjApi, ProblemListQuery};
//!
//! # async fn example() -> ojclient_core::Result<()> {
//! let client = HttpClient::builder(ClientConfig::default())
//!     .token_store(Arc::new(MemoryTokenStore::with_token("eyJhbGciOi...")))
//!     .build()?;
//! let api = OjApi::new(client);
//!
//! let page = api.problem_list(&ProblemListQuery::default()).await?;
//! println!("{} problems", page.into_data().map(|p| p.count).unwrap_or(0));
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod error;
pub mod http;
pub mod types;

// Re-export main types for convenience
pub use api::OjApi;
pub use error::{Error, Result};
pub use http::{
    ArrayFormat, ClientConfig, ErrorClassification, FileTokenStore, HttpClient,
    HttpClientBuilder, MemoryTokenStore, MultipartPayload, NoTokenStore, Notifier,
    RecordingNotifier, TokenStore, TracingNotifier,
};
pub use types::{
    ApiResponse, Category, CategoryForm, CategoryListQuery, Contest, ContestForm,
    ContestListQuery, ContestProblem, ContestRegistrationForm, IdentityQuery, LoginData,
    LoginForm, Page, PageQuery, Problem, ProblemCategory, ProblemForm, ProblemListQuery,
    RegisterData, RegisterForm, SendCodeForm, Submission, SubmitCode, SubmitListQuery,
    SubmitResult, SubmitStatus, TestCase, User,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
