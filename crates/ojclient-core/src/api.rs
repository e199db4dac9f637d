//! Typed endpoint catalog
//!
//! Each operation delegates to exactly one call wrapper on a fixed path; the
//! interceptors installed on the [`HttpClient`] handle auth and failures.

use serde_json::Value;

use crate::http::serializer::{self, ArrayFormat};
use crate::http::wrappers::NO_PARAMS;
use crate::http::{HttpClient, MultipartPayload};
use crate::types::{
    ApiResponse, Category, CategoryForm, CategoryListQuery, Contest, ContestForm,
    ContestListQuery, ContestRegistrationForm, IdentityQuery, LoginData, LoginForm, Page,
    PageQuery, Problem, ProblemForm, ProblemListQuery, RegisterData, RegisterForm,
    SendCodeForm, Submission, SubmitCode, SubmitListQuery, SubmitResult, TestCase, User,
};
use crate::Result;

/// Online-judge API bound to one client
#[derive(Debug, Clone)]
pub struct OjApi {
    client: HttpClient,
}

impl OjApi {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    // Public listings

    pub async fn problem_list(&self, query: &ProblemListQuery) -> Result<ApiResponse<Page<Problem>>> {
        self.client.get("/problem-list", Some(query)).await
    }

    pub async fn problem_detail(&self, query: &IdentityQuery) -> Result<ApiResponse<Problem>> {
        self.client.get("/problem-detail", Some(query)).await
    }

    pub async fn category_list(&self, query: &CategoryListQuery) -> Result<ApiResponse<Page<Category>>> {
        self.client.get("/category-list", Some(query)).await
    }

    pub async fn rank_list(&self, query: &PageQuery) -> Result<ApiResponse<Page<User>>> {
        self.client.get("/rank-list", Some(query)).await
    }

    pub async fn submit_list(&self, query: &SubmitListQuery) -> Result<ApiResponse<Page<Submission>>> {
        self.client.get("/submit-list", Some(query)).await
    }

    pub async fn user_detail(&self, query: &IdentityQuery) -> Result<ApiResponse<User>> {
        self.client.get("/user-detail", Some(query)).await
    }

    pub async fn contest_list(&self, query: &ContestListQuery) -> Result<ApiResponse<Page<Contest>>> {
        self.client.get("/contest-list", Some(query)).await
    }

    pub async fn contest_detail(&self, query: &IdentityQuery) -> Result<ApiResponse<Contest>> {
        self.client.get("/contest-detail", Some(query)).await
    }

    // Account

    pub async fn send_code(&self, form: &SendCodeForm) -> Result<ApiResponse<Value>> {
        self.client.post_uncode("/send-code", Some(form)).await
    }

    pub async fn login(&self, form: &LoginForm) -> Result<ApiResponse<LoginData>> {
        self.client.post_uncode("/login", Some(form)).await
    }

    pub async fn register(&self, form: &RegisterForm) -> Result<ApiResponse<RegisterData>> {
        self.client.post_uncode("/register", Some(form)).await
    }

    // Admin

    pub async fn delete_category(&self, query: &IdentityQuery) -> Result<ApiResponse<Value>> {
        self.client.delete("/admin/category-delete", Some(query)).await
    }

    pub async fn create_category(&self, form: &CategoryForm) -> Result<ApiResponse<Value>> {
        self.client.post_uncode("/admin/category-create", Some(form)).await
    }

    pub async fn modify_category(&self, form: &CategoryForm) -> Result<ApiResponse<Value>> {
        self.client.put("/admin/category-modify", Some(form)).await
    }

    pub async fn create_problem(&self, form: &ProblemForm) -> Result<ApiResponse<Value>> {
        self.client.post("/admin/problem-create", Some(form)).await
    }

    pub async fn modify_problem(&self, form: &ProblemForm) -> Result<ApiResponse<Value>> {
        self.client.put_json("/admin/problem-modify", Some(form)).await
    }

    pub async fn test_cases(&self, query: &IdentityQuery) -> Result<ApiResponse<Page<TestCase>>> {
        self.client.get("/admin/test-case", Some(query)).await
    }

    pub async fn create_contest(&self, form: &ContestForm) -> Result<ApiResponse<Value>> {
        self.client.post("/admin/contest-create", Some(form)).await
    }

    pub async fn modify_contest(&self, form: &ContestForm) -> Result<ApiResponse<Value>> {
        self.client.put_json("/admin/contest-modify", Some(form)).await
    }

    pub async fn delete_contest(&self, query: &IdentityQuery) -> Result<ApiResponse<Value>> {
        self.client.delete("/admin/contest-delete", Some(query)).await
    }

    // Signed-in user

    /// Submit source for judging; the problem identity travels in the path query
    pub async fn submit_code(&self, problem_identity: &str, code: &SubmitCode) -> Result<ApiResponse<SubmitResult>> {
        let path = format!(
            "/user/submit?problem_identity={}",
            urlencoding::encode(problem_identity)
        );
        self.client.post_json(&path, Some(code)).await
    }

    /// Register for a contest
    ///
    /// The server reads `contest_identity` from the query string, so the form
    /// is encoded onto the path and the urlencoded body stays empty.
    pub async fn register_contest(&self, form: &ContestRegistrationForm) -> Result<ApiResponse<Value>> {
        let mut path = String::from("/user/contest-registration");
        if let Some(query) = serializer::stringify_params(form, ArrayFormat::Indices)? {
            path.push('?');
            path.push_str(&query);
        }
        self.client.post_uncode(&path, NO_PARAMS).await
    }

    /// Upload to the base endpoint itself
    pub async fn upload_file(&self, payload: MultipartPayload) -> Result<ApiResponse<Value>> {
        self.client.up_file("", Some(payload)).await
    }
}
