//! Request and response schemas for the online-judge API
//!
//! Response structs mirror what the server serializes; every field defaults so
//! partial payloads (e.g. list rows without nested relations) still decode.
//! Request structs skip unset optional fields, which the serializer then
//! leaves out of the query or body entirely.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Server timestamps, written as `2006-01-02 15:04:05`
pub mod server_time {
    use chrono::NaiveDateTime;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_str(&time.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.is_empty() => NaiveDateTime::parse_from_str(&raw, FORMAT)
                .map(Some)
                .map_err(D::Error::custom),
            _ => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

/// Envelope every endpoint answers with: `{"code": 200, "data": ..., "msg": ...}`
///
/// The server reports business failures with `code: -1` and HTTP 200, so a
/// successful call can still carry a failed envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(default = "none", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

fn none<T>() -> Option<T> {
    None
}

/// Code the server uses for success
pub const SUCCESS_CODE: i64 = 200;

impl<T> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// Data of a successful envelope, or [`Error::Api`] with the server's `msg`
    pub fn into_result(self) -> Result<Option<T>> {
        if self.is_success() {
            Ok(self.data)
        } else {
            Err(Error::Api {
                code: self.code,
                message: self.msg.unwrap_or_default(),
            })
        }
    }
}

/// One page of a list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub list: Vec<T>,
    #[serde(default)]
    pub count: i64,
}

// ---------------------------------------------------------------------------
// Domain records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    pub id: u64,
    pub identity: String,
    pub name: String,
    pub parent_id: i64,
    #[serde(with = "server_time")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(with = "server_time")]
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemCategory {
    pub id: u64,
    pub problem_id: u64,
    pub category_id: u64,
    pub category_basic: Option<Category>,
}

/// A test case; identities are only present on stored cases
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestCase {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub identity: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub problem_identity: String,
    pub input: String,
    pub output: String,
}

impl TestCase {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Problem {
    pub id: u64,
    pub identity: String,
    pub title: String,
    pub content: String,
    pub max_runtime: i64,
    pub max_mem: i64,
    pub pass_num: i64,
    pub submit_num: i64,
    pub problem_categories: Vec<ProblemCategory>,
    pub test_cases: Vec<TestCase>,
    #[serde(with = "server_time")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(with = "server_time")]
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: u64,
    pub identity: String,
    pub name: String,
    pub phone: String,
    pub mail: String,
    pub pass_num: i64,
    pub submit_num: i64,
    pub is_admin: i64,
    #[serde(with = "server_time")]
    pub created_at: Option<NaiveDateTime>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.is_admin == 1
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Submission {
    pub id: u64,
    pub identity: String,
    pub problem_identity: String,
    pub problem_basic: Option<Problem>,
    pub user_identity: String,
    pub user_basic: Option<User>,
    pub path: String,
    pub status: i64,
    #[serde(with = "server_time")]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContestProblem {
    pub id: u64,
    pub contest_id: u64,
    pub problem_id: u64,
    pub problem_basic: Option<Problem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contest {
    pub id: u64,
    pub identity: String,
    pub name: String,
    pub content: String,
    #[serde(with = "server_time")]
    pub start_at: Option<NaiveDateTime>,
    #[serde(with = "server_time")]
    pub end_at: Option<NaiveDateTime>,
    pub contest_problems: Vec<ContestProblem>,
    #[serde(with = "server_time")]
    pub created_at: Option<NaiveDateTime>,
}

/// Data returned by `/login`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginData {
    pub token: String,
    pub is_admin: i64,
}

/// Data returned by `/register`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterData {
    pub token: String,
}

/// Judge states stored on a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitStatus {
    Pending,
    Accepted,
    WrongAnswer,
    TimeLimitExceeded,
    MemoryLimitExceeded,
    CompileError,
    InvalidCode,
}

impl SubmitStatus {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            -1 => Some(SubmitStatus::Pending),
            1 => Some(SubmitStatus::Accepted),
            2 => Some(SubmitStatus::WrongAnswer),
            3 => Some(SubmitStatus::TimeLimitExceeded),
            4 => Some(SubmitStatus::MemoryLimitExceeded),
            5 => Some(SubmitStatus::CompileError),
            6 => Some(SubmitStatus::InvalidCode),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            SubmitStatus::Pending => -1,
            SubmitStatus::Accepted => 1,
            SubmitStatus::WrongAnswer => 2,
            SubmitStatus::TimeLimitExceeded => 3,
            SubmitStatus::MemoryLimitExceeded => 4,
            SubmitStatus::CompileError => 5,
            SubmitStatus::InvalidCode => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SubmitStatus::Pending => "pending",
            SubmitStatus::Accepted => "accepted",
            SubmitStatus::WrongAnswer => "wrong answer",
            SubmitStatus::TimeLimitExceeded => "time limit exceeded",
            SubmitStatus::MemoryLimitExceeded => "memory limit exceeded",
            SubmitStatus::CompileError => "compile error",
            SubmitStatus::InvalidCode => "invalid code",
        }
    }
}

impl Submission {
    pub fn verdict(&self) -> Option<SubmitStatus> {
        SubmitStatus::from_code(self.status)
    }
}

/// Judge verdict returned by `/user/submit`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitResult {
    pub status: i64,
    pub msg: String,
}

impl SubmitResult {
    pub fn verdict(&self) -> Option<SubmitStatus> {
        SubmitStatus::from_code(self.status)
    }
}

// ---------------------------------------------------------------------------
// Request parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_identity: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

/// Contest listing takes the same paging and keyword filter
pub type ContestListQuery = CategoryListQuery;

/// Plain paging, used by the rank list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmitListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_identity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_identity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
}

/// Single `identity` parameter (details and deletes)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityQuery {
    pub identity: String,
}

impl IdentityQuery {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendCodeForm {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterForm {
    pub mail: String,
    pub code: String,
    pub name: String,
    pub password: String,
    pub phone: String,
}

/// Category create/modify form; `identity` is only sent on modify
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    pub name: String,
    #[serde(rename = "parentId")]
    pub parent_id: i64,
}

/// Problem create/modify body; `identity` is only sent on modify
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    pub title: String,
    pub content: String,
    pub problem_categories: Vec<i64>,
    pub max_runtime: i64,
    pub max_mem: i64,
    pub test_cases: Vec<TestCase>,
}

/// Contest create/modify body; `start_at` and `end_at` are Unix seconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContestForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    pub name: String,
    pub content: String,
    #[serde(rename = "problem_basic")]
    pub problem_basics: Vec<i64>,
    pub start_at: i64,
    pub end_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestRegistrationForm {
    pub contest_identity: String,
}

/// Source code submitted for judging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitCode {
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_with_page() {
        let body = json!({
            "code": 200,
            "data": {
                "list": [{"identity": "p-1", "title": "A+B", "created_at": "2024-03-01 08:30:00"}],
                "count": 1
            }
        });
        let response: ApiResponse<Page<Problem>> = serde_json::from_value(body).unwrap();
        assert!(response.is_success());
        let page = response.into_data().unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.list[0].title, "A+B");
        assert_eq!(
            page.list[0].created_at.unwrap().format(server_time::FORMAT).to_string(),
            "2024-03-01 08:30:00"
        );
    }

    #[test]
    fn test_business_failure_envelope() {
        let response: ApiResponse<LoginData> =
            serde_json::from_value(json!({"code": -1, "msg": "用户名或密码错误"})).unwrap();
        assert!(!response.is_success());
        assert_eq!(response.msg.as_deref(), Some("用户名或密码错误"));
        assert!(response.data.is_none());
        match response.into_result() {
            Err(Error::Api { code, message }) => {
                assert_eq!(code, -1);
                assert_eq!(message, "用户名或密码错误");
            }
            other => panic!("expected api error, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_timestamp_is_rejected() {
        let result: std::result::Result<Category, _> =
            serde_json::from_value(json!({"created_at": "yesterday"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_optional_params_are_skipped() {
        let query = ProblemListQuery {
            page: Some(2),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&query).unwrap(), json!({"page": 2}));
    }

    #[test]
    fn test_wire_names() {
        let form = CategoryForm {
            identity: None,
            name: "graph".to_string(),
            parent_id: 0,
        };
        assert_eq!(
            serde_json::to_value(&form).unwrap(),
            json!({"name": "graph", "parentId": 0})
        );

        let contest = ContestForm {
            problem_basics: vec![1, 2],
            ..Default::default()
        };
        let value = serde_json::to_value(&contest).unwrap();
        assert_eq!(value["problem_basic"], json!([1, 2]));
        assert!(value.get("identity").is_none());
    }

    #[test]
    fn test_submit_status_codes() {
        for code in [-1, 1, 2, 3, 4, 5, 6] {
            let status = SubmitStatus::from_code(code).unwrap();
            assert_eq!(status.code(), code);
        }
        assert_eq!(SubmitStatus::from_code(0), None);

        let result = SubmitResult {
            status: 3,
            msg: "运行超时".to_string(),
        };
        assert_eq!(result.verdict(), Some(SubmitStatus::TimeLimitExceeded));
        assert_eq!(result.verdict().unwrap().label(), "time limit exceeded");
    }

    #[test]
    fn test_new_test_case_omits_identities() {
        let value = serde_json::to_value(TestCase::new("1 2", "3")).unwrap();
        assert_eq!(value, json!({"input": "1 2", "output": "3"}));
    }
}
