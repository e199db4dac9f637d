//! Endpoint catalog against a mock judge server


use mockito::Matcher;
use ojclient_core::{
    CategoryForm, ContestForm, ContestRegistrationForm, Error, IdentityQuery, LoginForm,
    MultipartPayload, ProblemForm, ProblemListQuery, SubmitCode, SubmitListQuery, TestCase,
};
use serde_json::json;

#[tokio::test]
async fn test_problem_list_decodes_page() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/problem-list")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "2".into()),
            Matcher::UrlEncoded("keyword".into(), "sum".into()),
        ]))
        .match_header("authorization", "tok")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(test_support::ok_body(json!({
            "list": [
                {"identity": "p-1", "title": "A+B", "created_at": "2024-03-01 08:30:00"},
                {"identity": "p-2", "title": "Two Sum"}
            ],
            "count": 2
        })))
        .create_async()
        .await;

    let (api, _) = test_support::signed_in_api(&server.url(), "tok");
    let query = ProblemListQuery {
        page: Some(2),
        keyword: Some("sum".to_string()),
        ..Default::default()
    };
    let page = api.problem_list(&query).await.unwrap().into_result().unwrap().unwrap();

    assert_eq!(page.count, 2);
    assert_eq!(page.list[1].identity, "p-2");
    assert!(page.list[0].created_at.is_some());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_login_posts_urlencoded_form() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/login")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body("username=alice&password=s3cret%21")
        .with_status(200)
        .with_body(test_support::ok_body(json!({"token": "jwt", "is_admin": 1})))
        .create_async()
        .await;

    let (api, _) = test_support::signed_in_api(&server.url(), "");
    let form = LoginForm {
        username: "alice".to_string(),
        password: "s3cret!".to_string(),
    };
    let data = api.login(&form).await.unwrap().into_data().unwrap();

    assert_eq!(data.token, "jwt");
    assert_eq!(data.is_admin, 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_login_failure_envelope_becomes_api_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/login")
        .with_status(200)
        .with_body(r#"{"code": -1, "msg": "用户名或密码错误"}"#)
        .create_async()
        .await;

    let (api, notifier) = test_support::signed_in_api(&server.url(), "");
    let form = LoginForm {
        username: "alice".to_string(),
        password: "wrong".to_string(),
    };
    let err = api.login(&form).await.unwrap().into_result().unwrap_err();

    assert!(matches!(err, Error::Api { code: -1, .. }));
    assert!(notifier.is_empty());
}

#[tokio::test]
async fn test_category_create_and_modify_bodies() {
    let mut server = mockito::Server::new_async().await;
    let create = server
        .mock("POST", "/admin/category-create")
        .match_body("name=graph&parentId=0")
        .with_status(200)
        .with_body(test_support::ok_body(json!({})))
        .create_async()
        .await;
    let modify = server
        .mock("PUT", "/admin/category-modify")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body("identity=c-1&name=graphs&parentId=2")
        .with_status(200)
        .with_body(test_support::ok_body(json!({})))
        .create_async()
        .await;

    let (api, _) = test_support::signed_in_api(&server.url(), "admin");
    api.create_category(&CategoryForm {
        identity: None,
        name: "graph".to_string(),
        parent_id: 0,
    })
    .await
    .unwrap();
    api.modify_category(&CategoryForm {
        identity: Some("c-1".to_string()),
        name: "graphs".to_string(),
        parent_id: 2,
    })
    .await
    .unwrap();

    create.assert_async().await;
    modify.assert_async().await;
}

#[tokio::test]
async fn test_delete_category_uses_query() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("DELETE", "/admin/category-delete")
        .match_query(Matcher::UrlEncoded("identity".into(), "c-1".into()))
        .with_status(200)
        .with_body(test_support::ok_body(json!({})))
        .create_async()
        .await;

    let (api, _) = test_support::signed_in_api(&server.url(), "admin");
    api.delete_category(&IdentityQuery::new("c-1")).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_problem_create_and_modify_send_json() {
    let mut server = mockito::Server::new_async().await;
    let create = server
        .mock("POST", "/admin/problem-create")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "title": "A+B",
            "problem_categories": [1, 2],
            "test_cases": [{"input": "1 2", "output": "3"}]
        })))
        .with_status(200)
        .with_body(test_support::ok_body(json!({"identity": "p-9"})))
        .create_async()
        .await;
    let modify = server
        .mock("PUT", "/admin/problem-modify")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({"identity": "p-9", "max_mem": 128})))
        .with_status(200)
        .with_body(test_support::ok_body(json!({})))
        .create_async()
        .await;

    let (api, _) = test_support::signed_in_api(&server.url(), "admin");
    let mut form = ProblemForm {
        title: "A+B".to_string(),
        content: "add two numbers".to_string(),
        problem_categories: vec![1, 2],
        max_runtime: 1000,
        max_mem: 128,
        test_cases: vec![TestCase::new("1 2", "3")],
        ..Default::default()
    };
    api.create_problem(&form).await.unwrap();
    form.identity = Some("p-9".to_string());
    api.modify_problem(&form).await.unwrap();

    create.assert_async().await;
    modify.assert_async().await;
}

#[tokio::test]
async fn test_submit_code_encodes_identity_and_sends_multipart() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/user/submit")
        .match_query(Matcher::UrlEncoded("problem_identity".into(), "p 1&x".into()))
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".to_string()),
        )
        .match_body(Matcher::Regex(r#"name="code""#.to_string()))
        .with_status(200)
        .with_body(test_support::ok_body(json!({"status": 1, "msg": "答案正确"})))
        .create_async()
        .await;

    let (api, _) = test_support::signed_in_api(&server.url(), "tok");
    let code = SubmitCode {
        code: "package main".to_string(),
    };
    let verdict = api
        .submit_code("p 1&x", &code)
        .await
        .unwrap()
        .into_data()
        .unwrap();

    assert_eq!(verdict.status, 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_submit_list_filters() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/submit-list")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("user_identity".into(), "u-1".into()),
            Matcher::UrlEncoded("status".into(), "1".into()),
        ]))
        .with_status(200)
        .with_body(test_support::ok_body(json!({"list": [{"identity": "s-1", "status": 1}], "count": 1})))
        .create_async()
        .await;

    let (api, _) = test_support::signed_in_api(&server.url(), "tok");
    let query = SubmitListQuery {
        user_identity: Some("u-1".to_string()),
        status: Some(1),
        ..Default::default()
    };
    let page = api.submit_list(&query).await.unwrap().into_data().unwrap();
    assert_eq!(page.list[0].identity, "s-1");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_contest_lifecycle_routes() {
    let mut server = mockito::Server::new_async().await;
    let create = server
        .mock("POST", "/admin/contest-create")
        .match_body(Matcher::PartialJson(json!({"name": "weekly", "problem_basic": [3]})))
        .with_status(200)
        .with_body(test_support::ok_body(json!({})))
        .create_async()
        .await;
    let join = server
        .mock("POST", "/user/contest-registration")
        .match_query(Matcher::UrlEncoded("contest_identity".into(), "k-1".into()))
        .with_status(200)
        .with_body(test_support::ok_body(json!({})))
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/admin/contest-delete")
        .match_query(Matcher::UrlEncoded("identity".into(), "k-1".into()))
        .with_status(200)
        .with_body(test_support::ok_body(json!({})))
        .create_async()
        .await;

    let (api, _) = test_support::signed_in_api(&server.url(), "admin");
    api.create_contest(&ContestForm {
        name: "weekly".to_string(),
        problem_basics: vec![3],
        start_at: 1_700_000_000,
        end_at: 1_700_003_600,
        ..Default::default()
    })
    .await
    .unwrap();
    api.register_contest(&ContestRegistrationForm {
        contest_identity: "k-1".to_string(),
    })
    .await
    .unwrap();
    api.delete_contest(&IdentityQuery::new("k-1")).await.unwrap();

    create.assert_async().await;
    join.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn test_upload_targets_base_endpoint() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_body(Matcher::Regex(r#"filename="main.go""#.to_string()))
        .with_status(200)
        .with_body(test_support::ok_body(json!({"path": "/uploads/main.go"})))
        .create_async()
        .await;

    let (api, _) = test_support::signed_in_api(&server.url(), "tok");
    let payload = MultipartPayload::new()
        .text("kind", "source")
        .file("file", "main.go", b"package main".to_vec(), None);
    let body = api.upload_file(payload).await.unwrap();

    assert!(body.is_success());
    mock.assert_async().await;
}
