//! Judging command handlers: submissions, rankings, uploads and test cases

use super::utils::{expect_data, parse_key_value, with_spinner};
use super::Session;
use crate::cli::{IdentityArgs, OutputFormat, PageArgs, SubmissionsArgs, SubmitArgs, UploadArgs};
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use colored::Colorize;
use ojclient_core::{
    IdentityQuery, MultipartPayload, PageQuery, SubmitCode, SubmitListQuery, SubmitResult,
    SubmitStatus,
};
use std::fs;

/// Handle the submit command
pub async fn handle_submit(args: SubmitArgs, session: &Session, output: &mut OutputWriter) -> Result<()> {
    if !args.source.exists() {
        return Err(Error::FileNotFound { path: args.source });
    }
    let code = SubmitCode {
        code: fs::read_to_string(&args.source)?,
    };
    if code.code.trim().is_empty() {
        return Err(Error::invalid_args(format!(
            "{} is empty",
            args.source.display()
        )));
    }

    tracing::info!(
        problem = %args.problem,
        bytes = code.code.len(),
        "Submitting solution"
    );
    let response = with_spinner(
        output,
        "Judging...",
        session.api.submit_code(&args.problem, &code),
    )
    .await?;
    let result = expect_data(response, "verdict")?;
    show_verdict(&result, output)
}

fn show_verdict(result: &SubmitResult, output: &mut OutputWriter) -> Result<()> {
    if output.format() != OutputFormat::Human {
        return output.data(result);
    }

    let label = result
        .verdict()
        .map(|s| s.label().to_string())
        .unwrap_or_else(|| format!("status {}", result.status));
    let line = if result.msg.is_empty() {
        label
    } else {
        format!("{}: {}", label, result.msg)
    };

    match result.verdict() {
        Some(SubmitStatus::Accepted) => output.success(&format!("✓ {}", line)),
        Some(SubmitStatus::Pending) => output.info(&line),
        _ => {
            let line = format!("✗ {}", line);
            if output.use_color() {
                output.writeln(&line.red().to_string())
            } else {
                output.writeln(&line)
            }
        }
    }
}

/// Handle the submissions command
pub async fn handle_submissions(
    args: SubmissionsArgs,
    session: &Session,
    output: &mut OutputWriter,
) -> Result<()> {
    let query = SubmitListQuery {
        page: args.page.page,
        size: args.page.size,
        problem_identity: args.problem,
        user_identity: args.user,
        status: args.status,
    };
    let response =
        with_spinner(output, "Fetching submissions...", session.api.submit_list(&query)).await?;
    output.page(&expect_data(response, "submission list")?)
}

/// Handle the ranks command
pub async fn handle_ranks(args: PageArgs, session: &Session, output: &mut OutputWriter) -> Result<()> {
    let query = PageQuery {
        page: args.page,
        size: args.size,
    };
    let response = with_spinner(output, "Fetching ranking...", session.api.rank_list(&query)).await?;
    output.page(&expect_data(response, "rank list")?)
}

/// Handle the test-cases command
pub async fn handle_test_cases(
    args: IdentityArgs,
    session: &Session,
    output: &mut OutputWriter,
) -> Result<()> {
    let query = IdentityQuery::new(args.identity);
    let response =
        with_spinner(output, "Fetching test cases...", session.api.test_cases(&query)).await?;
    output.page(&expect_data(response, "test cases")?)
}

/// Handle the upload command
pub async fn handle_upload(args: UploadArgs, session: &Session, output: &mut OutputWriter) -> Result<()> {
    if !args.file.exists() {
        return Err(Error::FileNotFound { path: args.file });
    }

    let mut payload = MultipartPayload::new();
    for raw in &args.text {
        let (key, value) = parse_key_value(raw)?;
        payload = payload.text(key, value);
    }
    let payload = payload.file_from_path(args.field, &args.file).await?;

    let response = with_spinner(output, "Uploading...", session.api.upload_file(payload)).await?;
    let message = response.msg.clone();
    let data = response.into_result()?;

    if output.format() != OutputFormat::Human {
        return output.data(&serde_json::json!({ "msg": message, "data": data }));
    }
    output.success(&format!("✓ Uploaded {}", args.file.display()))?;
    if let Some(data) = data.filter(|d| !d.is_null()) {
        output.data(&data)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support;
    use mockito::Matcher;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_submit_prints_verdict() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/user/submit")
            .match_query(Matcher::UrlEncoded("problem_identity".into(), "p-1".into()))
            .match_body(Matcher::Regex("package main".to_string()))
            .with_status(200)
            .with_body(json!({"code": 200, "data": {"status": 2, "msg": "case 3"}}).to_string())
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let source = dir.path().join("main.go");
        fs::write(&source, "package main\n").unwrap();

        let (session, _token_dir) = test_support::session(&server.url());
        let (mut output, buffer) = test_support::writer(OutputFormat::Human);
        let args = SubmitArgs {
            problem: "p-1".to_string(),
            source,
        };
        handle_submit(args, &session, &mut output).await.unwrap();

        assert_eq!(buffer.contents().trim(), "✗ wrong answer: case 3");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_submit_missing_source() {
        let (session, _dir) = test_support::session("http://127.0.0.1:1/");
        let (mut output, _) = test_support::writer(OutputFormat::Human);
        let args = SubmitArgs {
            problem: "p-1".to_string(),
            source: "/no/such/main.go".into(),
        };
        let err = handle_submit(args, &session, &mut output).await.unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[tokio::test]
    async fn test_submissions_json_output() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/submit-list")
            .match_query(Matcher::UrlEncoded("status".into(), "-1".into()))
            .with_status(200)
            .with_body(json!({"code": 200, "data": {"list": [{"identity": "s-1", "status": -1}], "count": 1}}).to_string())
            .create_async()
            .await;

        let (session, _dir) = test_support::session(&server.url());
        let (mut output, buffer) = test_support::writer(OutputFormat::Json);
        let args = SubmissionsArgs {
            page: PageArgs::default(),
            problem: None,
            user: None,
            status: Some(-1),
        };
        handle_submissions(args, &session, &mut output).await.unwrap();

        let printed: serde_json::Value = serde_json::from_str(buffer.contents().trim()).unwrap();
        assert_eq!(printed["count"], 1);
        assert_eq!(printed["list"][0]["identity"], "s-1");
    }

    #[tokio::test]
    async fn test_upload_sends_text_fields() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="kind""#.to_string()),
                Matcher::Regex(r#"filename="data.txt""#.to_string()),
            ]))
            .with_status(200)
            .with_body(r#"{"code": 200, "data": null}"#)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let file = dir.path().join("data.txt");
        fs::write(&file, "1 2\n").unwrap();

        let (session, _token_dir) = test_support::session(&server.url());
        let (mut output, buffer) = test_support::writer(OutputFormat::Human);
        let args = UploadArgs {
            file,
            field: "file".to_string(),
            text: vec!["kind=input".to_string()],
        };
        handle_upload(args, &session, &mut output).await.unwrap();

        assert!(buffer.contents().contains("Uploaded"));
        mock.assert_async().await;
    }
}
