//! Problem command handlers

use super::utils::{accept, expect_data, read_form, with_spinner};
use super::Session;
use crate::cli::{OutputFormat, ProblemsAction, ProblemsArgs};
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use ojclient_core::{IdentityQuery, Problem, ProblemForm, ProblemListQuery};

/// Handle the problems command
pub async fn handle_problems(
    args: ProblemsArgs,
    session: &Session,
    output: &mut OutputWriter,
) -> Result<()> {
    match args.action {
        ProblemsAction::List {
            page,
            keyword,
            category,
        } => {
            let query = ProblemListQuery {
                page: page.page,
                size: page.size,
                keyword,
                category_identity: category,
            };
            let response =
                with_spinner(output, "Fetching problems...", session.api.problem_list(&query)).await?;
            output.page(&expect_data(response, "problem list")?)
        }
        ProblemsAction::Show(args) => {
            let query = IdentityQuery::new(args.identity);
            let response =
                with_spinner(output, "Fetching problem...", session.api.problem_detail(&query)).await?;
            let problem = expect_data(response, "problem")?;
            show_problem(&problem, output)
        }
        ProblemsAction::Create(args) => {
            let form: ProblemForm = read_form(&args.file)?;
            check_form(&form)?;
            tracing::info!(title = %form.title, cases = form.test_cases.len(), "Creating problem");
            let response =
                with_spinner(output, "Creating problem...", session.api.create_problem(&form)).await?;
            accept(response, output, &format!("Created problem '{}'", form.title))
        }
        ProblemsAction::Modify(args) => {
            let mut form: ProblemForm = read_form(&args.file)?;
            if let Some(identity) = args.identity {
                form.identity = Some(identity);
            }
            let identity = match form.identity.as_deref() {
                Some(identity) if !identity.is_empty() => identity.to_string(),
                _ => {
                    return Err(Error::invalid_args(
                        "problem identity is required: pass --identity or set it in the file",
                    ))
                }
            };
            check_form(&form)?;
            let response =
                with_spinner(output, "Modifying problem...", session.api.modify_problem(&form)).await?;
            accept(response, output, &format!("Modified problem {}", identity))
        }
    }
}

/// Reject forms the server would refuse anyway
fn check_form(form: &ProblemForm) -> Result<()> {
    if form.title.trim().is_empty() || form.content.trim().is_empty() {
        return Err(Error::invalid_args("problem title and content must not be empty"));
    }
    if form.problem_categories.is_empty() {
        return Err(Error::invalid_args("a problem needs at least one category"));
    }
    if form.test_cases.is_empty() {
        return Err(Error::invalid_args("a problem needs at least one test case"));
    }
    if form.max_runtime <= 0 || form.max_mem <= 0 {
        return Err(Error::invalid_args("max_runtime and max_mem must be positive"));
    }
    Ok(())
}

fn show_problem(problem: &Problem, output: &mut OutputWriter) -> Result<()> {
    if output.format() != OutputFormat::Human {
        return output.data(problem);
    }

    output.section(&format!("{} ({})", problem.title, problem.identity))?;
    output.writeln(&format!(
        "Limits: {} ms, {} MB",
        problem.max_runtime, problem.max_mem
    ))?;
    output.writeln(&format!(
        "Passed: {} / Submitted: {}",
        problem.pass_num, problem.submit_num
    ))?;

    let categories = problem
        .problem_categories
        .iter()
        .filter_map(|pc| pc.category_basic.as_ref().map(|c| c.name.clone()))
        .collect::<Vec<_>>();
    if !categories.is_empty() {
        output.writeln(&format!("Categories: {}", categories.join(", ")))?;
    }

    output.writeln("")?;
    output.writeln(&problem.content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{IdentityArgs, ModifyFileArgs};
    use crate::handlers::test_support;
    use mockito::Matcher;
    use serde_json::json;
    use std::fs;

    #[test]
    fn test_check_form() {
        let mut form = ProblemForm {
            title: "A+B".to_string(),
            content: "add".to_string(),
            problem_categories: vec![1],
            max_runtime: 1000,
            max_mem: 64,
            test_cases: vec![ojclient_core::TestCase::new("1 2", "3")],
            ..Default::default()
        };
        assert!(check_form(&form).is_ok());

        form.max_mem = 0;
        assert!(check_form(&form).is_err());
        form.max_mem = 64;

        form.test_cases.clear();
        assert!(check_form(&form).is_err());
    }

    #[tokio::test]
    async fn test_show_renders_problem() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/problem-detail")
            .match_query(Matcher::UrlEncoded("identity".into(), "p-1".into()))
            .with_status(200)
            .with_body(
                json!({
                    "code": 200,
                    "data": {"identity": "p-1", "title": "A+B", "content": "Add two numbers", "max_runtime": 1000, "max_mem": 64}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let (session, _dir) = test_support::session(&server.url());
        let (mut output, buffer) = test_support::writer(OutputFormat::Human);
        let args = ProblemsArgs {
            action: ProblemsAction::Show(IdentityArgs {
                identity: "p-1".to_string(),
            }),
        };
        handle_problems(args, &session, &mut output).await.unwrap();

        let text = buffer.contents();
        assert!(text.contains("=== A+B (p-1) ==="));
        assert!(text.contains("Limits: 1000 ms, 64 MB"));
        assert!(text.contains("Add two numbers"));
    }

    #[tokio::test]
    async fn test_modify_requires_identity() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("problem.json");
        fs::write(&path, r#"{"title": "A+B", "content": "add"}"#).unwrap();

        let (session, _token_dir) = test_support::session("http://127.0.0.1:1/");
        let (mut output, _) = test_support::writer(OutputFormat::Human);
        let args = ProblemsArgs {
            action: ProblemsAction::Modify(ModifyFileArgs {
                file: path,
                identity: None,
            }),
        };
        let err = handle_problems(args, &session, &mut output).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgs(_)));
    }
}
