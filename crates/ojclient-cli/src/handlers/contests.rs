//! Contest command handlers
//!
//! Contest forms carry `start_at` and `end_at` as Unix seconds. Form files
//! may also spell them as RFC 3339 timestamps or as `YYYY-MM-DD HH:MM:SS`
//! in local time; both are converted before the form is sent.

use super::utils::{accept, expect_data, form_from_value, read_document, with_spinner};
use super::Session;
use crate::cli::{ContestsAction, ContestsArgs, FormFileArgs, ModifyFileArgs, OutputFormat};
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use chrono::{DateTime, Local, NaiveDateTime};
use ojclient_core::types::server_time;
use ojclient_core::{Contest, ContestForm, ContestListQuery, ContestRegistrationForm, IdentityQuery};
use serde_json::Value;
use std::path::Path;

const TIME_FIELDS: [&str; 2] = ["start_at", "end_at"];

/// Handle the contests command
pub async fn handle_contests(
    args: ContestsArgs,
    session: &Session,
    output: &mut OutputWriter,
) -> Result<()> {
    match args.action {
        ContestsAction::List { page, keyword } => {
            let query = ContestListQuery {
                page: page.page,
                size: page.size,
                keyword,
            };
            let response =
                with_spinner(output, "Fetching contests...", session.api.contest_list(&query)).await?;
            output.page(&expect_data(response, "contest list")?)
        }
        ContestsAction::Show(args) => {
            let query = IdentityQuery::new(args.identity);
            let response =
                with_spinner(output, "Fetching contest...", session.api.contest_detail(&query)).await?;
            show_contest(&expect_data(response, "contest")?, output)
        }
        ContestsAction::Create(FormFileArgs { file }) => {
            let form = read_contest_form(&file)?;
            tracing::info!(name = %form.name, problems = form.problem_basics.len(), "Creating contest");
            let response =
                with_spinner(output, "Creating contest...", session.api.create_contest(&form)).await?;
            accept(response, output, &format!("Created contest '{}'", form.name))
        }
        ContestsAction::Modify(ModifyFileArgs { file, identity }) => {
            let mut form = read_contest_form(&file)?;
            if let Some(identity) = identity {
                form.identity = Some(identity);
            }
            let identity = match form.identity.as_deref() {
                Some(identity) if !identity.is_empty() => identity.to_string(),
                _ => {
                    return Err(Error::invalid_args(
                        "contest identity is required: pass --identity or set it in the file",
                    ))
                }
            };
            let response =
                with_spinner(output, "Modifying contest...", session.api.modify_contest(&form)).await?;
            accept(response, output, &format!("Modified contest {}", identity))
        }
        ContestsAction::Delete(args) => {
            let query = IdentityQuery::new(args.identity);
            let response =
                with_spinner(output, "Deleting contest...", session.api.delete_contest(&query)).await?;
            accept(response, output, &format!("Deleted contest {}", query.identity))
        }
        ContestsAction::Join(args) => {
            let form = ContestRegistrationForm {
                contest_identity: args.identity,
            };
            let response =
                with_spinner(output, "Registering...", session.api.register_contest(&form)).await?;
            accept(
                response,
                output,
                &format!("Registered for contest {}", form.contest_identity),
            )
        }
    }
}

/// Read a contest form, converting textual times and checking the window
fn read_contest_form(path: &Path) -> Result<ContestForm> {
    let mut document = read_document(path)?;
    if let Some(fields) = document.as_object_mut() {
        for field in TIME_FIELDS {
            let seconds = match fields.get(field) {
                Some(Value::String(raw)) => parse_time(raw).ok_or_else(|| {
                    Error::invalid_args(format!("{}: unrecognized time '{}'", field, raw))
                })?,
                _ => continue,
            };
            fields.insert(field.to_string(), Value::from(seconds));
        }
    }

    let form: ContestForm = form_from_value(path, document)?;
    check_form(&form)?;
    Ok(form)
}

/// Unix seconds from an RFC 3339 timestamp or a local `YYYY-MM-DD HH:MM:SS`
fn parse_time(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(seconds) = raw.parse::<i64>() {
        return Some(seconds);
    }
    if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
        return Some(time.timestamp());
    }
    NaiveDateTime::parse_from_str(raw, server_time::FORMAT)
        .ok()
        .and_then(|naive| naive.and_local_timezone(Local).earliest())
        .map(|time| time.timestamp())
}

fn check_form(form: &ContestForm) -> Result<()> {
    if form.name.trim().is_empty() || form.content.trim().is_empty() {
        return Err(Error::invalid_args("contest name and content must not be empty"));
    }
    if form.problem_basics.is_empty() {
        return Err(Error::invalid_args("a contest needs at least one problem"));
    }
    if form.start_at >= form.end_at {
        return Err(Error::invalid_args("contest start_at must be earlier than end_at"));
    }
    Ok(())
}

fn show_contest(contest: &Contest, output: &mut OutputWriter) -> Result<()> {
    if output.format() != OutputFormat::Human {
        return output.data(contest);
    }

    let time = |t: &Option<NaiveDateTime>| {
        t.map(|t| t.format(server_time::FORMAT).to_string())
            .unwrap_or_else(|| "-".to_string())
    };

    output.section(&format!("{} ({})", contest.name, contest.identity))?;
    output.writeln(&format!("Starts: {}", time(&contest.start_at)))?;
    output.writeln(&format!("Ends:   {}", time(&contest.end_at)))?;
    output.writeln("")?;
    output.writeln(&contest.content)?;

    let problems = contest
        .contest_problems
        .iter()
        .filter_map(|cp| cp.problem_basic.as_ref())
        .map(|p| vec![p.identity.clone(), p.title.clone()])
        .collect::<Vec<_>>();
    if !problems.is_empty() {
        output.writeln("")?;
        output.table(&["IDENTITY", "TITLE"], problems)?;
    }
    Ok(())
}
