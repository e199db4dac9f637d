//! Shared utilities for command handlers

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use ojclient_core::ApiResponse;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::future::Future;
use std::path::Path;

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false)
}

/// Read a JSON or YAML document into an untyped value
pub fn read_document(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;

    if is_yaml(path) {
        serde_yaml::from_str(&content).map_err(|e| {
            tracing::debug!(path = %path.display(), error = %e, "YAML parse failed");
            Error::InvalidFormat {
                path: path.to_path_buf(),
                expected: "YAML".to_string(),
            }
        })
    } else {
        serde_json::from_str(&content).map_err(|e| {
            tracing::debug!(path = %path.display(), error = %e, "JSON parse failed");
            Error::InvalidFormat {
                path: path.to_path_buf(),
                expected: "JSON".to_string(),
            }
        })
    }
}

/// Read a request form from a JSON or YAML file
pub fn read_form<T: DeserializeOwned>(path: &Path) -> Result<T> {
    form_from_value(path, read_document(path)?)
}

/// Turn an already-read document into a request form
pub fn form_from_value<T: DeserializeOwned>(path: &Path, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::InvalidFormat {
        path: path.to_path_buf(),
        expected: format!("form ({})", e),
    })
}

/// Await a request while a spinner runs
pub async fn with_spinner<F, T>(output: &OutputWriter, message: &str, request: F) -> T
where
    F: Future<Output = T>,
{
    let spinner = output.spinner(message);
    let result = request.await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    result
}

/// Data of a successful envelope, failing when the server sent none
pub fn expect_data<T>(response: ApiResponse<T>, what: &str) -> Result<T> {
    response.into_result()?.ok_or_else(|| Error::EmptyResponse {
        what: what.to_string(),
    })
}

/// Report the outcome of a call whose data is not interesting on its own
pub fn accept(response: ApiResponse<Value>, output: &mut OutputWriter, done: &str) -> Result<()> {
    let message = response.msg.clone();
    let data = response.into_result()?;

    if output.format() == OutputFormat::Human {
        output.success(&format!("✓ {}", done))?;
        if let Some(message) = message.filter(|m| !m.is_empty()) {
            output.info(&message)?;
        }
        Ok(())
    } else {
        output.data(&serde_json::json!({
            "msg": message,
            "data": data,
        }))
    }
}

/// Split a `KEY=VALUE` argument
pub fn parse_key_value(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(Error::invalid_args(format!(
            "expected KEY=VALUE, got '{}'",
            raw
        ))),
    }
}
