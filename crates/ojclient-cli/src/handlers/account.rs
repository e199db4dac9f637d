//! Account command handlers: registration, login and profiles

use super::utils::{accept, expect_data, with_spinner};
use super::Session;
use crate::cli::{IdentityArgs, LoginArgs, OutputFormat, RegisterArgs, SendCodeArgs};
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use ojclient_core::types::server_time;
use ojclient_core::{IdentityQuery, LoginForm, RegisterForm, SendCodeForm, User};

/// Handle the send-code command
pub async fn handle_send_code(
    args: SendCodeArgs,
    session: &Session,
    output: &mut OutputWriter,
) -> Result<()> {
    if !args.email.contains('@') {
        return Err(Error::invalid_args(format!(
            "'{}' is not an email address",
            args.email
        )));
    }
    let form = SendCodeForm { email: args.email };
    let response = with_spinner(output, "Sending code...", session.api.send_code(&form)).await?;
    accept(response, output, &format!("Code sent to {}", form.email))
}

/// Handle the register command, keeping the returned token
pub async fn handle_register(
    args: RegisterArgs,
    session: &Session,
    output: &mut OutputWriter,
) -> Result<()> {
    let form = RegisterForm {
        mail: args.mail,
        code: args.code,
        name: args.name,
        password: args.password,
        phone: args.phone,
    };
    let response = with_spinner(output, "Registering...", session.api.register(&form)).await?;
    let data = expect_data(response, "registration token")?;
    remember_token(session, &data.token)?;

    output.success(&format!("✓ Registered and signed in as {}", form.name))
}

/// Handle the login command, keeping the returned token
pub async fn handle_login(args: LoginArgs, session: &Session, output: &mut OutputWriter) -> Result<()> {
    let form = LoginForm {
        username: args.username,
        password: args.password,
    };
    let response = with_spinner(output, "Signing in...", session.api.login(&form)).await?;
    let data = expect_data(response, "login token")?;
    remember_token(session, &data.token)?;

    let role = if data.is_admin == 1 { " (admin)" } else { "" };
    output.success(&format!("✓ Signed in as {}{}", form.username, role))
}

/// Handle the logout command
pub fn handle_logout(session: &Session, output: &mut OutputWriter) -> Result<()> {
    session.token_store.clear()?;
    tracing::info!(path = %session.token_store.path().display(), "Token cleared");
    output.success("✓ Signed out")
}

/// Handle the user command
pub async fn handle_user(args: IdentityArgs, session: &Session, output: &mut OutputWriter) -> Result<()> {
    let query = IdentityQuery::new(args.identity);
    let response = with_spinner(output, "Fetching user...", session.api.user_detail(&query)).await?;
    let user = expect_data(response, "user")?;
    show_user(&user, output)
}

fn remember_token(session: &Session, token: &str) -> Result<()> {
    if token.is_empty() {
        return Err(Error::EmptyResponse {
            what: "token".to_string(),
        });
    }
    session.token_store.store(token)?;
    tracing::info!(path = %session.token_store.path().display(), "Token stored");
    Ok(())
}

fn show_user(user: &User, output: &mut OutputWriter) -> Result<()> {
    if output.format() != OutputFormat::Human {
        return output.data(user);
    }

    output.section(&user.name)?;
    output.writeln(&format!("Identity:  {}", user.identity))?;
    if !user.mail.is_empty() {
        output.writeln(&format!("Mail:      {}", user.mail))?;
    }
    if !user.phone.is_empty() {
        output.writeln(&format!("Phone:     {}", user.phone))?;
    }
    output.writeln(&format!(
        "Passed:    {} of {} submissions",
        user.pass_num, user.submit_num
    ))?;
    if user.is_admin() {
        output.writeln("Role:      admin")?;
    }
    if let Some(created) = user.created_at {
        output.writeln(&format!(
            "Joined:    {}",
            created.format(server_time::FORMAT)
        ))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support;
    use ojclient_core::TokenStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_login_then_logout_manages_token_file() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/login")
            .match_body("username=alice&password=s3cret")
            .with_status(200)
            .with_body(json!({"code": 200, "data": {"token": "jwt-abc", "is_admin": 0}}).to_string())
            .create_async()
            .await;

        let (session, _dir) = test_support::session(&server.url());
        let (mut output, buffer) = test_support::writer(OutputFormat::Human);

        let args = LoginArgs {
            username: "alice".to_string(),
            password: "s3cret".to_string(),
        };
        handle_login(args, &session, &mut output).await.unwrap();
        assert_eq!(session.token_store.get().unwrap().as_deref(), Some("jwt-abc"));
        assert!(buffer.contents().contains("Signed in as alice"));

        handle_logout(&session, &mut output).unwrap();
        assert_eq!(session.token_store.get().unwrap(), None);
    }

    #[tokio::test]
    async fn test_stored_token_is_sent_on_later_calls() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/user-detail")
            .match_header("authorization", "jwt-abc")
            .match_query(mockito::Matcher::UrlEncoded("identity".into(), "u-1".into()))
            .with_status(200)
            .with_body(json!({"code": 200, "data": {"identity": "u-1", "name": "alice", "pass_num": 3, "submit_num": 5}}).to_string())
            .create_async()
            .await;

        let (session, _dir) = test_support::session(&server.url());
        session.token_store.store("jwt-abc").unwrap();
        let (mut output, buffer) = test_support::writer(OutputFormat::Human);

        let args = IdentityArgs {
            identity: "u-1".to_string(),
        };
        handle_user(args, &session, &mut output).await.unwrap();

        assert!(buffer.contents().contains("Passed:    3 of 5 submissions"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_failed_login_keeps_previous_token() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/login")
            .with_status(200)
            .with_body(r#"{"code": -1, "msg": "wrong username or password"}"#)
            .create_async()
            .await;

        let (session, _dir) = test_support::session(&server.url());
        session.token_store.store("old").unwrap();
        let (mut output, _) = test_support::writer(OutputFormat::Human);

        let args = LoginArgs {
            username: "alice".to_string(),
            password: "nope".to_string(),
        };
        let err = handle_login(args, &session, &mut output).await.unwrap_err();

        assert_eq!(err.exit_code(), 3);
        assert_eq!(session.token_store.get().unwrap().as_deref(), Some("old"));
    }
}
