//! OJ Client CLI - command-line access to an online-judge server
//!
//! This is the main entry point for the `ojclient` application, providing
//! commands for browsing problems, submitting solutions, and administering
//! categories, problems and contests.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod notify;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use handlers::Session;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;
use tracing_appender::non_blocking::WorkerGuard;

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Set up colored output
    control::set_override(cli.use_color());

    let result = match load_config(&cli) {
        Ok(config) => {
            // Keep the guard alive so file logs are flushed on exit
            let _guard = match init_logging(&cli, &config) {
                Ok(guard) => guard,
                Err(e) => {
                    eprintln!("Failed to initialize logging: {}", e);
                    None
                }
            };
            run(cli, config).await
        }
        Err(e) => Err(e),
    };

    // Handle the result
    match result {
        Ok(()) => {
            process::exit(0);
        }
        Err(e) => {
            eprintln!(
                "{}",
                error::format_error(&e, control::SHOULD_COLORIZE.should_colorize())
            );

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

/// Load the configuration file and layer flag/environment overrides on top
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load_with_file(cli.config.as_deref())?;
    config.apply_overrides(cli.base_url.clone(), cli.timeout_ms)?;
    Ok(config)
}

/// Main application logic
#[instrument(skip(cli, config), fields(command = ?cli.command))]
async fn run(cli: Cli, config: Config) -> Result<()> {
    let timer = Timer::new("cli_execution");

    let use_color = cli.use_color() && config.output.color;
    let mut output = OutputWriter::new(cli.output, use_color, cli.quiet, config.output.progress);

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        base_url = %config.server.base_url,
        "Executing command"
    );

    let result = match cli.command {
        Commands::Config(args) => handlers::handle_config(args, &config, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args),
        command => {
            let session = Session::open(&config, use_color)?;
            dispatch(command, &session, &mut output).await
        }
    };

    tracing::debug!(elapsed_ms = timer.elapsed().as_millis() as u64, "Command finished");
    result
}

/// Route a server-bound command to its handler
async fn dispatch(command: Commands, session: &Session, output: &mut OutputWriter) -> Result<()> {
    match command {
        Commands::Problems(args) => handlers::handle_problems(args, session, output).await,
        Commands::Categories(args) => handlers::handle_categories(args, session, output).await,
        Commands::Ranks(args) => handlers::handle_ranks(args, session, output).await,
        Commands::Submissions(args) => handlers::handle_submissions(args, session, output).await,
        Commands::Submit(args) => handlers::handle_submit(args, session, output).await,
        Commands::Upload(args) => handlers::handle_upload(args, session, output).await,
        Commands::SendCode(args) => handlers::handle_send_code(args, session, output).await,
        Commands::Register(args) => handlers::handle_register(args, session, output).await,
        Commands::Login(args) => handlers::handle_login(args, session, output).await,
        Commands::Logout => handlers::handle_logout(session, output),
        Commands::User(args) => handlers::handle_user(args, session, output).await,
        Commands::Contests(args) => handlers::handle_contests(args, session, output).await,
        Commands::TestCases(args) => handlers::handle_test_cases(args, session, output).await,
        Commands::Config(_) | Commands::Completions(_) => Ok(()),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: &Config) -> Result<Option<WorkerGuard>> {
    // Create logging configuration from CLI args
    let mut logging_config = LoggingConfig::from_verbosity(cli.verbosity_level());

    // Layer the config file and then the environment on top
    logging_config.apply_file_config(&config.logging, cli.verbosity_level());
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing() {
        // Test verbose flag
        let cli = Cli::parse_from(["ojclient", "-vv", "ranks"]);
        assert_eq!(cli.verbosity_level(), 2);

        // Test quiet flag
        let cli = Cli::parse_from(["ojclient", "--quiet", "problems", "list"]);
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[test]
    fn test_load_config_applies_overrides() {
        let cli = Cli::parse_from([
            "ojclient",
            "--config",
            "/definitely/not/here.yaml",
            "ranks",
        ]);
        assert!(load_config(&cli).is_err());

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"server": {"base_url": "http://file.test/"}}"#).unwrap();
        let path_arg = path.display().to_string();
        let cli = Cli::parse_from([
            "ojclient",
            "--config",
            path_arg.as_str(),
            "--timeout-ms",
            "750",
            "ranks",
        ]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.server.base_url, "http://file.test/");
        assert_eq!(config.server.timeout_ms, 750);
    }
}
