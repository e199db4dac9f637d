//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Args, Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::path::PathBuf;

/// OJ Client - command-line access to the online-judge API
///
/// Browse problems and rankings, submit solutions, and administer
/// categories, problems and contests on an online-judge server.
#[derive(Parser, Debug)]
#[command(
    name = "ojclient",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "OJCLIENT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Server base URL (overrides the configuration file)
    #[arg(long, global = true, env = "OJCLIENT_BASE_URL")]
    pub base_url: Option<String>,

    /// Request timeout in milliseconds (overrides the configuration file)
    #[arg(long, global = true, env = "OJCLIENT_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse and administer problems
    Problems(ProblemsArgs),

    /// Browse and administer problem categories
    Categories(CategoriesArgs),

    /// Show the user ranking
    Ranks(PageArgs),

    /// List submissions
    Submissions(SubmissionsArgs),

    /// Submit a source file for judging
    Submit(SubmitArgs),

    /// Upload a file to the server
    Upload(UploadArgs),

    /// Send a registration code to an email address
    SendCode(SendCodeArgs),

    /// Register a new account
    Register(RegisterArgs),

    /// Log in and store the session token
    Login(LoginArgs),

    /// Forget the stored session token
    Logout,

    /// Show a user's profile
    User(IdentityArgs),

    /// Browse, administer and join contests
    Contests(ContestsArgs),

    /// List the test cases of a problem (admin)
    TestCases(IdentityArgs),

    /// Manage configuration files and settings
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Paging shared by list commands
#[derive(Args, Debug, Clone, Default)]
pub struct PageArgs {
    /// Page number, starting at 1
    #[arg(long)]
    pub page: Option<u32>,

    /// Rows per page
    #[arg(long)]
    pub size: Option<u32>,
}

/// A single identity argument
#[derive(Args, Debug, Clone)]
pub struct IdentityArgs {
    /// Identity of the record
    #[arg(value_name = "IDENTITY")]
    pub identity: String,
}

/// Arguments for the problems command
#[derive(Parser, Debug)]
pub struct ProblemsArgs {
    #[command(subcommand)]
    pub action: ProblemsAction,
}

/// Problem actions
#[derive(Subcommand, Debug)]
pub enum ProblemsAction {
    /// List problems
    List {
        #[command(flatten)]
        page: PageArgs,

        /// Filter by title or content keyword
        #[arg(short, long)]
        keyword: Option<String>,

        /// Filter by category identity
        #[arg(long)]
        category: Option<String>,
    },

    /// Show one problem
    Show(IdentityArgs),

    /// Create a problem from a JSON or YAML file (admin)
    Create(FormFileArgs),

    /// Modify a problem from a JSON or YAML file (admin)
    Modify(ModifyFileArgs),
}

/// A request form read from disk
#[derive(Args, Debug)]
pub struct FormFileArgs {
    /// Path to the form (JSON or YAML)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// A modify form read from disk, with an optional identity override
#[derive(Args, Debug)]
pub struct ModifyFileArgs {
    /// Path to the form (JSON or YAML)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Identity of the record to modify (overrides the file)
    #[arg(long)]
    pub identity: Option<String>,
}

/// Arguments for the categories command
#[derive(Parser, Debug)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    pub action: CategoriesAction,
}

/// Category actions
#[derive(Subcommand, Debug)]
pub enum CategoriesAction {
    /// List categories
    List {
        #[command(flatten)]
        page: PageArgs,

        /// Filter by name keyword
        #[arg(short, long)]
        keyword: Option<String>,
    },

    /// Create a category (admin)
    Create {
        /// Category name
        name: String,

        /// Numeric id of the parent category, 0 for top level
        #[arg(long, default_value_t = 0)]
        parent_id: i64,
    },

    /// Modify a category (admin)
    Modify {
        /// Category identity
        identity: String,

        /// New name
        name: String,

        /// Numeric id of the parent category, 0 for top level
        #[arg(long, default_value_t = 0)]
        parent_id: i64,
    },

    /// Delete a category (admin)
    Delete(IdentityArgs),
}

/// Arguments for the submissions command
#[derive(Parser, Debug)]
pub struct SubmissionsArgs {
    #[command(flatten)]
    pub page: PageArgs,

    /// Only submissions for this problem identity
    #[arg(long)]
    pub problem: Option<String>,

    /// Only submissions by this user identity
    #[arg(long)]
    pub user: Option<String>,

    /// Only submissions with this status code
    #[arg(long, allow_hyphen_values = true)]
    pub status: Option<i64>,
}

/// Arguments for the submit command
#[derive(Parser, Debug)]
pub struct SubmitArgs {
    /// Identity of the problem being solved
    #[arg(value_name = "PROBLEM")]
    pub problem: String,

    /// Source file to submit
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,
}

/// Arguments for the upload command
#[derive(Parser, Debug)]
pub struct UploadArgs {
    /// File to upload
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Form field name for the file
    #[arg(long, default_value = "file")]
    pub field: String,

    /// Extra text fields as KEY=VALUE
    #[arg(long = "text", value_name = "KEY=VALUE")]
    pub text: Vec<String>,
}

/// Arguments for the send-code command
#[derive(Parser, Debug)]
pub struct SendCodeArgs {
    /// Address the code is mailed to
    #[arg(value_name = "EMAIL")]
    pub email: String,
}

/// Arguments for the register command
#[derive(Parser, Debug)]
pub struct RegisterArgs {
    /// Email address the code was sent to
    #[arg(long)]
    pub mail: String,

    /// Code received by email
    #[arg(long)]
    pub code: String,

    /// Account name
    #[arg(long)]
    pub name: String,

    /// Account password
    #[arg(long, env = "OJCLIENT_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Phone number
    #[arg(long, default_value = "")]
    pub phone: String,
}

/// Arguments for the login command
#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// Account name
    #[arg(value_name = "USERNAME")]
    pub username: String,

    /// Account password
    #[arg(long, env = "OJCLIENT_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Arguments for the contests command
#[derive(Parser, Debug)]
pub struct ContestsArgs {
    #[command(subcommand)]
    pub action: ContestsAction,
}

/// Contest actions
#[derive(Subcommand, Debug)]
pub enum ContestsAction {
    /// List contests
    List {
        #[command(flatten)]
        page: PageArgs,

        /// Filter by name keyword
        #[arg(short, long)]
        keyword: Option<String>,
    },

    /// Show one contest
    Show(IdentityArgs),

    /// Create a contest from a JSON or YAML file (admin)
    Create(FormFileArgs),

    /// Modify a contest from a JSON or YAML file (admin)
    Modify(ModifyFileArgs),

    /// Delete a contest (admin)
    Delete(IdentityArgs),

    /// Register for a contest
    Join(IdentityArgs),
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show(ConfigShowArgs),

    /// Write a default configuration file
    Init(ConfigInitArgs),

    /// Print where configuration and the token are read from
    Path,
}

/// Arguments for config show
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "yaml")]
    pub format: ConfigFormat,
}

/// Arguments for config init
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Where to write the file (defaults to the user config directory)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Force overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli {
            verbose: 2,
            quiet: false,
            config: None,
            output: OutputFormat::Human,
            no_color: false,
            base_url: None,
            timeout_ms: None,
            command: Commands::Logout,
        };
        assert_eq!(cli.verbosity_level(), 2);

        let quiet_cli = Cli {
            verbose: 2,
            quiet: true,
            ..cli
        };
        assert_eq!(quiet_cli.verbosity_level(), 0);
    }

    #[test]
    fn test_problem_list_flags() {
        let cli = Cli::parse_from([
            "ojclient", "problems", "list", "--page", "2", "--keyword", "sum", "--category", "c-1",
        ]);
        match cli.command {
            Commands::Problems(ProblemsArgs {
                action: ProblemsAction::List { page, keyword, category },
            }) => {
                assert_eq!(page.page, Some(2));
                assert_eq!(page.size, None);
                assert_eq!(keyword.as_deref(), Some("sum"));
                assert_eq!(category.as_deref(), Some("c-1"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_overrides_after_subcommand() {
        let cli = Cli::parse_from([
            "ojclient", "ranks", "--base-url", "http://oj.test/", "--timeout-ms", "500", "-o", "json",
        ]);
        assert_eq!(cli.base_url.as_deref(), Some("http://oj.test/"));
        assert_eq!(cli.timeout_ms, Some(500));
        assert_eq!(cli.output, OutputFormat::Json);
    }

    #[test]
    fn test_submissions_accept_pending_status() {
        let cli = Cli::parse_from(["ojclient", "submissions", "--status", "-1"]);
        match cli.command {
            Commands::Submissions(args) => assert_eq!(args.status, Some(-1)),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
