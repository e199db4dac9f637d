//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.
//! Handlers that talk to the server share a [`Session`].

mod account;
mod categories;
mod completions;
mod config;
mod contests;
mod judge;
mod problems;
mod utils;

pub use account::{handle_login, handle_logout, handle_register, handle_send_code, handle_user};
pub use categories::handle_categories;
pub use completions::handle_completions;
pub use config::handle_config;
pub use contests::handle_contests;
pub use judge::{handle_ranks, handle_submissions, handle_submit, handle_test_cases, handle_upload};
pub use problems::handle_problems;

use crate::config::Config;
use crate::error::Result;
use crate::notify::ConsoleNotifier;
use ojclient_core::{FileTokenStore, HttpClient, OjApi};
use std::sync::Arc;

/// API client plus the token file it reads from
pub struct Session {
    pub api: OjApi,
    pub token_store: Arc<FileTokenStore>,
}

impl Session {
    /// Build a session from the effective configuration
    pub fn open(config: &Config, use_color: bool) -> Result<Self> {
        let token_store = Arc::new(FileTokenStore::new(config.token_file()?));
        tracing::debug!(
            base_url = %config.server.base_url,
            token_file = %token_store.path().display(),
            "Opening session"
        );

        let client = HttpClient::builder(config.server.clone())
            .token_store(token_store.clone())
            .notifier(Arc::new(ConsoleNotifier::new(use_color)))
            .build()?;

        Ok(Self {
            api: OjApi::new(client),
            token_store,
        })
    }
}
