//! Console surface for failure notifications

use colored::Colorize;
use ojclient_core::Notifier;

/// Prints each notification to stderr as it is raised
#[derive(Debug, Clone, Copy)]
pub struct ConsoleNotifier {
    use_color: bool,
}

impl ConsoleNotifier {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn render(&self, message: &str) -> String {
        if self.use_color {
            format!("{} {}", "⚠".yellow().bold(), message.yellow())
        } else {
            format!("NOTICE: {}", message)
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        tracing::debug!(notification = %message, "showing notification");
        eprintln!("{}", self.render(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_rendering() {
        let notifier = ConsoleNotifier::new(false);
        assert_eq!(
            notifier.render("very sorry, resource not found"),
            "NOTICE: very sorry, resource not found"
        );
    }
}
