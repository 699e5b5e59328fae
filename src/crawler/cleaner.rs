//! Setup-sequence cleaning
//!
//! Extracted fragments usually start with the real setup commands
//! (`wget`, `unzip`, `rm`, `cd`, `ls`) and then drift into narrative code
//! samples or file listings. Cleaning keeps the leading run of commands and
//! throws away everything from the first deviation on.

use crate::config::{ExtractorConfig, DEFAULT_COMMAND_PREFIXES};
use crate::storage::CommandSequence;

/// Truncates raw fragments to the canonical setup sequence
#[derive(Debug, Clone)]
pub struct CommandCleaner {
    prefixes: Vec<String>,
}

impl Default for CommandCleaner {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND_PREFIXES.iter().map(|s| s.to_string()).collect())
    }
}

impl CommandCleaner {
    pub fn new(prefixes: Vec<String>) -> Self {
        Self { prefixes }
    }

    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self::new(config.command_prefixes.clone())
    }

    fn is_setup_command(&self, fragment: &str) -> bool {
        self.prefixes.iter().any(|p| fragment.starts_with(p.as_str()))
    }

    /// Returns the longest prefix of `fragments` made of setup commands
    ///
    /// Stops before the first fragment that matches no allowed prefix, and
    /// stops right after a bare `ls` (what follows it is a file listing).
    /// Later fragments are discarded even if they would match.
    pub fn clean(&self, fragments: &[String]) -> CommandSequence {
        let mut cleaned = Vec::new();

        for fragment in fragments {
            if !self.is_setup_command(fragment) {
                break;
            }

            cleaned.push(fragment.clone());

            if fragment.trim() == "ls" {
                break;
            }
        }

        CommandSequence::new(cleaned)
    }
}
