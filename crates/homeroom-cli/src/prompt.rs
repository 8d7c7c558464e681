//! Interactive credential source

use std::io::IsTerminal;

use homeroom_core::{ConfigError, CredentialSource};

const PROMPT: &str = "Gemini API key: ";

/// Asks for the API key on the terminal, without echoing it.
///
/// Yields nothing when stdin is not a terminal, so piped and scheduled runs
/// never block.
#[derive(Debug, Clone, Copy)]
pub struct TerminalPrompt {
    interactive: bool,
}

impl TerminalPrompt {
    /// Prompt if stdin is attached to a terminal
    #[must_use]
    pub fn detect() -> Self {
        Self {
            interactive: std::io::stdin().is_terminal(),
        }
    }

    /// Prompt that never asks
    #[must_use]
    pub fn disabled() -> Self {
        Self { interactive: false }
    }

    /// Whether `lookup` will ask
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::detect()
    }
}

impl CredentialSource for TerminalPrompt {
    fn name(&self) -> String {
        "terminal prompt".to_string()
    }

    fn lookup(&self) -> Result<Option<String>, ConfigError> {
        if !self.interactive {
            return Ok(None);
        }
        let key = rpassword::prompt_password(PROMPT)
            .map_err(|e| ConfigError::io_error("<terminal>", e))?;
        Ok(Some(key.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_terminal_yields_nothing() {
        let prompt = TerminalPrompt::disabled();
        assert!(!prompt.is_interactive());
        assert!(matches!(prompt.lookup(), Ok(None)));
        assert_eq!(prompt.name(), "terminal prompt");
    }

    #[test]
    fn detect_follows_stdin() {
        assert_eq!(
            TerminalPrompt::detect().is_interactive(),
            std::io::stdin().is_terminal()
        );
    }
}
