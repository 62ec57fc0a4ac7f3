//! Terminal implementation of the core `Console` port.

use std::io::IsTerminal as _;

use buildtree_core::{
    application::{ApplicationError, ports::Console},
    error::BuildtreeResult,
};

/// Reads answers from the controlling terminal.
///
/// Input is disabled with `--no-input` or when stdin is not a terminal, so
/// piped and CI runs never block on a prompt.
#[derive(Debug, Clone, Copy)]
pub struct TerminalConsole {
    input_enabled: bool,
}

impl TerminalConsole {
    pub fn new(no_input: bool) -> Self {
        Self {
            input_enabled: !no_input && std::io::stdin().is_terminal(),
        }
    }
}

impl Console for TerminalConsole {
    fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    #[cfg(feature = "interactive")]
    fn prompt(&self, text: &str, default: &str) -> BuildtreeResult<String> {
        if !self.input_enabled {
            return Err(disabled());
        }
        dialoguer::Input::<String>::with_theme(&VerbatimTheme)
            .with_prompt(text)
            .default(default.to_string())
            .show_default(false)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| {
                ApplicationError::ConsoleError {
                    reason: e.to_string(),
                }
                .into()
            })
    }

    #[cfg(not(feature = "interactive"))]
    fn prompt(&self, text: &str, default: &str) -> BuildtreeResult<String> {
        if !self.input_enabled {
            return Err(disabled());
        }
        let term = console::Term::stderr();
        let read = term.write_str(text).and_then(|()| term.read_line());
        match read {
            Ok(answer) if answer.trim().is_empty() => Ok(default.to_string()),
            Ok(answer) => Ok(answer),
            Err(e) => Err(ApplicationError::ConsoleError {
                reason: e.to_string(),
            }
            .into()),
        }
    }
}

/// Writes prompts exactly as the core phrases them, with no `: ` suffix.
#[cfg(feature = "interactive")]
struct VerbatimTheme;

#[cfg(feature = "interactive")]
impl dialoguer::theme::Theme for VerbatimTheme {
    fn format_input_prompt(
        &self,
        f: &mut dyn std::fmt::Write,
        prompt: &str,
        _default: Option<&str>,
    ) -> std::fmt::Result {
        f.write_str(prompt)
    }

    fn format_input_prompt_selection(
        &self,
        f: &mut dyn std::fmt::Write,
        prompt: &str,
        sel: &str,
    ) -> std::fmt::Result {
        write!(f, "{prompt}{sel}")
    }
}

fn disabled() -> buildtree_core::error::BuildtreeError {
    ApplicationError::ConsoleError {
        reason: "input is disabled".into(),
    }
    .into()
}
