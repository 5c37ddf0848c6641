//! Outbound solver commands.

use std::fmt;

/// Line terminator the solver expects.
pub const LINE_TERMINATOR: &str = "\n";

/// One text directive written to the solver's standard input.
///
/// Most commands are a single line and get a terminator appended. Some
/// dialogues need several terminators in one write, e.g. `PACC\n\n\n` to
/// answer the save-file and dump-file prompts with empty input; those are
/// built with [`Command::raw`] and written exactly as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Command {
    text: String,
    append_newline: bool,
}

impl Command {
    /// A command that gets a line terminator appended.
    pub fn line(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            append_newline: true,
        }
    }

    /// A command written verbatim, terminators included by the caller.
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            append_newline: false,
        }
    }

    /// The directive without any appended terminator.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether a terminator is appended on write.
    pub fn appends_newline(&self) -> bool {
        self.append_newline
    }

    /// Bytes actually written to the solver.
    pub fn encode(&self) -> String {
        if self.append_newline {
            format!("{}{}", self.text, LINE_TERMINATOR)
        } else {
            self.text.clone()
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text.escape_debug())
    }
}

impl From<&str> for Command {
    fn from(text: &str) -> Self {
        Command::line(text)
    }
}

impl From<String> for Command {
    fn from(text: String) -> Self {
        Command::line(text)
    }
}
