// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for deck parsing

use thiserror::Error;

/// Result type for parsing operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing a keyword deck
#[derive(Error, Debug)]
pub enum Error {
    /// The token stream was rejected by the grammar. Carries the 1-based
    /// line number of the offending line; the message embeds the
    /// surrounding source lines for context.
    #[error("syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },
}

impl Error {
    /// Create a syntax error
    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        Error::Syntax {
            line,
            message: message.into(),
        }
    }

    /// Line number the error was raised at, if known
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Syntax { line, .. } => Some(*line),
        }
    }
}
