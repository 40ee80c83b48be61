//! Line-ending normalization and formatting restoration.
//!
//! Every matcher works on an LF-only copy of the file. The original line-ending
//! style and trailing-newline state are recorded once, up front, and reapplied
//! to the final body after a successful edit.

use serde::{Deserialize, Serialize};

/// Line-ending style detected in the original file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
}

impl LineEnding {
    /// CRLF if the text contains at least one `\r\n`, LF otherwise.
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            Self::Crlf
        } else {
            Self::Lf
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }
}

/// Convert every `\r\n` to `\n`.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// LF-normalized view of a file plus what is needed to restore its formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedContent {
    pub body: String,
    pub had_trailing_newline: bool,
    pub line_ending: LineEnding,
}

impl NormalizedContent {
    pub fn new(raw: &str) -> Self {
        let line_ending = LineEnding::detect(raw);
        let body = normalize_line_endings(raw);
        let had_trailing_newline = body.ends_with('\n');
        Self {
            body,
            had_trailing_newline,
            line_ending,
        }
    }

    /// Reapply the original trailing-newline state and line-ending style.
    pub fn restore(&self, new_body: &str) -> String {
        let mut out = new_body.to_string();
        let has_trailing_newline = out.ends_with('\n');
        if self.had_trailing_newline && !has_trailing_newline {
            out.push('\n');
        } else if !self.had_trailing_newline && has_trailing_newline {
            out.pop();
        }

        match self.line_ending {
            LineEnding::Lf => out,
            LineEnding::Crlf => out.replace('\n', "\r\n"),
        }
    }
}
