//! Commit message input.
//!
//! The interactive terminal prompt is one [`MessageSource`]; tests and piped
//! stdin use [`ReaderSource`] instead. Messages are carried as `OsString` so
//! bytes read from stdin reach `git commit -m` unchanged.

use std::ffi::{OsStr, OsString};
use std::io::{BufRead, Write};

use dialoguer::Input;

use crate::error::PromptError;

/// Label shown before the commit message is read.
pub const PROMPT_LABEL: &str = "Enter commit message";

/// Anything that can produce one commit message.
pub trait MessageSource {
    fn read_message(&mut self) -> Result<OsString, PromptError>;
}

/// Reads one line from a `BufRead`, printing the label to `W` first.
pub struct ReaderSource<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> ReaderSource<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl<R: BufRead, W: Write> MessageSource for ReaderSource<R, W> {
    fn read_message(&mut self) -> Result<OsString, PromptError> {
        write!(self.writer, "{}: ", PROMPT_LABEL).map_err(PromptError::ReadFailed)?;
        self.writer.flush().map_err(PromptError::ReadFailed)?;

        let mut line = Vec::new();
        self.reader
            .read_until(b'\n', &mut line)
            .map_err(PromptError::ReadFailed)?;

        Ok(bytes_to_os_string(strip_line_ending(&line).to_vec()))
    }
}

/// Interactive prompt on the controlling terminal via dialoguer.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl MessageSource for TerminalPrompt {
    fn read_message(&mut self) -> Result<OsString, PromptError> {
        // Empty input is accepted here; `validate_message` owns that policy.
        Input::<String>::new()
            .with_prompt(PROMPT_LABEL)
            .allow_empty(true)
            .interact_text()
            .map(OsString::from)
            .map_err(PromptError::Interactive)
    }
}

/// A message supplied up front (e.g. `--message`).
#[derive(Debug, Clone)]
pub struct FixedMessage(pub OsString);

impl MessageSource for FixedMessage {
    fn read_message(&mut self) -> Result<OsString, PromptError> {
        Ok(self.0.clone())
    }
}

/// Apply the empty-message policy.
///
/// Whitespace-only counts as empty, since git strips it to nothing. The
/// content is otherwise not inspected; any encoding is accepted.
pub fn validate_message(message: OsString, allow_empty: bool) -> Result<OsString, PromptError> {
    if is_blank(&message) && !allow_empty {
        return Err(PromptError::EmptyMessage);
    }
    Ok(message)
}

pub(crate) fn is_blank(message: &OsStr) -> bool {
    message.to_string_lossy().trim().is_empty()
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(unix)]
fn bytes_to_os_string(bytes: Vec<u8>) -> OsString {
    use std::os::unix::ffi::OsStringExt;
    OsString::from_vec(bytes)
}

// Windows command lines are UTF-16, so undecodable bytes cannot be passed on.
#[cfg(not(unix))]
fn bytes_to_os_string(bytes: Vec<u8>) -> OsString {
    String::from_utf8_lossy(&bytes).into_owned().into()
}
