//! Host adapters for the command line: the system clipboard and prompts on
//! the controlling terminal.
//!
//! The selection arrives on stdin, so prompts read their answers from the
//! terminal device instead and write to stderr, keeping stdout for the block.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

use crate::host::{ClipboardProvider, InputProvider, InputRequest};

/// Clipboard read through `pbpaste` (macOS) or `xclip` (Linux).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardProvider for SystemClipboard {
    fn read_text(&self) -> Option<String> {
        match read_clipboard_impl() {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Failed to read clipboard: {}", e);
                None
            }
        }
    }
}

#[cfg(target_os = "macos")]
fn read_clipboard_impl() -> io::Result<Option<String>> {
    let output = std::process::Command::new("pbpaste").output()?;
    Ok(clipboard_output(output))
}

#[cfg(target_os = "linux")]
fn read_clipboard_impl() -> io::Result<Option<String>> {
    let output = std::process::Command::new("xclip")
        .args(["-selection", "clipboard", "-o"])
        .output()?;
    Ok(clipboard_output(output))
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
fn read_clipboard_impl() -> io::Result<Option<String>> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "clipboard not supported on this platform",
    ))
}

#[cfg(any(target_os = "macos", target_os = "linux"))]
fn clipboard_output(output: std::process::Output) -> Option<String> {
    if !output.status.success() {
        return None;
    }
    let content = String::from_utf8_lossy(&output.stdout).to_string();
    (!content.is_empty()).then_some(content)
}

/// Line-oriented access to a terminal.
pub trait TerminalIO {
    fn write_prompt(&self, prompt: &str) -> io::Result<()>;

    /// Next line without its line ending; `None` at end of input.
    fn read_line(&self) -> io::Result<Option<String>>;
}

/// The controlling terminal: prompts on stderr, answers from `/dev/tty`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Tty;

impl TerminalIO for Tty {
    fn write_prompt(&self, prompt: &str) -> io::Result<()> {
        let mut stderr = io::stderr();
        write!(stderr, "{}", prompt)?;
        stderr.flush()
    }

    fn read_line(&self) -> io::Result<Option<String>> {
        let tty = File::open("/dev/tty")?;
        let mut line = String::new();
        if BufReader::new(tty).read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Scripted terminal for tests.
#[derive(Debug, Default)]
pub struct MockTerminal {
    lines: RefCell<VecDeque<String>>,
    written: RefCell<String>,
}

impl MockTerminal {
    pub fn with_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: RefCell::new(lines.into_iter().map(Into::into).collect()),
            written: RefCell::new(String::new()),
        }
    }

    /// Everything written so far.
    pub fn written(&self) -> String {
        self.written.borrow().clone()
    }
}

impl TerminalIO for MockTerminal {
    fn write_prompt(&self, prompt: &str) -> io::Result<()> {
        self.written.borrow_mut().push_str(prompt);
        Ok(())
    }

    fn read_line(&self) -> io::Result<Option<String>> {
        Ok(self.lines.borrow_mut().pop_front())
    }
}

/// Interactive input on a terminal.
///
/// An answer that fails validation is reported and asked for again, up to
/// `max_attempts` times; after that, or at end of input, the prompt counts
/// as dismissed.
pub struct TerminalInput<T: TerminalIO = Tty> {
    terminal: T,
    max_attempts: usize,
}

impl TerminalInput<Tty> {
    pub fn new() -> Self {
        Self::with_terminal(Tty)
    }
}

impl Default for TerminalInput<Tty> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TerminalIO> TerminalInput<T> {
    pub fn with_terminal(terminal: T) -> Self {
        Self {
            terminal,
            max_attempts: 3,
        }
    }

    pub fn max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    fn ask(&self, request: &InputRequest) -> io::Result<Option<String>> {
        self.terminal.write_prompt(&format!(
            "{}\n{}\n{}: ",
            request.prompt(),
            request.placeholder(),
            request.title()
        ))?;

        for attempt in 1..=self.max_attempts {
            let Some(answer) = self.terminal.read_line()? else {
                return Ok(None);
            };
            match request.validate(&answer) {
                Ok(()) => return Ok(Some(answer)),
                Err(message) if attempt < self.max_attempts => {
                    self.terminal
                        .write_prompt(&format!("{}\n{}: ", message, request.title()))?;
                }
                Err(message) => {
                    log::warn!("Giving up on {} after {} attempts: {}", request.title(), attempt, message);
                }
            }
        }
        Ok(None)
    }
}

impl<T: TerminalIO> InputProvider for TerminalInput<T> {
    fn prompt(&self, request: &InputRequest) -> Option<String> {
        self.ask(request).unwrap_or_else(|e| {
            log::warn!("Failed to prompt for {}: {}", request.title(), e);
            None
        })
    }
}

/// Input provider for non-interactive runs: every prompt is dismissed.
#[derive(Debug, Default, Clone, Copy)]
pub struct NonInteractive;

impl InputProvider for NonInteractive {
    fn prompt(&self, request: &InputRequest) -> Option<String> {
        log::debug!("not prompting for {} (non-interactive)", request.title());
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::FieldName;

    #[test]
    fn test_valid_answer() {
        let input = TerminalInput::with_terminal(MockTerminal::with_lines(["right"]));
        let request = InputRequest::new(FieldName::Justify, 1);
        assert_eq!(input.prompt(&request), Some("right".to_string()));
        assert!(input.terminal().written().contains("Options: left, center or right"));
    }

    #[test]
    fn test_invalid_answer_is_asked_again() {
        let input = TerminalInput::with_terminal(MockTerminal::with_lines(["wide", "4"]));
        let request = InputRequest::new(FieldName::GapLeft, 0);
        assert_eq!(input.prompt(&request), Some("4".to_string()));
        assert!(input.terminal().written().contains("Must be an integer >= 0"));
    }

    #[test]
    fn test_gives_up_after_max_attempts() {
        let input =
            TerminalInput::with_terminal(MockTerminal::with_lines(["**", "##", "-"])).max_attempts(2);
        let request = InputRequest::new(FieldName::PadLines, 0);
        assert_eq!(input.prompt(&request), None);
    }

    #[test]
    fn test_end_of_input_dismisses() {
        let input = TerminalInput::with_terminal(MockTerminal::default());
        assert_eq!(input.prompt(&InputRequest::new(FieldName::Subjects, 0)), None);
    }

    #[test]
    fn test_empty_answer_is_accepted() {
        let input = TerminalInput::with_terminal(MockTerminal::with_lines([""]));
        assert_eq!(
            input.prompt(&InputRequest::new(FieldName::LineLength, 0)),
            Some(String::new())
        );
    }
}
