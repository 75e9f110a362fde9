//! Operator consoles.

use dialoguer::Input;
use seedling_types::{Console, SeedlingError, Result};
use std::io::{self, BufRead, Stdin, StdinLock, Stdout, Write};

/// Console over any line-oriented reader and writer.
///
/// Used for piped input and in tests.
pub struct LineConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineConsole<R, W> {
    /// Create a console reading from `input` and writing to `output`.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Take back the output sink.
    pub fn into_output(self) -> W {
        self.output
    }
}

impl LineConsole<StdinLock<'static>, Stdout> {
    /// Console over the process's standard streams.
    pub fn stdio() -> Self {
        let stdin: Stdin = io::stdin();
        Self::new(stdin.lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console for LineConsole<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let trimmed = line.strip_suffix('\n').unwrap_or(&line);
        let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
        Ok(Some(trimmed.to_string()))
    }

    fn notice(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }
}

/// Interactive console for a real terminal.
#[derive(Debug, Default)]
pub struct TerminalConsole;

impl TerminalConsole {
    /// Create a terminal console.
    pub fn new() -> Self {
        Self
    }
}

impl Console for TerminalConsole {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        // dialoguer appends its own separator
        let prompt = prompt.trim_end().trim_end_matches(':');

        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map(Some)
            .map_err(|e| SeedlingError::Prompt(e.to_string()))
    }

    fn notice(&mut self, text: &str) -> Result<()> {
        println!("{}", text);
        Ok(())
    }
}

/// Pick the console for this process: interactive when stdin is a terminal,
/// line-based otherwise.
pub fn detect() -> Box<dyn Console> {
    if seedling_core::term::in_controlling_terminal() {
        Box::new(TerminalConsole::new())
    } else {
        Box::new(LineConsole::stdio())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_console_reads_and_strips() {
        let mut console = LineConsole::new("first\r\nsecond".as_bytes(), Vec::new());

        assert_eq!(console.read_line("> ").unwrap(), Some("first".to_string()));
        assert_eq!(console.read_line("> ").unwrap(), Some("second".to_string()));
        assert_eq!(console.read_line("> ").unwrap(), None);

        let shown = String::from_utf8(console.into_output()).unwrap();
        assert_eq!(shown, "> > > ");
    }

    #[test]
    fn test_line_console_notice() {
        let mut console = LineConsole::new(io::empty(), Vec::new());
        console.notice("hello").unwrap();
        assert_eq!(console.into_output(), b"hello\n");
    }
}
