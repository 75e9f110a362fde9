//! Operator-provided values.

use seedling_types::{Console, Result};

/// Line shown under every prompt text.
pub const ENTER_VALUE: &str = "Please enter (or leave empty to skip):";

/// Stream of values typed in by the operator.
///
/// Each pull shows a blank line and the prompt text, then reads one line.
/// Empty input is yielded as an empty string; deciding what an empty value
/// means is left to whoever consumes the secret. The stream ends when the
/// console input is closed.
pub struct Prompt<'a, C: Console + ?Sized> {
    text: String,
    console: &'a mut C,
}

impl<'a, C: Console + ?Sized> Prompt<'a, C> {
    /// Create a prompt that asks `text` on `console`.
    pub fn new(text: impl Into<String>, console: &'a mut C) -> Self {
        Self {
            text: text.into(),
            console,
        }
    }

    /// The text shown before reading.
    pub fn text(&self) -> &str {
        &self.text
    }

    fn ask(&mut self) -> Result<Option<String>> {
        self.console.notice("")?;
        self.console.notice(&self.text)?;
        self.console.read_line(ENTER_VALUE)
    }
}

impl<C: Console + ?Sized> Iterator for Prompt<'_, C> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.ask().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::LineConsole;

    #[test]
    fn test_prompt_reads_one_line_per_pull() {
        let mut console = LineConsole::new("alice\n\n".as_bytes(), Vec::new());
        let mut prompt = Prompt::new("Initial user", &mut console);

        assert_eq!(prompt.next().unwrap().unwrap(), "alice");
        assert_eq!(prompt.next().unwrap().unwrap(), "");
        assert!(prompt.next().is_none());

        let shown = String::from_utf8(console.into_output()).unwrap();
        assert_eq!(shown.matches("Initial user").count(), 3);
        assert!(shown.starts_with("\nInitial user\nPlease enter (or leave empty to skip):"));
    }

    #[test]
    fn test_prompt_through_trait_object() {
        let mut console = LineConsole::new("example.com\r\n".as_bytes(), Vec::new());
        let dynamic: &mut dyn Console = &mut console;
        let mut prompt = Prompt::new("Domain", dynamic);

        assert_eq!(prompt.next().unwrap().unwrap(), "example.com");
    }
}
