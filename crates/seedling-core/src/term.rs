//! Terminal utilities for colored output and formatting.

use colored::*;
use std::io::{self, IsTerminal};

/// Check if stdin is attached to an interactive terminal.
pub fn in_controlling_terminal() -> bool {
    io::stdin().is_terminal()
}

/// Format a string with Seedling color codes.
///
/// Supports codes like #R{text}, #G{text}, #Y{text}, #B{text}, #M{text}, #C{text}, #K{text}
pub fn colorize(input: &str) -> String {
    let mut result = input.to_string();

    let color_codes = ["#R{", "#G{", "#Y{", "#B{", "#M{", "#C{", "#K{"];

    for start in color_codes {
        let mut search_from = 0;
        while let Some(offset) = result[search_from..].find(start) {
            let start_pos = search_from + offset;
            let Some(end_offset) = result[start_pos..].find('}') else {
                break;
            };
            let end_pos = start_pos + end_offset;
            let text = &result[start_pos + start.len()..end_pos];

            let colored = match start {
                "#R{" => text.red().to_string(),
                "#G{" => text.green().to_string(),
                "#Y{" => text.yellow().to_string(),
                "#B{" => text.blue().to_string(),
                "#M{" => text.magenta().to_string(),
                "#C{" => text.cyan().to_string(),
                "#K{" => text.bright_black().to_string(),
                _ => text.to_string(),
            };

            result.replace_range(start_pos..=end_pos, &colored);
            search_from = start_pos + colored.len();
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorize_plain_when_disabled() {
        colored::control::set_override(false);
        assert_eq!(colorize("#G{ok} then #R{fail}"), "ok then fail");
        assert_eq!(colorize("no codes"), "no codes");
        assert_eq!(colorize("#Y{unterminated"), "#Y{unterminated");
        colored::control::unset_override();
    }
}
