//! Terminal operator for manual speaker selection.
//!
//! Implements the [`SpeakerOperator`] port on stdin/stdout:
//!
//! ```text
//! Please select the next speaker from the following list:
//! 1: Coder
//! 2: Reviewer
//! Enter the number of the next speaker (enter nothing or `q` to use auto selection): 2
//! ```

use colored::Colorize;
use roundtable_application::SpeakerOperator;
use std::io::{self, BufRead, Write};

/// Interactive operator reading answers from stdin.
pub struct ConsoleOperator;

impl ConsoleOperator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleOperator {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeakerOperator for ConsoleOperator {
    fn show(&self, line: &str) {
        println!("{}", line);
    }

    fn read_line(&self, prompt: &str) -> Option<String> {
        print!("{}", prompt.magenta().bold());
        io::stdout().flush().ok()?;

        let mut input = String::new();
        match io::stdin().lock().read_line(&mut input) {
            // EOF: nobody is there to answer
            Ok(0) | Err(_) => None,
            Ok(_) => Some(input.trim().to_string()),
        }
    }
}
