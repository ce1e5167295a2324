//! User confirmation capability
//!
//! Any yes/no source is acceptable; the console prompt is the default
//! surface, `--yes` composes the non-interactive variant.

use owo_colors::OwoColorize;
use std::io::{self, BufRead, Write};

pub trait Confirm: Send + Sync {
    /// Present `prompt` and return the user's decision
    fn confirm(&self, prompt: &str) -> bool;
}

/// Interactive `[y/N]` console prompt. Empty input declines.
pub struct ConsolePrompt;

impl Confirm for ConsolePrompt {
    fn confirm(&self, prompt: &str) -> bool {
        loop {
            print!("{}  {} [y/N]: ", "?".bright_cyan().bold(), prompt);
            if io::stdout().flush().is_err() {
                return false;
            }

            let mut input = String::new();
            if io::stdin().lock().read_line(&mut input).is_err() {
                return false;
            }

            match input.trim().to_lowercase().as_str() {
                "y" | "yes" => return true,
                "n" | "no" | "" => return false,
                _ => println!("   {}  Please answer y or n", "!".yellow()),
            }
        }
    }
}

/// Non-interactive acceptance, selected by `--yes`
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}
