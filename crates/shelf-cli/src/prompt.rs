//! Interactive input: plain lines, masked passwords and yes/no questions.

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::Completer;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Editor, Helper};
use shelf_application::Confirmation;
use std::borrow::Cow::{self, Borrowed, Owned};
use std::io::{self, BufRead, Write};

/// Shows `*` instead of the typed characters while `masking` is on.
#[derive(Default)]
struct MaskingHelper {
    masking: bool,
}

impl Helper for MaskingHelper {}

impl Completer for MaskingHelper {
    type Candidate = String;
}

impl Hinter for MaskingHelper {
    type Hint = String;
}

impl Validator for MaskingHelper {}

impl Highlighter for MaskingHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if self.masking {
            Owned("*".repeat(line.chars().count()))
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        self.masking
    }
}

pub struct Prompter {
    editor: Editor<MaskingHelper, DefaultHistory>,
}

impl Prompter {
    pub fn new() -> Result<Self> {
        let mut editor = Editor::new()?;
        editor.set_helper(Some(MaskingHelper::default()));
        Ok(Self { editor })
    }

    pub fn line(&mut self, prompt: &str) -> Result<String> {
        self.set_masking(false);
        Ok(self.editor.readline(prompt)?.trim().to_string())
    }

    pub fn password(&mut self, prompt: &str) -> Result<String> {
        self.set_masking(true);
        let result = self.editor.readline(prompt);
        self.set_masking(false);
        Ok(result?)
    }

    /// Uses `given` when present, otherwise asks.
    pub fn line_or(&mut self, given: Option<String>, prompt: &str) -> Result<String> {
        match given {
            Some(value) => Ok(value),
            None => self.line(prompt),
        }
    }

    fn set_masking(&mut self, masking: bool) {
        if let Some(helper) = self.editor.helper_mut() {
            helper.masking = masking;
        }
    }
}

/// Asks on the terminal; anything but `y`/`yes` declines.
pub struct ConsoleConfirmation;

impl Confirmation for ConsoleConfirmation {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{} {} ", prompt.bright_yellow(), "[y/N]".bright_black());
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}
