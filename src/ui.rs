//! User Interface abstraction layer
//!
//! Interactive prompts go through [`UserInterface`] so that the selection
//! engine and the commands can be driven by a scripted [`MockUI`] in tests.
//! Everything interactive is rendered on stderr: stdout is reserved for
//! command output such as `switch --print`, which shell wrappers capture.

use console::Term;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, FuzzySelect};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::error::{GiwoError, Result};

/// Trait for user interface interactions
pub trait UserInterface {
    /// Display one line of interactive output
    fn show(&self, line: &str);

    /// Prompt for a line of text; end of input is an error
    fn read_line(&self, prompt: &str) -> Result<String>;

    /// Ask a yes/no question
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;

    /// Fuzzy-searchable picker; `None` when the user backs out
    fn fuzzy_select(&self, prompt: &str, items: &[String]) -> Result<Option<usize>>;

    /// Clear the interactive screen
    fn clear(&self);
}

/// Production implementation on the terminal's stderr
pub struct TerminalUI {
    term: Term,
    theme: ColorfulTheme,
}

impl TerminalUI {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalUI {
    fn default() -> Self {
        Self::new()
    }
}

fn prompt_error(e: dialoguer::Error) -> GiwoError {
    GiwoError::Io(io::Error::other(e.to_string()))
}

impl UserInterface for TerminalUI {
    fn show(&self, line: &str) {
        eprintln!("{line}");
    }

    fn read_line(&self, prompt: &str) -> Result<String> {
        self.term.write_str(prompt)?;
        self.term.flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(GiwoError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed",
            )));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        let answer = Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact_on_opt(&self.term)
            .map_err(prompt_error)?;
        Ok(answer.unwrap_or(false))
    }

    fn fuzzy_select(&self, prompt: &str, items: &[String]) -> Result<Option<usize>> {
        FuzzySelect::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact_on_opt(&self.term)
            .map_err(prompt_error)
    }

    fn clear(&self) {
        if self.term.is_term() {
            let _ = self.term.clear_screen();
        }
        let _ = io::stderr().flush();
    }
}

/// Mock implementation for testing
///
/// Responses are consumed in order; everything passed to [`show`] is kept so
/// tests can assert on the rendered output. Running out of scripted lines
/// behaves like a closed stdin.
///
/// [`show`]: UserInterface::show
#[derive(Default)]
pub struct MockUI {
    inputs: RefCell<VecDeque<String>>,
    confirms: RefCell<VecDeque<bool>>,
    selections: RefCell<VecDeque<Option<usize>>>,
    output: RefCell<Vec<String>>,
    prompts: RefCell<Vec<String>>,
}

impl MockUI {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a line for `read_line`
    pub fn with_input(self, input: impl Into<String>) -> Self {
        self.inputs.borrow_mut().push_back(input.into());
        self
    }

    /// Queue an answer for `confirm`
    pub fn with_confirm(self, confirm: bool) -> Self {
        self.confirms.borrow_mut().push_back(confirm);
        self
    }

    /// Queue a picker outcome for `fuzzy_select`
    pub fn with_selection(self, selection: Option<usize>) -> Self {
        self.selections.borrow_mut().push_back(selection);
        self
    }

    /// Check if all configured responses have been consumed
    pub fn is_exhausted(&self) -> bool {
        self.inputs.borrow().is_empty()
            && self.confirms.borrow().is_empty()
            && self.selections.borrow().is_empty()
    }

    /// Lines shown so far
    pub fn output(&self) -> Vec<String> {
        self.output.borrow().clone()
    }

    /// Prompts asked so far, across all prompt kinds
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }

    /// Whether any shown line contains `needle` once colors are stripped
    pub fn output_contains(&self, needle: &str) -> bool {
        self.output
            .borrow()
            .iter()
            .any(|line| console::strip_ansi_codes(line).contains(needle))
    }
}

fn exhausted(kind: &str) -> GiwoError {
    GiwoError::Io(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("no more {kind} configured for MockUI"),
    ))
}

impl UserInterface for MockUI {
    fn show(&self, line: &str) {
        self.output.borrow_mut().push(line.to_string());
    }

    fn read_line(&self, prompt: &str) -> Result<String> {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.inputs
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| exhausted("inputs"))
    }

    fn confirm(&self, prompt: &str, _default: bool) -> Result<bool> {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.confirms
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| exhausted("confirmations"))
    }

    fn fuzzy_select(&self, prompt: &str, _items: &[String]) -> Result<Option<usize>> {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.selections
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| exhausted("selections"))
    }

    fn clear(&self) {}
}
