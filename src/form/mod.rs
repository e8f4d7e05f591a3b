//! Interactive-form collaborator.
//!
//! Every prompt the tool shows goes through [`Form`]. A closed input stream
//! surfaces as [`BulkError::Aborted`](crate::error::BulkError::Aborted), which
//! callers treat as a normal negative outcome.

mod terminal;

pub use terminal::{TerminalForm, parse_selection};

use crate::error::Result;

/// Typed prompts for free text, single-select, multi-select and confirmation.
pub trait Form {
    /// Single line of free text.
    fn input(&mut self, title: &str, description: &str) -> Result<String>;

    /// Multi-line free text.
    fn text(&mut self, title: &str, description: &str) -> Result<String>;

    /// Pick exactly one option; returns its index.
    fn select(&mut self, title: &str, options: &[String]) -> Result<usize>;

    /// Pick any number of options; returns their indices in ascending order.
    fn multi_select(&mut self, title: &str, options: &[String]) -> Result<Vec<usize>>;

    /// Yes/no question shown under a description block.
    fn confirm(&mut self, title: &str, description: &str) -> Result<bool>;

    /// Show a message that needs no answer, such as a validation error.
    fn notice(&mut self, message: &str) -> Result<()>;
}

/// Prompt with `ask` until `validate` accepts the answer.
pub(crate) fn ask_until_valid(
    form: &mut dyn Form,
    mut ask: impl FnMut(&mut dyn Form) -> Result<String>,
    validate: impl Fn(&str) -> Result<()>,
) -> Result<String> {
    loop {
        let answer = ask(&mut *form)?;
        match validate(&answer) {
            Ok(()) => return Ok(answer),
            Err(e) => form.notice(&e.to_string())?,
        }
    }
}
