//! Change and command descriptors.
//!
//! Both are collected once per run, validated up front, and shared read-only
//! by every repository's pipeline pass.

use crate::error::{BulkError, Result};
use crate::form::{Form, ask_until_valid};
use regex::Regex;
use std::sync::LazyLock;

/// Maximum length of a branch name, in characters.
pub const BRANCH_NAME_LIMIT: usize = 80;
/// Maximum length of a pull request title, in characters.
pub const PR_TITLE_LIMIT: usize = 80;
/// Maximum length of the commit / pull request message, in characters.
pub const MESSAGE_LIMIT: usize = 400;

static BRANCH_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9\-_./]+$").expect("valid branch name regex"));

/// Branch names must be non-empty and use only `A-Z a-z 0-9 - _ . /`.
pub fn validate_branch_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(BulkError::Invalid("Branch name required".into()));
    }
    if name.chars().count() > BRANCH_NAME_LIMIT {
        return Err(BulkError::Invalid(format!(
            "Branch name is longer than {} characters",
            BRANCH_NAME_LIMIT
        )));
    }
    if !BRANCH_CHARSET.is_match(name) {
        return Err(BulkError::Invalid(
            "Branch name can only contain a-z A-Z 0-9 - _ . /".into(),
        ));
    }
    Ok(())
}

pub fn validate_pr_title(title: &str) -> Result<()> {
    if title.is_empty() {
        return Err(BulkError::Invalid("Pull Request title required".into()));
    }
    if title.chars().count() > PR_TITLE_LIMIT {
        return Err(BulkError::Invalid(format!(
            "Pull Request title is longer than {} characters",
            PR_TITLE_LIMIT
        )));
    }
    Ok(())
}

pub fn validate_message(message: &str) -> Result<()> {
    if message.chars().count() > MESSAGE_LIMIT {
        return Err(BulkError::Invalid(format!(
            "Commit message is longer than {} characters",
            MESSAGE_LIMIT
        )));
    }
    Ok(())
}

/// Branch, pull request title and message applied to every selected repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeDescriptor {
    branch_name: String,
    pr_title: String,
    message: String,
}

impl ChangeDescriptor {
    /// Build a validated descriptor.
    pub fn new(
        branch_name: impl Into<String>,
        pr_title: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self> {
        let (branch_name, pr_title, message) =
            (branch_name.into(), pr_title.into(), message.into());
        validate_branch_name(&branch_name)?;
        validate_pr_title(&pr_title)?;
        validate_message(&message)?;
        Ok(Self {
            branch_name,
            pr_title,
            message,
        })
    }

    /// Prompt for each field, re-asking until the answer is valid.
    pub fn collect(form: &mut dyn Form) -> Result<Self> {
        let branch_name = ask_until_valid(
            form,
            |f| f.input("Branch name:", ""),
            validate_branch_name,
        )?;
        let pr_title = ask_until_valid(
            form,
            |f| f.input("Pull Request title:", ""),
            validate_pr_title,
        )?;
        let message = ask_until_valid(
            form,
            |f| f.text("Commit message:", ""),
            validate_message,
        )?;

        Self::new(branch_name, pr_title, message)
    }

    pub fn branch_name(&self) -> &str {
        &self.branch_name
    }

    pub fn pr_title(&self) -> &str {
        &self.pr_title
    }

    /// Commit message, also used as the pull request body.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The shell command line run inside every checkout. Not validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    command_line: String,
}

impl CommandDescriptor {
    pub fn new(command_line: impl Into<String>) -> Self {
        Self {
            command_line: command_line.into(),
        }
    }

    pub fn collect(form: &mut dyn Form) -> Result<Self> {
        let line = form.input(
            "Command",
            "Enter the command to run on each repository",
        )?;
        Ok(Self::new(line))
    }

    pub fn command_line(&self) -> &str {
        &self.command_line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::TerminalForm;
    use std::io::Cursor;

    #[test]
    fn test_branch_name_charset() {
        assert!(validate_branch_name("feat/ABC-123_v1.0").is_ok());
        assert!(validate_branch_name("feat branch").is_err());
        assert!(validate_branch_name("").is_err());
        assert!(validate_branch_name("feat~1").is_err());
        assert!(validate_branch_name("naïve").is_err());
    }

    #[test]
    fn test_branch_name_length() {
        assert!(validate_branch_name(&"a".repeat(BRANCH_NAME_LIMIT)).is_ok());
        assert!(validate_branch_name(&"a".repeat(BRANCH_NAME_LIMIT + 1)).is_err());
    }

    #[test]
    fn test_title_and_message() {
        assert!(validate_pr_title("").is_err());
        assert!(validate_pr_title("Bump deps").is_ok());
        assert!(validate_message("").is_ok());
        assert!(validate_message(&"é".repeat(MESSAGE_LIMIT)).is_ok());
        assert!(validate_message(&"x".repeat(MESSAGE_LIMIT + 1)).is_err());
    }

    #[test]
    fn test_new_rejects_invalid_fields() {
        assert!(ChangeDescriptor::new("ok", "title", "").is_ok());
        assert!(ChangeDescriptor::new("bad name", "title", "").is_err());
        assert!(ChangeDescriptor::new("ok", "", "").is_err());
    }

    #[test]
    fn test_collect_reprompts_on_invalid_input() {
        let input = "feat branch\nfeat/x\n\nAdd file\nline one\nline two\n\n";
        let mut form = TerminalForm::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());

        let change = ChangeDescriptor::collect(&mut form).unwrap();
        assert_eq!(change.branch_name(), "feat/x");
        assert_eq!(change.pr_title(), "Add file");
        assert_eq!(change.message(), "line one\nline two");

        let out = String::from_utf8(form.into_writer()).unwrap();
        assert!(out.contains("Branch name can only contain"));
        assert!(out.contains("Pull Request title required"));
    }

    #[test]
    fn test_command_is_taken_verbatim() {
        let mut form = TerminalForm::new(Cursor::new(b"\n".to_vec()), Vec::new());
        let command = CommandDescriptor::collect(&mut form).unwrap();
        assert_eq!(command.command_line(), "");
    }
}
