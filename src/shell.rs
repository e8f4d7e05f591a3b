//! Process execution for the user's command.

use crate::error::Result;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};

/// Exit status and captured output of one command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, or `None` if the process was killed by a signal.
    pub code: Option<i32>,
    /// stdout and stderr as written to one shared pipe, interleaved.
    pub output: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs a command line through a shell interpreter.
pub trait Shell {
    /// Run `command_line` with `cwd` as the working directory.
    ///
    /// A non-zero exit is reported through [`CommandOutput::code`], not as an error.
    fn run(&self, command_line: &str, cwd: &Path) -> Result<CommandOutput>;
}

/// [`Shell`] that invokes `<program> -c <command_line>`.
#[derive(Debug, Clone)]
pub struct SystemShell {
    program: String,
}

impl SystemShell {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for SystemShell {
    fn default() -> Self {
        Self::new("sh")
    }
}

impl Shell for SystemShell {
    fn run(&self, command_line: &str, cwd: &Path) -> Result<CommandOutput> {
        let (mut reader, writer) = std::io::pipe()?;

        // The Command holds the write ends; it must be dropped before reading
        // or the pipe never reaches EOF.
        let mut child = Command::new(&self.program)
            .arg("-c")
            .arg(command_line)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(writer.try_clone()?)
            .stderr(writer)
            .spawn()?;

        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let status = child.wait()?;

        Ok(CommandOutput {
            code: status.code(),
            output: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}
