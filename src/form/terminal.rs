//! Line-oriented terminal implementation of [`Form`].

use crate::error::{BulkError, Result};
use crate::form::Form;
use std::io::{self, BufRead, StdinLock, Stdout, Write};

/// A [`Form`] that reads answers line by line from `reader` and writes
/// prompts to `writer`. End of input aborts the current prompt.
pub struct TerminalForm<R, W> {
    reader: R,
    writer: W,
}

impl TerminalForm<StdinLock<'static>, Stdout> {
    /// Form bound to the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalForm<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Consume the form and return its writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn read_line(&mut self) -> Result<String> {
        self.writer.flush()?;
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(BulkError::Aborted);
        }
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }

    fn header(&mut self, title: &str, description: &str) -> Result<()> {
        writeln!(self.writer, "{}", title)?;
        if !description.is_empty() {
            writeln!(self.writer, "{}", description)?;
        }
        Ok(())
    }

    fn list(&mut self, options: &[String]) -> Result<()> {
        for (i, option) in options.iter().enumerate() {
            writeln!(self.writer, "  {:>3}) {}", i + 1, option)?;
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> Form for TerminalForm<R, W> {
    fn input(&mut self, title: &str, description: &str) -> Result<String> {
        self.header(title, description)?;
        write!(self.writer, "> ")?;
        self.read_line()
    }

    fn text(&mut self, title: &str, description: &str) -> Result<String> {
        self.header(title, description)?;
        writeln!(self.writer, "(finish with an empty line)")?;

        let mut lines = Vec::new();
        loop {
            let line = self.read_line()?;
            if line.is_empty() {
                break;
            }
            lines.push(line);
        }
        Ok(lines.join("\n"))
    }

    fn select(&mut self, title: &str, options: &[String]) -> Result<usize> {
        if options.is_empty() {
            return Err(BulkError::Invalid(format!("'{}' has no options", title)));
        }
        self.header(title, "")?;
        self.list(options)?;

        loop {
            write!(self.writer, "choose 1-{}: ", options.len())?;
            let answer = self.read_line()?;
            match answer.trim().parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(n - 1),
                _ => writeln!(self.writer, "'{}' is not a valid choice", answer.trim())?,
            }
        }
    }

    fn multi_select(&mut self, title: &str, options: &[String]) -> Result<Vec<usize>> {
        self.header(title, "")?;
        self.list(options)?;

        loop {
            write!(
                self.writer,
                "choose numbers or ranges (e.g. 1,3-5), 'all', or nothing: "
            )?;
            let answer = self.read_line()?;
            match parse_selection(&answer, options.len()) {
                Ok(indices) => return Ok(indices),
                Err(e) => writeln!(self.writer, "{}", e)?,
            }
        }
    }

    fn confirm(&mut self, title: &str, description: &str) -> Result<bool> {
        self.header(title, description)?;

        loop {
            write!(self.writer, "[y] Correct / [n] Abort: ")?;
            let answer = self.read_line()?;
            match answer.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.writer, "please answer y or n")?,
            }
        }
    }

    fn notice(&mut self, message: &str) -> Result<()> {
        writeln!(self.writer, "{}", message)?;
        Ok(())
    }
}

/// Parse a 1-based selection such as `"1, 3-5"` into sorted, unique 0-based
/// indices below `len`. `"all"` selects everything; blank selects nothing.
pub fn parse_selection(input: &str, len: usize) -> std::result::Result<Vec<usize>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Vec::new());
    }
    if input.eq_ignore_ascii_case("all") {
        return Ok((0..len).collect());
    }

    let parse = |s: &str| -> std::result::Result<usize, String> {
        match s.trim().parse::<usize>() {
            Ok(n) if (1..=len).contains(&n) => Ok(n - 1),
            _ => Err(format!("'{}' is not between 1 and {}", s.trim(), len)),
        }
    };

    let mut indices = Vec::new();
    for part in input.split(',').filter(|p| !p.trim().is_empty()) {
        match part.split_once('-') {
            Some((from, to)) => {
                let (from, to) = (parse(from)?, parse(to)?);
                if from > to {
                    return Err(format!("range '{}' is reversed", part.trim()));
                }
                indices.extend(from..=to);
            }
            None => indices.push(parse(part)?),
        }
    }

    indices.sort_unstable();
    indices.dedup();
    Ok(indices)
}
