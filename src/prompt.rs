//! Operator confirmations.

use crate::error::ArchiverResult;
use std::io::{BufRead, Write};

/// Asks the operator a question and returns the raw answer line.
pub trait Prompt {
    fn ask(&mut self, question: &str, hint: &str) -> ArchiverResult<String>;

    /// True only when the trimmed answer is exactly `expected`.
    fn confirm(&mut self, question: &str, hint: &str, expected: &str) -> ArchiverResult<bool> {
        Ok(self.ask(question, hint)?.trim() == expected)
    }
}

impl<P: Prompt + ?Sized> Prompt for &mut P {
    fn ask(&mut self, question: &str, hint: &str) -> ArchiverResult<String> {
        (**self).ask(question, hint)
    }
}

/// Prompt over any reader/writer pair; [`TerminalPrompt::stdio`] for the real
/// terminal. End of input reads as an empty answer, which declines.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompt<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Prompt for TerminalPrompt<R, W> {
    fn ask(&mut self, question: &str, hint: &str) -> ArchiverResult<String> {
        writeln!(self.output, "{}", question)?;
        write!(self.output, "{} ", hint)?;
        self.output.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        Ok(answer)
    }
}
