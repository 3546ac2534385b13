//! Line-oriented prompting over any reader/writer pair.

use std::io::{self, BufRead, Write};

/// One line read from the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Trimmed text of the line.
    Text(String),
    /// The line held bytes that are not UTF-8; they were consumed.
    NotUtf8,
    /// Input is exhausted.
    End,
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prints `prompt` and reads one line.
    ///
    /// Undecodable bytes are reported as [`Line::NotUtf8`] rather than as
    /// an I/O error, so the caller can reject the line and keep reading.
    pub fn line(&mut self, prompt: &str) -> io::Result<Line> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut buffer = Vec::new();
        if self.input.read_until(b'\n', &mut buffer)? == 0 {
            return Ok(Line::End);
        }
        match String::from_utf8(buffer) {
            Ok(text) => Ok(Line::Text(text.trim().to_string())),
            Err(_) => Ok(Line::NotUtf8),
        }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}
