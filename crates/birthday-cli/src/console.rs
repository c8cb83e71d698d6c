//! Line-oriented console over any reader/writer pair.

use std::io::{self, BufRead, Write};

const REPROMPT: &str = "Please enter \"y\" or \"n\" (y/n): ";

/// Reads operator input and writes the session transcript.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `text` without a newline and flush.
    pub fn prompt(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes())?;
        self.output.flush()
    }

    /// Next input line without its terminator; `None` once input is exhausted.
    ///
    /// A line that is not UTF-8 is consumed and reported as `InvalidData`,
    /// so the next call reads the following line.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut raw = Vec::new();
        if self.input.read_until(b'\n', &mut raw)? == 0 {
            return Ok(None);
        }
        let line = String::from_utf8(raw).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidData, "input was not valid UTF-8")
        })?;
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Ask a yes/no question, re-prompting until the answer is `y` or `n`.
    ///
    /// Blocks until answered. Exhausted input counts as `n`.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        self.prompt(question)?;
        loop {
            let answer = match self.read_line() {
                Ok(Some(answer)) => answer,
                Ok(None) => {
                    writeln!(self.output)?;
                    return Ok(false);
                }
                Err(e) if e.kind() == io::ErrorKind::InvalidData => String::new(),
                Err(e) => return Err(e),
            };
            match answer.trim().to_ascii_lowercase().as_str() {
                "y" => return Ok(true),
                "n" => return Ok(false),
                _ => self.prompt(REPROMPT)?,
            }
        }
    }

    /// Give back the underlying writer.
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R, W: Write> Write for Console<R, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }
}
