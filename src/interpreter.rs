use crate::errors::ProtocolError;
use crate::input::{classify, parse_count, Header, Operation};
use std::io::BufRead;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    AwaitingCapacity,
    AwaitingCommand,
    Terminated,
}

/// Pulls lines from `reader` and turns them into operations, one per call.
///
/// The first line is always the capacity. After a terminating operation or
/// any error the interpreter stays in `Terminated` and stops reading.
pub struct CommandInterpreter<R> {
    reader: R,
    state:  State,
    line:   usize,
}

impl<R: BufRead> CommandInterpreter<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, state: State::AwaitingCapacity, line: 0 }
    }

    pub fn state(&self) -> State { self.state }

    /// Number of lines consumed so far.
    pub fn line_number(&self) -> usize { self.line }

    pub fn next_operation(&mut self) -> Result<Operation, ProtocolError> {
        let result = self.pull();
        self.state = match (&self.state, &result) {
            (State::Terminated, _) | (_, Err(_)) => State::Terminated,
            (_, Ok(op)) if op.is_terminal()      => State::Terminated,
            _                                    => State::AwaitingCommand,
        };
        result
    }

    fn pull(&mut self) -> Result<Operation, ProtocolError> {
        if self.state == State::Terminated {
            return Ok(Operation::Terminate);
        }
        let text = match self.read_line()? {
            Some(t) => t,
            None => {
                debug!(line = self.line, "end of input");
                return Ok(Operation::Terminate);
            }
        };

        if self.state == State::AwaitingCapacity {
            let cap = parse_count(&text).ok_or_else(|| ProtocolError::InvalidCount {
                line: self.line,
                text: text.clone(),
            })?;
            return Ok(Operation::SetCapacity(cap));
        }

        match classify(&text) {
            Header::Append(arg) => {
                let k = self.count(arg)?;
                Ok(Operation::Append(self.read_values(k)?))
            }
            Header::Evict(arg) => Ok(Operation::Evict(self.count(arg)?)),
            Header::List       => Ok(Operation::List),
            Header::Quit       => Ok(Operation::Terminate),
            Header::Unknown    => Ok(Operation::Malformed { line: self.line, text }),
        }
    }

    fn count(&self, arg: &str) -> Result<usize, ProtocolError> {
        parse_count(arg).ok_or_else(|| ProtocolError::InvalidCount {
            line: self.line,
            text: arg.to_string(),
        })
    }

    /// Reads exactly `expected` verbatim lines. Short input is an error, never a partial batch.
    fn read_values(&mut self, expected: usize) -> Result<Vec<String>, ProtocolError> {
        let header = self.line;
        let mut values = Vec::new();
        while values.len() < expected {
            match self.read_line()? {
                Some(v) => {
                    trace!(line = self.line, value = %v, "append value");
                    values.push(v);
                }
                None => {
                    return Err(ProtocolError::TruncatedInput {
                        line: header,
                        expected,
                        received: values.len(),
                    });
                }
            }
        }
        Ok(values)
    }

    fn read_line(&mut self) -> Result<Option<String>, ProtocolError> {
        let mut buf = String::new();
        if self.reader.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        self.line += 1;
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        Ok(Some(buf))
    }
}
