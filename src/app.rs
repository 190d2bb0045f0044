use crate::errors::{ProtocolError, SessionError};
use crate::input::Operation;
use crate::interpreter::CommandInterpreter;
use crate::util::ring_buffer::{EvictPolicy, RingStore};
use std::io::{BufRead, Write};
use std::ops::ControlFlow;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Apply every operation to the buffer.
    #[default]
    Apply,
    /// Print what each operation would do; the buffer is never touched.
    Describe,
}

/// Owns the buffer for one run and applies operations to it as they arrive.
#[derive(Debug, Default)]
pub struct Session {
    store:   RingStore,
    policy:  EvictPolicy,
    mode:    Mode,
    applied: usize,
}

impl Session {
    pub fn new(policy: EvictPolicy, mode: Mode) -> Self {
        Self { store: RingStore::new(), policy, mode, applied: 0 }
    }

    pub fn store(&self) -> &RingStore { &self.store }

    /// Operations handled so far, including the terminating one.
    pub fn applied(&self) -> usize { self.applied }

    /// Drive `interp` until it terminates, writing `List` output to `out`.
    pub fn run<R, W>(&mut self, interp: &mut CommandInterpreter<R>, out: &mut W) -> Result<(), SessionError>
    where
        R: BufRead,
        W: Write,
    {
        let result = self.drive(interp, out);
        out.flush().map_err(SessionError::Write)?;
        result
    }

    fn drive<R, W>(&mut self, interp: &mut CommandInterpreter<R>, out: &mut W) -> Result<(), SessionError>
    where
        R: BufRead,
        W: Write,
    {
        loop {
            let op = interp.next_operation()?;
            debug!(op = op.label(), line = interp.line_number(), state = ?interp.state(), "operation");
            self.applied += 1;
            let flow = match self.mode {
                Mode::Apply    => self.apply(op, out)?,
                Mode::Describe => self.describe(op, out)?,
            };
            if flow.is_break() {
                return Ok(());
            }
        }
    }

    /// Apply one operation. `Break` means the session is over.
    fn apply<W: Write>(&mut self, op: Operation, out: &mut W) -> Result<ControlFlow<()>, SessionError> {
        match op {
            Operation::SetCapacity(n) => self.store.set_capacity(n),
            Operation::Append(values) => self.store.append(values)?,
            Operation::Evict(n)       => self.store.evict(n, self.policy)?,
            Operation::List => {
                for value in self.store.to_ordered_list() {
                    writeln!(out, "{}", value).map_err(SessionError::Write)?;
                }
            }
            Operation::Terminate => return Ok(ControlFlow::Break(())),
            Operation::Malformed { line, text } => {
                return Err(ProtocolError::UnrecognizedCommand { line, text }.into());
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    fn describe<W: Write>(&self, op: Operation, out: &mut W) -> Result<ControlFlow<()>, SessionError> {
        writeln!(out, "{}", op.describe()).map_err(SessionError::Write)?;
        match op {
            Operation::Malformed { line, text } => {
                Err(ProtocolError::UnrecognizedCommand { line, text }.into())
            }
            Operation::Terminate => Ok(ControlFlow::Break(())),
            _ => Ok(ControlFlow::Continue(())),
        }
    }
}
