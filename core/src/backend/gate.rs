//! One-shot initialization gate.
//!
//! Wraps a `once_cell::sync::OnceCell` holding the *result* of an
//! initializer, not just the value. The first caller runs the initializer;
//! concurrent callers block until it finishes; everyone, then and later,
//! sees the same outcome. A failure is recorded like a success and handed
//! out again on every call. There is no retry.
//!
//! If the initializer panics the cell stays empty and the next caller runs
//! it again; a panic is a bug, not a recorded outcome.

use once_cell::sync::OnceCell;

use crate::error::{TwinkeyError, TwinkeyResult};

/// Process-wide ready-gate around a fallible initializer.
pub struct InitGate<T> {
    cell: OnceCell<Result<T, TwinkeyError>>,
}

impl<T> InitGate<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Run `init` if nobody has yet, otherwise return the recorded outcome.
    pub fn get_or_init<F>(&self, init: F) -> TwinkeyResult<&T>
    where
        F: FnOnce() -> TwinkeyResult<T>,
    {
        match self.cell.get_or_init(init) {
            Ok(value) => Ok(value),
            Err(e) => Err(e.clone()),
        }
    }

    /// The recorded outcome, or `None` if initialization hasn't finished.
    pub fn get(&self) -> Option<TwinkeyResult<&T>> {
        self.cell.get().map(|outcome| match outcome {
            Ok(value) => Ok(value),
            Err(e) => Err(e.clone()),
        })
    }

    /// `true` once initialization has finished, successfully or not.
    pub fn is_settled(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> Default for InitGate<T> {
    fn default() -> Self {
        Self::new()
    }
}
