//! Library modules built on the method/transaction contract.
//!
//! None of these are part of the scheduler itself; they are ordinary
//! consumers of it, useful for demonstrations and for exercising the
//! contract in tests.  Each keeps its registered state private and
//! exposes host-side handles (shared cells) for the signals a test
//! bench or driver needs to poke.

use std::cell::Cell;
use std::fmt::{self, Debug, Formatter};
use std::rc::Rc;

use bits::prelude::Word;

mod connect;
mod demo;
mod fifo;
mod input;
mod output;

pub use connect::{ConcatConnector, CopyConnector};
pub use demo::{demo_circuit, DemoPorts};
pub use fifo::SyncFifo;
pub use input::DebouncedInput;
pub use output::LatchedOutput;

/// Host-side handle for a button line.
#[derive(Clone)]
pub struct ButtonHandle(Rc<Cell<bool>>);

impl ButtonHandle {
    fn new() -> ButtonHandle {
        ButtonHandle(Rc::new(Cell::new(false)))
    }

    pub fn set(&self, pressed: bool) {
        self.0.set(pressed);
    }

    #[must_use]
    pub fn get(&self) -> bool {
        self.0.get()
    }
}

impl Debug for ButtonHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "ButtonHandle({})", self.0.get())
    }
}

/// Host-side handle for a parallel data line.
#[derive(Clone)]
pub struct LineHandle(Rc<Cell<Word>>);

impl LineHandle {
    fn new(initial: Word) -> LineHandle {
        LineHandle(Rc::new(Cell::new(initial)))
    }

    pub fn set(&self, word: Word) {
        self.0.set(word);
    }

    #[must_use]
    pub fn get(&self) -> Word {
        self.0.get()
    }
}

impl Debug for LineHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "LineHandle({:?})", self.0.get())
    }
}
