//! "Clicked" output: a button-gated parallel output latch.

use bits::prelude::{Width, Word};

use super::{ButtonHandle, LineHandle};
use crate::board::SignalBoard;
use crate::circuit::{Circuit, Module};
use crate::error::BuildError;
use crate::method::MethodId;

/// A clicked output unit.  The `put` method is ready for exactly one
/// cycle after each rising edge of the (two-flop synchronized) button
/// line; the run pulse latches the input-port word into a register
/// readable from the host side.
#[derive(Debug)]
pub struct LatchedOutput {
    put: MethodId,
    button: ButtonHandle,
    latched: LineHandle,
    button1: bool,
    button2: bool,
}

impl LatchedOutput {
    pub fn new(
        circuit: &mut Circuit,
        name: &str,
        width: Width,
    ) -> Result<LatchedOutput, BuildError> {
        let put = circuit.new_method(&format!("{name}.put"), width, Width::ZERO)?;
        Ok(LatchedOutput {
            put,
            button: ButtonHandle::new(),
            latched: LineHandle::new(Word::zero(width)),
            button1: false,
            button2: false,
        })
    }

    /// The method accepting words to latch.
    #[must_use]
    pub fn put(&self) -> MethodId {
        self.put
    }

    #[must_use]
    pub fn button(&self) -> ButtonHandle {
        self.button.clone()
    }

    /// Reads back the latched register.
    #[must_use]
    pub fn probe(&self) -> LineHandle {
        self.latched.clone()
    }
}

impl Module for LatchedOutput {
    fn comb(&mut self, board: &mut SignalBoard) {
        board.set_ready(self.put, self.button1 && !self.button2);
    }

    fn clock(&mut self, board: &SignalBoard) {
        if board.run(self.put) {
            self.latched.set(board.data_in(self.put));
        }
        self.button2 = self.button1;
        self.button1 = self.button.get();
    }
}
