//! "Clicked" input: a button-gated parallel input port.

use bits::prelude::{Width, Word};

use super::{ButtonHandle, LineHandle};
use crate::board::SignalBoard;
use crate::circuit::{Circuit, Module};
use crate::error::BuildError;
use crate::method::MethodId;

/// A clicked input unit.  A rising edge on the (two-flop
/// synchronized) button line captures the data line and raises the
/// `get` method's ready; the captured word is then handed out by one
/// run pulse, after which ready drops until the next edge.
#[derive(Debug)]
pub struct DebouncedInput {
    get: MethodId,
    width: Width,
    button: ButtonHandle,
    line: LineHandle,
    // Two-flop synchronizer and the sampled data line.
    button1: bool,
    button2: bool,
    line1: Word,
    // One-deep capture register.
    have: bool,
    held: Word,
}

impl DebouncedInput {
    pub fn new(
        circuit: &mut Circuit,
        name: &str,
        width: Width,
    ) -> Result<DebouncedInput, BuildError> {
        let get = circuit.new_method(&format!("{name}.get"), Width::ZERO, width)?;
        Ok(DebouncedInput {
            get,
            width,
            button: ButtonHandle::new(),
            line: LineHandle::new(Word::zero(width)),
            button1: false,
            button2: false,
            line1: Word::zero(width),
            have: false,
            held: Word::zero(width),
        })
    }

    /// The method handing out captured words.
    #[must_use]
    pub fn get(&self) -> MethodId {
        self.get
    }

    #[must_use]
    pub fn button(&self) -> ButtonHandle {
        self.button.clone()
    }

    #[must_use]
    pub fn line(&self) -> LineHandle {
        self.line.clone()
    }
}

impl Module for DebouncedInput {
    fn comb(&mut self, board: &mut SignalBoard) {
        board.set_ready(self.get, self.have);
        board.set_data_out(self.get, self.held);
    }

    fn clock(&mut self, board: &SignalBoard) {
        if board.run(self.get) {
            self.have = false;
        }
        // A fresh edge re-arms the capture even in the cycle the old
        // word is consumed.
        if self.button1 && !self.button2 {
            self.have = true;
            self.held = self.line1;
        }
        self.button2 = self.button1;
        self.button1 = self.button.get();
        self.line1 = Word::masked(self.width, self.line.get().value());
    }
}
