//! The example circuit: two clicked inputs feeding a FIFO through a
//! concatenating transaction, drained by a copying transaction into a
//! clicked output.

use bits::prelude::Width;

use super::{
    ButtonHandle, ConcatConnector, CopyConnector, DebouncedInput, LatchedOutput, LineHandle,
    SyncFifo,
};
use crate::circuit::Circuit;
use crate::error::BuildError;

/// Host-side handles for the demo circuit's external lines.
#[derive(Clone, Debug)]
pub struct DemoPorts {
    pub in1_button: ButtonHandle,
    pub in1_line: LineHandle,
    pub in2_button: ButtonHandle,
    pub in2_line: LineHandle,
    pub out_button: ButtonHandle,
    pub out_probe: LineHandle,
}

/// Builds and seals the demo circuit.
///
/// Pressing both input buttons captures one bit on each input; the
/// concatenating transaction pushes the two bits into the FIFO as one
/// word as soon as both captures are armed; each press of the output
/// button drains one word into the output latch.
pub fn demo_circuit() -> Result<(Circuit, DemoPorts), BuildError> {
    let mut circuit = Circuit::new();
    let manager = circuit.new_manager()?;
    circuit.enter(manager);

    let bit = Width::new(1)?;
    let pair = Width::new(2)?;
    let fifo = SyncFifo::new(&mut circuit, "fifo", pair, 16)?;
    let in1 = DebouncedInput::new(&mut circuit, "in1", bit)?;
    let in2 = DebouncedInput::new(&mut circuit, "in2", bit)?;
    let out = LatchedOutput::new(&mut circuit, "out", pair)?;
    let cat = ConcatConnector::new(&mut circuit, "cat", in1.get(), in2.get(), fifo.write())?;
    let copy = CopyConnector::new(&mut circuit, "copy", fifo.read(), out.put())?;

    let ports = DemoPorts {
        in1_button: in1.button(),
        in1_line: in1.line(),
        in2_button: in2.button(),
        in2_line: in2.line(),
        out_button: out.button(),
        out_probe: out.probe(),
    };

    circuit.add_module(Box::new(fifo));
    circuit.add_module(Box::new(in1));
    circuit.add_module(Box::new(in2));
    circuit.add_module(Box::new(out));
    circuit.add_module(Box::new(cat));
    circuit.add_module(Box::new(copy));

    circuit.exit(manager)?;
    circuit.seal()?;
    Ok((circuit, ports))
}
