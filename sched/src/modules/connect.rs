//! Combinational connector transactions.
//!
//! A connector owns no data of its own; it is a single transaction
//! which requests every cycle and, whenever granted, moves this
//! cycle's output data of one or two source methods into a sink
//! method's input port.  The scheduler's atomicity is what makes this
//! safe: the sources and the sink are either all invoked together or
//! not at all.

use crate::board::SignalBoard;
use crate::circuit::{Circuit, Module};
use crate::error::BuildError;
use crate::method::MethodId;
use crate::transaction::{TransactionId, UseInput};

/// Moves one word per cycle from a source method to a sink method.
#[derive(Debug)]
pub struct CopyConnector {
    transaction: TransactionId,
}

impl CopyConnector {
    pub fn new(
        circuit: &mut Circuit,
        name: &str,
        source: MethodId,
        sink: MethodId,
    ) -> Result<CopyConnector, BuildError> {
        let transaction = circuit.new_transaction(name)?;
        let (_, source_width) = circuit.method_ports(source)?;
        let data = circuit.use_method(transaction, source, UseInput::none())?;
        circuit.use_method(transaction, sink, UseInput::wire(source_width, data))?;
        Ok(CopyConnector { transaction })
    }

    #[must_use]
    pub fn transaction(&self) -> TransactionId {
        self.transaction
    }
}

impl Module for CopyConnector {
    fn comb(&mut self, board: &mut SignalBoard) {
        board.set_request(self.transaction, true);
    }

    fn clock(&mut self, _board: &SignalBoard) {}
}

/// Reads two source methods and writes their concatenation (low
/// source in the low bits) to a sink method.
#[derive(Debug)]
pub struct ConcatConnector {
    transaction: TransactionId,
}

impl ConcatConnector {
    pub fn new(
        circuit: &mut Circuit,
        name: &str,
        low: MethodId,
        high: MethodId,
        sink: MethodId,
    ) -> Result<ConcatConnector, BuildError> {
        let transaction = circuit.new_transaction(name)?;
        let (_, low_width) = circuit.method_ports(low)?;
        let (_, high_width) = circuit.method_ports(high)?;
        let width = low_width.checked_add(high_width)?;
        let low_data = circuit.use_method(transaction, low, UseInput::none())?;
        let high_data = circuit.use_method(transaction, high, UseInput::none())?;
        circuit.use_method(
            transaction,
            sink,
            UseInput::expr(width, move |board| {
                low_data
                    .read(board)
                    .cat(high_data.read(board))
                    .expect("source widths were checked at construction")
            }),
        )?;
        Ok(ConcatConnector { transaction })
    }

    #[must_use]
    pub fn transaction(&self) -> TransactionId {
        self.transaction
    }
}

impl Module for ConcatConnector {
    fn comb(&mut self, board: &mut SignalBoard) {
        board.set_request(self.transaction, true);
    }

    fn clock(&mut self, _board: &SignalBoard) {}
}
