//! Per-cycle signal storage.
//!
//! All of the handshake and data signals are recomputed every cycle;
//! the board is plain storage for the current cycle's values, reset
//! at the start of each evaluation pass.  Each signal has exactly one
//! legitimate driver: method owners drive ready/data_out and
//! transaction owners drive request through the public setters, while
//! run/grant/data_in can only be driven from inside this crate (by
//! the manager).

use bits::prelude::{Width, Word};

use crate::method::MethodId;
use crate::transaction::TransactionId;

#[derive(Clone, Debug)]
struct MethodSlot {
    input: Width,
    output: Width,
    ready: bool,
    run: bool,
    data_in: Word,
    data_out: Word,
}

impl MethodSlot {
    fn new(input: Width, output: Width) -> MethodSlot {
        MethodSlot {
            input,
            output,
            ready: false,
            run: false,
            data_in: Word::zero(input),
            data_out: Word::zero(output),
        }
    }

    fn reset(&mut self) {
        self.ready = false;
        self.run = false;
        self.data_in = Word::zero(self.input);
        self.data_out = Word::zero(self.output);
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct TransactionSlot {
    request: bool,
    grant: bool,
}

#[derive(Clone, Debug)]
pub struct SignalBoard {
    methods: Vec<MethodSlot>,
    transactions: Vec<TransactionSlot>,
}

impl SignalBoard {
    pub fn new<I>(ports: I, transactions: usize) -> SignalBoard
    where
        I: IntoIterator<Item = (Width, Width)>,
    {
        SignalBoard {
            methods: ports
                .into_iter()
                .map(|(input, output)| MethodSlot::new(input, output))
                .collect(),
            transactions: vec![TransactionSlot::default(); transactions],
        }
    }

    /// Clears every combinational signal ahead of a new evaluation
    /// pass.
    pub fn begin_cycle(&mut self) {
        for slot in self.methods.iter_mut() {
            slot.reset();
        }
        for slot in self.transactions.iter_mut() {
            *slot = TransactionSlot::default();
        }
    }

    #[must_use]
    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    #[must_use]
    pub fn ready(&self, method: MethodId) -> bool {
        self.methods[method.0].ready
    }

    pub fn set_ready(&mut self, method: MethodId, ready: bool) {
        self.methods[method.0].ready = ready;
    }

    #[must_use]
    pub fn run(&self, method: MethodId) -> bool {
        self.methods[method.0].run
    }

    pub(crate) fn set_run(&mut self, method: MethodId, run: bool) {
        self.methods[method.0].run = run;
    }

    #[must_use]
    pub fn data_out(&self, method: MethodId) -> Word {
        self.methods[method.0].data_out
    }

    pub fn set_data_out(&mut self, method: MethodId, data: Word) {
        debug_assert_eq!(data.width(), self.methods[method.0].output);
        self.methods[method.0].data_out = data;
    }

    #[must_use]
    pub fn data_in(&self, method: MethodId) -> Word {
        self.methods[method.0].data_in
    }

    pub(crate) fn set_data_in(&mut self, method: MethodId, data: Word) {
        debug_assert_eq!(data.width(), self.methods[method.0].input);
        self.methods[method.0].data_in = data;
    }

    #[must_use]
    pub fn request(&self, transaction: TransactionId) -> bool {
        self.transactions[transaction.0].request
    }

    pub fn set_request(&mut self, transaction: TransactionId, request: bool) {
        self.transactions[transaction.0].request = request;
    }

    #[must_use]
    pub fn grant(&self, transaction: TransactionId) -> bool {
        self.transactions[transaction.0].grant
    }

    pub(crate) fn set_grant(&mut self, transaction: TransactionId, grant: bool) {
        self.transactions[transaction.0].grant = grant;
    }

    /// Transactions holding their grant this cycle, in id order.
    pub fn granted_transactions(&self) -> impl Iterator<Item = TransactionId> + '_ {
        self.transactions
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.grant)
            .map(|(index, _)| TransactionId(index))
    }

    /// Methods whose run pulse is asserted this cycle, in id order.
    pub fn run_methods(&self) -> impl Iterator<Item = MethodId> + '_ {
        self.methods
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.run)
            .map(|(index, _)| MethodId(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_port_board() -> SignalBoard {
        let w = Width::new(4).expect("test width in range");
        SignalBoard::new([(w, Width::ZERO), (Width::ZERO, w)], 2)
    }

    #[test]
    fn test_begin_cycle_clears_everything() {
        let mut board = two_port_board();
        let (m0, m1) = (MethodId(0), MethodId(1));
        let t0 = TransactionId(0);
        board.set_ready(m0, true);
        board.set_run(m1, true);
        board.set_request(t0, true);
        board.set_grant(t0, true);
        board.set_data_out(m1, Word::masked(Width::new(4).expect("in range"), 0b1010));

        board.begin_cycle();
        assert!(!board.ready(m0));
        assert!(!board.run(m1));
        assert!(!board.request(t0));
        assert!(!board.grant(t0));
        assert_eq!(board.data_out(m1).value(), 0);
        assert_eq!(board.granted_transactions().count(), 0);
        assert_eq!(board.run_methods().count(), 0);
    }

    #[test]
    fn test_activity_iterators() {
        let mut board = two_port_board();
        board.set_run(MethodId(1), true);
        board.set_grant(TransactionId(0), true);
        assert_eq!(
            board.run_methods().collect::<Vec<_>>(),
            vec![MethodId(1)]
        );
        assert_eq!(
            board.granted_transactions().collect::<Vec<_>>(),
            vec![TransactionId(0)]
        );
    }
}
