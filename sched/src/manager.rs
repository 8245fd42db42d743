//! The transaction manager: usage graph and per-cycle scheduling.
//!
//! The manager owns the bipartite graph between transactions and the
//! methods they use.  The graph is built during construction, frozen
//! by [`TransactionManager::seal`], and then consulted every cycle by
//! [`TransactionManager::resolve`], which turns the cycle's
//! request/ready signals into grant/run/data assignments.  Resolution
//! is a single combinational pass: eligibility, then per-method
//! arbitration, then all-or-nothing grants, then signal driving.
//! Nothing about it can fail at runtime; every combination of inputs
//! produces a well-defined (possibly all-false) assignment.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use serde::Serialize;
use tracing::{event, Level};

use crate::arbiter::RoundRobinArbiter;
use crate::board::SignalBoard;
use crate::error::BuildError;
use crate::method::{MethodId, OutputHandle};
use crate::transaction::{TransactionId, Use, UseInput};


/// Identifies a manager within its circuit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ManagerId(pub(crate) usize);

impl Display for ManagerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "g{}", self.0)
    }
}

#[derive(Debug, Default)]
pub struct TransactionManager {
    /// Registration order; grants are reported in this order too.
    transactions: Vec<TransactionId>,
    /// Transaction -> its declared uses, in declaration order.
    uses: BTreeMap<TransactionId, Vec<Use>>,
    /// Method -> the transactions that use it, in registration order.
    /// An arbiter's requester indices are positions in this list.
    users: BTreeMap<MethodId, Vec<TransactionId>>,
    /// One arbiter per contended method; single-user methods need
    /// none.  Populated by `seal`.
    arbiters: BTreeMap<MethodId, RoundRobinArbiter>,
    sealed: bool,
}

impl TransactionManager {
    #[must_use]
    pub fn new() -> TransactionManager {
        TransactionManager::default()
    }

    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Methods which appear in this manager's usage graph.
    pub fn used_methods(&self) -> impl Iterator<Item = MethodId> + '_ {
        self.users.keys().copied()
    }

    pub fn register_transaction(&mut self, transaction: TransactionId) -> Result<(), BuildError> {
        if self.sealed {
            return Err(BuildError::GraphSealed);
        }
        if !self.uses.contains_key(&transaction) {
            self.transactions.push(transaction);
            self.uses.insert(transaction, Vec::new());
        }
        Ok(())
    }

    /// Declares that `transaction` invokes `method` whenever it is
    /// granted, supplying `input` to the method's input port.  The
    /// returned handle reads the method's output port.
    pub fn use_method(
        &mut self,
        transaction: TransactionId,
        method: MethodId,
        input: UseInput,
    ) -> Result<OutputHandle, BuildError> {
        if self.sealed {
            return Err(BuildError::GraphSealed);
        }
        let uses = self
            .uses
            .get_mut(&transaction)
            .ok_or(BuildError::UnknownTransaction(transaction))?;
        if uses.iter().any(|u| u.method == method) {
            return Err(BuildError::DuplicateUse {
                transaction,
                method,
            });
        }
        uses.push(Use { method, input });
        self.users.entry(method).or_default().push(transaction);
        Ok(OutputHandle { method })
    }

    /// Freezes the usage graph and instantiates one arbiter per
    /// contended method.  Sealing twice is an error, as is any
    /// registration afterwards.
    pub fn seal(&mut self) -> Result<(), BuildError> {
        if self.sealed {
            return Err(BuildError::GraphSealed);
        }
        for (method, users) in self.users.iter() {
            if users.len() > 1 {
                self.arbiters
                    .insert(*method, RoundRobinArbiter::new(users.len())?);
            }
        }
        self.sealed = true;
        event!(
            Level::DEBUG,
            "sealed usage graph: {} transactions, {} used methods, {} contended",
            self.transactions.len(),
            self.users.len(),
            self.arbiters.len()
        );
        Ok(())
    }

    /// The per-cycle scheduling pass.  Reads this cycle's
    /// request/ready signals off the board and drives grant, run and
    /// the input-port muxes.
    pub fn resolve(&mut self, board: &mut SignalBoard) {
        debug_assert!(self.sealed, "resolve called on an unsealed manager");

        // Eligibility: requesting, and every used method is ready.
        let mut eligible: BTreeMap<TransactionId, bool> = BTreeMap::new();
        for transaction in &self.transactions {
            let runnable = self.uses[transaction]
                .iter()
                .all(|u| board.ready(u.method));
            eligible.insert(*transaction, board.request(*transaction) && runnable);
        }

        // Arbitration: for each contended method, pick among its
        // eligible users.
        let mut selected: BTreeMap<MethodId, TransactionId> = BTreeMap::new();
        for (method, arbiter) in self.arbiters.iter() {
            let users = &self.users[method];
            let requests: Vec<bool> = users.iter().map(|t| eligible[t]).collect();
            if let Some(slot) = arbiter.pick(&requests).granted {
                selected.insert(*method, users[slot]);
            }
        }

        // Grant: all-or-nothing across every used method.  Losing any
        // one arbitration forfeits the whole transaction, which is
        // what keeps multi-method transactions atomic.
        for transaction in &self.transactions {
            let grant = eligible[transaction]
                && self.uses[transaction].iter().all(|u| {
                    if self.arbiters.contains_key(&u.method) {
                        selected.get(&u.method) == Some(transaction)
                    } else {
                        // Statically sole user; wins unconditionally.
                        true
                    }
                });
            board.set_grant(*transaction, grant);
            if grant {
                event!(Level::TRACE, "granted transaction {transaction}");
            }
        }

        // Drive run pulses and mux the winner's input data onto each
        // method's input port.  At most one user of a method can hold
        // a grant, by construction.
        for (method, users) in self.users.iter() {
            let winner = users.iter().copied().find(|t| board.grant(*t));
            board.set_run(*method, winner.is_some());
            if let Some(winner) = winner {
                let input = self.uses[&winner]
                    .iter()
                    .find(|u| u.method == *method)
                    .map(|u| &u.input);
                if let Some(UseInput::Expr { expr, .. }) = input {
                    let data = expr(board);
                    board.set_data_in(*method, data);
                }
            }
        }

        // Rotation follows service: an arbiter's pointer only moves
        // when its selected transaction was actually granted.
        for (method, arbiter) in self.arbiters.iter_mut() {
            if let Some(transaction) = selected.get(method) {
                if board.grant(*transaction) {
                    let users = &self.users[method];
                    if let Some(slot) = users.iter().position(|t| t == transaction) {
                        arbiter.commit(slot);
                    }
                }
            }
        }
    }
}
