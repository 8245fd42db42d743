//! The circuit: construction registry and the per-cycle evaluation
//! loop.
//!
//! A circuit is built in two phases.  During construction, modules
//! register methods, transactions and uses (threading through the
//! manager scope), after which [`Circuit::seal`] freezes every usage
//! graph.  During simulation, [`Circuit::step`] evaluates one cycle:
//! every module's combinational outputs, then every manager's
//! scheduling pass, then every module's registered update.  The phase
//! order is what makes grant feedback structurally impossible: a
//! module's ready/request are computed before any grant exists.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{event, span, Level};

use bits::prelude::Width;

use crate::board::SignalBoard;
use crate::error::BuildError;
use crate::manager::{ManagerId, TransactionManager};
use crate::method::{MethodId, OutputHandle};
use crate::scope::ManagerScope;
use crate::transaction::{TransactionId, UseInput};

/// A hardware module participating in the per-cycle evaluation.
///
/// `comb` must drive `ready`/`data_out` for the module's methods and
/// `request` for its transactions purely from the module's registered
/// state; it runs before any grant is known, so those signals cannot
/// depend on the cycle's own scheduling outcome.  `clock` performs
/// the registered state update at the cycle boundary and is where the
/// module reacts to `run`/`grant`/`data_in`.
pub trait Module {
    fn comb(&mut self, board: &mut SignalBoard);
    fn clock(&mut self, board: &SignalBoard);
}

#[derive(Debug)]
struct MethodEntry {
    name: String,
    input: Width,
    output: Width,
}

#[derive(Debug)]
struct TransactionEntry {
    name: String,
    manager: ManagerId,
}

/// What happened in one simulated cycle.
#[derive(Clone, Debug, Serialize)]
pub struct CycleReport {
    pub cycle: u64,
    /// Transactions which held their grant, in id order.
    pub granted: Vec<TransactionId>,
    /// Methods whose run pulse fired, in id order.
    pub ran: Vec<MethodId>,
}

impl CycleReport {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.granted.is_empty() && self.ran.is_empty()
    }
}

pub struct Circuit {
    methods: Vec<MethodEntry>,
    transactions: Vec<TransactionEntry>,
    managers: Vec<TransactionManager>,
    scope: ManagerScope,
    modules: Vec<Box<dyn Module>>,
    /// Present once the circuit has been sealed.
    board: Option<SignalBoard>,
    cycle: u64,
}

impl Circuit {
    #[must_use]
    pub fn new() -> Circuit {
        Circuit {
            methods: Vec::new(),
            transactions: Vec::new(),
            managers: Vec::new(),
            scope: ManagerScope::new(),
            modules: Vec::new(),
            board: None,
            cycle: 0,
        }
    }

    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.board.is_some()
    }

    #[must_use]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn new_manager(&mut self) -> Result<ManagerId, BuildError> {
        if self.is_sealed() {
            return Err(BuildError::GraphSealed);
        }
        let id = ManagerId(self.managers.len());
        self.managers.push(TransactionManager::new());
        Ok(id)
    }

    /// Opens a manager scope; submodules constructed before the
    /// matching [`Circuit::exit`] bind their transactions to it.
    pub fn enter(&mut self, manager: ManagerId) {
        debug_assert!(manager.0 < self.managers.len());
        self.scope.enter(manager);
    }

    pub fn exit(&mut self, manager: ManagerId) -> Result<(), BuildError> {
        self.scope.exit(manager)
    }

    /// Runs `build` inside an enter/exit pair for `manager`.
    pub fn scoped<R>(
        &mut self,
        manager: ManagerId,
        build: impl FnOnce(&mut Circuit) -> Result<R, BuildError>,
    ) -> Result<R, BuildError> {
        self.enter(manager);
        let result = build(self)?;
        self.exit(manager)?;
        Ok(result)
    }

    /// Allocates a method with the given port widths.  Either width
    /// may be zero for a port that carries no data.
    pub fn new_method(
        &mut self,
        name: &str,
        input: Width,
        output: Width,
    ) -> Result<MethodId, BuildError> {
        if self.is_sealed() {
            return Err(BuildError::GraphSealed);
        }
        let id = MethodId(self.methods.len());
        self.methods.push(MethodEntry {
            name: name.to_owned(),
            input,
            output,
        });
        Ok(id)
    }

    /// Allocates a transaction bound to the innermost open manager
    /// scope.
    pub fn new_transaction(&mut self, name: &str) -> Result<TransactionId, BuildError> {
        if self.is_sealed() {
            return Err(BuildError::GraphSealed);
        }
        let manager = self.scope.current()?;
        let id = TransactionId(self.transactions.len());
        self.managers[manager.0].register_transaction(id)?;
        self.transactions.push(TransactionEntry {
            name: name.to_owned(),
            manager,
        });
        Ok(id)
    }

    /// Declares that `transaction` uses `method`, supplying `input`.
    /// The declared input width must match the method's input port.
    pub fn use_method(
        &mut self,
        transaction: TransactionId,
        method: MethodId,
        input: UseInput,
    ) -> Result<OutputHandle, BuildError> {
        if self.is_sealed() {
            return Err(BuildError::GraphSealed);
        }
        let entry = self
            .methods
            .get(method.0)
            .ok_or(BuildError::UnknownMethod(method))?;
        if input.width() != entry.input {
            return Err(BuildError::PortWidthMismatch {
                method,
                expected: entry.input,
                declared: input.width(),
            });
        }
        let owner = self
            .transactions
            .get(transaction.0)
            .ok_or(BuildError::UnknownTransaction(transaction))?
            .manager;
        self.managers[owner.0].use_method(transaction, method, input)
    }

    pub fn add_module(&mut self, module: Box<dyn Module>) {
        self.modules.push(module);
    }

    #[must_use]
    pub fn method_name(&self, method: MethodId) -> Option<&str> {
        self.methods.get(method.0).map(|entry| entry.name.as_str())
    }

    #[must_use]
    pub fn transaction_name(&self, transaction: TransactionId) -> Option<&str> {
        self.transactions
            .get(transaction.0)
            .map(|entry| entry.name.as_str())
    }

    /// The (input, output) port widths of a method.
    pub fn method_ports(&self, method: MethodId) -> Result<(Width, Width), BuildError> {
        self.methods
            .get(method.0)
            .map(|entry| (entry.input, entry.output))
            .ok_or(BuildError::UnknownMethod(method))
    }

    /// Freezes every usage graph and brings up the signal board.  No
    /// registration is possible afterwards.
    pub fn seal(&mut self) -> Result<(), BuildError> {
        if self.is_sealed() {
            return Err(BuildError::GraphSealed);
        }
        if !self.scope.is_empty() {
            return Err(BuildError::UnbalancedScope {
                depth: self.scope.depth(),
            });
        }
        // A method's run pulse is driven by the manager scheduling
        // its users, so all users must sit under one manager.
        let mut owner: BTreeMap<MethodId, ManagerId> = BTreeMap::new();
        for (index, manager) in self.managers.iter().enumerate() {
            for method in manager.used_methods() {
                if owner.insert(method, ManagerId(index)).is_some() {
                    return Err(BuildError::MethodSharedAcrossManagers { method });
                }
            }
        }
        for manager in self.managers.iter_mut() {
            manager.seal()?;
        }
        self.board = Some(SignalBoard::new(
            self.methods.iter().map(|entry| (entry.input, entry.output)),
            self.transactions.len(),
        ));
        event!(
            Level::DEBUG,
            "circuit sealed: {} methods, {} transactions, {} managers, {} modules",
            self.methods.len(),
            self.transactions.len(),
            self.managers.len(),
            self.modules.len()
        );
        Ok(())
    }

    /// Evaluates one cycle and reports what was granted and run.
    pub fn step(&mut self) -> Result<CycleReport, BuildError> {
        let cycle = self.cycle;
        let board = self.board.as_mut().ok_or(BuildError::NotSealed)?;
        let step_span = span!(Level::TRACE, "cycle", n = cycle);
        let _enter = step_span.enter();

        board.begin_cycle();
        for module in self.modules.iter_mut() {
            module.comb(board);
        }
        for manager in self.managers.iter_mut() {
            manager.resolve(board);
        }
        for module in self.modules.iter_mut() {
            module.clock(board);
        }

        let report = CycleReport {
            cycle,
            granted: board.granted_transactions().collect(),
            ran: board.run_methods().collect(),
        };
        self.cycle += 1;
        Ok(report)
    }
}

impl Default for Circuit {
    /// We're implementing this mainly to keep clippy happy.
    fn default() -> Circuit {
        Circuit::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::transaction::UseInput;

    const COMPLAIN: &str = "test circuit should build";

    /// One module exposing a method which is always ready and a
    /// transaction which always wants it.
    struct Ticker {
        method: MethodId,
        transaction: TransactionId,
        served: Rc<Cell<u64>>,
    }

    impl Module for Ticker {
        fn comb(&mut self, board: &mut SignalBoard) {
            board.set_ready(self.method, true);
            board.set_request(self.transaction, true);
        }

        fn clock(&mut self, board: &SignalBoard) {
            if board.run(self.method) {
                self.served.set(self.served.get() + 1);
            }
        }
    }

    #[test]
    fn test_step_before_seal_is_rejected() {
        let mut circuit = Circuit::new();
        assert!(matches!(circuit.step(), Err(BuildError::NotSealed)));
    }

    #[test]
    fn test_transaction_needs_an_open_scope() {
        let mut circuit = Circuit::new();
        assert_eq!(
            circuit.new_transaction("orphan").err(),
            Some(BuildError::NoActiveManager)
        );
    }

    #[test]
    fn test_seal_with_open_scope_is_rejected() {
        let mut circuit = Circuit::new();
        let manager = circuit.new_manager().expect(COMPLAIN);
        circuit.enter(manager);
        assert_eq!(
            circuit.seal(),
            Err(BuildError::UnbalancedScope { depth: 1 })
        );
    }

    #[test]
    fn test_use_width_must_match_the_input_port() {
        let w4 = Width::new(4).expect("test width in range");
        let w2 = Width::new(2).expect("test width in range");
        let mut circuit = Circuit::new();
        let manager = circuit.new_manager().expect(COMPLAIN);
        circuit.enter(manager);
        let sink = circuit.new_method("sink", w4, Width::ZERO).expect(COMPLAIN);
        let txn = circuit.new_transaction("writer").expect(COMPLAIN);
        assert_eq!(
            circuit
                .use_method(txn, sink, UseInput::expr(w2, |_| bits::word!(2, 0)))
                .err(),
            Some(BuildError::PortWidthMismatch {
                method: sink,
                expected: w4,
                declared: w2,
            })
        );
    }

    #[test]
    fn test_method_users_must_share_a_manager() {
        let mut circuit = Circuit::new();
        let first = circuit.new_manager().expect(COMPLAIN);
        let second = circuit.new_manager().expect(COMPLAIN);
        let method = circuit
            .new_method("shared", Width::ZERO, Width::ZERO)
            .expect(COMPLAIN);

        circuit
            .scoped(first, |circuit| {
                let txn = circuit.new_transaction("a")?;
                circuit.use_method(txn, method, UseInput::none())?;
                Ok(())
            })
            .expect(COMPLAIN);
        circuit
            .scoped(second, |circuit| {
                let txn = circuit.new_transaction("b")?;
                circuit.use_method(txn, method, UseInput::none())?;
                Ok(())
            })
            .expect(COMPLAIN);

        assert_eq!(
            circuit.seal(),
            Err(BuildError::MethodSharedAcrossManagers { method })
        );
    }

    #[test]
    fn test_registration_after_seal_is_rejected() {
        let mut circuit = Circuit::new();
        circuit.new_manager().expect(COMPLAIN);
        circuit.seal().expect(COMPLAIN);
        assert_eq!(
            circuit
                .new_method("late", Width::ZERO, Width::ZERO)
                .err(),
            Some(BuildError::GraphSealed)
        );
        assert_eq!(circuit.new_manager().err(), Some(BuildError::GraphSealed));
        assert_eq!(circuit.seal(), Err(BuildError::GraphSealed));
    }

    #[test]
    fn test_step_runs_the_three_phases() {
        let mut circuit = Circuit::new();
        let manager = circuit.new_manager().expect(COMPLAIN);
        let served = Rc::new(Cell::new(0));
        let (method, transaction) = circuit
            .scoped(manager, |circuit| {
                let method = circuit.new_method("tick", Width::ZERO, Width::ZERO)?;
                let transaction = circuit.new_transaction("ticker")?;
                circuit.use_method(transaction, method, UseInput::none())?;
                Ok((method, transaction))
            })
            .expect(COMPLAIN);
        circuit.add_module(Box::new(Ticker {
            method,
            transaction,
            served: served.clone(),
        }));
        circuit.seal().expect(COMPLAIN);

        for cycle in 0..3 {
            let report = circuit.step().expect("step should succeed");
            assert_eq!(report.cycle, cycle);
            assert_eq!(report.granted, vec![transaction]);
            assert_eq!(report.ran, vec![method]);
            assert!(!report.is_idle());
        }
        assert_eq!(served.get(), 3);
        assert_eq!(circuit.cycle(), 3);
    }
}
