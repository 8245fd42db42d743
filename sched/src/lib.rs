//! This crate implements atomic transactions over shared hardware
//! methods and the cycle-accurate harness that evaluates them.
//!
//! A *method* is a shared capability with a ready/run handshake and
//! optional data ports; a *transaction* atomically invokes one or
//! more methods in a single cycle.  Every cycle, each transaction
//! manager computes which transactions are eligible, arbitrates every
//! contended method with a rotating-priority arbiter, and grants a
//! transaction only if it wins every method it uses, so partial
//! invocations never happen and nobody starves under contention.
#![crate_name = "sched"]

mod arbiter;
mod board;
mod circuit;
mod error;
mod manager;
mod method;
pub mod modules;
mod scope;
mod transaction;

pub use arbiter::{RoundRobinArbiter, Selection};
pub use board::SignalBoard;
pub use circuit::{Circuit, CycleReport, Module};
pub use error::BuildError;
pub use manager::{ManagerId, TransactionManager};
pub use method::{MethodId, OutputHandle};
pub use scope::ManagerScope;
pub use transaction::{InputFn, TransactionId, UseInput};
