//! Construction-time errors.
//!
//! Everything here indicates a mistake by the circuit author and
//! aborts construction; the per-cycle scheduling pass itself is total
//! and has no error channel.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

use bits::prelude::{Width, WordError};

use crate::manager::ManagerId;
use crate::method::MethodId;
use crate::transaction::TransactionId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildError {
    /// An arbiter over zero requesters was requested.
    EmptyArbiter,
    /// A registration arrived after the usage graph was sealed (or a
    /// graph was sealed twice).
    GraphSealed,
    /// A construction step needed the enclosing manager but no scope
    /// was active.
    NoActiveManager,
    /// A scope exit named a manager other than the innermost open
    /// scope (mismatched enter/exit nesting).
    ScopeMismatch {
        expected: ManagerId,
        found: Option<ManagerId>,
    },
    /// The circuit was sealed while scopes were still open.
    UnbalancedScope { depth: usize },
    /// The circuit was stepped before being sealed.
    NotSealed,
    /// A transaction declared two uses of the same method.  Such a
    /// transaction can never win the method's arbitration twice at
    /// once, so it would be dead by construction.
    DuplicateUse {
        transaction: TransactionId,
        method: MethodId,
    },
    /// A use's declared input width disagrees with the method's input
    /// port.
    PortWidthMismatch {
        method: MethodId,
        expected: Width,
        declared: Width,
    },
    /// A method's users span more than one manager, which would leave
    /// its run pulse driven from two places.
    MethodSharedAcrossManagers { method: MethodId },
    UnknownMethod(MethodId),
    UnknownTransaction(TransactionId),
    /// A width computation failed while registering data ports.
    Word(WordError),
}

impl Error for BuildError {}

impl From<WordError> for BuildError {
    fn from(e: WordError) -> BuildError {
        BuildError::Word(e)
    }
}

impl Display for BuildError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        use BuildError::*;
        match self {
            EmptyArbiter => f.write_str("an arbiter must have at least one requester"),
            GraphSealed => f.write_str("the usage graph is already sealed"),
            NoActiveManager => {
                f.write_str("no manager scope is active; transactions need an enclosing manager")
            }
            ScopeMismatch { expected, found } => match found {
                Some(found) => write!(
                    f,
                    "scope exit named manager {expected} but the innermost open scope is {found}"
                ),
                None => write!(
                    f,
                    "scope exit named manager {expected} but no scope is open"
                ),
            },
            UnbalancedScope { depth } => {
                write!(f, "circuit sealed with {depth} scope(s) still open")
            }
            NotSealed => f.write_str("the circuit must be sealed before it can be stepped"),
            DuplicateUse {
                transaction,
                method,
            } => {
                write!(
                    f,
                    "transaction {transaction} uses method {method} twice; it could never be granted"
                )
            }
            PortWidthMismatch {
                method,
                expected,
                declared,
            } => {
                write!(
                    f,
                    "method {method} has a {expected}-bit input port but the use supplies {declared} bits"
                )
            }
            MethodSharedAcrossManagers { method } => {
                write!(
                    f,
                    "method {method} is used from more than one manager; its run pulse would be double-driven"
                )
            }
            UnknownMethod(method) => write!(f, "method {method} is not part of this circuit"),
            UnknownTransaction(transaction) => {
                write!(f, "transaction {transaction} is not part of this circuit")
            }
            Word(e) => write!(f, "{e}"),
        }
    }
}
