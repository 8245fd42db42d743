//! Transactions: atomic all-or-nothing uses of one or more methods.

use std::fmt::{self, Debug, Display, Formatter};

use serde::Serialize;

use bits::prelude::{Width, Word};

use crate::board::SignalBoard;
use crate::method::{MethodId, OutputHandle};

/// Identifies a transaction within its circuit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TransactionId(pub(crate) usize);

impl TransactionId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "t{}", self.0)
    }
}

/// Owner-supplied combinational expression producing a use's input
/// data.  It is evaluated only in a cycle where the transaction is
/// granted, after every method owner has driven its output port, so
/// it may freely read other methods' outputs from the same cycle.
pub type InputFn = Box<dyn Fn(&SignalBoard) -> Word>;

/// The input side of one method use.
pub enum UseInput {
    /// The method's input port is zero-width; nothing to supply.
    None,
    /// A combinational expression of the declared width.
    Expr { width: Width, expr: InputFn },
}

impl UseInput {
    #[must_use]
    pub fn none() -> UseInput {
        UseInput::None
    }

    pub fn expr(width: Width, f: impl Fn(&SignalBoard) -> Word + 'static) -> UseInput {
        UseInput::Expr {
            width,
            expr: Box::new(f),
        }
    }

    /// Wires another method's output straight through.
    #[must_use]
    pub fn wire(width: Width, from: OutputHandle) -> UseInput {
        UseInput::Expr {
            width,
            expr: Box::new(move |board| from.read(board)),
        }
    }

    pub(crate) fn width(&self) -> Width {
        match self {
            UseInput::None => Width::ZERO,
            UseInput::Expr { width, .. } => *width,
        }
    }
}

impl Debug for UseInput {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            UseInput::None => f.write_str("UseInput::None"),
            UseInput::Expr { width, .. } => f
                .debug_struct("UseInput::Expr")
                .field("width", width)
                .field("expr", &format_args!("<fn>"))
                .finish(),
        }
    }
}

/// One edge of the usage graph: a transaction's declared use of a
/// method, with the data it supplies to the method's input port.
#[derive(Debug)]
pub(crate) struct Use {
    pub(crate) method: MethodId,
    pub(crate) input: UseInput,
}
