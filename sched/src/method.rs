//! Methods: named shared capabilities with a ready/run handshake.
//!
//! A method's owner asserts `ready` and drives the output port every
//! cycle from its own registered state; the manager alone asserts
//! `run` and drives the input port.  All of those per-cycle signals
//! live on the [`SignalBoard`](crate::board::SignalBoard); this
//! module only defines the identity and handle types.

use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use bits::prelude::Word;

use crate::board::SignalBoard;

/// Identifies a method within its circuit.  Methods are stored
/// arena-style; the id is the index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MethodId(pub(crate) usize);

impl MethodId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl Display for MethodId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "m{}", self.0)
    }
}

/// Returned by `use_method`; reads the used method's output data for
/// the current cycle.  The value is only meaningful in a cycle where
/// the using transaction holds its grant.
#[derive(Clone, Copy, Debug)]
pub struct OutputHandle {
    pub(crate) method: MethodId,
}

impl OutputHandle {
    #[must_use]
    pub fn method(self) -> MethodId {
        self.method
    }

    #[must_use]
    pub fn read(self, board: &SignalBoard) -> Word {
        board.data_out(self.method)
    }
}
