//! A synchronous FIFO exposing its two ends as methods.

use std::collections::VecDeque;

use bits::prelude::{Width, Word};

use crate::board::SignalBoard;
use crate::circuit::{Circuit, Module};
use crate::error::BuildError;
use crate::method::MethodId;

/// A registered first-in-first-out queue.  `read` is ready while the
/// queue is non-empty and its output port carries the head word;
/// `write` is ready while there is room.  A pop and a push may both
/// be granted in the same cycle.
#[derive(Debug)]
pub struct SyncFifo {
    read: MethodId,
    write: MethodId,
    depth: usize,
    queue: VecDeque<Word>,
}

impl SyncFifo {
    pub fn new(
        circuit: &mut Circuit,
        name: &str,
        width: Width,
        depth: usize,
    ) -> Result<SyncFifo, BuildError> {
        let read = circuit.new_method(&format!("{name}.read"), Width::ZERO, width)?;
        let write = circuit.new_method(&format!("{name}.write"), width, Width::ZERO)?;
        Ok(SyncFifo {
            read,
            write,
            depth,
            queue: VecDeque::with_capacity(depth),
        })
    }

    #[must_use]
    pub fn read(&self) -> MethodId {
        self.read
    }

    #[must_use]
    pub fn write(&self) -> MethodId {
        self.write
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Module for SyncFifo {
    fn comb(&mut self, board: &mut SignalBoard) {
        board.set_ready(self.read, !self.queue.is_empty());
        if let Some(head) = self.queue.front() {
            board.set_data_out(self.read, *head);
        }
        board.set_ready(self.write, self.queue.len() < self.depth);
    }

    fn clock(&mut self, board: &SignalBoard) {
        // Pop before push so a full queue can still turn over when
        // both ends run in the same cycle.
        if board.run(self.read) {
            self.queue.pop_front();
        }
        if board.run(self.write) {
            self.queue.push_back(board.data_in(self.write));
        }
    }
}
