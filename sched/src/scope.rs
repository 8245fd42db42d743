//! Construction-time manager scoping.
//!
//! Nested module builders need to know which manager to register
//! their transactions with, without every constructor threading a
//! manager handle through its arguments.  The scope is an explicit
//! LIFO stack owned by the circuit: enter a manager before building
//! the submodules that belong to it, exit afterwards.  The stack is
//! consulted only while the circuit is being constructed; it plays no
//! part in simulation.

use crate::error::BuildError;
use crate::manager::ManagerId;

#[derive(Debug, Default)]
pub struct ManagerScope {
    stack: Vec<ManagerId>,
}

impl ManagerScope {
    #[must_use]
    pub fn new() -> ManagerScope {
        ManagerScope::default()
    }

    pub fn enter(&mut self, manager: ManagerId) {
        self.stack.push(manager);
    }

    /// Closes the innermost scope.  The caller names the manager it
    /// believes it is closing; naming any other manager means the
    /// enter/exit pairs are mismatched, which is a construction bug.
    pub fn exit(&mut self, manager: ManagerId) -> Result<(), BuildError> {
        match self.stack.pop() {
            None => Err(BuildError::ScopeMismatch {
                expected: manager,
                found: None,
            }),
            Some(top) if top == manager => Ok(()),
            Some(top) => {
                // Leave the stack as we found it; construction is
                // about to be aborted with the error anyway.
                self.stack.push(top);
                Err(BuildError::ScopeMismatch {
                    expected: manager,
                    found: Some(top),
                })
            }
        }
    }

    /// The innermost active manager.
    pub fn current(&self) -> Result<ManagerId, BuildError> {
        self.stack
            .last()
            .copied()
            .ok_or(BuildError::NoActiveManager)
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifo_discipline() {
        let (outer, inner) = (ManagerId(0), ManagerId(1));
        let mut scope = ManagerScope::new();
        assert_eq!(scope.current(), Err(BuildError::NoActiveManager));

        scope.enter(outer);
        scope.enter(inner);
        assert_eq!(scope.current(), Ok(inner));
        assert_eq!(scope.exit(inner), Ok(()));
        assert_eq!(scope.current(), Ok(outer));
        assert_eq!(scope.exit(outer), Ok(()));
        assert!(scope.is_empty());
    }

    #[test]
    fn test_mismatched_exit() {
        let (outer, inner) = (ManagerId(0), ManagerId(1));
        let mut scope = ManagerScope::new();
        scope.enter(outer);
        assert_eq!(
            scope.exit(inner),
            Err(BuildError::ScopeMismatch {
                expected: inner,
                found: Some(outer),
            })
        );
        // The failed exit must not have disturbed the stack.
        assert_eq!(scope.current(), Ok(outer));
    }

    #[test]
    fn test_exit_of_empty_scope() {
        let mut scope = ManagerScope::new();
        assert_eq!(
            scope.exit(ManagerId(0)),
            Err(BuildError::ScopeMismatch {
                expected: ManagerId(0),
                found: None,
            })
        );
    }
}
