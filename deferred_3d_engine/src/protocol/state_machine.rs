//! Protocol state machines
//!
//! A [`StateMachine`] tracks the current state of one protocol (for instance
//! the call order of a shader) and refuses every transition that was not
//! registered when it was built. The transition table is immutable and
//! shared between copies of the same machine.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use rustc_hash::FxHashSet;
use crate::error::{Error, Result};

/// A value in one protocol's state space
pub trait ProtocolState: Copy + Eq + Hash + fmt::Debug + 'static {
    /// Name reported in protocol violations
    const MACHINE: &'static str;
}

/// Finite state machine over an explicit `(from, to)` edge set
#[derive(Debug, Clone)]
pub struct StateMachine<S: ProtocolState> {
    initial: S,
    current: S,
    transitions: Arc<FxHashSet<(S, S)>>,
}

impl<S: ProtocolState> StateMachine<S> {
    /// Start building a machine whose initial state is `initial`
    pub fn builder(initial: S) -> StateMachineBuilder<S> {
        StateMachineBuilder {
            initial,
            transitions: FxHashSet::default(),
            reset_edges: false,
        }
    }

    /// Move to `target`.
    ///
    /// # Errors
    ///
    /// [`Error::ProtocolViolation`] if `(current, target)` is not registered.
    /// The current state is left unchanged.
    pub fn transition(&mut self, target: S) -> Result<()> {
        if !self.transitions.contains(&(self.current, target)) {
            return Err(Error::ProtocolViolation {
                machine: S::MACHINE,
                from: format!("{:?}", self.current),
                to: format!("{:?}", target),
            });
        }
        self.current = target;
        Ok(())
    }

    /// Whether `transition(target)` would succeed
    pub fn can_transition(&self, target: S) -> bool {
        self.transitions.contains(&(self.current, target))
    }

    pub fn current(&self) -> S {
        self.current
    }

    pub fn initial(&self) -> S {
        self.initial
    }

    pub fn is_initial(&self) -> bool {
        self.current == self.initial
    }

    /// A machine with the same table, positioned at the initial state
    pub fn fresh(&self) -> Self {
        Self {
            initial: self.initial,
            current: self.initial,
            transitions: Arc::clone(&self.transitions),
        }
    }

    /// Number of registered edges
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }
}

/// Builder for [`StateMachine`]
pub struct StateMachineBuilder<S: ProtocolState> {
    initial: S,
    transitions: FxHashSet<(S, S)>,
    reset_edges: bool,
}

impl<S: ProtocolState> StateMachineBuilder<S> {
    /// Register the edge `from -> to`
    pub fn transition(mut self, from: S, to: S) -> Self {
        self.transitions.insert((from, to));
        self
    }

    /// Register `from -> to` for every `to` in `targets`
    pub fn transitions(mut self, from: S, targets: &[S]) -> Self {
        for &to in targets {
            self.transitions.insert((from, to));
        }
        self
    }

    /// Give every non-initial state mentioned by an edge an edge back to the
    /// initial state
    pub fn with_universal_reset(mut self) -> Self {
        self.reset_edges = true;
        self
    }

    pub fn build(self) -> StateMachine<S> {
        let mut transitions = self.transitions;
        if self.reset_edges {
            let states: Vec<S> = transitions
                .iter()
                .flat_map(|&(from, to)| [from, to])
                .filter(|&state| state != self.initial)
                .collect();
            for state in states {
                transitions.insert((state, self.initial));
            }
        }
        StateMachine {
            initial: self.initial,
            current: self.initial,
            transitions: Arc::new(transitions),
        }
    }
}

#[cfg(test)]
#[path = "state_machine_tests.rs"]
mod tests;
