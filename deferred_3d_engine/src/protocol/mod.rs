pub mod state_machine;

pub use state_machine::{ProtocolState, StateMachine, StateMachineBuilder};
