//! Scena Core - Script interpreter core (pure logic, no IO)
//!
//! Contains the instruction cursor, call-frame stack, command dispatch, and
//! the tick-based suspend/resume state machine. Only operates on in-memory
//! data structures; loading script blobs and owning the tick loop are the
//! host's responsibility.
//!
//! Configuration is passed explicitly via parameters, not via global state.

pub mod runtime;

// Re-export common types
pub use runtime::command::{
    Command, CommandTable, CommandTableBuilder, Control, PendingCommand, PollStatus,
};
pub use runtime::commands::standard_table;
pub use runtime::context::{ActorId, ScriptContext, ScriptStatus};
pub use runtime::cursor::Cursor;
pub use runtime::error::ScriptError;
pub use runtime::resolver::{TwoTierStore, VariableResolver, SAVED_VAR_BASE};
pub use runtime::vm::{Interpreter, TickOutcome};

// Re-export config types from scena-config
pub use scena_config::{LimitConfig, Phase, VmConfig};
