//! Slotbridge - protocol-slot dispatch for host-defined extension types
//!
//! The embedding runtime calls fixed `extern "C"` slot functions (call,
//! hash, getattr, iternext, ...) on its objects. This crate resolves the
//! object's class context, invokes the Rust callback registered for that
//! slot, and converts the outcome back into the runtime's convention:
//! a result handle or status code, or a sentinel with the runtime's error
//! state set.
//!
//! Architecture:
//! - `host` - services the runtime provides (type identity, argument
//!   access, value conversion, raising, default dealloc)
//! - `context` - per-type callback tables and the type registry
//! - `marshal` - borrowed argument views and managed result values
//! - `dispatch` - one dispatcher per slot plus error translation
//! - `ffi` - the installed bridge and the `extern "C"` entry points

pub mod bridge;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod ffi;
pub mod host;
pub mod logging;
pub mod marshal;
pub mod object;
pub mod slots;
pub mod stats;

#[cfg(test)]
mod mock;

// Re-export core types
pub use bridge::Bridge;
pub use config::BridgeConfig;
pub use context::{ClassContext, ClassContextBuilder, Registry};
pub use dispatch::Dispatcher;
pub use error::{BridgeError, ErrorKind, SlotError, SlotResult};
pub use ffi::{bridge, install, register_class, SlotTable};
pub use host::Host;
pub use marshal::{ArgTuple, KwArgs, Object, Value};
pub use object::{ObjectHandle, TypeKey};
pub use slots::{CompareOp, Slot, SlotSet};
pub use stats::{DispatchStats, StatsSnapshot};
