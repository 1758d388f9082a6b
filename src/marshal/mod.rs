//! Argument marshalling - native handles <-> managed views
//!
//! Design: Zero-copy in, single conversion out:
//! - Incoming tuples, keyword mappings and single objects are wrapped
//!   in borrowed views that read through the host on demand
//! - A null handle becomes an empty view, never a failure
//! - Callback results are owned `Value`s converted to a new-reference
//!   handle exactly once, at the native boundary
//!
//! Architecture:
//! - `views.rs` - `Object`, `ArgTuple`, `KwArgs`
//! - `value.rs` - `Value`, the managed result representation

mod value;
mod views;

pub use value::Value;
pub use views::{ArgIter, ArgTuple, KwArgs, Object};

use crate::error::SlotResult;
use crate::host::Host;
use crate::logging::trace;
use crate::object::ObjectHandle;

/// Convert a callback result into a new-reference native handle
#[inline]
pub fn unwrap_to_handle(host: &dyn Host, value: Value) -> SlotResult<ObjectHandle> {
    trace!(event = "type_conversion", from = value.type_name(), to = "native");
    host.to_native(value)
}
