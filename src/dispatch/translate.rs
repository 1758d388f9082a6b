//! Error translation - managed failures -> native error state + sentinel
//!
//! The only place the runtime's ambient error state is touched. Every
//! failure path ends here exactly once; success paths never do.

use libc::{c_int, c_long};

use crate::error::SlotError;
use crate::host::Host;
use crate::logging::debug;
use crate::object::ObjectHandle;
use crate::slots::Slot;

/// Failure return of object-producing slots
pub const NULL_RESULT: ObjectHandle = ObjectHandle::null();
/// Success return of init/set-attr slots
pub const STATUS_OK: c_int = 0;
/// Failure return of init/set-attr/compare slots
pub const STATUS_FAILED: c_int = -1;
/// Reserved "hash failed" code
pub const HASH_FAILED: c_long = -1;
/// Substitute for a successful hash that collides with `HASH_FAILED`
pub const HASH_ALTERNATE: c_long = -2;

/// Raise `err` into the runtime and hand back the slot's sentinel
#[inline(never)]
pub fn translate<R>(host: &dyn Host, slot: Slot, err: SlotError, sentinel: R) -> R {
    debug!(
        event = "slot_failure",
        slot = slot.name(),
        kind = err.kind.name(),
        message = %err.message,
        "Raising callback failure"
    );
    host.raise(err);
    sentinel
}

/// Widen a callback hash to the runtime's hash width
#[inline]
pub fn widen_hash(value: u32) -> c_long {
    // Sign-wraps where `long` is 32 bits, so u32::MAX meets the sentinel there.
    value as c_long
}

/// Keep a successful hash distinct from the failure sentinel
#[inline]
pub fn finish_hash(widened: c_long) -> c_long {
    if widened == HASH_FAILED {
        HASH_ALTERNATE
    } else {
        widened
    }
}
