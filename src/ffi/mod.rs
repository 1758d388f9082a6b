//! C FFI - slot entry points installed in runtime type descriptors
//!
//! Design: Fixed-signature bindings with:
//! 1. One `extern "C"` function per protocol slot
//! 2. A process-wide bridge installed once before any type is registered
//! 3. Error propagation via sentinels plus the host's error state
//!
//! # Safety
//! Every entry point trusts its pointer arguments: object pointers must
//! be live runtime objects (or null where the slot allows it) and name
//! pointers must be NUL-terminated C strings.

mod table;

pub use table::{
    CmpFunc, DestructorFunc, GetAttrFunc, GetAttroFunc, HashFunc, InitProc, RichCmpFunc,
    SetAttrFunc, SetAttroFunc, SlotTable, TernaryFunc, UnaryFunc,
};

use core::ffi::{c_void, CStr};
use libc::{c_char, c_int, c_long};
use once_cell::sync::OnceCell;
use std::sync::Arc;

use crate::bridge::Bridge;
use crate::config::BridgeConfig;
use crate::context::ClassContext;
use crate::dispatch::{Dispatcher, HASH_FAILED, NULL_RESULT, STATUS_FAILED};
use crate::error::BridgeError;
use crate::host::Host;
use crate::logging::error;
use crate::object::{ObjectHandle, TypeKey};
use crate::slots::Slot;

static BRIDGE: OnceCell<Bridge> = OnceCell::new();

/// Install the process-wide bridge (once)
pub fn install(host: Arc<dyn Host>, config: BridgeConfig) -> Result<&'static Bridge, BridgeError> {
    let mut fresh = false;
    let bridge = BRIDGE.get_or_init(|| {
        fresh = true;
        Bridge::new(host, config)
    });
    if fresh {
        Ok(bridge)
    } else {
        Err(BridgeError::AlreadyInstalled)
    }
}

/// The installed bridge
pub fn bridge() -> Result<&'static Bridge, BridgeError> {
    BRIDGE.get().ok_or(BridgeError::NotInstalled)
}

/// Register a class with the installed bridge, returning its slot table
pub fn register_class(key: TypeKey, ctx: ClassContext) -> Result<SlotTable, BridgeError> {
    bridge()?.register(key, ctx)
}

#[inline]
fn dispatch<R>(slot: Slot, sentinel: R, f: impl FnOnce(&Dispatcher<'static>) -> R) -> R {
    match BRIDGE.get() {
        Some(bridge) => f(&bridge.dispatcher()),
        None => {
            error!(event = "bridge_missing", slot = slot.name(), "Slot invoked before install");
            sentinel
        }
    }
}

#[inline]
fn h(ptr: *mut c_void) -> ObjectHandle {
    ObjectHandle::from_raw(ptr)
}

unsafe fn name<'a>(ptr: *const c_char) -> Option<&'a CStr> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr))
    }
}

/// `tp_call`
#[no_mangle]
pub unsafe extern "C" fn slotbridge_class_call(
    obj: *mut c_void,
    args: *mut c_void,
    kwds: *mut c_void,
) -> *mut c_void {
    dispatch(Slot::Call, NULL_RESULT, |d| d.call(h(obj), h(args), h(kwds))).as_raw()
}

/// `tp_compare`
#[no_mangle]
pub unsafe extern "C" fn slotbridge_class_compare(obj1: *mut c_void, obj2: *mut c_void) -> c_int {
    dispatch(Slot::Compare, STATUS_FAILED, |d| d.compare(h(obj1), h(obj2)))
}

/// `tp_getattr`
#[no_mangle]
pub unsafe extern "C" fn slotbridge_class_getattr(
    obj: *mut c_void,
    attr: *const c_char,
) -> *mut c_void {
    let attr = name(attr);
    dispatch(Slot::GetAttr, NULL_RESULT, |d| d.getattr(h(obj), attr)).as_raw()
}

/// `tp_getattro`
#[no_mangle]
pub unsafe extern "C" fn slotbridge_class_getattro(
    obj: *mut c_void,
    attr: *mut c_void,
) -> *mut c_void {
    dispatch(Slot::GetAttrObj, NULL_RESULT, |d| d.getattro(h(obj), h(attr))).as_raw()
}

/// `tp_dealloc`
#[no_mangle]
pub unsafe extern "C" fn slotbridge_class_dealloc(obj: *mut c_void) {
    dispatch(Slot::Dealloc, (), |d| d.dealloc(h(obj)))
}

/// `tp_hash`
#[no_mangle]
pub unsafe extern "C" fn slotbridge_class_hash(obj: *mut c_void) -> c_long {
    dispatch(Slot::Hash, HASH_FAILED, |d| d.hash(h(obj)))
}

/// `tp_init`
#[no_mangle]
pub unsafe extern "C" fn slotbridge_class_init(
    obj: *mut c_void,
    args: *mut c_void,
    kwds: *mut c_void,
) -> c_int {
    dispatch(Slot::Init, STATUS_FAILED, |d| d.init(h(obj), h(args), h(kwds)))
}

/// `tp_iter`
#[no_mangle]
pub unsafe extern "C" fn slotbridge_class_iter(obj: *mut c_void) -> *mut c_void {
    dispatch(Slot::Iter, NULL_RESULT, |d| d.iter(h(obj))).as_raw()
}

/// `tp_iternext`
#[no_mangle]
pub unsafe extern "C" fn slotbridge_class_iternext(obj: *mut c_void) -> *mut c_void {
    dispatch(Slot::IterNext, NULL_RESULT, |d| d.iternext(h(obj))).as_raw()
}

/// `tp_repr`
#[no_mangle]
pub unsafe extern "C" fn slotbridge_class_repr(obj: *mut c_void) -> *mut c_void {
    dispatch(Slot::Repr, NULL_RESULT, |d| d.repr(h(obj))).as_raw()
}

/// `tp_richcompare`
#[no_mangle]
pub unsafe extern "C" fn slotbridge_class_richcompare(
    obj1: *mut c_void,
    obj2: *mut c_void,
    op: c_int,
) -> *mut c_void {
    dispatch(Slot::RichCompare, NULL_RESULT, |d| d.richcompare(h(obj1), h(obj2), op)).as_raw()
}

/// `tp_setattr`
#[no_mangle]
pub unsafe extern "C" fn slotbridge_class_setattr(
    obj: *mut c_void,
    attr: *const c_char,
    value: *mut c_void,
) -> c_int {
    let attr = name(attr);
    dispatch(Slot::SetAttr, STATUS_FAILED, |d| d.setattr(h(obj), attr, h(value)))
}

/// `tp_setattro`
#[no_mangle]
pub unsafe extern "C" fn slotbridge_class_setattro(
    obj1: *mut c_void,
    obj2: *mut c_void,
    obj3: *mut c_void,
) -> c_int {
    dispatch(Slot::SetAttrObj, STATUS_FAILED, |d| d.setattro(h(obj1), h(obj2), h(obj3)))
}

/// `tp_str`
#[no_mangle]
pub unsafe extern "C" fn slotbridge_class_str(obj: *mut c_void) -> *mut c_void {
    dispatch(Slot::Str, NULL_RESULT, |d| d.str(h(obj))).as_raw()
}

#[cfg(test)]
mod tests;
