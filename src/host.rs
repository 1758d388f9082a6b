//! Host services - what the embedding runtime provides to the bridge
//!
//! Design: One object-safe trait covering the narrow contracts the
//! dispatchers consume:
//! 1. Type identity of an instance (registry key)
//! 2. Zero-copy access to argument tuples and keyword mappings
//! 3. Managed value -> native handle conversion (new reference)
//! 4. Raising into the runtime's per-thread error state
//! 5. Default storage release for types without a dealloc callback
//!
//! Implementations must be reentrant: a callback running inside one
//! dispatch may trigger further dispatches on the same thread.

use crate::error::{SlotError, SlotResult};
use crate::marshal::Value;
use crate::object::{ObjectHandle, TypeKey};

pub trait Host: Send + Sync {
    /// Runtime type of `obj` (never null)
    fn type_of(&self, obj: ObjectHandle) -> TypeKey;

    /// Number of items in a native argument tuple
    fn tuple_len(&self, tuple: ObjectHandle) -> usize;

    /// Borrowed item of a native argument tuple, `None` when out of range
    fn tuple_item(&self, tuple: ObjectHandle, index: usize) -> Option<ObjectHandle>;

    /// Number of entries in a native keyword mapping
    fn mapping_len(&self, mapping: ObjectHandle) -> usize;

    /// Borrowed value for `key` in a native keyword mapping
    fn mapping_get(&self, mapping: ObjectHandle, key: &str) -> Option<ObjectHandle>;

    /// Keys of a native keyword mapping, in runtime iteration order
    fn mapping_keys(&self, mapping: ObjectHandle) -> Vec<String>;

    /// Integer payload of a native object, if it is an integer
    fn int_value(&self, obj: ObjectHandle) -> Option<i64>;

    /// String payload of a native object, if it is a string
    fn str_value(&self, obj: ObjectHandle) -> Option<String>;

    /// Produce a new-reference native handle for a managed value
    fn to_native(&self, value: Value) -> SlotResult<ObjectHandle>;

    /// Allocate a native string object (repr/str results)
    fn new_string(&self, s: &str) -> SlotResult<ObjectHandle>;

    /// Set the runtime's error state for the current thread
    fn raise(&self, err: SlotError);

    /// Release native storage for an instance with no dealloc callback
    fn default_deallocate(&self, obj: ObjectHandle);
}
