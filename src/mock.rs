//! In-memory host for tests
//!
//! Objects are heap boxes owned by the host and freed when it drops.
//! Error state is kept per thread, as in a real runtime.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, ThreadId};

use crate::error::{SlotError, SlotResult};
use crate::host::Host;
use crate::marshal::Value;
use crate::object::{ObjectHandle, TypeKey};

pub const NONE_TYPE: TypeKey = TypeKey(1);
pub const BOOL_TYPE: TypeKey = TypeKey(2);
pub const INT_TYPE: TypeKey = TypeKey(3);
pub const FLOAT_TYPE: TypeKey = TypeKey(4);
pub const STR_TYPE: TypeKey = TypeKey(5);
pub const TUPLE_TYPE: TypeKey = TypeKey(6);
pub const DICT_TYPE: TypeKey = TypeKey(7);

#[derive(Debug)]
enum Payload {
    Instance,
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Tuple(Vec<ObjectHandle>),
    Dict(Vec<(String, ObjectHandle)>),
}

#[derive(Debug)]
struct MockObject {
    ty: TypeKey,
    payload: Payload,
}

pub struct MockHost {
    objects: Mutex<Vec<usize>>,
    errors: Mutex<HashMap<ThreadId, Vec<SlotError>>>,
    deallocated: Mutex<Vec<ObjectHandle>>,
    next_type: AtomicUsize,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(Vec::new()),
            errors: Mutex::new(HashMap::new()),
            deallocated: Mutex::new(Vec::new()),
            next_type: AtomicUsize::new(0x100),
        }
    }

    /// Fresh extension type identity
    pub fn new_type(&self) -> TypeKey {
        TypeKey(self.next_type.fetch_add(1, Ordering::Relaxed))
    }

    fn alloc(&self, ty: TypeKey, payload: Payload) -> ObjectHandle {
        let raw = Box::into_raw(Box::new(MockObject { ty, payload }));
        self.objects.lock().push(raw as usize);
        ObjectHandle::from_raw(raw.cast())
    }

    fn object(&self, h: ObjectHandle) -> &MockObject {
        assert!(!h.is_null(), "null handle passed to mock host");
        unsafe { &*(h.as_raw() as *const MockObject) }
    }

    pub fn new_instance(&self, ty: TypeKey) -> ObjectHandle {
        self.alloc(ty, Payload::Instance)
    }

    pub fn int(&self, v: i64) -> ObjectHandle {
        self.alloc(INT_TYPE, Payload::Int(v))
    }

    pub fn string(&self, s: &str) -> ObjectHandle {
        self.alloc(STR_TYPE, Payload::Str(s.to_owned()))
    }

    pub fn tuple(&self, items: &[ObjectHandle]) -> ObjectHandle {
        self.alloc(TUPLE_TYPE, Payload::Tuple(items.to_vec()))
    }

    pub fn dict(&self, entries: &[(&str, ObjectHandle)]) -> ObjectHandle {
        let entries = entries
            .iter()
            .map(|(k, v)| ((*k).to_owned(), *v))
            .collect();
        self.alloc(DICT_TYPE, Payload::Dict(entries))
    }

    /// Decode a native handle back into a managed value
    pub fn decode(&self, h: ObjectHandle) -> Value {
        if h.is_null() {
            return Value::None;
        }
        match &self.object(h).payload {
            Payload::None => Value::None,
            Payload::Bool(b) => Value::Bool(*b),
            Payload::Int(i) => Value::Int(*i),
            Payload::Float(f) => Value::Float(*f),
            Payload::Str(s) => Value::Str(s.clone()),
            Payload::Tuple(items) => Value::Tuple(items.iter().map(|h| self.decode(*h)).collect()),
            Payload::Instance | Payload::Dict(_) => Value::Object(h),
        }
    }

    /// Errors raised on the current thread since the last call
    pub fn take_errors(&self) -> Vec<SlotError> {
        self.errors
            .lock()
            .remove(&thread::current().id())
            .unwrap_or_default()
    }

    pub fn deallocated(&self) -> Vec<ObjectHandle> {
        self.deallocated.lock().clone()
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MockHost {
    fn drop(&mut self) {
        for addr in self.objects.get_mut().drain(..) {
            unsafe { drop(Box::from_raw(addr as *mut MockObject)) };
        }
    }
}

impl Host for MockHost {
    fn type_of(&self, obj: ObjectHandle) -> TypeKey {
        self.object(obj).ty
    }

    fn tuple_len(&self, tuple: ObjectHandle) -> usize {
        match &self.object(tuple).payload {
            Payload::Tuple(items) => items.len(),
            _ => 0,
        }
    }

    fn tuple_item(&self, tuple: ObjectHandle, index: usize) -> Option<ObjectHandle> {
        match &self.object(tuple).payload {
            Payload::Tuple(items) => items.get(index).copied(),
            _ => None,
        }
    }

    fn mapping_len(&self, mapping: ObjectHandle) -> usize {
        match &self.object(mapping).payload {
            Payload::Dict(entries) => entries.len(),
            _ => 0,
        }
    }

    fn mapping_get(&self, mapping: ObjectHandle, key: &str) -> Option<ObjectHandle> {
        match &self.object(mapping).payload {
            Payload::Dict(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| *v),
            _ => None,
        }
    }

    fn mapping_keys(&self, mapping: ObjectHandle) -> Vec<String> {
        match &self.object(mapping).payload {
            Payload::Dict(entries) => entries.iter().map(|(k, _)| k.clone()).collect(),
            _ => Vec::new(),
        }
    }

    fn int_value(&self, obj: ObjectHandle) -> Option<i64> {
        match self.object(obj).payload {
            Payload::Int(i) => Some(i),
            _ => None,
        }
    }

    fn str_value(&self, obj: ObjectHandle) -> Option<String> {
        match &self.object(obj).payload {
            Payload::Str(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn to_native(&self, value: Value) -> SlotResult<ObjectHandle> {
        Ok(match value {
            Value::None => self.alloc(NONE_TYPE, Payload::None),
            Value::Bool(b) => self.alloc(BOOL_TYPE, Payload::Bool(b)),
            Value::Int(i) => self.int(i),
            Value::Float(f) => self.alloc(FLOAT_TYPE, Payload::Float(f)),
            Value::Str(s) => self.string(&s),
            Value::Tuple(items) => {
                let handles = items
                    .into_iter()
                    .map(|v| self.to_native(v))
                    .collect::<SlotResult<Vec<_>>>()?;
                self.tuple(&handles)
            }
            Value::Object(h) => h,
        })
    }

    fn new_string(&self, s: &str) -> SlotResult<ObjectHandle> {
        Ok(self.string(s))
    }

    fn raise(&self, err: SlotError) {
        self.errors
            .lock()
            .entry(thread::current().id())
            .or_default()
            .push(err);
    }

    fn default_deallocate(&self, obj: ObjectHandle) {
        self.deallocated.lock().push(obj);
    }
}
