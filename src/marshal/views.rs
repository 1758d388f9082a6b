//! Borrowed views over native argument objects
//!
//! Views never copy native storage and never take references; they are
//! only valid for the duration of the dispatch that created them.

use core::fmt;

use crate::error::{SlotError, SlotResult};
use crate::host::Host;
use crate::object::{ObjectHandle, TypeKey};

/// Single native object seen from a callback
#[derive(Clone, Copy)]
pub struct Object<'h> {
    host: &'h dyn Host,
    handle: ObjectHandle,
}

impl<'h> Object<'h> {
    /// Wrap a borrowed handle; `None` for the null marker
    pub fn wrap(host: &'h dyn Host, handle: ObjectHandle) -> Option<Self> {
        handle.non_null().map(|handle| Self { host, handle })
    }

    #[inline]
    pub fn handle(&self) -> ObjectHandle {
        self.handle
    }

    pub fn type_key(&self) -> TypeKey {
        self.host.type_of(self.handle)
    }

    pub fn as_int(&self) -> Option<i64> {
        self.host.int_value(self.handle)
    }

    pub fn as_string(&self) -> Option<String> {
        self.host.str_value(self.handle)
    }

    /// Integer payload or a TypeError naming `what`
    pub fn expect_int(&self, what: &str) -> SlotResult<i64> {
        self.as_int()
            .ok_or_else(|| SlotError::type_error(format!("{} must be an int", what)))
    }
}

impl fmt::Debug for Object<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Object").field(&self.handle).finish()
    }
}

/// Positional arguments of a call/init slot
#[derive(Clone, Copy)]
pub struct ArgTuple<'h> {
    host: &'h dyn Host,
    handle: Option<ObjectHandle>,
}

impl<'h> ArgTuple<'h> {
    /// Wrap a native tuple; null yields an empty view
    pub fn wrap(host: &'h dyn Host, handle: ObjectHandle) -> Self {
        Self {
            host,
            handle: handle.non_null(),
        }
    }

    pub fn len(&self) -> usize {
        self.handle.map_or(0, |h| self.host.tuple_len(h))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Object<'h>> {
        let item = self.host.tuple_item(self.handle?, index)?;
        Object::wrap(self.host, item)
    }

    /// Argument at `index` or an IndexError
    pub fn require(&self, index: usize) -> SlotResult<Object<'h>> {
        self.get(index).ok_or_else(|| {
            SlotError::index_error(format!(
                "missing positional argument {} (got {})",
                index,
                self.len()
            ))
        })
    }

    /// Integer argument at `index`
    pub fn int(&self, index: usize) -> SlotResult<i64> {
        self.require(index)?
            .expect_int(&format!("argument {}", index))
    }

    pub fn iter(&self) -> ArgIter<'h> {
        ArgIter {
            args: *self,
            index: 0,
            len: self.len(),
        }
    }

    pub fn handle(&self) -> Option<ObjectHandle> {
        self.handle
    }
}

impl fmt::Debug for ArgTuple<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'h> IntoIterator for &ArgTuple<'h> {
    type Item = Object<'h>;
    type IntoIter = ArgIter<'h>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct ArgIter<'h> {
    args: ArgTuple<'h>,
    index: usize,
    len: usize,
}

impl<'h> Iterator for ArgIter<'h> {
    type Item = Object<'h>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.len {
            let i = self.index;
            self.index += 1;
            if let Some(obj) = self.args.get(i) {
                return Some(obj);
            }
        }
        None
    }
}

/// Keyword arguments of a call/init slot
#[derive(Clone, Copy)]
pub struct KwArgs<'h> {
    host: &'h dyn Host,
    handle: Option<ObjectHandle>,
}

impl<'h> KwArgs<'h> {
    /// Wrap a native mapping; null (no keywords given) yields an empty view
    pub fn wrap(host: &'h dyn Host, handle: ObjectHandle) -> Self {
        Self {
            host,
            handle: handle.non_null(),
        }
    }

    pub fn len(&self) -> usize {
        self.handle.map_or(0, |h| self.host.mapping_len(h))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, key: &str) -> Option<Object<'h>> {
        let value = self.host.mapping_get(self.handle?, key)?;
        Object::wrap(self.host, value)
    }

    pub fn keys(&self) -> Vec<String> {
        self.handle
            .map(|h| self.host.mapping_keys(h))
            .unwrap_or_default()
    }

    pub fn handle(&self) -> Option<ObjectHandle> {
        self.handle
    }
}

impl fmt::Debug for KwArgs<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}
