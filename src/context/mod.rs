//! Class contexts - per-type tables of slot callbacks
//!
//! Design: One optional, explicitly typed callback per protocol slot.
//! A context is built once when its type is registered and is never
//! mutated afterwards, so lookups can share it freely across threads.

mod registry;

pub use registry::Registry;

use core::fmt;
use std::sync::Arc;

use crate::error::SlotResult;
use crate::marshal::{ArgTuple, KwArgs, Object, Value};
use crate::object::ObjectHandle;
use crate::slots::{CompareOp, Slot, SlotSet};

pub type CallFn =
    dyn for<'h> Fn(ObjectHandle, &ArgTuple<'h>, &KwArgs<'h>) -> SlotResult<Value> + Send + Sync;
pub type CompareFn = dyn for<'h> Fn(ObjectHandle, Object<'h>) -> SlotResult<i32> + Send + Sync;
pub type GetAttrFn = dyn Fn(ObjectHandle, &str) -> SlotResult<Value> + Send + Sync;
pub type GetAttrObjFn = dyn for<'h> Fn(ObjectHandle, Object<'h>) -> SlotResult<Value> + Send + Sync;
pub type DeallocFn = dyn Fn(ObjectHandle) + Send + Sync;
pub type HashFn = dyn Fn(ObjectHandle) -> SlotResult<u32> + Send + Sync;
pub type InitFn =
    dyn for<'h> Fn(ObjectHandle, &ArgTuple<'h>, &KwArgs<'h>) -> SlotResult<()> + Send + Sync;
pub type IterFn = dyn Fn(ObjectHandle) -> SlotResult<Value> + Send + Sync;
/// `Ok(None)` is natural exhaustion, not an error
pub type IterNextFn = dyn Fn(ObjectHandle) -> SlotResult<Option<Value>> + Send + Sync;
/// repr/str have no error channel
pub type ReprFn = dyn Fn(ObjectHandle) -> String + Send + Sync;
pub type RichCompareFn =
    dyn for<'h> Fn(ObjectHandle, Object<'h>, CompareOp) -> SlotResult<Value> + Send + Sync;
/// A `None` value means attribute deletion
pub type SetAttrFn =
    dyn for<'h> Fn(ObjectHandle, &str, Option<Object<'h>>) -> SlotResult<()> + Send + Sync;
pub type SetAttrObjFn = dyn for<'h> Fn(ObjectHandle, Object<'h>, Option<Object<'h>>) -> SlotResult<()>
    + Send
    + Sync;

/// Slot callbacks of one registered extension type
#[derive(Clone, Default)]
pub struct ClassContext {
    name: String,
    pub(crate) call: Option<Arc<CallFn>>,
    pub(crate) compare: Option<Arc<CompareFn>>,
    pub(crate) getattr: Option<Arc<GetAttrFn>>,
    pub(crate) getattro: Option<Arc<GetAttrObjFn>>,
    pub(crate) dealloc: Option<Arc<DeallocFn>>,
    pub(crate) hash: Option<Arc<HashFn>>,
    pub(crate) init: Option<Arc<InitFn>>,
    pub(crate) iter: Option<Arc<IterFn>>,
    pub(crate) iternext: Option<Arc<IterNextFn>>,
    pub(crate) repr: Option<Arc<ReprFn>>,
    pub(crate) richcmp: Option<Arc<RichCompareFn>>,
    pub(crate) setattr: Option<Arc<SetAttrFn>>,
    pub(crate) setattro: Option<Arc<SetAttrObjFn>>,
    pub(crate) str: Option<Arc<ReprFn>>,
}

impl ClassContext {
    pub fn builder(name: impl Into<String>) -> ClassContextBuilder {
        ClassContextBuilder {
            ctx: ClassContext {
                name: name.into(),
                ..Default::default()
            },
        }
    }

    /// Type name, used in diagnostics
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has(&self, slot: Slot) -> bool {
        match slot {
            Slot::Call => self.call.is_some(),
            Slot::Compare => self.compare.is_some(),
            Slot::GetAttr => self.getattr.is_some(),
            Slot::GetAttrObj => self.getattro.is_some(),
            Slot::Dealloc => self.dealloc.is_some(),
            Slot::Hash => self.hash.is_some(),
            Slot::Init => self.init.is_some(),
            Slot::Iter => self.iter.is_some(),
            Slot::IterNext => self.iternext.is_some(),
            Slot::Repr => self.repr.is_some(),
            Slot::RichCompare => self.richcmp.is_some(),
            Slot::SetAttr => self.setattr.is_some(),
            Slot::SetAttrObj => self.setattro.is_some(),
            Slot::Str => self.str.is_some(),
        }
    }

    /// Slots this class declares (its capability set)
    pub fn slots(&self) -> SlotSet {
        Slot::ALL.into_iter().filter(|s| self.has(*s)).collect()
    }
}

impl fmt::Debug for ClassContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassContext")
            .field("name", &self.name)
            .field("slots", &self.slots())
            .finish()
    }
}

/// Builder for an immutable `ClassContext`
pub struct ClassContextBuilder {
    ctx: ClassContext,
}

impl ClassContextBuilder {
    pub fn call<F>(mut self, f: F) -> Self
    where
        F: for<'h> Fn(ObjectHandle, &ArgTuple<'h>, &KwArgs<'h>) -> SlotResult<Value>
            + Send
            + Sync
            + 'static,
    {
        self.ctx.call = Some(Arc::new(f));
        self
    }

    pub fn compare<F>(mut self, f: F) -> Self
    where
        F: for<'h> Fn(ObjectHandle, Object<'h>) -> SlotResult<i32> + Send + Sync + 'static,
    {
        self.ctx.compare = Some(Arc::new(f));
        self
    }

    pub fn getattr<F>(mut self, f: F) -> Self
    where
        F: Fn(ObjectHandle, &str) -> SlotResult<Value> + Send + Sync + 'static,
    {
        self.ctx.getattr = Some(Arc::new(f));
        self
    }

    pub fn getattro<F>(mut self, f: F) -> Self
    where
        F: for<'h> Fn(ObjectHandle, Object<'h>) -> SlotResult<Value> + Send + Sync + 'static,
    {
        self.ctx.getattro = Some(Arc::new(f));
        self
    }

    pub fn dealloc<F>(mut self, f: F) -> Self
    where
        F: Fn(ObjectHandle) + Send + Sync + 'static,
    {
        self.ctx.dealloc = Some(Arc::new(f));
        self
    }

    pub fn hash<F>(mut self, f: F) -> Self
    where
        F: Fn(ObjectHandle) -> SlotResult<u32> + Send + Sync + 'static,
    {
        self.ctx.hash = Some(Arc::new(f));
        self
    }

    pub fn init<F>(mut self, f: F) -> Self
    where
        F: for<'h> Fn(ObjectHandle, &ArgTuple<'h>, &KwArgs<'h>) -> SlotResult<()>
            + Send
            + Sync
            + 'static,
    {
        self.ctx.init = Some(Arc::new(f));
        self
    }

    pub fn iter<F>(mut self, f: F) -> Self
    where
        F: Fn(ObjectHandle) -> SlotResult<Value> + Send + Sync + 'static,
    {
        self.ctx.iter = Some(Arc::new(f));
        self
    }

    pub fn iternext<F>(mut self, f: F) -> Self
    where
        F: Fn(ObjectHandle) -> SlotResult<Option<Value>> + Send + Sync + 'static,
    {
        self.ctx.iternext = Some(Arc::new(f));
        self
    }

    pub fn repr<F>(mut self, f: F) -> Self
    where
        F: Fn(ObjectHandle) -> String + Send + Sync + 'static,
    {
        self.ctx.repr = Some(Arc::new(f));
        self
    }

    pub fn richcompare<F>(mut self, f: F) -> Self
    where
        F: for<'h> Fn(ObjectHandle, Object<'h>, CompareOp) -> SlotResult<Value>
            + Send
            + Sync
            + 'static,
    {
        self.ctx.richcmp = Some(Arc::new(f));
        self
    }

    pub fn setattr<F>(mut self, f: F) -> Self
    where
        F: for<'h> Fn(ObjectHandle, &str, Option<Object<'h>>) -> SlotResult<()>
            + Send
            + Sync
            + 'static,
    {
        self.ctx.setattr = Some(Arc::new(f));
        self
    }

    pub fn setattro<F>(mut self, f: F) -> Self
    where
        F: for<'h> Fn(ObjectHandle, Object<'h>, Option<Object<'h>>) -> SlotResult<()>
            + Send
            + Sync
            + 'static,
    {
        self.ctx.setattro = Some(Arc::new(f));
        self
    }

    pub fn str<F>(mut self, f: F) -> Self
    where
        F: Fn(ObjectHandle) -> String + Send + Sync + 'static,
    {
        self.ctx.str = Some(Arc::new(f));
        self
    }

    pub fn build(self) -> ClassContext {
        self.ctx
    }
}
