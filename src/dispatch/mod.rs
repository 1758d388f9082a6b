//! Slot dispatchers - route native slot calls to class callbacks
//!
//! Design: Every slot follows the same four steps:
//! 1. Resolve the class context of the primary instance
//! 2. Select that slot's callback (absent -> SystemError, except dealloc)
//! 3. Wrap the raw arguments in borrowed views and invoke once
//! 4. Marshal the success value, or translate the failure into the
//!    runtime error state plus the slot's sentinel
//!
//! Dispatchers hold no mutable state, so callbacks may re-enter the
//! bridge for the same or other instances.

mod translate;

pub use translate::{
    finish_hash, translate, widen_hash, HASH_ALTERNATE, HASH_FAILED, NULL_RESULT, STATUS_FAILED,
    STATUS_OK,
};

use core::ffi::CStr;
use libc::{c_int, c_long};
use std::sync::Arc;

use crate::context::{ClassContext, Registry, ReprFn};
use crate::error::{SlotError, SlotResult};
use crate::host::Host;
use crate::logging::{error, trace, warn};
use crate::marshal::{unwrap_to_handle, ArgTuple, KwArgs, Object, Value};
use crate::object::ObjectHandle;
use crate::slots::{CompareOp, Slot};
use crate::stats::DispatchStats;

/// Borrowed view of a bridge, exposing one method per protocol slot
#[derive(Clone, Copy)]
pub struct Dispatcher<'b> {
    host: &'b dyn Host,
    registry: &'b Registry,
    stats: &'b DispatchStats,
    trace: bool,
}

impl<'b> Dispatcher<'b> {
    pub fn new(
        host: &'b dyn Host,
        registry: &'b Registry,
        stats: &'b DispatchStats,
        trace: bool,
    ) -> Self {
        Self {
            host,
            registry,
            stats,
            trace,
        }
    }

    /// Slot call: `instance(*args, **kwargs)`
    pub fn call(&self, obj: ObjectHandle, args: ObjectHandle, kwds: ObjectHandle) -> ObjectHandle {
        let outcome = self.begin(Slot::Call, obj).and_then(|ctx| {
            let f = select(&ctx, Slot::Call, &ctx.call)?;
            let args = ArgTuple::wrap(self.host, args);
            let kwargs = KwArgs::wrap(self.host, kwds);
            f(obj, &args, &kwargs)
        });
        self.object_result(Slot::Call, outcome)
    }

    /// Slot compare: three-way comparison against `other`
    pub fn compare(&self, obj: ObjectHandle, other: ObjectHandle) -> c_int {
        let outcome = self.begin(Slot::Compare, obj).and_then(|ctx| {
            let f = select(&ctx, Slot::Compare, &ctx.compare)?;
            let other = self.required(Slot::Compare, other)?;
            f(obj, other)
        });
        match outcome {
            Ok(ordering) => ordering as c_int,
            Err(err) => self.fail(Slot::Compare, err, STATUS_FAILED),
        }
    }

    /// Slot getattr: attribute lookup by C string name
    pub fn getattr(&self, obj: ObjectHandle, name: Option<&CStr>) -> ObjectHandle {
        let outcome = self.begin(Slot::GetAttr, obj).and_then(|ctx| {
            let f = select(&ctx, Slot::GetAttr, &ctx.getattr)?;
            let name = attr_name(name)?;
            f(obj, name)
        });
        self.object_result(Slot::GetAttr, outcome)
    }

    /// Slot getattro: attribute lookup by name object
    pub fn getattro(&self, obj: ObjectHandle, name: ObjectHandle) -> ObjectHandle {
        let outcome = self.begin(Slot::GetAttrObj, obj).and_then(|ctx| {
            let f = select(&ctx, Slot::GetAttrObj, &ctx.getattro)?;
            let name = self.required(Slot::GetAttrObj, name)?;
            f(obj, name)
        });
        self.object_result(Slot::GetAttrObj, outcome)
    }

    /// Slot dealloc: user callback, or the host's default release
    ///
    /// Has no error channel; an unregistered type also takes the default path.
    pub fn dealloc(&self, obj: ObjectHandle) {
        self.enter(Slot::Dealloc, obj);
        if obj.is_null() {
            error!(event = "dealloc_null", "Dealloc invoked with a null instance");
            return;
        }

        let key = self.host.type_of(obj);
        let callback = match self.registry.get(key) {
            Some(ctx) => ctx.dealloc.clone(),
            None => {
                warn!(event = "dealloc_unregistered", type_key = %key, "Dealloc for unregistered type");
                None
            }
        };

        match callback {
            Some(f) => f(obj),
            None => {
                self.stats.record_default_dealloc();
                self.host.default_deallocate(obj);
            }
        }
    }

    /// Slot hash: widened callback hash, never equal to the failure code
    pub fn hash(&self, obj: ObjectHandle) -> c_long {
        let outcome = self.begin(Slot::Hash, obj).and_then(|ctx| {
            let f = select(&ctx, Slot::Hash, &ctx.hash)?;
            f(obj)
        });
        match outcome {
            Ok(value) => finish_hash(widen_hash(value)),
            Err(err) => self.fail(Slot::Hash, err, HASH_FAILED),
        }
    }

    /// Slot init: `__init__(*args, **kwargs)`
    pub fn init(&self, obj: ObjectHandle, args: ObjectHandle, kwds: ObjectHandle) -> c_int {
        let outcome = self.begin(Slot::Init, obj).and_then(|ctx| {
            let f = select(&ctx, Slot::Init, &ctx.init)?;
            let args = ArgTuple::wrap(self.host, args);
            let kwargs = KwArgs::wrap(self.host, kwds);
            f(obj, &args, &kwargs)
        });
        self.status_result(Slot::Init, outcome)
    }

    /// Slot iter: produce an iterator object
    pub fn iter(&self, obj: ObjectHandle) -> ObjectHandle {
        let outcome = self.begin(Slot::Iter, obj).and_then(|ctx| {
            let f = select(&ctx, Slot::Iter, &ctx.iter)?;
            f(obj)
        });
        self.object_result(Slot::Iter, outcome)
    }

    /// Slot iternext: next item, or null with no error set when exhausted
    pub fn iternext(&self, obj: ObjectHandle) -> ObjectHandle {
        let outcome = self.begin(Slot::IterNext, obj).and_then(|ctx| {
            let f = select(&ctx, Slot::IterNext, &ctx.iternext)?;
            f(obj)
        });
        match outcome {
            Ok(Some(value)) => self.object_result(Slot::IterNext, Ok(value)),
            Ok(None) => {
                self.stats.record_exhaustion();
                NULL_RESULT
            }
            Err(err) => self.fail(Slot::IterNext, err, NULL_RESULT),
        }
    }

    /// Slot repr: new native string from the callback's text
    pub fn repr(&self, obj: ObjectHandle) -> ObjectHandle {
        self.text(Slot::Repr, obj, |ctx| &ctx.repr)
    }

    /// Slot richcompare: comparison result object for `op`
    pub fn richcompare(&self, obj: ObjectHandle, other: ObjectHandle, op: c_int) -> ObjectHandle {
        let outcome = self.begin(Slot::RichCompare, obj).and_then(|ctx| {
            let f = select(&ctx, Slot::RichCompare, &ctx.richcmp)?;
            let other = self.required(Slot::RichCompare, other)?;
            let op = CompareOp::from_raw(op).ok_or_else(|| {
                SlotError::system_error(format!("invalid comparison operator {}", op))
            })?;
            f(obj, other, op)
        });
        self.object_result(Slot::RichCompare, outcome)
    }

    /// Slot setattr: set (or delete, when `value` is null) by C string name
    pub fn setattr(&self, obj: ObjectHandle, name: Option<&CStr>, value: ObjectHandle) -> c_int {
        let outcome = self.begin(Slot::SetAttr, obj).and_then(|ctx| {
            let f = select(&ctx, Slot::SetAttr, &ctx.setattr)?;
            let name = attr_name(name)?;
            f(obj, name, Object::wrap(self.host, value))
        });
        self.status_result(Slot::SetAttr, outcome)
    }

    /// Slot setattro: set (or delete, when `value` is null) by name object
    pub fn setattro(&self, obj: ObjectHandle, name: ObjectHandle, value: ObjectHandle) -> c_int {
        let outcome = self.begin(Slot::SetAttrObj, obj).and_then(|ctx| {
            let f = select(&ctx, Slot::SetAttrObj, &ctx.setattro)?;
            let name = self.required(Slot::SetAttrObj, name)?;
            f(obj, name, Object::wrap(self.host, value))
        });
        self.status_result(Slot::SetAttrObj, outcome)
    }

    /// Slot str: new native string from the callback's text
    pub fn str(&self, obj: ObjectHandle) -> ObjectHandle {
        self.text(Slot::Str, obj, |ctx| &ctx.str)
    }

    // ------------------------------------------------------------------
    // Shared steps
    // ------------------------------------------------------------------

    #[inline]
    fn enter(&self, slot: Slot, obj: ObjectHandle) {
        self.stats.record_dispatch();
        if self.trace {
            trace!(event = "slot_dispatch", slot = slot.name(), instance = ?obj);
        }
    }

    fn begin(&self, slot: Slot, obj: ObjectHandle) -> SlotResult<Arc<ClassContext>> {
        self.enter(slot, obj);
        self.registry.lookup(self.host, obj)
    }

    fn required(&self, slot: Slot, handle: ObjectHandle) -> SlotResult<Object<'b>> {
        Object::wrap(self.host, handle).ok_or_else(|| {
            SlotError::system_error(format!("{} received a NULL argument", slot.name()))
        })
    }

    fn text<F>(&self, slot: Slot, obj: ObjectHandle, field: F) -> ObjectHandle
    where
        F: for<'c> Fn(&'c ClassContext) -> &'c Option<Arc<ReprFn>>,
    {
        let outcome = self.begin(slot, obj).and_then(|ctx| {
            let f = select(&ctx, slot, field(ctx.as_ref()))?;
            let text = f(obj);
            self.host.new_string(&text)
        });
        match outcome {
            Ok(handle) => handle,
            Err(err) => self.fail(slot, err, NULL_RESULT),
        }
    }

    fn object_result(&self, slot: Slot, outcome: SlotResult<Value>) -> ObjectHandle {
        match outcome.and_then(|value| unwrap_to_handle(self.host, value)) {
            Ok(handle) => handle,
            Err(err) => self.fail(slot, err, NULL_RESULT),
        }
    }

    fn status_result(&self, slot: Slot, outcome: SlotResult<()>) -> c_int {
        match outcome {
            Ok(()) => STATUS_OK,
            Err(err) => self.fail(slot, err, STATUS_FAILED),
        }
    }

    fn fail<R>(&self, slot: Slot, err: SlotError, sentinel: R) -> R {
        self.stats.record_failure();
        translate(self.host, slot, err, sentinel)
    }
}

/// The slot's callback, or a SystemError if the class never declared it
fn select<T: ?Sized>(ctx: &ClassContext, slot: Slot, field: &Option<Arc<T>>) -> SlotResult<Arc<T>> {
    field.clone().ok_or_else(|| {
        error!(event = "slot_missing", class = ctx.name(), slot = slot.name(), "Slot has no callback");
        SlotError::system_error(format!("{} does not implement {}", ctx.name(), slot.name()))
    })
}

fn attr_name(name: Option<&CStr>) -> SlotResult<&str> {
    let name = name.ok_or_else(|| SlotError::system_error("attribute name is NULL"))?;
    name.to_str()
        .map_err(|_| SlotError::type_error("attribute name must be valid UTF-8"))
}
