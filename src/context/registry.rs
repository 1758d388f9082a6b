//! Context registry - runtime type -> class context
//!
//! Lookups run on every slot call, so they are a single sharded hash
//! probe. The returned `Arc` is cloned out before any callback runs; no
//! shard guard is ever held across user code, which keeps nested
//! dispatches (and registrations from inside callbacks) deadlock free.
//!
//! A type's context is fixed once registered: a second registration for
//! the same key is rejected, and there is no removal.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

use super::ClassContext;
use crate::error::{BridgeError, SlotError, SlotResult};
use crate::host::Host;
use crate::logging::{debug, error, warn};
use crate::object::{ObjectHandle, TypeKey};

#[derive(Default)]
pub struct Registry {
    contexts: DashMap<TypeKey, Arc<ClassContext>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `ctx` for `key`; an already registered key keeps its context
    pub fn register(&self, key: TypeKey, ctx: ClassContext) -> Result<Arc<ClassContext>, BridgeError> {
        match self.contexts.entry(key) {
            Entry::Occupied(existing) => {
                warn!(
                    event = "register_duplicate",
                    type_key = %key,
                    class = ctx.name(),
                    registered = existing.get().name(),
                    "Class already registered"
                );
                Err(BridgeError::AlreadyRegistered(key))
            }
            Entry::Vacant(slot) => {
                debug!(type_key = %key, class = ctx.name(), slots = ?ctx.slots(), "Class registered");
                let ctx = Arc::new(ctx);
                slot.insert(Arc::clone(&ctx));
                Ok(ctx)
            }
        }
    }

    pub fn contains(&self, key: TypeKey) -> bool {
        self.contexts.contains_key(&key)
    }

    pub fn get(&self, key: TypeKey) -> Option<Arc<ClassContext>> {
        self.contexts.get(&key).map(|entry| Arc::clone(entry.value()))
    }

    /// Class context of the instance's runtime type
    ///
    /// An unregistered type means a descriptor was wired to this bridge
    /// without a context; that surfaces as a SystemError.
    pub fn lookup(&self, host: &dyn Host, obj: ObjectHandle) -> SlotResult<Arc<ClassContext>> {
        if obj.is_null() {
            error!(event = "lookup_null", "Slot invoked with a null instance");
            return Err(SlotError::system_error("slot invoked with a NULL instance"));
        }

        let key = host.type_of(obj);
        self.get(key).ok_or_else(|| {
            error!(event = "lookup_miss", type_key = %key, "No class context registered");
            SlotError::system_error(format!("no class context registered for {}", key))
        })
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}
