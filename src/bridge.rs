//! Bridge - host + registry + stats, the state every dispatch reads

use std::sync::Arc;

use crate::config::BridgeConfig;
use crate::context::{ClassContext, Registry};
use crate::dispatch::Dispatcher;
use crate::error::BridgeError;
use crate::ffi::SlotTable;
use crate::host::Host;
use crate::logging::{self, info};
use crate::object::TypeKey;
use crate::stats::DispatchStats;

pub struct Bridge {
    host: Arc<dyn Host>,
    registry: Registry,
    stats: DispatchStats,
    config: BridgeConfig,
}

impl Bridge {
    pub fn new(host: Arc<dyn Host>, config: BridgeConfig) -> Self {
        if let Some(log) = &config.log {
            logging::init_with_config(log.clone());
        }
        info!(event = "bridge_init", trace_dispatch = config.trace_dispatch, "Slot bridge initializing");

        Self {
            host,
            registry: Registry::new(),
            stats: DispatchStats::new(),
            config,
        }
    }

    #[inline]
    pub fn dispatcher(&self) -> Dispatcher<'_> {
        Dispatcher::new(
            self.host.as_ref(),
            &self.registry,
            &self.stats,
            self.config.trace_dispatch,
        )
    }

    /// Register a class and return the slot table to install in its descriptor
    pub fn register(&self, key: TypeKey, ctx: ClassContext) -> Result<SlotTable, BridgeError> {
        let ctx = self.registry.register(key, ctx)?;
        Ok(SlotTable::for_slots(ctx.slots()))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    pub fn host(&self) -> &dyn Host {
        self.host.as_ref()
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }
}
