//! `ajaxgate-events` — responder channels and dispatch notifications.
//!
//! - `filter`: ordered, wildcard-capable responder channels (chained reduction)
//! - `bus` / `in_memory_bus`: pub/sub distribution of `DispatchRecord`s

pub mod bus;
pub mod filter;
pub mod in_memory_bus;
pub mod record;

pub use bus::{EventBus, Subscription};
pub use filter::{
    ChannelPattern, DEFAULT_PRIORITY, Filter, FilterRegistry, FilterRegistryBuilder,
};
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use record::DispatchRecord;
